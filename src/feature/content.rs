//! The content dictionary: a plain key-value snapshot of an image feature's
//! configuration, persisted alongside dataset metadata.
//!
//! ```json
//! { "shape": [null, null, 3], "dtype": "uint8", "encoding_format": "png", "use_colormap": false }
//! ```
//!
//! Decoding a dictionary performs no validation by itself; building a
//! configuration from it goes through the validator.

use serde::{Deserialize, Serialize};

use crate::config::ImageFeatureConfig;
use crate::error::ImgcolError;
use crate::types::Shape;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ContentDict {
    pub shape: Vec<Option<usize>>,
    pub dtype: String,
    #[serde(default)]
    pub encoding_format: Option<String>,
    /// Older metadata may omit this key; absent means `false`.
    #[serde(default)]
    pub use_colormap: Option<bool>,
}

impl ContentDict {
    pub fn to_json(&self) -> Result<String, ImgcolError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, ImgcolError> {
        Ok(serde_json::from_str(json)?)
    }

    /// The dictionary as a generic JSON object.
    pub fn to_value(&self) -> Result<serde_json::Value, ImgcolError> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn from_value(value: serde_json::Value) -> Result<Self, ImgcolError> {
        Ok(serde_json::from_value(value)?)
    }
}

impl From<&ImageFeatureConfig> for ContentDict {
    fn from(config: &ImageFeatureConfig) -> Self {
        Self {
            shape: config.shape().dims().to_vec(),
            dtype: config.dtype().name().to_string(),
            encoding_format: config.encoding_format().map(|f| f.name().to_string()),
            use_colormap: Some(config.use_colormap()),
        }
    }
}

impl TryFrom<ContentDict> for ImageFeatureConfig {
    type Error = ImgcolError;

    fn try_from(dict: ContentDict) -> Result<Self, Self::Error> {
        ImageFeatureConfig::from_names(
            Some(Shape::new(dict.shape)),
            Some(&dict.dtype),
            dict.encoding_format.as_deref(),
            dict.use_colormap.unwrap_or(false),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_layout() {
        let dict = ContentDict::from(&ImageFeatureConfig::default());
        let value = dict.to_value().unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "shape": [null, null, 3],
                "dtype": "uint8",
                "encoding_format": null,
                "use_colormap": false,
            })
        );
    }

    #[test]
    fn test_missing_optional_keys() {
        let dict = ContentDict::from_json(r#"{"shape": [null, null, 1], "dtype": "uint16"}"#).unwrap();
        assert_eq!(dict.encoding_format, None);
        assert_eq!(dict.use_colormap, None);
        let cfg = ImageFeatureConfig::try_from(dict).unwrap();
        assert!(!cfg.use_colormap());
    }

    #[test]
    fn test_invalid_dict_fails_validation() {
        let dict = ContentDict {
            shape: vec![None, None, Some(4)],
            dtype: "uint8".into(),
            encoding_format: Some("jpeg".into()),
            use_colormap: None,
        };
        assert!(matches!(
            ImageFeatureConfig::try_from(dict),
            Err(ImgcolError::InvalidConfiguration(_))
        ));
    }
}
