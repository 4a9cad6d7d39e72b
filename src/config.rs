// In: src/config.rs

//! Configuration for image features and their previews.
//!
//! `ImageFeatureConfig` is the validated, immutable description of one image
//! column. It is created once at schema-definition time and only through the
//! validator, so a value of this type is always internally consistent.
//!
//! `PreviewConfig` holds the tunables of the HTML preview renderer. Like every
//! other configuration struct in this crate it is plain `serde` data with
//! field-level defaults, so it can be loaded from a partial JSON document.

use serde::{Deserialize, Serialize};

use crate::error::ImgcolError;
use crate::types::{EncodingFormat, ImageDType, Shape};
use crate::validation;

//==================================================================================
// I. Image Feature Configuration
//==================================================================================

/// The validated configuration of a single image feature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFeatureConfig {
    shape: Shape,
    dtype: ImageDType,
    encoding_format: Option<EncodingFormat>,
    use_colormap: bool,
}

impl ImageFeatureConfig {
    /// Validates and builds a configuration. See [`validation::validate`] for
    /// the defaults and the order of checks.
    pub fn new(
        shape: Option<Shape>,
        dtype: Option<ImageDType>,
        encoding_format: Option<EncodingFormat>,
        use_colormap: bool,
    ) -> Result<Self, ImgcolError> {
        validation::validate(
            shape,
            dtype,
            encoding_format.as_ref().map(EncodingFormat::name),
            use_colormap,
        )
    }

    /// Like [`ImageFeatureConfig::new`], but takes the format and dtype by name,
    /// as they appear in persisted metadata or foreign callers.
    pub fn from_names(
        shape: Option<Shape>,
        dtype: Option<&str>,
        encoding_format: Option<&str>,
        use_colormap: bool,
    ) -> Result<Self, ImgcolError> {
        // Format membership is the first check, so it runs before the dtype name is parsed.
        validation::validate_encoding_format(encoding_format)?;
        let dtype = dtype.map(|name| name.parse::<ImageDType>()).transpose()?;
        validation::validate(shape, dtype, encoding_format, use_colormap)
    }

    pub(crate) fn from_validated(
        shape: Shape,
        dtype: ImageDType,
        encoding_format: Option<EncodingFormat>,
        use_colormap: bool,
    ) -> Self {
        Self {
            shape,
            dtype,
            encoding_format,
            use_colormap,
        }
    }

    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    pub fn dtype(&self) -> ImageDType {
        self.dtype
    }

    /// The format as configured. `None` is kept as-is even though encode
    /// writes PNG in that case.
    pub fn encoding_format(&self) -> Option<EncodingFormat> {
        self.encoding_format
    }

    pub fn use_colormap(&self) -> bool {
        self.use_colormap
    }
}

impl Default for ImageFeatureConfig {
    /// `(None, None, 3)`, `uint8`, no format, no colormap.
    fn default() -> Self {
        Self::from_validated(Shape::default(), ImageDType::UInt8, None, false)
    }
}

//==================================================================================
// II. Preview Configuration
//==================================================================================

/// Settings for the HTML preview renderer.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub struct PreviewConfig {
    /// Longest side of a thumbnail, in pixels. Larger images are shrunk.
    #[serde(default = "default_thumbnail_size")]
    pub thumbnail_size: u32,

    /// Frames per second of the rendered animation (GIF or mp4).
    #[serde(default = "default_framerate")]
    pub framerate: u32,

    /// `width` attribute of the emitted `<video>` tag.
    #[serde(default = "default_video_width")]
    pub video_width: u32,

    /// Name or path of the external video encoder binary.
    #[serde(default = "default_ffmpeg_binary")]
    pub ffmpeg_binary: String,
}

impl PreviewConfig {
    /// Parses a (possibly partial) JSON document; missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ImgcolError> {
        let config: Self = serde_json::from_str(json)?;
        if config.framerate == 0 {
            return Err(ImgcolError::InvalidConfiguration(
                "preview `framerate` must be at least 1".to_string(),
            ));
        }
        Ok(config)
    }

    /// The framerate actually used for rendering; never 0.
    pub fn effective_framerate(&self) -> u32 {
        self.framerate.max(1)
    }

    /// Milliseconds each animation frame is shown for.
    pub fn frame_delay_ms(&self) -> u32 {
        1000 / self.effective_framerate()
    }
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            thumbnail_size: default_thumbnail_size(),
            framerate: default_framerate(),
            video_width: default_video_width(),
            ffmpeg_binary: default_ffmpeg_binary(),
        }
    }
}

/// Helper for `serde` to provide a default for `thumbnail_size`.
fn default_thumbnail_size() -> u32 {
    128
}

fn default_framerate() -> u32 {
    10
}

fn default_video_width() -> u32 {
    175
}

fn default_ffmpeg_binary() -> String {
    "ffmpeg".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_config_partial_json_uses_defaults() {
        let cfg = PreviewConfig::from_json(r#"{ "framerate": 25 }"#).unwrap();
        assert_eq!(cfg.framerate, 25);
        assert_eq!(cfg.thumbnail_size, 128);
        assert_eq!(cfg.ffmpeg_binary, "ffmpeg");
        assert_eq!(cfg.frame_delay_ms(), 40);
    }

    #[test]
    fn test_zero_framerate() {
        let err = PreviewConfig::from_json(r#"{ "framerate": 0 }"#).unwrap_err();
        assert!(matches!(err, ImgcolError::InvalidConfiguration(_)));

        // Built in code, a zero framerate is clamped rather than passed through.
        let cfg = PreviewConfig {
            framerate: 0,
            ..Default::default()
        };
        assert_eq!(cfg.effective_framerate(), 1);
        assert_eq!(cfg.frame_delay_ms(), 1000);
    }

    #[test]
    fn test_default_frame_delay() {
        assert_eq!(PreviewConfig::default().frame_delay_ms(), 100);
    }

    #[test]
    fn test_from_names_rejects_bad_dtype_name() {
        let err = ImageFeatureConfig::from_names(None, Some("int8"), None, false).unwrap_err();
        assert!(matches!(err, ImgcolError::InvalidConfiguration(_)));
    }

    #[test]
    fn test_typed_and_named_constructors_agree() {
        let typed = ImageFeatureConfig::new(
            Some(Shape::new(vec![None, None, Some(1)])),
            Some(ImageDType::UInt16),
            Some(EncodingFormat::Png),
            true,
        )
        .unwrap();
        let named = ImageFeatureConfig::from_names(
            Some(Shape::new(vec![None, None, Some(1)])),
            Some("uint16"),
            Some("png"),
            true,
        )
        .unwrap();
        assert_eq!(typed, named);
        assert_eq!(ImageFeatureConfig::default(), ImageFeatureConfig::new(None, None, None, false).unwrap());
    }
}
