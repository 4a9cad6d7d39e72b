// In: src/validation.rs

//! The configuration validator for image features.
//!
//! Four independent, pure checks run in a fixed order during construction:
//! encoding format membership, dtype compatibility, shape/channel
//! compatibility, and colormap compatibility. Each check either returns the
//! accepted value or an `InvalidConfiguration` error; nothing is ever left
//! half-validated.

use crate::config::ImageFeatureConfig;
use crate::error::ImgcolError;
use crate::types::{EncodingFormat, ImageDType, Shape};

//==================================================================================
// 1. Acceptance Tables
//==================================================================================

/// Channel counts each format can serialize. `None` (unset format) is unrestricted.
pub fn acceptable_channels(format: Option<EncodingFormat>) -> Option<&'static [usize]> {
    match format {
        Some(EncodingFormat::Png) => Some(&[0, 1, 2, 3, 4][..]),
        Some(EncodingFormat::Jpeg) => Some(&[0, 1, 3][..]),
        None => None,
    }
}

/// Pixel dtypes each format can serialize. `None` (unset format) is unrestricted.
pub fn acceptable_dtypes(format: Option<EncodingFormat>) -> Option<&'static [ImageDType]> {
    match format {
        Some(EncodingFormat::Png) => Some(&[ImageDType::UInt8, ImageDType::UInt16][..]),
        Some(EncodingFormat::Jpeg) => Some(&[ImageDType::UInt8][..]),
        None => None,
    }
}

/// Channel count of every frame in a frame sequence.
pub const SEQUENCE_CHANNELS: usize = 3;

//==================================================================================
// 2. Individual Checks
//==================================================================================

/// Checks membership of a raw format name in the supported set.
pub fn validate_encoding_format(
    encoding_format: Option<&str>,
) -> Result<Option<EncodingFormat>, ImgcolError> {
    encoding_format
        .map(|name| name.parse::<EncodingFormat>())
        .transpose()
}

pub fn validate_dtype(
    dtype: ImageDType,
    encoding_format: Option<EncodingFormat>,
) -> Result<ImageDType, ImgcolError> {
    if let Some(acceptable) = acceptable_dtypes(encoding_format) {
        if !acceptable.contains(&dtype) {
            return Err(ImgcolError::InvalidConfiguration(format!(
                "Acceptable `dtype` for {}: {} (was {})",
                describe_format(encoding_format),
                join(acceptable.iter().map(|d| d.to_string())),
                dtype
            )));
        }
    }
    Ok(dtype)
}

pub fn validate_shape(
    shape: Shape,
    encoding_format: Option<EncodingFormat>,
) -> Result<Shape, ImgcolError> {
    match shape.rank() {
        3 => {}
        4 => {
            if shape.channels() != Some(SEQUENCE_CHANNELS) {
                return Err(ImgcolError::InvalidConfiguration(format!(
                    "Frame sequences must have {} channels. Got: {}",
                    SEQUENCE_CHANNELS, shape
                )));
            }
        }
        _ => {
            return Err(ImgcolError::InvalidConfiguration(format!(
                "Image shape must be (height, width, channels) or \
                 (frames, height, width, channels). Got: {}",
                shape
            )))
        }
    }

    if let Some(acceptable) = acceptable_channels(encoding_format) {
        // An unknown channel count is never in the acceptable set.
        let ok = shape.channels().map_or(false, |c| acceptable.contains(&c));
        if !ok {
            let channels = shape
                .channels()
                .map_or_else(|| "None".to_string(), |c| c.to_string());
            return Err(ImgcolError::InvalidConfiguration(format!(
                "Acceptable `channels` for {}: {} (was {})",
                describe_format(encoding_format),
                join(acceptable.iter().map(|c| c.to_string())),
                channels
            )));
        }
    }
    Ok(shape)
}

pub fn validate_colormap(
    use_colormap: bool,
    shape: &Shape,
    encoding_format: Option<EncodingFormat>,
) -> Result<bool, ImgcolError> {
    if use_colormap {
        if let Some(format) = encoding_format {
            if format != EncodingFormat::Png {
                return Err(ImgcolError::InvalidConfiguration(format!(
                    "Colormap is only available for PNG images. Got: {}",
                    format
                )));
            }
        }
        if shape.channels() != Some(1) {
            return Err(ImgcolError::InvalidConfiguration(format!(
                "Colormap is only available for gray-scale images. Got: {}",
                shape
            )));
        }
    }
    Ok(use_colormap)
}

//==================================================================================
// 3. Ordered Driver
//==================================================================================

/// Applies defaults and runs every check in order, producing a fully valid
/// configuration or the first violation.
///
/// Missing shape defaults to `(None, None, 3)` and missing dtype to `uint8`.
pub fn validate(
    shape: Option<Shape>,
    dtype: Option<ImageDType>,
    encoding_format: Option<&str>,
    use_colormap: bool,
) -> Result<ImageFeatureConfig, ImgcolError> {
    let shape = shape.unwrap_or_default();
    let dtype = dtype.unwrap_or_default();

    let encoding_format = validate_encoding_format(encoding_format)?;
    let dtype = validate_dtype(dtype, encoding_format)?;
    let shape = validate_shape(shape, encoding_format)?;
    let use_colormap = validate_colormap(use_colormap, &shape, encoding_format)?;

    Ok(ImageFeatureConfig::from_validated(
        shape,
        dtype,
        encoding_format,
        use_colormap,
    ))
}

fn describe_format(format: Option<EncodingFormat>) -> &'static str {
    format.map_or("unset format", |f| f.name())
}

fn join(items: impl Iterator<Item = String>) -> String {
    format!("[{}]", items.collect::<Vec<_>>().join(", "))
}

//==================================================================================
// 4. Unit Tests
//==================================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn rgb() -> Option<Shape> {
        Some(Shape::new(vec![None, None, Some(3)]))
    }

    fn channels(c: usize) -> Option<Shape> {
        Some(Shape::new(vec![None, None, Some(c)]))
    }

    fn is_invalid<T: std::fmt::Debug>(result: Result<T, ImgcolError>) -> bool {
        matches!(result, Err(ImgcolError::InvalidConfiguration(_)))
    }

    #[test]
    fn test_format_dtype_acceptance_table_is_exhaustive() {
        let formats = [None, Some("png"), Some("jpeg")];
        let dtypes = [ImageDType::UInt8, ImageDType::UInt16];
        for format in formats {
            for dtype in dtypes {
                let expected_ok = !(format == Some("jpeg") && dtype == ImageDType::UInt16);
                let result = validate(rgb(), Some(dtype), format, false);
                assert_eq!(
                    result.is_ok(),
                    expected_ok,
                    "format={:?} dtype={:?}",
                    format,
                    dtype
                );
            }
        }
    }

    #[test]
    fn test_channel_acceptance_per_format() {
        for c in 0..=5 {
            assert_eq!(validate(channels(c), None, Some("png"), false).is_ok(), c <= 4);
            assert_eq!(
                validate(channels(c), None, Some("jpeg"), false).is_ok(),
                matches!(c, 0 | 1 | 3)
            );
            // Unset format does not restrict channels.
            assert!(validate(channels(c), None, None, false).is_ok());
        }
    }

    #[test]
    fn test_unknown_channels_rejected_only_when_format_is_set() {
        let shape = Some(Shape::new(vec![None, None, None]));
        assert!(validate(shape.clone(), None, None, false).is_ok());
        assert!(is_invalid(validate(shape, None, Some("png"), false)));
    }

    #[test]
    fn test_unsupported_format_name() {
        assert!(is_invalid(validate(None, None, Some("webp"), false)));
    }

    #[test]
    fn test_format_is_checked_before_dtype() {
        let err = validate(None, Some(ImageDType::UInt16), Some("gif"), false).unwrap_err();
        assert!(err.to_string().contains("encoding_format"));
    }

    #[test]
    fn test_colormap_rules() {
        // Valid: grayscale, png or unset.
        assert!(validate(channels(1), None, None, true).is_ok());
        assert!(validate(channels(1), None, Some("png"), true).is_ok());
        // Invalid: jpeg, or any channel count other than 1.
        assert!(is_invalid(validate(channels(1), None, Some("jpeg"), true)));
        for c in [0, 2, 3, 4] {
            assert!(is_invalid(validate(channels(c), None, None, true)));
            assert!(is_invalid(validate(channels(c), None, Some("png"), true)));
        }
        // Disabled colormap never fails this check.
        assert!(validate(channels(3), None, Some("jpeg"), false).is_ok());
    }

    #[test]
    fn test_defaults_applied() {
        let cfg = validate(None, None, None, false).unwrap();
        assert_eq!(cfg.shape(), &Shape::default());
        assert_eq!(cfg.dtype(), ImageDType::UInt8);
        assert_eq!(cfg.encoding_format(), None);
        assert!(!cfg.use_colormap());
    }

    #[test]
    fn test_shape_rank_rules() {
        assert!(is_invalid(validate(Some(Shape::new(vec![None, Some(3)])), None, None, false)));
        let frames_rgb = Shape::new(vec![None, None, None, Some(3)]);
        assert!(validate(Some(frames_rgb), None, None, false).is_ok());
        let frames_gray = Shape::new(vec![None, None, None, Some(1)]);
        assert!(is_invalid(validate(Some(frames_gray), None, None, false)));
    }
}
