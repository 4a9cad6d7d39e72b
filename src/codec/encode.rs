//! This module contains the stateless encoders that turn a `(height, width,
//! channels)` pixel array into PNG or JPEG bytes.
//!
//! Both functions are safe, panic-free wrappers around the `image` crate.
//! Channel counts map onto color types as 1 -> L, 2 -> LA, 3 -> RGB, 4 -> RGBA.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageBuffer, ImageFormat};

use crate::error::ImgcolError;
use crate::types::{ImageDType, PixelArray};

//==================================================================================
// 1. Private Core Logic
//==================================================================================

/// Splits a rank-3 shape into `(height, width, channels)`.
pub(crate) fn hwc(shape: &[usize]) -> Result<(u32, u32, usize), ImgcolError> {
    match *shape {
        [h, w, c] => {
            let to_u32 = |d: usize| {
                u32::try_from(d).map_err(|_| {
                    ImgcolError::UnsupportedInput(format!("dimension {} is too large", d))
                })
            };
            Ok((to_u32(h)?, to_u32(w)?, c))
        }
        _ => Err(ImgcolError::UnsupportedInput(format!(
            "single-image codecs require a (height, width, channels) array, got shape {:?}",
            shape
        ))),
    }
}

/// Wraps a rank-3 pixel array into the matching `DynamicImage` variant.
pub(crate) fn to_dynamic_image(array: &PixelArray) -> Result<DynamicImage, ImgcolError> {
    let (height, width, channels) = hwc(array.shape())?;

    let image = match array {
        PixelArray::UInt8(a) => {
            let raw: Vec<u8> = a.iter().copied().collect();
            match channels {
                1 => ImageBuffer::from_raw(width, height, raw).map(DynamicImage::ImageLuma8),
                2 => ImageBuffer::from_raw(width, height, raw).map(DynamicImage::ImageLumaA8),
                3 => ImageBuffer::from_raw(width, height, raw).map(DynamicImage::ImageRgb8),
                4 => ImageBuffer::from_raw(width, height, raw).map(DynamicImage::ImageRgba8),
                _ => None,
            }
        }
        PixelArray::UInt16(a) => {
            let raw: Vec<u16> = a.iter().copied().collect();
            match channels {
                1 => ImageBuffer::from_raw(width, height, raw).map(DynamicImage::ImageLuma16),
                2 => ImageBuffer::from_raw(width, height, raw).map(DynamicImage::ImageLumaA16),
                3 => ImageBuffer::from_raw(width, height, raw).map(DynamicImage::ImageRgb16),
                4 => ImageBuffer::from_raw(width, height, raw).map(DynamicImage::ImageRgba16),
                _ => None,
            }
        }
    };

    image.ok_or_else(|| {
        ImgcolError::UnsupportedInput(format!(
            "cannot build an image from {} samples with {} channels",
            array.dtype(),
            channels
        ))
    })
}

//==================================================================================
// 2. Public API
//==================================================================================

/// Encodes a rank-3 `uint8` or `uint16` array as PNG. Lossless.
pub fn encode_png(array: &PixelArray) -> Result<Vec<u8>, ImgcolError> {
    let image = to_dynamic_image(array)?;
    let mut out = Cursor::new(Vec::new());
    image.write_to(&mut out, ImageFormat::Png)?;
    Ok(out.into_inner())
}

/// Encodes a rank-3 `uint8` array with 1 or 3 channels as baseline JPEG.
pub fn encode_jpeg(array: &PixelArray, quality: u8) -> Result<Vec<u8>, ImgcolError> {
    if array.dtype() != ImageDType::UInt8 {
        return Err(ImgcolError::UnsupportedInput(format!(
            "JPEG can only encode uint8 images (got {})",
            array.dtype()
        )));
    }
    let (_, _, channels) = hwc(array.shape())?;
    if !matches!(channels, 1 | 3) {
        return Err(ImgcolError::UnsupportedInput(format!(
            "JPEG can only encode 1 or 3 channels (got {})",
            channels
        )));
    }

    let image = to_dynamic_image(array)?;
    let mut out = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut out, quality);
    image.write_with_encoder(encoder)?;
    Ok(out)
}

//==================================================================================
// 3. Unit Tests
//==================================================================================
