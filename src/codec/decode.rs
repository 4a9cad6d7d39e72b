//! Format-sniffing decoder for serialized image records.
//!
//! The container format is always detected from the bytes themselves, never
//! from the feature configuration: a column configured as JPEG may still hold
//! PNG or GIF records if they were ingested from files.

use std::io::Cursor;

use image::codecs::gif::GifDecoder;
use image::{AnimationDecoder, DynamicImage, ImageFormat};

use crate::error::ImgcolError;
use crate::types::{ImageDType, PixelArray};

/// Containers this decoder accepts.
pub const SUPPORTED_FORMATS: [ImageFormat; 4] = [
    ImageFormat::Png,
    ImageFormat::Jpeg,
    ImageFormat::Gif,
    ImageFormat::Bmp,
];

/// Channel counts a GIF can be decoded into.
const GIF_CHANNELS: [usize; 2] = [0, 3];

fn decode_err(err: impl std::fmt::Display) -> ImgcolError {
    ImgcolError::DecodeError(err.to_string())
}

/// Detects the container format from the leading signature bytes.
pub fn sniff_format(bytes: &[u8]) -> Result<ImageFormat, ImgcolError> {
    let format = image::guess_format(bytes).map_err(decode_err)?;
    if SUPPORTED_FORMATS.contains(&format) {
        Ok(format)
    } else {
        Err(ImgcolError::DecodeError(format!(
            "unsupported image container {:?}; expected one of PNG, JPEG, GIF, BMP",
            format
        )))
    }
}

/// Decodes `bytes` into a pixel array with the requested channel count and dtype.
///
/// `channels == 0` keeps the native channel count of the stored image. Still
/// images come back as `(height, width, channels)`, GIFs as
/// `(frames, height, width, 3)`.
pub fn decode_image(
    bytes: &[u8],
    channels: usize,
    dtype: ImageDType,
) -> Result<PixelArray, ImgcolError> {
    match sniff_format(bytes)? {
        ImageFormat::Gif => decode_gif_frames(bytes, channels, dtype),
        format => {
            let image = image::load_from_memory_with_format(bytes, format).map_err(decode_err)?;
            decode_still(image, channels, dtype)
        }
    }
}

fn decode_still(
    image: DynamicImage,
    channels: usize,
    dtype: ImageDType,
) -> Result<PixelArray, ImgcolError> {
    let channels = if channels == 0 {
        usize::from(image.color().channel_count())
    } else {
        channels
    };
    let shape = [image.height() as usize, image.width() as usize, channels];

    match dtype {
        ImageDType::UInt8 => {
            let samples = match channels {
                1 => image.into_luma8().into_raw(),
                2 => image.into_luma_alpha8().into_raw(),
                3 => image.into_rgb8().into_raw(),
                4 => image.into_rgba8().into_raw(),
                other => return Err(unsupported_channels(other)),
            };
            PixelArray::from_u8_samples(&shape, samples)
        }
        ImageDType::UInt16 => {
            let samples = match channels {
                1 => image.into_luma16().into_raw(),
                2 => image.into_luma_alpha16().into_raw(),
                3 => image.into_rgb16().into_raw(),
                4 => image.into_rgba16().into_raw(),
                other => return Err(unsupported_channels(other)),
            };
            PixelArray::from_u16_samples(&shape, samples)
        }
    }
}

fn decode_gif_frames(
    bytes: &[u8],
    channels: usize,
    dtype: ImageDType,
) -> Result<PixelArray, ImgcolError> {
    if !GIF_CHANNELS.contains(&channels) {
        return Err(ImgcolError::DecodeError(format!(
            "GIF images can only be decoded with 0 or 3 channels (got {})",
            channels
        )));
    }

    let decoder = GifDecoder::new(Cursor::new(bytes)).map_err(decode_err)?;
    let frames = decoder.into_frames().collect_frames().map_err(decode_err)?;
    let (width, height) = match frames.first() {
        Some(frame) => frame.buffer().dimensions(),
        None => return Err(ImgcolError::DecodeError("GIF contains no frames".to_string())),
    };

    // Frames are full-canvas RGBA; alpha is dropped.
    let mut rgb = Vec::with_capacity(frames.len() * (width * height) as usize * 3);
    for (i, frame) in frames.iter().enumerate() {
        let buffer = frame.buffer();
        if buffer.dimensions() != (width, height) {
            return Err(ImgcolError::DecodeError(format!(
                "GIF frame {} is {:?}, expected {:?}",
                i,
                buffer.dimensions(),
                (width, height)
            )));
        }
        for pixel in buffer.pixels() {
            rgb.extend_from_slice(&pixel.0[..3]);
        }
    }

    let shape = [frames.len(), height as usize, width as usize, 3];
    match dtype {
        ImageDType::UInt8 => PixelArray::from_u8_samples(&shape, rgb),
        // Same scaling as the codec library's 8 -> 16 bit conversion.
        ImageDType::UInt16 => PixelArray::from_u16_samples(
            &shape,
            rgb.into_iter().map(|v| u16::from(v) * 257).collect(),
        ),
    }
}

fn unsupported_channels(channels: usize) -> ImgcolError {
    ImgcolError::DecodeError(format!(
        "cannot decode into {} channels; expected 0, 1, 2, 3 or 4",
        channels
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::encode::encode_png;
    use image::codecs::gif::{GifEncoder, Repeat};
    use image::{Delay, Frame, Rgba, RgbaImage};
    use ndarray::Array3;

    fn tiny_gif(frames: usize) -> Vec<u8> {
        let mut buf = Vec::new();
        {
            let mut encoder = GifEncoder::new(&mut buf);
            encoder.set_repeat(Repeat::Infinite).unwrap();
            for i in 0..frames {
                let img = RgbaImage::from_pixel(3, 2, Rgba([10 * i as u8, 0, 200, 255]));
                let frame = Frame::from_parts(img, 0, 0, Delay::from_numer_denom_ms(100, 1));
                encoder.encode_frame(frame).unwrap();
            }
        }
        buf
    }

    #[test]
    fn test_sniff_rejects_garbage() {
        let result = sniff_format(b"definitely not an image");
        assert!(matches!(result, Err(ImgcolError::DecodeError(_))));
    }

    #[test]
    fn test_native_channels_when_zero_requested() {
        let png = encode_png(&PixelArray::from(Array3::<u8>::zeros((2, 3, 2)))).unwrap();
        let decoded = decode_image(&png, 0, ImageDType::UInt8).unwrap();
        assert_eq!(decoded.shape(), &[2, 3, 2]);
    }

    #[test]
    fn test_channel_conversion_gray_to_rgb() {
        let png = encode_png(&PixelArray::from(Array3::<u8>::from_elem((2, 2, 1), 77))).unwrap();
        let decoded = decode_image(&png, 3, ImageDType::UInt8).unwrap();
        assert_eq!(decoded.shape(), &[2, 2, 3]);
        assert!(decoded.as_u8().unwrap().iter().all(|&v| v == 77));
    }

    #[test]
    fn test_u8_source_scaled_into_u16() {
        let png = encode_png(&PixelArray::from(Array3::<u8>::from_elem((1, 1, 1), 255))).unwrap();
        let decoded = decode_image(&png, 1, ImageDType::UInt16).unwrap();
        assert_eq!(decoded.as_u16().unwrap()[[0, 0, 0]], u16::MAX);
    }

    #[test]
    fn test_gif_decodes_to_frame_stack() {
        let gif = tiny_gif(3);
        let decoded = decode_image(&gif, 3, ImageDType::UInt8).unwrap();
        assert_eq!(decoded.shape(), &[3, 2, 3, 3]);
    }

    #[test]
    fn test_gif_rejects_grayscale() {
        let gif = tiny_gif(2);
        let result = decode_image(&gif, 1, ImageDType::UInt8);
        assert!(matches!(result, Err(ImgcolError::DecodeError(_))));
    }

    #[test]
    fn test_bad_channel_count_is_decode_error() {
        let png = encode_png(&PixelArray::from(Array3::<u8>::zeros((2, 2, 3)))).unwrap();
        assert!(matches!(
            decode_image(&png, 5, ImageDType::UInt8),
            Err(ImgcolError::DecodeError(_))
        ));
    }
}
