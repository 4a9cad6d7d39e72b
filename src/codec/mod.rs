// In: src/codec/mod.rs

// ====================================================================================
// ARCHITECTURAL OVERVIEW: The Codec Layer
// ====================================================================================
//
// The codec layer is a thin, panic-free wrapper around the `image` crate. It owns no
// compression logic of its own; it only maps our closed types onto the library.
//
// Encoding (pixel array -> bytes):
//
//   1. [ImageFeature::encode]      -> picks a `CodecOp` from the configured format
//         |                           (unset format -> `EncodePng`)
//         `-> 2. [ExecutionHelper::run(op, input)]  -> lazily created `CodecRunner`
//                   |
//                   `-> 3. [encode::encode_png / encode::encode_jpeg]
//
// Decoding (bytes -> pixel array):
//
//   1. [decode::sniff_format]       -> format taken from the bytes, never from config
//   2. [decode::decode_image]       -> still image (h, w, c) or GIF frames (n, h, w, 3),
//                                      converted to the requested channels and dtype
//
// ====================================================================================

pub mod decode;
pub mod encode;

use crate::error::ImgcolError;
use crate::types::{EncodingFormat, PixelArray};

pub use decode::{decode_image, sniff_format};

/// Quality used for every JPEG written by this crate.
pub const JPEG_QUALITY: u8 = 95;

/// The single-image codec operations an execution helper can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecOp {
    EncodePng,
    EncodeJpeg { quality: u8 },
}

/// Maps the configured format onto its encode operation. An unset format
/// encodes as PNG; the configuration itself keeps reporting `None`.
pub fn encode_op_for(format: Option<EncodingFormat>) -> CodecOp {
    match format.unwrap_or(EncodingFormat::Png) {
        EncodingFormat::Png => CodecOp::EncodePng,
        EncodingFormat::Jpeg => CodecOp::EncodeJpeg {
            quality: JPEG_QUALITY,
        },
    }
}

/// **CONTRACT:** Runs one codec operation in isolation and returns its output.
///
/// Implementations are re-creatable at any time and hold no state the caller
/// depends on, so owners may drop and rebuild them freely.
pub trait ExecutionHelper {
    fn run(&mut self, op: CodecOp, input: &PixelArray) -> Result<Vec<u8>, ImgcolError>;
}

/// The default, in-process execution helper.
#[derive(Debug, Default)]
pub struct CodecRunner {
    runs: u64,
}

impl CodecRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of operations executed by this instance.
    pub fn runs(&self) -> u64 {
        self.runs
    }
}

impl ExecutionHelper for CodecRunner {
    fn run(&mut self, op: CodecOp, input: &PixelArray) -> Result<Vec<u8>, ImgcolError> {
        self.runs += 1;
        log::debug!(
            "codec run #{}: {:?} on {:?} array of shape {:?}",
            self.runs,
            op,
            input.dtype(),
            input.shape()
        );
        match op {
            CodecOp::EncodePng => encode::encode_png(input),
            CodecOp::EncodeJpeg { quality } => encode::encode_jpeg(input, quality),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    #[test]
    fn test_unset_format_maps_to_png() {
        assert_eq!(encode_op_for(None), CodecOp::EncodePng);
        assert_eq!(encode_op_for(Some(EncodingFormat::Png)), CodecOp::EncodePng);
        assert_eq!(
            encode_op_for(Some(EncodingFormat::Jpeg)),
            CodecOp::EncodeJpeg { quality: 95 }
        );
    }

    #[test]
    fn test_runner_counts_runs() {
        let mut runner = CodecRunner::new();
        let img = PixelArray::from(Array3::<u8>::zeros((2, 2, 3)));
        let png = runner.run(CodecOp::EncodePng, &img).unwrap();
        assert_eq!(sniff_format(&png).unwrap(), image::ImageFormat::Png);
        runner.run(CodecOp::EncodeJpeg { quality: 80 }, &img).unwrap();
        assert_eq!(runner.runs(), 2);
    }
}
