// In: src/feature/mod.rs

//! The image feature adapter.
//!
//! An `ImageFeature` is built once per image column of a dataset schema. It
//! declares how the column looks in memory (`tensor_spec`) and on disk
//! (`serialized_spec`), turns raw image sources into the bytes stored in a
//! record (`encode`), and turns those bytes back into pixels (`decode`).
//!
//! Only pixel arrays are validated and re-encoded. Paths, byte buffers and
//! readers are stored verbatim: ingestion stays fast, and checking that their
//! content matches the configured format, shape and dtype is the caller's job.

pub mod content;

use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};

use arrow_schema::DataType;
use serde::{Deserialize, Serialize};

use crate::codec::{self, CodecRunner, ExecutionHelper};
use crate::config::{ImageFeatureConfig, PreviewConfig};
use crate::error::ImgcolError;
use crate::preview::{FfmpegEncoder, PreviewRenderer};
use crate::types::shape::format_dims;
use crate::types::{EncodingFormat, ImageDType, PixelArray, Shape};

pub use content::ContentDict;

//==================================================================================
// 1. Specs & Sources
//==================================================================================

/// The logical, decoded representation callers get back from `decode`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct TensorSpec {
    pub shape: Shape,
    pub dtype: ImageDType,
}

impl TensorSpec {
    /// Arrow element type of the decoded pixels.
    pub fn arrow_type(&self) -> DataType {
        self.dtype.to_arrow_type()
    }
}

/// The on-disk representation: one opaque, size-free byte string per record.
/// Pixel dimensions are recovered from the codec headers in the bytes.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SerializedSpec {
    pub shape: Shape,
    pub data_type: DataType,
}

impl Default for SerializedSpec {
    fn default() -> Self {
        Self {
            shape: Shape::scalar(),
            data_type: DataType::Binary,
        }
    }
}

/// Anything `ImageFeature::encode` accepts.
pub enum ImageSource {
    /// A decoded pixel array; validated and encoded with the configured codec.
    Array(PixelArray),
    /// An image file on disk; its bytes are stored as-is.
    Path(PathBuf),
    /// Already-encoded image bytes; stored as-is.
    Bytes(Vec<u8>),
    /// An open byte stream; read to the end and stored as-is.
    Reader(Box<dyn Read>),
}

impl ImageSource {
    pub fn reader(reader: impl Read + 'static) -> Self {
        Self::Reader(Box::new(reader))
    }
}

impl fmt::Debug for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Array(a) => write!(f, "Array({}, shape={:?})", a.dtype(), a.shape()),
            Self::Path(p) => write!(f, "Path({})", p.display()),
            Self::Bytes(b) => write!(f, "Bytes(len={})", b.len()),
            Self::Reader(_) => f.write_str("Reader(..)"),
        }
    }
}

impl From<PixelArray> for ImageSource {
    fn from(array: PixelArray) -> Self {
        Self::Array(array)
    }
}

impl From<PathBuf> for ImageSource {
    fn from(path: PathBuf) -> Self {
        Self::Path(path)
    }
}

impl From<&Path> for ImageSource {
    fn from(path: &Path) -> Self {
        Self::Path(path.to_path_buf())
    }
}

impl From<Vec<u8>> for ImageSource {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Bytes(bytes)
    }
}

//==================================================================================
// 2. The Adapter
//==================================================================================

/// Adapter between image sources and the serialized byte records of an image column.
///
/// The codec runner is attached on the first pixel-array encode and is never
/// part of a snapshot: cloning or (de)serializing an `ImageFeature` yields a
/// value without one, which attaches a fresh runner when next needed.
/// Concurrent encodes on one instance are not supported (`encode` takes
/// `&mut self`).
#[derive(Serialize, Deserialize)]
#[serde(into = "ContentDict", try_from = "ContentDict")]
pub struct ImageFeature {
    config: ImageFeatureConfig,
    runner: Option<CodecRunner>,
}

impl ImageFeature {
    /// Validates the configuration and builds the adapter.
    ///
    /// Defaults: shape `(None, None, 3)`, dtype `uint8`, no encoding format
    /// (pixel arrays are then written as PNG), no colormap.
    pub fn new(
        shape: Option<Shape>,
        dtype: Option<ImageDType>,
        encoding_format: Option<EncodingFormat>,
        use_colormap: bool,
    ) -> Result<Self, ImgcolError> {
        let config = ImageFeatureConfig::new(shape, dtype, encoding_format, use_colormap)?;
        Ok(Self::from_config(config))
    }

    pub fn from_config(config: ImageFeatureConfig) -> Self {
        log::debug!(
            "image feature: shape={} dtype={} encoding_format={:?} use_colormap={}",
            config.shape(),
            config.dtype(),
            config.encoding_format(),
            config.use_colormap()
        );
        Self {
            config,
            runner: None,
        }
    }

    pub fn config(&self) -> &ImageFeatureConfig {
        &self.config
    }

    pub fn tensor_spec(&self) -> TensorSpec {
        TensorSpec {
            shape: self.config.shape().clone(),
            dtype: self.config.dtype(),
        }
    }

    pub fn serialized_spec(&self) -> SerializedSpec {
        SerializedSpec::default()
    }

    /// Whether a codec runner is currently attached.
    pub fn has_runner(&self) -> bool {
        self.runner.is_some()
    }

    //------------------------------------------------------------------------------
    // Encode / Decode
    //------------------------------------------------------------------------------

    /// Converts one image source into the bytes stored in a record.
    pub fn encode(&mut self, source: impl Into<ImageSource>) -> Result<Vec<u8>, ImgcolError> {
        match source.into() {
            ImageSource::Array(array) => self.encode_array(&array),
            ImageSource::Path(path) => {
                log::debug!("storing image file {} verbatim", path.display());
                Ok(std::fs::read(&path)?)
            }
            ImageSource::Bytes(bytes) => Ok(bytes),
            ImageSource::Reader(mut reader) => {
                let mut bytes = Vec::new();
                reader.read_to_end(&mut bytes)?;
                Ok(bytes)
            }
        }
    }

    /// Validates a pixel array against the configured dtype and shape, then
    /// encodes it with the configured format (PNG when unset).
    pub fn encode_array(&mut self, array: &PixelArray) -> Result<Vec<u8>, ImgcolError> {
        if array.dtype() != self.config.dtype() {
            return Err(ImgcolError::DtypeMismatch {
                expected: self.config.dtype().to_string(),
                found: array.dtype().to_string(),
            });
        }
        if !self.config.shape().is_compatible_with(array.shape()) {
            return Err(ImgcolError::ShapeMismatch {
                expected: self.config.shape().to_string(),
                found: format_dims(array.shape()),
            });
        }

        let op = codec::encode_op_for(self.config.encoding_format());
        let runner = self.runner.get_or_insert_with(CodecRunner::new);
        runner.run(op, array)
    }

    /// Reconstructs the pixel array from a stored record.
    ///
    /// The container is sniffed from the bytes. The result is converted to the
    /// configured channel count (0 keeps the native count) and dtype, and must
    /// then match the configured shape.
    pub fn decode(&self, bytes: &[u8]) -> Result<PixelArray, ImgcolError> {
        let shape = self.config.shape();
        let channels = shape.channels().unwrap_or(0);
        let decoded = codec::decode_image(bytes, channels, self.config.dtype())?;

        if !shape.with_native_channels().is_compatible_with(decoded.shape()) {
            return Err(ImgcolError::DecodeError(format!(
                "decoded image of shape {} is not compatible with {}",
                format_dims(decoded.shape()),
                shape
            )));
        }
        Ok(decoded)
    }

    //------------------------------------------------------------------------------
    // Content Dictionary
    //------------------------------------------------------------------------------

    pub fn to_content_dict(&self) -> ContentDict {
        ContentDict::from(&self.config)
    }

    /// Rebuilds an adapter from its content dictionary, re-running validation.
    pub fn from_content_dict(dict: ContentDict) -> Result<Self, ImgcolError> {
        Ok(Self::from_config(ImageFeatureConfig::try_from(dict)?))
    }

    //------------------------------------------------------------------------------
    // HTML Preview
    //------------------------------------------------------------------------------

    fn renderer(&self) -> PreviewRenderer<FfmpegEncoder> {
        let preview = PreviewConfig::default();
        let encoder = FfmpegEncoder::new(&preview.ffmpeg_binary);
        PreviewRenderer::new(preview, self.config.use_colormap(), encoder)
    }

    /// A single decoded image as an HTML `<img>` thumbnail.
    pub fn repr_html(&self, image: &PixelArray) -> Result<String, ImgcolError> {
        self.renderer().render_single(image)
    }

    /// A `(frames, h, w, c)` stack as an HTML video (or GIF fallback).
    pub fn repr_html_batch(&self, frames: &PixelArray) -> Result<String, ImgcolError> {
        self.renderer().render_batch(frames)
    }
}

impl Clone for ImageFeature {
    /// Clones the configuration only; the runner is re-created on demand.
    fn clone(&self) -> Self {
        Self::from_config(self.config.clone())
    }
}

impl PartialEq for ImageFeature {
    fn eq(&self, other: &Self) -> bool {
        self.config == other.config
    }
}

impl fmt::Debug for ImageFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageFeature")
            .field("shape", self.config.shape())
            .field("dtype", &self.config.dtype())
            .field("encoding_format", &self.config.encoding_format())
            .field("use_colormap", &self.config.use_colormap())
            .finish()
    }
}

impl From<ImageFeature> for ContentDict {
    fn from(feature: ImageFeature) -> Self {
        feature.to_content_dict()
    }
}

impl TryFrom<ContentDict> for ImageFeature {
    type Error = ImgcolError;

    fn try_from(dict: ContentDict) -> Result<Self, Self::Error> {
        Self::from_content_dict(dict)
    }
}
