// In: src/error.rs

//! This module defines the single, unified error type for the entire imgcol library.
//! It uses the `thiserror` crate to provide ergonomic, context-aware error handling.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImgcolError {
    // =========================================================================
    // === High-Level, Semantic Errors (Specific to our library's logic)
    // =========================================================================
    /// A bad format/dtype/shape/colormap combination was given to a constructor.
    #[error("Invalid image feature configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Image dtype should be {expected}. Detected: {found}.")]
    DtypeMismatch { expected: String, found: String },

    #[error("Shape {found} is not compatible with the expected shape {expected}")]
    ShapeMismatch { expected: String, found: String },

    /// The serialized bytes are not a valid image, or cannot be represented
    /// with the configured channel count / shape.
    #[error("Image decoding failed: {0}")]
    DecodeError(String),

    #[error("Input is not supported by this operation: {0}")]
    UnsupportedInput(String),

    // --- External video encoder ---
    /// The encoder binary could not be found. The preview renderer recovers
    /// from this one by falling back to GIF.
    #[error("External video encoder is not available: {0}")]
    ExternalEncoderUnavailable(String),

    #[error("External video encoder failed: {0}")]
    ExternalEncoderFailure(String),

    #[error("Internal logic error (this is a bug): {0}")]
    InternalError(String),

    // =========================================================================
    // === External Error Wrappers (Using #[from] for automatic conversion)
    // =========================================================================
    /// An error originating from the image codec library.
    #[error("Image codec error: {0}")]
    Image(#[from] image::ImageError),

    /// An error originating from the Arrow library.
    #[error("Arrow operation failed: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    /// An error originating from the underlying I/O subsystem (e.g., file not found).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An error from the Serde JSON library, typically during content dictionary (de)serialization.
    #[error("Serde JSON error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    /// An error for Python FFI (Foreign Function Interface) operations.
    #[error("FFI operation failed: {0}")]
    FfiError(String), // PyErr doesn't impl Error, so we can't use #[from] here.
}

// =============================================================================
// === Manual `From` Implementations ===
// =============================================================================

impl From<ndarray::ShapeError> for ImgcolError {
    fn from(err: ndarray::ShapeError) -> Self {
        ImgcolError::InternalError(format!("ndarray shape error: {}", err))
    }
}

#[cfg(feature = "python")]
impl From<pyo3::PyErr> for ImgcolError {
    fn from(err: pyo3::PyErr) -> Self {
        ImgcolError::FfiError(err.to_string())
    }
}

#[cfg(feature = "python")]
impl From<ImgcolError> for pyo3::PyErr {
    fn from(err: ImgcolError) -> pyo3::PyErr {
        pyo3::exceptions::PyValueError::new_err(err.to_string())
    }
}
