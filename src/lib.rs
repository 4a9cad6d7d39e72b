//! This file is the root of the `imgcol` Rust crate.
//!
//! Its responsibilities are strictly limited to:
//! 1.  Declaring all the top-level modules of our library (`feature`, `codec`, etc.)
//!     so the Rust compiler knows they exist, and re-exporting the public surface.
//! 2.  Defining the `#[pymodule]` which acts as the main entry point when the
//!     compiled library is imported into Python (`python` feature only).

//==================================================================================
// 0. Constants
//==================================================================================
/// The crate version, automatically set from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
//==================================================================================
// 1. Module Declarations
//==================================================================================
pub mod bridge;
pub mod codec;
pub mod config;
pub mod error;
pub mod feature;
pub mod preview;
pub mod types;
pub mod utils;
pub mod validation;

#[cfg(feature = "python")]
mod ffi;

pub use config::{ImageFeatureConfig, PreviewConfig};
pub use error::ImgcolError;
pub use feature::{ContentDict, ImageFeature, ImageSource, SerializedSpec, TensorSpec};
pub use preview::{FfmpegEncoder, PreviewRenderer, VideoEncoder};
pub use types::{EncodingFormat, ImageDType, PixelArray, Shape};

//==================================================================================
// 2. Python Module Definition
//==================================================================================
#[cfg(feature = "python")]
use pyo3::prelude::*;

/// The `imgcol` Python module.
#[cfg(feature = "python")]
#[pymodule]
fn imgcol(py: Python, m: &PyModule) -> PyResult<()> {
    m.add_class::<ffi::python::PyImageFeature>()?;

    // --- Expose the custom error type ---
    m.add(
        "ImgcolError",
        py.get_type::<pyo3::exceptions::PyValueError>(),
    )?;

    // --- Expose version string as a module attribute ---
    m.add("__version__", VERSION)?;

    m.add_function(wrap_pyfunction!(ffi::python::enable_verbose_logging_py, m)?)?;

    Ok(())
}
