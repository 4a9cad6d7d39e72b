// In: src/ffi/python.rs

use log::LevelFilter;
use pyo3::exceptions::PyTypeError;
use pyo3::prelude::*;
use pyo3::types::PyBytes;
use std::path::PathBuf;

use crate::config::ImageFeatureConfig;
use crate::feature::{ContentDict, ImageFeature};
use crate::types::{ImageDType, PixelArray, Shape};
use crate::utils;

//==================================================================================
// I. The Feature Adapter
//==================================================================================

#[pyclass(name = "ImageFeature", module = "imgcol")]
pub struct PyImageFeature {
    inner: ImageFeature,
}

#[pymethods]
impl PyImageFeature {
    /// Creates a new ImageFeature.
    ///
    /// Every argument is optional. `shape` uses `None` for unknown dimensions;
    /// `dtype` and `encoding_format` are given by name ("uint8", "png", ...).
    #[new]
    #[pyo3(signature = (
        shape = None,
        dtype = None,
        encoding_format = None,
        use_colormap = false
    ))]
    fn new(
        shape: Option<Vec<Option<usize>>>,
        dtype: Option<&str>,
        encoding_format: Option<&str>,
        use_colormap: bool,
    ) -> PyResult<Self> {
        let config = ImageFeatureConfig::from_names(
            shape.map(Shape::new),
            dtype,
            encoding_format,
            use_colormap,
        )?;
        Ok(Self {
            inner: ImageFeature::from_config(config),
        })
    }

    /// Encodes an already-encoded image: `bytes`, a path-like object, or a
    /// file-like object with `read()`. The content is stored verbatim.
    #[pyo3(name = "encode")]
    pub fn encode_py<'py>(&mut self, py: Python<'py>, value: &PyAny) -> PyResult<&'py PyBytes> {
        let encoded = if let Ok(bytes) = value.downcast::<PyBytes>() {
            self.inner.encode(bytes.as_bytes().to_vec())?
        } else if let Ok(path) = value.extract::<PathBuf>() {
            self.inner.encode(path)?
        } else if value.hasattr("read")? {
            let content: Vec<u8> = value.call_method0("read")?.extract()?;
            self.inner.encode(content)?
        } else {
            return Err(PyTypeError::new_err(format!(
                "Cannot encode object of type {}; expected bytes, a path or a file object.",
                value.get_type().name()?
            )));
        };
        Ok(PyBytes::new(py, &encoded))
    }

    /// Validates and encodes a raw pixel buffer (native byte order, C order).
    #[pyo3(name = "encode_pixels")]
    pub fn encode_pixels_py<'py>(
        &mut self,
        py: Python<'py>,
        data: &[u8],
        shape: Vec<usize>,
        dtype: &str,
    ) -> PyResult<&'py PyBytes> {
        let dtype: ImageDType = dtype.parse()?;
        let array = PixelArray::from_ne_bytes(&shape, dtype, data)?;
        let inner = &mut self.inner;
        let encoded = py.allow_threads(move || inner.encode_array(&array))?;
        Ok(PyBytes::new(py, &encoded))
    }

    /// Decodes a stored record into `(pixel_bytes, shape, dtype)`.
    #[pyo3(name = "decode")]
    pub fn decode_py<'py>(
        &self,
        py: Python<'py>,
        data: &[u8],
    ) -> PyResult<(&'py PyBytes, Vec<usize>, &'static str)> {
        let inner = &self.inner;
        let array = py.allow_threads(move || inner.decode(data))?;
        Ok((
            PyBytes::new(py, &array.to_ne_bytes()),
            array.shape().to_vec(),
            array.dtype().name(),
        ))
    }

    #[getter]
    fn tensor_shape(&self) -> Vec<Option<usize>> {
        self.inner.tensor_spec().shape.dims().to_vec()
    }

    #[getter]
    fn tensor_dtype(&self) -> &'static str {
        self.inner.tensor_spec().dtype.name()
    }

    fn to_json_content(&self) -> PyResult<String> {
        Ok(self.inner.to_content_dict().to_json()?)
    }

    #[staticmethod]
    fn from_json_content(json: &str) -> PyResult<Self> {
        let inner = ImageFeature::from_content_dict(ContentDict::from_json(json)?)?;
        Ok(Self { inner })
    }

    // Pickling carries the content dictionary only; the codec runner is rebuilt lazily.
    fn __getstate__(&self) -> PyResult<String> {
        self.to_json_content()
    }

    fn __setstate__(&mut self, state: &str) -> PyResult<()> {
        self.inner = ImageFeature::from_content_dict(ContentDict::from_json(state)?)?;
        Ok(())
    }

    fn __repr__(&self) -> String {
        let config = self.inner.config();
        format!(
            "ImageFeature(shape={}, dtype={}, encoding_format={}, use_colormap={})",
            config.shape(),
            config.dtype(),
            config.encoding_format().map_or("None", |f| f.name()),
            if config.use_colormap() { "True" } else { "False" }
        )
    }
}

//==================================================================================
// II. Module Functions
//==================================================================================

#[pyfunction]
#[pyo3(name = "enable_verbose_logging", signature = (log_file = None))]
pub fn enable_verbose_logging_py(log_file: Option<String>) -> PyResult<()> {
    utils::init_logging(LevelFilter::Info, log_file.as_deref())?;
    Ok(())
}
