//! photofilter
//!
//! Load a raster image, apply one of eight photo filters to it, preview the
//! result and export it. Usable as a library, from the `photofilter` CLI,
//! from Python via PyO3 and from JavaScript via WASM bindings.
//!
//! ## Image Format
//! Filters work on dense 8-bit arrays of shape (height, width, channels):
//! - **Grayscale**: (height, width, 1) - single channel
//! - **RGB**: (height, width, 3) - 3 color channels
//! - **RGBA**: (height, width, 4) - 3 color channels + alpha
//!
//! Every filter returns an array with the input's shape.
//!
//! ## Example
//!
//! ```no_run
//! use photofilter::{Filter, Session};
//!
//! # fn main() -> photofilter::Result<()> {
//! let mut session = Session::default();
//! session.open("photo.jpg")?;
//! session.apply(Filter::Sepia);
//! session.save("photo_sepia.png")?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod filters;
pub mod io;
pub mod session;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use config::{CartoonConfig, FilterConfig, SessionConfig, SketchConfig};
pub use error::{Error, Result};
pub use filters::{apply_filter, apply_filter_with, Filter};
pub use session::Session;

// Python bindings (only when python feature is enabled)
#[cfg(feature = "python")]
mod python {
    use numpy::{IntoPyArray, PyArray3, PyReadonlyArray3};
    use pyo3::exceptions::PyValueError;
    use pyo3::prelude::*;

    use crate::filters::{blur, color, edge, grayscale, sharpen, stylize};
    use crate::{CartoonConfig, Filter, FilterConfig};

    fn check_channels(channels: usize) -> PyResult<()> {
        if matches!(channels, 1 | 3 | 4) {
            Ok(())
        } else {
            Err(PyValueError::new_err(format!(
                "expected 1, 3 or 4 channels, got {channels}"
            )))
        }
    }

    // ========================================================================
    // Filter Catalogue
    // ========================================================================

    /// Apply a named filter with default parameters.
    ///
    /// # Arguments
    /// * `image` - (height, width, channels) u8 array, 1, 3 or 4 channels
    /// * `name` - Filter name or label, e.g. "sepia" or "Edge Detection"
    #[pyfunction]
    pub fn apply_filter<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        name: &str,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let filter: Filter = name
            .parse()
            .map_err(|e: crate::Error| PyValueError::new_err(e.to_string()))?;
        let input = image.as_array();
        check_channels(input.dim().2)?;
        let result = crate::filters::apply_filter_with(input, filter, &FilterConfig::default());
        Ok(result.into_pyarray(py))
    }

    /// Names of all filters in menu order.
    #[pyfunction]
    pub fn filter_names() -> Vec<&'static str> {
        Filter::ALL.iter().map(|f| f.name()).collect()
    }

    // ========================================================================
    // Individual Filters
    // ========================================================================

    #[pyfunction]
    #[pyo3(name = "grayscale")]
    pub fn grayscale_py<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let input = image.as_array();
        check_channels(input.dim().2)?;
        Ok(grayscale::grayscale_u8(input).into_pyarray(py))
    }

    #[pyfunction]
    pub fn sepia<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let input = image.as_array();
        check_channels(input.dim().2)?;
        Ok(color::sepia_u8(input).into_pyarray(py))
    }

    #[pyfunction]
    #[pyo3(signature = (image, ksize=15, sigma=0.0))]
    pub fn gaussian_blur<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        ksize: usize,
        sigma: f32,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let input = image.as_array();
        check_channels(input.dim().2)?;
        Ok(blur::gaussian_blur_u8(input, ksize, sigma).into_pyarray(py))
    }

    #[pyfunction]
    #[pyo3(signature = (image, ksize=5))]
    pub fn median_blur<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        ksize: usize,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let input = image.as_array();
        check_channels(input.dim().2)?;
        Ok(blur::median_blur_u8(input, ksize).into_pyarray(py))
    }

    #[pyfunction]
    #[pyo3(signature = (image, diameter=9, sigma_color=300.0, sigma_space=300.0))]
    pub fn bilateral<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        diameter: usize,
        sigma_color: f32,
        sigma_space: f32,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let input = image.as_array();
        check_channels(input.dim().2)?;
        Ok(blur::bilateral_u8(input, diameter, sigma_color, sigma_space).into_pyarray(py))
    }

    #[pyfunction]
    #[pyo3(name = "sharpen", signature = (image, amount=1.0))]
    pub fn sharpen_py<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        amount: f32,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let input = image.as_array();
        check_channels(input.dim().2)?;
        Ok(sharpen::sharpen_u8(input, amount).into_pyarray(py))
    }

    #[pyfunction]
    #[pyo3(signature = (image, low_threshold=100.0, high_threshold=200.0))]
    pub fn canny<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        low_threshold: f32,
        high_threshold: f32,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let input = image.as_array();
        check_channels(input.dim().2)?;
        Ok(edge::canny_u8(input, low_threshold, high_threshold).into_pyarray(py))
    }

    #[pyfunction]
    pub fn cartoon<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let input = image.as_array();
        check_channels(input.dim().2)?;
        Ok(stylize::cartoon_u8(input, &CartoonConfig::default()).into_pyarray(py))
    }

    #[pyfunction]
    #[pyo3(signature = (image, ksize=21, scale=256.0))]
    pub fn pencil_sketch<'py>(
        py: Python<'py>,
        image: PyReadonlyArray3<'py, u8>,
        ksize: usize,
        scale: f32,
    ) -> PyResult<Bound<'py, PyArray3<u8>>> {
        let input = image.as_array();
        check_channels(input.dim().2)?;
        Ok(stylize::pencil_sketch_u8(input, ksize, scale).into_pyarray(py))
    }

    /// photofilter extension module
    #[pymodule]
    pub fn photofilter(m: &Bound<'_, PyModule>) -> PyResult<()> {
        // Catalogue
        m.add_function(wrap_pyfunction!(apply_filter, m)?)?;
        m.add_function(wrap_pyfunction!(filter_names, m)?)?;

        // Primitives
        m.add_function(wrap_pyfunction!(grayscale_py, m)?)?;
        m.add_function(wrap_pyfunction!(sepia, m)?)?;
        m.add_function(wrap_pyfunction!(gaussian_blur, m)?)?;
        m.add_function(wrap_pyfunction!(median_blur, m)?)?;
        m.add_function(wrap_pyfunction!(bilateral, m)?)?;
        m.add_function(wrap_pyfunction!(sharpen_py, m)?)?;
        m.add_function(wrap_pyfunction!(canny, m)?)?;
        m.add_function(wrap_pyfunction!(cartoon, m)?)?;
        m.add_function(wrap_pyfunction!(pencil_sketch, m)?)?;

        Ok(())
    }
}

#[cfg(feature = "python")]
pub use python::photofilter;
