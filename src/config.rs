//! Tunable filter and session parameters.
//!
//! Nothing here is persisted. The defaults reproduce the fixed parameters
//! of the eight menu filters; front ends override individual fields with
//! struct-update syntax.

/// Parameters of the Sketch filter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SketchConfig {
    /// Gaussian kernel size applied to the inverted gray image (odd).
    pub ksize: usize,
    /// Scale of the `gray / inverted_blur` division.
    pub scale: f32,
}

impl Default for SketchConfig {
    fn default() -> Self {
        Self {
            ksize: 21,
            scale: 256.0,
        }
    }
}

/// Parameters of the Cartoon filter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CartoonConfig {
    /// Median blur aperture for the edge mask (odd).
    pub median_ksize: usize,
    /// Adaptive threshold neighbourhood size (odd).
    pub block_size: usize,
    /// Constant subtracted from the neighbourhood mean.
    pub c: f32,
    /// Bilateral filter diameter.
    pub bilateral_diameter: usize,
    pub sigma_color: f32,
    pub sigma_space: f32,
}

impl Default for CartoonConfig {
    fn default() -> Self {
        Self {
            median_ksize: 5,
            block_size: 9,
            c: 9.0,
            bilateral_diameter: 9,
            sigma_color: 300.0,
            sigma_space: 300.0,
        }
    }
}

/// Parameters for every filter in the catalogue.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterConfig {
    /// Gaussian kernel size of the Blur filter (odd).
    pub blur_ksize: usize,
    pub sketch: SketchConfig,
    pub cartoon: CartoonConfig,
    /// Sharpen strength, 1.0 = classic `[-1 -1 -1; -1 9 -1; -1 -1 -1]`.
    pub sharpen_amount: f32,
    /// Canny hysteresis thresholds on the L1 Sobel magnitude.
    pub canny_low: f32,
    pub canny_high: f32,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            blur_ksize: 15,
            sketch: SketchConfig::default(),
            cartoon: CartoonConfig::default(),
            sharpen_amount: 1.0,
            canny_low: 100.0,
            canny_high: 200.0,
        }
    }
}

/// Default preview bounds: an 800x600 window minus a 20 px margin.
pub const DEFAULT_PREVIEW_MAX: (u32, u32) = (780, 580);

/// Session-level settings.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub filters: FilterConfig,
    /// JPEG quality (1-100), ignored for other formats.
    pub jpeg_quality: u8,
    /// Maximum (width, height) of [`crate::Session::preview`] output.
    pub preview_max: (u32, u32),
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            filters: FilterConfig::default(),
            jpeg_quality: 95,
            preview_max: DEFAULT_PREVIEW_MAX,
        }
    }
}
