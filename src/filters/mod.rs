//! Filter modules and the filter catalogue.
//!
//! ## Supported Formats
//!
//! All filters accept 8-bit images with 1, 3, or 4 channels:
//!
//! | Format | Shape | Description |
//! |--------|-------|-------------|
//! | Grayscale8 | (H, W, 1) | Single luminance channel, 0-255 |
//! | RGB8 | (H, W, 3) | Red, green, blue, 0-255 |
//! | RGBA8 | (H, W, 4) | RGB + alpha, 0-255 |
//!
//! Channel count is inferred from input array dimensions.
//!
//! ## Architecture
//!
//! All filters follow these principles:
//! - **Shape preserving** - Output has the input's height, width and channel count
//! - **Alpha preservation** - Alpha channel (if present) is always preserved
//! - **Gray outputs** - Filters producing gray (grayscale, sketch, edge) write R=G=B
//! - **Pure** - Inputs are borrowed views, outputs are new arrays
//!
//! ## Filter Catalogue
//!
//! [`Filter`] enumerates the eight user-selectable filters; [`apply_filter`]
//! dispatches to the primitives in the submodules.

pub mod core;
pub mod grayscale;
pub mod color;
pub mod blur;
pub mod sharpen;
pub mod edge;
pub mod stylize;

use std::fmt;
use std::str::FromStr;
use std::time::Instant;

use ndarray::{Array3, ArrayView3};

use crate::config::FilterConfig;
use crate::error::Error;

/// A named, fixed image transform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Filter {
    /// Unmodified copy of the original.
    #[default]
    Normal,
    Grayscale,
    Sepia,
    Cartoon,
    Sketch,
    Blur,
    Sharpen,
    /// Canny edge detection.
    Edge,
}

impl Filter {
    /// All filters in menu order.
    pub const ALL: [Filter; 8] = [
        Filter::Normal,
        Filter::Grayscale,
        Filter::Sepia,
        Filter::Cartoon,
        Filter::Sketch,
        Filter::Blur,
        Filter::Sharpen,
        Filter::Edge,
    ];

    /// Stable lowercase identifier.
    pub fn name(self) -> &'static str {
        match self {
            Filter::Normal => "normal",
            Filter::Grayscale => "grayscale",
            Filter::Sepia => "sepia",
            Filter::Cartoon => "cartoon",
            Filter::Sketch => "sketch",
            Filter::Blur => "blur",
            Filter::Sharpen => "sharpen",
            Filter::Edge => "edge",
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Filter::Normal => "Normal",
            Filter::Grayscale => "Grayscale",
            Filter::Sepia => "Sepia",
            Filter::Cartoon => "Cartoon",
            Filter::Sketch => "Sketch",
            Filter::Blur => "Blur",
            Filter::Sharpen => "Sharpen",
            Filter::Edge => "Edge Detection",
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Filter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        let key = key.replace(['-', '_'], " ");
        Filter::ALL
            .into_iter()
            .find(|f| f.name() == key || f.label().to_ascii_lowercase() == key)
            .ok_or_else(|| Error::UnknownFilter(s.to_string()))
    }
}

/// Apply a filter with default parameters.
pub fn apply_filter(input: ArrayView3<u8>, filter: Filter) -> Array3<u8> {
    apply_filter_with(input, filter, &FilterConfig::default())
}

/// Apply a filter with explicit parameters.
///
/// # Arguments
/// * `input` - Image with 1, 3, or 4 channels (height, width, channels)
/// * `filter` - Which transform to run
/// * `config` - Per-filter parameters
///
/// # Returns
/// New image with the input's shape
pub fn apply_filter_with(input: ArrayView3<u8>, filter: Filter, config: &FilterConfig) -> Array3<u8> {
    let started = Instant::now();
    let output = match filter {
        Filter::Normal => input.to_owned(),
        Filter::Grayscale => grayscale::grayscale_u8(input),
        Filter::Sepia => color::sepia_u8(input),
        Filter::Cartoon => stylize::cartoon_u8(input, &config.cartoon),
        Filter::Sketch => stylize::pencil_sketch_u8(input, config.sketch.ksize, config.sketch.scale),
        Filter::Blur => blur::gaussian_blur_u8(input, config.blur_ksize, 0.0),
        Filter::Sharpen => sharpen::sharpen_u8(input, config.sharpen_amount),
        Filter::Edge => edge::canny_u8(input, config.canny_low, config.canny_high),
    };
    let (height, width, channels) = input.dim();
    tracing::debug!(
        filter = filter.name(),
        width,
        height,
        channels,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "applied filter"
    );
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(height: usize, width: usize, channels: usize) -> Array3<u8> {
        Array3::from_shape_fn((height, width, channels), |(y, x, c)| {
            if channels == 4 && c == 3 {
                200
            } else {
                ((x * 23 + y * 17 + c * 61) % 256) as u8
            }
        })
    }

    #[test]
    fn test_names_and_labels() {
        assert_eq!(Filter::ALL.len(), 8);
        assert_eq!(Filter::Edge.name(), "edge");
        assert_eq!(Filter::Edge.label(), "Edge Detection");
        assert_eq!(Filter::Sepia.to_string(), "Sepia");
        assert_eq!(Filter::default(), Filter::Normal);
    }

    #[test]
    fn test_from_str_accepts_names_and_labels() {
        for f in Filter::ALL {
            assert_eq!(f.name().parse::<Filter>().unwrap(), f);
            assert_eq!(f.label().parse::<Filter>().unwrap(), f);
        }
        assert_eq!("EDGE-DETECTION".parse::<Filter>().unwrap(), Filter::Edge);
        assert_eq!("edge_detection".parse::<Filter>().unwrap(), Filter::Edge);
        assert_eq!(" Blur ".parse::<Filter>().unwrap(), Filter::Blur);
    }

    #[test]
    fn test_from_str_rejects_unknown() {
        let err = "vintage".parse::<Filter>().unwrap_err();
        assert!(matches!(err, Error::UnknownFilter(name) if name == "vintage"));
    }

    #[test]
    fn test_every_filter_preserves_shape() {
        for channels in [1, 3, 4] {
            let img = gradient(12, 9, channels);
            for f in Filter::ALL {
                let result = apply_filter(img.view(), f);
                assert_eq!(result.dim(), img.dim(), "{f} changed shape for {channels} channels");
            }
        }
    }

    #[test]
    fn test_every_filter_preserves_alpha() {
        let img = gradient(10, 10, 4);
        for f in Filter::ALL {
            let result = apply_filter(img.view(), f);
            assert!(
                result.index_axis(ndarray::Axis(2), 3).iter().all(|&a| a == 200),
                "{f} altered alpha"
            );
        }
    }

    #[test]
    fn test_normal_is_identity() {
        let img = gradient(5, 7, 3);
        assert_eq!(apply_filter(img.view(), Filter::Normal), img);
    }

    #[test]
    fn test_gray_filters_write_equal_channels() {
        let img = gradient(10, 10, 3);
        for f in [Filter::Grayscale, Filter::Sketch, Filter::Edge] {
            let result = apply_filter(img.view(), f);
            for y in 0..10 {
                for x in 0..10 {
                    assert_eq!(result[[y, x, 0]], result[[y, x, 1]], "{f}");
                    assert_eq!(result[[y, x, 1]], result[[y, x, 2]], "{f}");
                }
            }
        }
    }

    #[test]
    fn test_config_overrides_reach_filters() {
        let img = gradient(8, 8, 3);
        let config = FilterConfig {
            sharpen_amount: 0.0,
            ..FilterConfig::default()
        };
        assert_eq!(apply_filter_with(img.view(), Filter::Sharpen, &config), img);
    }

    #[test]
    fn test_extra_channels_do_not_panic() {
        let img = gradient(6, 6, 5);
        for f in Filter::ALL {
            let result = apply_filter(img.view(), f);
            assert_eq!(result.dim(), (6, 6, 5), "{f}");
        }
    }
}
