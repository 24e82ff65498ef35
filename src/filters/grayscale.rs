//! Grayscale conversion filter.
//!
//! Defaults to ITU-R BT.601 luma (`0.299 R + 0.587 G + 0.114 B`), the
//! weights classic photo tools use for RGB to gray. BT.709 and custom
//! weights are available through [`GrayscaleWeights`].
//!
//! ## Channel handling
//!
//! - **Grayscale** (H, W, 1): returned unchanged
//! - **RGB** (H, W, 3): R=G=B=luma
//! - **RGBA** (H, W, 4): R=G=B=luma, alpha preserved

use ndarray::{Array2, Array3, ArrayView2, ArrayView3, Axis};

use super::core::saturate_u8;

/// RGB channel weights for luma computation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrayscaleWeights {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl GrayscaleWeights {
    /// ITU-R BT.601 coefficients.
    pub const BT601: Self = Self {
        r: 0.299,
        g: 0.587,
        b: 0.114,
    };

    /// ITU-R BT.709 coefficients.
    pub const BT709: Self = Self {
        r: 0.2126,
        g: 0.7152,
        b: 0.0722,
    };

    /// Custom weights, normalized to sum to 1.0.
    ///
    /// Falls back to BT.601 if the weights sum to zero or less.
    pub fn custom(r: f32, g: f32, b: f32) -> Self {
        let sum = r + g + b;
        if sum <= 0.0 {
            return Self::BT601;
        }
        Self {
            r: r / sum,
            g: g / sum,
            b: b / sum,
        }
    }
}

impl Default for GrayscaleWeights {
    fn default() -> Self {
        Self::BT601
    }
}

/// Compute the luma plane of an image.
///
/// # Arguments
/// * `input` - Image with 1, 3, or 4 channels (height, width, channels)
/// * `weights` - RGB weights (ignored for single-channel input)
///
/// # Returns
/// 2D array (height, width) of luma values
pub fn luma_plane_u8(input: ArrayView3<u8>, weights: GrayscaleWeights) -> Array2<u8> {
    let (height, width, channels) = input.dim();
    if channels < 3 {
        return input.index_axis(Axis(2), 0).to_owned();
    }

    Array2::from_shape_fn((height, width), |(y, x)| {
        let r = input[[y, x, 0]] as f32;
        let g = input[[y, x, 1]] as f32;
        let b = input[[y, x, 2]] as f32;
        saturate_u8(weights.r * r + weights.g * g + weights.b * b)
    })
}

/// Broadcast a gray plane back to `like`'s channel layout.
///
/// Every color channel receives the plane value; alpha is taken from `like`.
pub fn gray_to_channels(plane: ArrayView2<u8>, like: ArrayView3<u8>) -> Array3<u8> {
    let (height, width, channels) = like.dim();
    Array3::from_shape_fn((height, width, channels), |(y, x, c)| {
        if channels == 4 && c == 3 {
            like[[y, x, 3]]
        } else {
            plane[[y, x]]
        }
    })
}

/// Convert an image to grayscale with custom weights.
///
/// Output keeps the input's channel count: R=G=B=luma, alpha preserved.
pub fn grayscale_weighted_u8(input: ArrayView3<u8>, weights: GrayscaleWeights) -> Array3<u8> {
    let plane = luma_plane_u8(input, weights);
    gray_to_channels(plane.view(), input)
}

/// Convert an image to grayscale using BT.601 luma.
pub fn grayscale_u8(input: ArrayView3<u8>) -> Array3<u8> {
    grayscale_weighted_u8(input, GrayscaleWeights::BT601)
}
