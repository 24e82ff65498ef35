//! Stylize filters: Cartoon, Pencil Sketch, plus their building blocks
//! (adaptive threshold, masking, inversion, dodge division).
//!
//! ## Supported Formats
//!
//! Both filters accept images with 1, 3, or 4 channels and return the same
//! channel count. Alpha (if present) is preserved.

use ndarray::{Array2, Array3, ArrayView2, ArrayView3, Axis};

use super::blur::{bilateral_u8, gaussian_blur_u8, median_blur_u8};
use super::core::{replicate, saturate_u8};
use super::grayscale::{gray_to_channels, luma_plane_u8, GrayscaleWeights};
use crate::config::CartoonConfig;

// ============================================================================
// Building blocks
// ============================================================================

/// Invert a gray plane (`255 - v`).
pub fn invert_plane(plane: ArrayView2<u8>) -> Array2<u8> {
    plane.mapv(|v| 255 - v)
}

/// Binary adaptive threshold against the local mean.
///
/// A pixel becomes 255 when it is brighter than the mean of its
/// `block_size x block_size` neighbourhood minus `c`, and 0 otherwise.
/// The neighbourhood replicates border pixels.
///
/// # Arguments
/// * `plane` - Gray plane (height, width)
/// * `block_size` - Neighbourhood size (forced odd, at least 3)
/// * `c` - Constant subtracted from the mean (rounded up)
pub fn adaptive_threshold_mean(plane: ArrayView2<u8>, block_size: usize, c: f32) -> Array2<u8> {
    let (height, width) = plane.dim();
    let radius = (block_size.max(3) | 1) as isize / 2;
    let area = ((2 * radius + 1) * (2 * radius + 1)) as f32;
    let delta = c.ceil() as i32;

    Array2::from_shape_fn((height, width), |(y, x)| {
        let mut sum = 0u32;
        for dy in -radius..=radius {
            let sy = replicate(y as isize + dy, height);
            for dx in -radius..=radius {
                let sx = replicate(x as isize + dx, width);
                sum += plane[[sy, sx]] as u32;
            }
        }
        let mean = saturate_u8(sum as f32 / area) as i32;
        if plane[[y, x]] as i32 - mean > -delta {
            255
        } else {
            0
        }
    })
}

/// Keep color channels where `mask` is non-zero, zero them elsewhere.
///
/// Alpha (if present) is preserved.
pub fn apply_mask_u8(input: ArrayView3<u8>, mask: ArrayView2<u8>) -> Array3<u8> {
    let (height, width, channels) = input.dim();
    Array3::from_shape_fn((height, width, channels), |(y, x, c)| {
        if (channels == 4 && c == 3) || mask[[y, x]] != 0 {
            input[[y, x, c]]
        } else {
            0
        }
    })
}

/// Per-pixel `numerator * scale / denominator`, 0 where the denominator is 0.
pub fn divide_planes(numerator: ArrayView2<u8>, denominator: ArrayView2<u8>, scale: f32) -> Array2<u8> {
    Array2::from_shape_fn(numerator.dim(), |(y, x)| {
        let d = denominator[[y, x]];
        if d == 0 {
            0
        } else {
            saturate_u8(numerator[[y, x]] as f32 * scale / d as f32)
        }
    })
}

// ============================================================================
// Cartoon
// ============================================================================

/// Cartoon effect: flat color regions outlined by dark edges.
///
/// Algorithm:
/// 1. BT.601 gray, median blurred to suppress noise
/// 2. Adaptive mean threshold of the gray image → edge mask (edges = 0)
/// 3. Bilateral filter of the color image → smoothed regions
/// 4. Smoothed color kept where the mask is 255, black on edges
///
/// # Arguments
/// * `input` - Image with 1, 3, or 4 channels (height, width, channels)
/// * `config` - Median, threshold and bilateral parameters
///
/// # Returns
/// Cartoon image with same channel count
pub fn cartoon_u8(input: ArrayView3<u8>, config: &CartoonConfig) -> Array3<u8> {
    let gray = luma_plane_u8(input, GrayscaleWeights::BT601);
    let smoothed_gray = median_blur_u8(gray.view().insert_axis(Axis(2)), config.median_ksize);
    let edges = adaptive_threshold_mean(
        smoothed_gray.index_axis(Axis(2), 0),
        config.block_size,
        config.c,
    );

    let color = bilateral_u8(
        input,
        config.bilateral_diameter,
        config.sigma_color,
        config.sigma_space,
    );

    apply_mask_u8(color.view(), edges.view())
}

// ============================================================================
// Pencil Sketch
// ============================================================================

/// Pencil sketch effect via color dodge of gray over its blurred negative.
///
/// Algorithm:
/// 1. BT.601 gray
/// 2. Invert and Gaussian blur (`ksize`, sigma derived from size)
/// 3. Invert the blur again
/// 4. `gray * scale / inverted_blur`, saturated
///
/// # Arguments
/// * `input` - Image with 1, 3, or 4 channels (height, width, channels)
/// * `ksize` - Gaussian kernel size (odd)
/// * `scale` - Division scale (256 yields white paper on flat regions)
///
/// # Returns
/// Grayscale sketch image with same channel count (R=G=B, alpha preserved)
pub fn pencil_sketch_u8(input: ArrayView3<u8>, ksize: usize, scale: f32) -> Array3<u8> {
    let gray = luma_plane_u8(input, GrayscaleWeights::BT601);
    let inverted = invert_plane(gray.view());
    let blurred = gaussian_blur_u8(inverted.view().insert_axis(Axis(2)), ksize, 0.0);
    let inverted_blur = invert_plane(blurred.index_axis(Axis(2), 0));
    let sketch = divide_planes(gray.view(), inverted_blur.view(), scale);
    gray_to_channels(sketch.view(), input)
}
