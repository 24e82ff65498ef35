//! Blur filters: Gaussian, Median, Bilateral.
//!
//! All filters accept images with 1, 3, or 4 channels. Color channels are
//! processed, alpha is copied unchanged. Rows are processed in parallel
//! with Rayon.

use ndarray::{Array3, ArrayView3};
use rayon::prelude::*;

use super::core::{
    color_channels, from_rows, gaussian_kernel_1d, reflect_101, replicate, saturate_u8,
    separable_convolve_u8,
};

// ============================================================================
// Gaussian Blur
// ============================================================================

/// Apply Gaussian blur.
///
/// Uses separable 2-pass convolution with reflect-101 borders.
///
/// # Arguments
/// * `input` - Image with 1, 3, or 4 channels (height, width, channels)
/// * `ksize` - Kernel size (forced odd); 1 or less returns a copy
/// * `sigma` - Standard deviation; `<= 0` derives it from `ksize`
///
/// # Returns
/// Blurred image with same channel count
pub fn gaussian_blur_u8(input: ArrayView3<u8>, ksize: usize, sigma: f32) -> Array3<u8> {
    if ksize <= 1 {
        return input.to_owned();
    }
    let kernel = gaussian_kernel_1d(ksize, sigma);
    separable_convolve_u8(input, &kernel)
}

// ============================================================================
// Median Blur
// ============================================================================

/// Apply median blur.
///
/// Replaces each sample with the median of its `ksize x ksize`
/// neighbourhood. Borders replicate the edge pixel.
///
/// # Arguments
/// * `input` - Image with 1, 3, or 4 channels (height, width, channels)
/// * `ksize` - Aperture size (forced odd); 1 or less returns a copy
///
/// # Returns
/// Median-filtered image with same channel count
pub fn median_blur_u8(input: ArrayView3<u8>, ksize: usize) -> Array3<u8> {
    let (height, width, channels) = input.dim();
    if ksize <= 1 || height == 0 || width == 0 {
        return input.to_owned();
    }
    let radius = (ksize / 2) as isize;
    let color_ch = color_channels(channels);
    let row_len = width * channels;
    let window_len = ((2 * radius + 1) * (2 * radius + 1)) as usize;
    let mid = window_len / 2;

    let mut output = vec![0u8; height * row_len];
    output.par_chunks_mut(row_len).enumerate().for_each(|(y, row)| {
        let mut window = Vec::with_capacity(window_len);
        for x in 0..width {
            for c in 0..color_ch {
                window.clear();
                for dy in -radius..=radius {
                    let sy = replicate(y as isize + dy, height);
                    for dx in -radius..=radius {
                        let sx = replicate(x as isize + dx, width);
                        window.push(input[[sy, sx, c]]);
                    }
                }
                let (_, median, _) = window.select_nth_unstable(mid);
                row[x * channels + c] = *median;
            }
            if channels == 4 {
                row[x * channels + 3] = input[[y, x, 3]];
            }
        }
    });

    from_rows(height, width, channels, output)
}

// ============================================================================
// Bilateral Filter
// ============================================================================

/// Apply an edge-preserving bilateral filter.
///
/// Each output sample is a weighted mean over a circular neighbourhood.
/// Weights combine spatial distance (`sigma_space`) and color distance
/// (`sigma_color`), where the color distance of a multi-channel pixel is the
/// L1 sum of its per-channel differences. Borders use reflect-101.
///
/// # Arguments
/// * `input` - Image with 1, 3, or 4 channels (height, width, channels)
/// * `diameter` - Neighbourhood diameter; 0 derives it from `sigma_space`
/// * `sigma_color` - Color similarity falloff (larger mixes more colors)
/// * `sigma_space` - Spatial falloff
///
/// # Returns
/// Filtered image with same channel count
pub fn bilateral_u8(
    input: ArrayView3<u8>,
    diameter: usize,
    sigma_color: f32,
    sigma_space: f32,
) -> Array3<u8> {
    let (height, width, channels) = input.dim();
    if height == 0 || width == 0 {
        return input.to_owned();
    }
    let sigma_color = if sigma_color <= 0.0 { 1.0 } else { sigma_color };
    let sigma_space = if sigma_space <= 0.0 { 1.0 } else { sigma_space };
    let radius: isize = if diameter == 0 {
        (sigma_space * 1.5).round() as isize
    } else {
        (diameter / 2) as isize
    };
    let radius = radius.max(1);

    let color_ch = color_channels(channels);
    let space_coeff = -0.5 / (sigma_space * sigma_space);
    let color_coeff = -0.5 / (sigma_color * sigma_color);

    // Circular window offsets with their spatial weights
    let mut offsets: Vec<(isize, isize, f32)> = Vec::new();
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            let r2 = (dy * dy + dx * dx) as f32;
            if r2.sqrt() > radius as f32 {
                continue;
            }
            offsets.push((dy, dx, (r2 * space_coeff).exp()));
        }
    }

    // Color weight lookup indexed by L1 color distance
    let color_weights: Vec<f32> = (0..256 * color_ch)
        .map(|d| {
            let d = d as f32;
            (d * d * color_coeff).exp()
        })
        .collect();

    let row_len = width * channels;
    let mut output = vec![0u8; height * row_len];
    output.par_chunks_mut(row_len).enumerate().for_each(|(y, row)| {
        let mut sums = vec![0.0f32; color_ch];
        for x in 0..width {
            sums.fill(0.0);
            let mut weight_sum = 0.0f32;

            for &(dy, dx, space_w) in &offsets {
                let sy = reflect_101(y as isize + dy, height);
                let sx = reflect_101(x as isize + dx, width);

                let mut dist = 0usize;
                for c in 0..color_ch {
                    dist += (input[[sy, sx, c]] as i32 - input[[y, x, c]] as i32).unsigned_abs()
                        as usize;
                }
                let w = space_w * color_weights[dist];
                for c in 0..color_ch {
                    sums[c] += input[[sy, sx, c]] as f32 * w;
                }
                weight_sum += w;
            }

            for c in 0..color_ch {
                row[x * channels + c] = saturate_u8(sums[c] / weight_sum);
            }
            if channels == 4 {
                row[x * channels + 3] = input[[y, x, 3]];
            }
        }
    });

    from_rows(height, width, channels, output)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step_image(height: usize, width: usize, channels: usize) -> Array3<u8> {
        let mut img = Array3::<u8>::zeros((height, width, channels));
        for y in 0..height {
            for x in 0..width {
                for c in 0..color_channels(channels) {
                    img[[y, x, c]] = if x < width / 2 { 20 } else { 220 };
                }
                if channels == 4 {
                    img[[y, x, 3]] = 255;
                }
            }
        }
        img
    }

    #[test]
    fn test_gaussian_blur_flat_unchanged() {
        let img = Array3::<u8>::from_elem((8, 8, 3), 90);
        let result = gaussian_blur_u8(img.view(), 15, 0.0);
        assert_eq!(result, img);
    }

    #[test]
    fn test_gaussian_blur_softens_step() {
        let img = step_image(10, 10, 3);
        let result = gaussian_blur_u8(img.view(), 5, 0.0);

        // Pixels next to the step move toward the middle
        assert!(result[[5, 4, 0]] > 20);
        assert!(result[[5, 5, 0]] < 220);
        // Far side stays close to the original
        assert!(result[[5, 0, 0]] < 40);
    }

    #[test]
    fn test_gaussian_blur_ksize_one_is_copy() {
        let img = step_image(4, 4, 3);
        assert_eq!(gaussian_blur_u8(img.view(), 1, 0.0), img);
    }

    #[test]
    fn test_gaussian_blur_preserves_alpha() {
        let mut img = step_image(6, 6, 4);
        img[[2, 2, 3]] = 10;
        let result = gaussian_blur_u8(img.view(), 5, 0.0);
        assert_eq!(result[[2, 2, 3]], 10);
        assert_eq!(result[[0, 0, 3]], 255);
    }

    #[test]
    fn test_median_removes_salt_noise() {
        let mut img = Array3::<u8>::from_elem((5, 5, 1), 50);
        img[[2, 2, 0]] = 255;

        let result = median_blur_u8(img.view(), 3);

        assert_eq!(result[[2, 2, 0]], 50);
    }

    #[test]
    fn test_median_keeps_straight_edge() {
        let img = step_image(7, 8, 3);
        let result = median_blur_u8(img.view(), 5);
        assert_eq!(result, img);
    }

    #[test]
    fn test_bilateral_flat_unchanged() {
        let img = Array3::<u8>::from_elem((6, 6, 3), 140);
        let result = bilateral_u8(img.view(), 9, 75.0, 75.0);
        assert_eq!(result, img);
    }

    #[test]
    fn test_bilateral_preserves_strong_edge_with_small_sigma_color() {
        let img = step_image(8, 8, 3);
        let result = bilateral_u8(img.view(), 5, 10.0, 10.0);

        // 200 levels apart with sigma_color=10: neighbours across the edge get ~0 weight
        assert_eq!(result[[4, 3, 0]], 20);
        assert_eq!(result[[4, 4, 0]], 220);
    }

    #[test]
    fn test_bilateral_large_sigma_color_mixes_edge() {
        let img = step_image(8, 8, 3);
        let result = bilateral_u8(img.view(), 9, 300.0, 300.0);
        assert!(result[[4, 3, 0]] > 20);
        assert!(result[[4, 4, 0]] < 220);
    }

    #[test]
    fn test_bilateral_output_shape_rgba() {
        let img = step_image(5, 6, 4);
        let result = bilateral_u8(img.view(), 9, 300.0, 300.0);
        assert_eq!(result.dim(), (5, 6, 4));
        assert_eq!(result[[2, 2, 3]], 255);
    }

    #[test]
    fn test_bilateral_handles_five_channels() {
        let img = Array3::<u8>::from_elem((4, 4, 5), 10);
        let result = bilateral_u8(img.view(), 9, 300.0, 300.0);
        assert_eq!(result, img);
    }
}
