//! Core utilities for image processing filters.
//!
//! This module provides shared functionality used by multiple filters:
//! - Gaussian kernel generation
//! - Border extrapolation (reflect-101 and replicate)
//! - Separable and 3x3 convolution with row-parallel passes
//! - Saturating conversion back to u8

use ndarray::{Array3, ArrayView3};
use rayon::prelude::*;

/// Number of channels a filter should process (alpha excluded).
#[inline]
pub fn color_channels(channels: usize) -> usize {
    if channels == 4 {
        3
    } else {
        channels
    }
}

/// Round and clamp a float sample to the u8 range.
#[inline]
pub fn saturate_u8(v: f32) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

/// Reflect-101 border index: `gfedcb|abcdefgh|gfedcba`.
#[inline]
pub fn reflect_101(i: isize, len: usize) -> usize {
    if len == 1 {
        return 0;
    }
    let last = len as isize - 1;
    let mut i = i;
    while i < 0 || i > last {
        i = if i < 0 { -i } else { 2 * last - i };
    }
    i as usize
}

/// Replicate border index: `aaaaaa|abcdefgh|hhhhhhh`.
#[inline]
pub fn replicate(i: isize, len: usize) -> usize {
    i.clamp(0, len as isize - 1) as usize
}

/// Sigma used when a Gaussian is specified by its kernel size only.
pub fn sigma_for_ksize(ksize: usize) -> f32 {
    0.3 * ((ksize as f32 - 1.0) * 0.5 - 1.0) + 0.8
}

/// Generate a normalized 1D Gaussian kernel.
///
/// # Arguments
/// * `ksize` - Kernel length, forced odd
/// * `sigma` - Standard deviation; `<= 0` derives it from `ksize`
///
/// # Returns
/// Kernel weights summing to 1.0
pub fn gaussian_kernel_1d(ksize: usize, sigma: f32) -> Vec<f32> {
    let ksize = ksize.max(1) | 1;
    let sigma = if sigma > 0.0 {
        sigma
    } else {
        sigma_for_ksize(ksize)
    };
    let half = (ksize / 2) as f32;

    let mut kernel: Vec<f32> = (0..ksize)
        .map(|i| {
            let x = i as f32 - half;
            (-x * x / (2.0 * sigma * sigma)).exp()
        })
        .collect();

    let sum: f32 = kernel.iter().sum();
    for v in kernel.iter_mut() {
        *v /= sum;
    }

    kernel
}

/// Wrap a row-major buffer produced by a row-parallel pass.
pub(crate) fn from_rows<T>(height: usize, width: usize, channels: usize, data: Vec<T>) -> Array3<T> {
    Array3::from_shape_vec((height, width, channels), data)
        .expect("row buffer length is height * width * channels")
}

/// Copy the alpha channel of `input` into `output` when both have 4 channels.
pub fn copy_alpha(input: ArrayView3<u8>, output: &mut Array3<u8>) {
    let (height, width, channels) = input.dim();
    if channels != 4 || output.dim().2 != 4 {
        return;
    }
    for y in 0..height {
        for x in 0..width {
            output[[y, x, 3]] = input[[y, x, 3]];
        }
    }
}

/// Separable convolution with the same 1D kernel on both axes.
///
/// Uses reflect-101 borders. Color channels are convolved, alpha is copied.
/// Both passes are parallelized over rows with Rayon.
pub fn separable_convolve_u8(input: ArrayView3<u8>, kernel: &[f32]) -> Array3<u8> {
    let (height, width, channels) = input.dim();
    if height == 0 || width == 0 {
        return input.to_owned();
    }
    let half = (kernel.len() / 2) as isize;
    let color_ch = color_channels(channels);
    let row_len = width * channels;

    // Pass 1: Horizontal
    let mut temp = vec![0.0f32; height * row_len];
    temp.par_chunks_mut(row_len).enumerate().for_each(|(y, row)| {
        for x in 0..width {
            for c in 0..color_ch {
                let mut sum = 0.0f32;
                for (ki, &kv) in kernel.iter().enumerate() {
                    let sx = reflect_101(x as isize + ki as isize - half, width);
                    sum += input[[y, sx, c]] as f32 * kv;
                }
                row[x * channels + c] = sum;
            }
        }
    });

    // Pass 2: Vertical
    let mut output = vec![0u8; height * row_len];
    output.par_chunks_mut(row_len).enumerate().for_each(|(y, row)| {
        for x in 0..width {
            for c in 0..color_ch {
                let mut sum = 0.0f32;
                for (ki, &kv) in kernel.iter().enumerate() {
                    let sy = reflect_101(y as isize + ki as isize - half, height);
                    sum += temp[sy * row_len + x * channels + c] * kv;
                }
                row[x * channels + c] = saturate_u8(sum);
            }
            if channels == 4 {
                row[x * channels + 3] = input[[y, x, 3]];
            }
        }
    });

    from_rows(height, width, channels, output)
}

/// Convolve color channels with a 3x3 kernel (correlation, as filter2D).
///
/// Uses reflect-101 borders and saturates the result. Alpha is copied.
pub fn convolve_3x3_u8(input: ArrayView3<u8>, kernel: &[[f32; 3]; 3]) -> Array3<u8> {
    let (height, width, channels) = input.dim();
    if height == 0 || width == 0 {
        return input.to_owned();
    }
    let color_ch = color_channels(channels);
    let row_len = width * channels;

    let mut output = vec![0u8; height * row_len];
    output.par_chunks_mut(row_len).enumerate().for_each(|(y, row)| {
        for x in 0..width {
            for c in 0..color_ch {
                let mut sum = 0.0f32;
                for (ky, krow) in kernel.iter().enumerate() {
                    let sy = reflect_101(y as isize + ky as isize - 1, height);
                    for (kx, &kv) in krow.iter().enumerate() {
                        let sx = reflect_101(x as isize + kx as isize - 1, width);
                        sum += input[[sy, sx, c]] as f32 * kv;
                    }
                }
                row[x * channels + c] = saturate_u8(sum);
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

    #[test]
    fn test_reflect_101_borders() {
        // gfedcb|abcdefgh|gfedcba
        assert_eq!(reflect_101(-1, 8), 1);
        assert_eq!(reflect_101(-2, 8), 2);
        assert_eq!(reflect_101(8, 8), 6);
        assert_eq!(reflect_101(9, 8), 5);
        assert_eq!(reflect_101(3, 8), 3);
        assert_eq!(reflect_101(-5, 1), 0);
        // Far outside a short axis still lands inside
        assert!(reflect_101(-7, 3) < 3);
    }

    #[test]
    fn test_replicate_borders() {
        assert_eq!(replicate(-3, 5), 0);
        assert_eq!(replicate(7, 5), 4);
        assert_eq!(replicate(2, 5), 2);
    }

    #[test]
    fn test_sigma_for_ksize() {
        assert!((sigma_for_ksize(15) - 2.6).abs() < 1e-5);
        assert!((sigma_for_ksize(21) - 3.5).abs() < 1e-5);
    }

    #[test]
    fn test_gaussian_kernel_normalized_and_symmetric() {
        let k = gaussian_kernel_1d(15, 0.0);
        assert_eq!(k.len(), 15);
        let sum: f32 = k.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5);
        for i in 0..7 {
            assert!((k[i] - k[14 - i]).abs() < 1e-6);
        }
        assert!(k[7] > k[6]);
    }

    #[test]
    fn test_gaussian_kernel_even_size_made_odd() {
        assert_eq!(gaussian_kernel_1d(4, 1.0).len(), 5);
    }

    #[test]
    fn test_separable_convolve_flat_image_unchanged() {
        let img = Array3::<u8>::from_elem((6, 7, 3), 120);
        let kernel = gaussian_kernel_1d(5, 0.0);
        let result = separable_convolve_u8(img.view(), &kernel);
        assert_eq!(result, img);
    }

    #[test]
    fn test_convolve_3x3_identity() {
        let mut img = Array3::<u8>::zeros((4, 4, 4));
        for y in 0..4 {
            for x in 0..4 {
                img[[y, x, 0]] = (y * 40 + x * 10) as u8;
                img[[y, x, 3]] = 77;
            }
        }
        let identity = [[0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 0.0]];
        let result = convolve_3x3_u8(img.view(), &identity);
        assert_eq!(result, img);
    }

    #[test]
    fn test_convolve_3x3_matches_sequential_loop() {
        let img = Array3::from_shape_fn((9, 11, 3), |(y, x, c)| ((x * 29 + y * 47 + c * 83) % 256) as u8);
        let kernel = [[0.0, -1.0, 0.0], [-1.0, 5.0, -1.0], [0.0, -1.0, 0.0]];
        let result = convolve_3x3_u8(img.view(), &kernel);

        let (height, width, channels) = img.dim();
        for y in 0..height {
            for x in 0..width {
                for c in 0..channels {
                    let mut sum = 0.0f32;
                    for (ky, krow) in kernel.iter().enumerate() {
                        let sy = reflect_101(y as isize + ky as isize - 1, height);
                        for (kx, &kv) in krow.iter().enumerate() {
                            let sx = reflect_101(x as isize + kx as isize - 1, width);
                            sum += img[[sy, sx, c]] as f32 * kv;
                        }
                    }
                    assert_eq!(result[[y, x, c]], saturate_u8(sum), "at ({y}, {x}, {c})");
                }
            }
        }
    }
}
