//! Edge detection: Canny.
//!
//! ## Supported Formats
//!
//! Accepts images with 1, 3, or 4 channels:
//! - **Grayscale**: (height, width, 1) - uses the single channel directly
//! - **RGB**: (height, width, 3) - computes BT.601 luma first
//! - **RGBA**: (height, width, 4) - computes luma from RGB, preserves alpha
//!
//! Output is binary (0 or 255) and written to every color channel.

use ndarray::{Array2, Array3, ArrayView2, ArrayView3};

use super::core::replicate;
use super::grayscale::{gray_to_channels, luma_plane_u8, GrayscaleWeights};

/// tan(22.5°), boundary between horizontal and diagonal gradient sectors.
const TAN_22_5: f32 = 0.414_213_57;

/// 3x3 Sobel gradients of a gray plane with replicated borders.
///
/// Returns `(dx, dy)` as unnormalized integer-valued floats.
fn sobel_3x3(gray: ArrayView2<u8>) -> (Array2<f32>, Array2<f32>) {
    let (height, width) = gray.dim();
    let mut dx = Array2::<f32>::zeros((height, width));
    let mut dy = Array2::<f32>::zeros((height, width));

    let at = |y: isize, x: isize| -> f32 {
        gray[[replicate(y, height), replicate(x, width)]] as f32
    };

    for y in 0..height as isize {
        for x in 0..width as isize {
            let gx = (at(y - 1, x + 1) + 2.0 * at(y, x + 1) + at(y + 1, x + 1))
                - (at(y - 1, x - 1) + 2.0 * at(y, x - 1) + at(y + 1, x - 1));
            let gy = (at(y + 1, x - 1) + 2.0 * at(y + 1, x) + at(y + 1, x + 1))
                - (at(y - 1, x - 1) + 2.0 * at(y - 1, x) + at(y - 1, x + 1));
            dx[[y as usize, x as usize]] = gx;
            dy[[y as usize, x as usize]] = gy;
        }
    }

    (dx, dy)
}

/// Run Canny on a gray plane.
///
/// Algorithm:
/// - 3x3 Sobel gradients (no pre-blur)
/// - L1 gradient magnitude `|dx| + |dy|`
/// - Non-maximum suppression along the gradient direction quantized to
///   horizontal, vertical or one of the two diagonals
/// - Hysteresis: pixels above `high` seed edges, which grow through
///   8-connected pixels above `low`
///
/// # Returns
/// Plane of 0 (background) and 255 (edge)
pub fn canny_plane_u8(gray: ArrayView2<u8>, low: f32, high: f32) -> Array2<u8> {
    let (height, width) = gray.dim();
    let mut edges = Array2::<u8>::zeros((height, width));
    if height < 3 || width < 3 {
        return edges;
    }
    let (low, high) = if low > high { (high, low) } else { (low, high) };

    let (dx, dy) = sobel_3x3(gray);
    let magnitude = Array2::from_shape_fn((height, width), |(y, x)| {
        dx[[y, x]].abs() + dy[[y, x]].abs()
    });
    // Outside the image counts as zero magnitude
    let mag = |y: isize, x: isize| -> f32 {
        if y < 0 || x < 0 || y >= height as isize || x >= width as isize {
            0.0
        } else {
            magnitude[[y as usize, x as usize]]
        }
    };

    // Non-maximum suppression, then classify survivors as strong or weak
    let mut weak = Array2::<bool>::from_elem((height, width), false);
    let mut stack: Vec<(usize, usize)> = Vec::new();

    for y in 0..height {
        for x in 0..width {
            let m = magnitude[[y, x]];
            if m <= low {
                continue;
            }
            let (yi, xi) = (y as isize, x as isize);
            let gx = dx[[y, x]];
            let gy = dy[[y, x]];
            let ax = gx.abs();
            let ay = gy.abs();
            let tg22 = ax * TAN_22_5;

            let is_max = if ay < tg22 {
                // Horizontal gradient: compare left/right
                m > mag(yi, xi - 1) && m >= mag(yi, xi + 1)
            } else if ay > tg22 + 2.0 * ax {
                // Vertical gradient: compare up/down
                m > mag(yi - 1, xi) && m >= mag(yi + 1, xi)
            } else {
                // Diagonal: direction depends on gradient sign agreement
                let s: isize = if (gx < 0.0) != (gy < 0.0) { -1 } else { 1 };
                m > mag(yi - 1, xi - s) && m > mag(yi + 1, xi + s)
            };

            if !is_max {
                continue;
            }
            if m > high {
                edges[[y, x]] = 255;
                stack.push((y, x));
            } else {
                weak[[y, x]] = true;
            }
        }
    }

    // Hysteresis: grow strong edges through 8-connected weak pixels
    while let Some((y, x)) = stack.pop() {
        for ny in y.saturating_sub(1)..(y + 2).min(height) {
            for nx in x.saturating_sub(1)..(x + 2).min(width) {
                if weak[[ny, nx]] {
                    weak[[ny, nx]] = false;
                    edges[[ny, nx]] = 255;
                    stack.push((ny, nx));
                }
            }
        }
    }

    edges
}

/// Find edges using Canny edge detection.
///
/// # Arguments
/// * `input` - Image with 1, 3, or 4 channels (height, width, channels)
/// * `low_threshold` - Hysteresis low threshold on the L1 Sobel magnitude
/// * `high_threshold` - Hysteresis high threshold on the L1 Sobel magnitude
///
/// # Returns
/// Edge image with same channel count (binary: 0 or 255, alpha preserved)
pub fn canny_u8(input: ArrayView3<u8>, low_threshold: f32, high_threshold: f32) -> Array3<u8> {
    let gray = luma_plane_u8(input, GrayscaleWeights::BT601);
    let edges = canny_plane_u8(gray.view(), low_threshold, high_threshold);
    gray_to_channels(edges.view(), input)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vertical_step(height: usize, width: usize, channels: usize) -> Array3<u8> {
        let mut img = Array3::<u8>::zeros((height, width, channels));
        for y in 0..height {
            for x in 0..width {
                let v = if x < width / 2 { 0 } else { 255 };
                for c in 0..channels.min(3) {
                    img[[y, x, c]] = v;
                }
                if channels == 4 {
                    img[[y, x, 3]] = 255;
                }
            }
        }
        img
    }

    #[test]
    fn test_sobel_vertical_step() {
        let img = vertical_step(5, 6, 1);
        let gray = img.index_axis(ndarray::Axis(2), 0);
        let (dx, dy) = sobel_3x3(gray);
        // Step between x=2 and x=3: |dx| = 4 * 255 on both sides
        assert_eq!(dx[[2, 2]], 1020.0);
        assert_eq!(dx[[2, 3]], 1020.0);
        assert_eq!(dx[[2, 0]], 0.0);
        assert_eq!(dy[[2, 2]], 0.0);
    }

    #[test]
    fn test_canny_detects_vertical_edge() {
        let img = vertical_step(8, 8, 3);
        let result = canny_u8(img.view(), 100.0, 200.0);

        // Exactly one column of edge pixels in the interior rows
        for y in 1..7 {
            let count = (0..8).filter(|&x| result[[y, x, 0]] == 255).count();
            assert_eq!(count, 1, "row {y} should have a single edge pixel");
        }
        assert_eq!(result[[4, 3, 0]], 255);
        assert_eq!(result[[4, 0, 0]], 0);
    }

    #[test]
    fn test_canny_output_is_binary_and_gray() {
        let mut img = Array3::<u8>::zeros((10, 10, 3));
        for y in 0..10 {
            for x in 0..10 {
                img[[y, x, 0]] = ((x * 37 + y * 11) % 256) as u8;
                img[[y, x, 1]] = ((x * 7 + y * 53) % 256) as u8;
                img[[y, x, 2]] = ((x * y * 5) % 256) as u8;
            }
        }
        let result = canny_u8(img.view(), 100.0, 200.0);
        for y in 0..10 {
            for x in 0..10 {
                let v = result[[y, x, 0]];
                assert!(v == 0 || v == 255);
                assert_eq!(v, result[[y, x, 1]]);
                assert_eq!(v, result[[y, x, 2]]);
            }
        }
    }

    #[test]
    fn test_canny_flat_has_no_edges() {
        let img = Array3::<u8>::from_elem((6, 6, 3), 77);
        let result = canny_u8(img.view(), 100.0, 200.0);
        assert!(result.iter().all(|&v| v == 0));
    }

    #[test]
    fn test_canny_weak_edge_needs_strong_neighbour() {
        // A faint step (L1 magnitude 4 * 40 = 160) lies between the thresholds
        let mut img = Array3::<u8>::zeros((6, 8, 1));
        for y in 0..6 {
            for x in 4..8 {
                img[[y, x, 0]] = 40;
            }
        }
        let isolated = canny_u8(img.view(), 100.0, 200.0);
        assert!(isolated.iter().all(|&v| v == 0));

        // Lowering the high threshold makes the same edge strong
        let strong = canny_u8(img.view(), 100.0, 150.0);
        assert!(strong.iter().any(|&v| v == 255));
    }

    #[test]
    fn test_canny_small_image_is_empty() {
        let img = Array3::<u8>::from_elem((2, 2, 3), 255);
        let result = canny_u8(img.view(), 100.0, 200.0);
        assert_eq!(result.dim(), (2, 2, 3));
        assert!(result.iter().all(|&v| v == 0));
    }

    #[test]
    fn test_canny_preserves_alpha() {
        let img = vertical_step(6, 6, 4);
        let result = canny_u8(img.view(), 100.0, 200.0);
        assert_eq!(result[[3, 3, 3]], 255);
        assert_eq!(result[[3, 0, 3]], 255);
    }

    #[test]
    fn test_canny_swapped_thresholds_match() {
        let mut img = Array3::<u8>::zeros((12, 12, 3));
        for y in 0..12 {
            for x in 0..12 {
                img[[y, x, 0]] = ((x * 41 + y * 13) % 256) as u8;
                img[[y, x, 1]] = ((x * 9 + y * 67) % 256) as u8;
                img[[y, x, 2]] = ((x * y * 7) % 256) as u8;
            }
        }
        let ordered = canny_u8(img.view(), 100.0, 200.0);
        let swapped = canny_u8(img.view(), 200.0, 100.0);
        assert_eq!(ordered, swapped);
        assert!(ordered.iter().any(|&v| v == 255));
    }
}
