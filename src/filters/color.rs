//! Color matrix filters: generic 3x3 transform and Sepia.
//!
//! Pixel-wise operations without spatial context. Every output channel is a
//! weighted sum of the input R, G, B values, saturated to 0-255.
//!
//! ## Supported Formats
//!
//! - **Grayscale**: (height, width, 1) - returned unchanged (no color to mix)
//! - **RGB**: (height, width, 3)
//! - **RGBA**: (height, width, 4) - alpha preserved

use ndarray::{Array3, ArrayView3};

use super::core::saturate_u8;

/// Classic sepia tone matrix, rows produce R', G', B' from (R, G, B).
pub const SEPIA_MATRIX: [[f32; 3]; 3] = [
    [0.393, 0.769, 0.189],
    [0.349, 0.686, 0.168],
    [0.272, 0.534, 0.131],
];

/// Apply a 3x3 color matrix to every pixel.
///
/// # Arguments
/// * `input` - Image with 1, 3, or 4 channels (height, width, channels)
/// * `matrix` - Row `i` holds the (R, G, B) weights of output channel `i`
///
/// # Returns
/// Transformed image with same channel count
pub fn color_matrix_u8(input: ArrayView3<u8>, matrix: &[[f32; 3]; 3]) -> Array3<u8> {
    let (height, width, channels) = input.dim();
    if channels < 3 {
        return input.to_owned();
    }
    let mut output = Array3::<u8>::zeros((height, width, channels));

    for y in 0..height {
        for x in 0..width {
            let r = input[[y, x, 0]] as f32;
            let g = input[[y, x, 1]] as f32;
            let b = input[[y, x, 2]] as f32;
            for (c, row) in matrix.iter().enumerate() {
                output[[y, x, c]] = saturate_u8(row[0] * r + row[1] * g + row[2] * b);
            }
            for c in 3..channels {
                output[[y, x, c]] = input[[y, x, c]];
            }
        }
    }
    output
}

/// Apply the sepia tone filter.
pub fn sepia_u8(input: ArrayView3<u8>) -> Array3<u8> {
    color_matrix_u8(input, &SEPIA_MATRIX)
}
