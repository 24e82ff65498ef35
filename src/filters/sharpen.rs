//! Sharpen filter.
//!
//! 3x3 sharpening kernel over all eight neighbours:
//!
//! ```text
//! -a   -a   -a
//! -a  1+8a  -a
//! -a   -a   -a
//! ```
//!
//! With `a = 1.0` this is the classic `[-1 -1 -1; -1 9 -1; -1 -1 -1]` kernel.
//! The kernel sums to 1, so flat regions are unchanged.

use ndarray::{Array3, ArrayView3};

use super::core::convolve_3x3_u8;

/// Build the sharpening kernel for a given strength.
pub fn sharpen_kernel(amount: f32) -> [[f32; 3]; 3] {
    let e = -amount;
    let center = 1.0 + 8.0 * amount;
    [[e, e, e], [e, center, e], [e, e, e]]
}

/// Apply sharpening filter.
///
/// # Arguments
/// * `input` - Image with 1, 3, or 4 channels (height, width, channels)
/// * `amount` - Sharpening strength (1.0 = standard); `<= 0` returns a copy
///
/// # Returns
/// Sharpened image with same channel count, alpha preserved
pub fn sharpen_u8(input: ArrayView3<u8>, amount: f32) -> Array3<u8> {
    if amount <= 0.0 {
        return input.to_owned();
    }
    convolve_3x3_u8(input, &sharpen_kernel(amount))
}
