//! WebAssembly exports for photofilter.
//!
//! These functions are exposed to JavaScript via wasm-bindgen. Images cross
//! the boundary as flat row-major byte arrays plus their dimensions.

use ndarray::Array3;
use wasm_bindgen::prelude::*;

use crate::filters::{apply_filter, Filter};

/// Apply a named filter to a flat image buffer.
///
/// # Arguments
/// * `data` - Flat array of bytes (length = width * height * channels)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `channels` - 1 (gray), 3 (RGB) or 4 (RGBA)
/// * `name` - Filter name or label, e.g. "cartoon"
///
/// # Returns
/// Flat array of bytes with the same layout as `data`
#[wasm_bindgen]
pub fn apply_filter_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    channels: usize,
    name: &str,
) -> Result<Vec<u8>, JsValue> {
    let filter: Filter = name
        .parse()
        .map_err(|e: crate::Error| JsValue::from_str(&e.to_string()))?;
    if !matches!(channels, 1 | 3 | 4) {
        return Err(JsValue::from_str("channels must be 1, 3 or 4"));
    }
    let input = Array3::from_shape_vec((height, width, channels), data.to_vec())
        .map_err(|e| JsValue::from_str(&format!("invalid dimensions: {e}")))?;

    let result = apply_filter(input.view(), filter);
    Ok(result.into_raw_vec_and_offset().0)
}

/// Names of all filters in menu order.
#[wasm_bindgen]
pub fn filter_names_wasm() -> Vec<String> {
    Filter::ALL.iter().map(|f| f.name().to_string()).collect()
}

/// Human-readable labels of all filters in menu order.
#[wasm_bindgen]
pub fn filter_labels_wasm() -> Vec<String> {
    Filter::ALL.iter().map(|f| f.label().to_string()).collect()
}
