//! Editing session: one original image, one filtered image, one selection.
//!
//! The original is kept untouched after loading so every filter starts from
//! full-quality pixels. The filtered image is replaced wholesale on each
//! action.

use std::path::{Path, PathBuf};

use image::imageops::FilterType;
use ndarray::Array3;

use crate::config::SessionConfig;
use crate::error::{Error, Result};
use crate::filters::{apply_filter_with, Filter};
use crate::io::{from_dynamic_image, load_image, save_image, to_dynamic_image};

/// Stateful load → filter → preview/save workflow.
#[derive(Debug, Default)]
pub struct Session {
    config: SessionConfig,
    original: Option<Array3<u8>>,
    filtered: Option<Array3<u8>>,
    selected: Filter,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The loaded image, as decoded.
    pub fn original(&self) -> Option<&Array3<u8>> {
        self.original.as_ref()
    }

    /// The result of the last filter action (a copy of the original after load).
    pub fn filtered(&self) -> Option<&Array3<u8>> {
        self.filtered.as_ref()
    }

    pub fn selected(&self) -> Filter {
        self.selected
    }

    pub fn has_image(&self) -> bool {
        self.original.is_some()
    }

    /// (width, height) of the loaded image.
    pub fn dimensions(&self) -> Option<(usize, usize)> {
        self.original.as_ref().map(|img| {
            let (height, width, _) = img.dim();
            (width, height)
        })
    }

    /// Load an image, replacing both buffers.
    ///
    /// The filtered image starts as a copy of the original and the selection
    /// resets to [`Filter::Normal`].
    ///
    /// # Errors
    ///
    /// Unsupported extensions and decode failures leave the session unchanged.
    pub fn open<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let image = load_image(path)?;
        self.filtered = Some(image.clone());
        self.original = Some(image);
        self.selected = Filter::Normal;
        Ok(())
    }

    /// Replace the loaded image with an in-memory buffer.
    pub fn set_image(&mut self, image: Array3<u8>) {
        self.filtered = Some(image.clone());
        self.original = Some(image);
        self.selected = Filter::Normal;
    }

    /// Recompute the filtered image from the original.
    ///
    /// Does nothing and returns `false` when no image is loaded.
    pub fn apply(&mut self, filter: Filter) -> bool {
        let Some(original) = self.original.as_ref() else {
            tracing::warn!(filter = filter.name(), "no image loaded, ignoring filter");
            return false;
        };
        self.filtered = Some(apply_filter_with(original.view(), filter, &self.config.filters));
        self.selected = filter;
        true
    }

    /// Write the filtered image to `path`.
    ///
    /// # Returns
    ///
    /// The path actually written (`.jpg` appended when `path` has no extension).
    ///
    /// # Errors
    ///
    /// [`Error::NoImageLoaded`] when there is nothing to save, otherwise
    /// format and I/O errors from [`save_image`].
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<PathBuf> {
        let filtered = self.filtered.as_ref().ok_or(Error::NoImageLoaded)?;
        save_image(filtered.view(), path, self.config.jpeg_quality)
    }

    /// The filtered image scaled to fit the configured preview bounds.
    pub fn preview(&self) -> Result<Option<Array3<u8>>> {
        let (max_width, max_height) = self.config.preview_max;
        self.preview_within(max_width, max_height)
    }

    /// The filtered image scaled to fit `max_width x max_height`.
    ///
    /// Aspect ratio is preserved and images are never upscaled. Resampling
    /// uses Lanczos3. Returns `None` when no image is loaded.
    pub fn preview_within(&self, max_width: u32, max_height: u32) -> Result<Option<Array3<u8>>> {
        let Some(filtered) = self.filtered.as_ref() else {
            return Ok(None);
        };
        let (height, width, _) = filtered.dim();
        let Some((new_width, new_height)) =
            fit_within(width as u32, height as u32, max_width.max(1), max_height.max(1))
        else {
            return Ok(Some(filtered.clone()));
        };

        let resized = to_dynamic_image(filtered.view())?.resize_exact(
            new_width,
            new_height,
            FilterType::Lanczos3,
        );
        // Keep the channel layout of the filtered image
        let channels = filtered.dim().2;
        let array = match channels {
            4 => {
                let raw = resized.into_rgba8().into_raw();
                Array3::from_shape_vec((new_height as usize, new_width as usize, 4), raw)
                    .map_err(|e| Error::InvalidShape {
                        expected: format!("({new_height}, {new_width}, 4)"),
                        actual: e.to_string(),
                    })?
            }
            _ => from_dynamic_image(resized),
        };
        Ok(Some(array))
    }
}

/// Size that fits `width x height` inside the bounds, or `None` if it already fits.
fn fit_within(width: u32, height: u32, max_width: u32, max_height: u32) -> Option<(u32, u32)> {
    if width <= max_width && height <= max_height {
        return None;
    }
    let ratio = (max_width as f64 / width as f64).min(max_height as f64 / height as f64);
    let new_width = ((width as f64 * ratio) as u32).max(1);
    let new_height = ((height as f64 * ratio) as u32).max(1);
    Some((new_width, new_height))
}
