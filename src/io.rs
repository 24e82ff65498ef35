//! Image loading and saving.
//!
//! - `load_image`: decode a file into a (height, width, channels) array
//! - `save_image`: encode an array, format chosen by the file extension
//! - `to_dynamic_image` / `from_dynamic_image`: conversions to the `image` crate

use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, GrayImage, RgbImage, RgbaImage};
use ndarray::{Array3, ArrayView3};

use crate::error::{Error, Result};

/// Extensions accepted by [`load_image`] and [`save_image`] (lowercase).
pub const SUPPORTED_EXTENSIONS: [&str; 6] = ["jpg", "jpeg", "png", "bmp", "tif", "tiff"];

/// Extension appended when a save path has none.
pub const DEFAULT_EXTENSION: &str = "jpg";

/// Lowercased extension of `path`, if any.
fn extension_of(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

/// Whether `path` carries one of the supported raster extensions.
pub fn is_supported(path: &Path) -> bool {
    extension_of(path).is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()))
}

/// Convert a decoded image into a 3-channel RGB array.
///
/// Gray sources are expanded to R=G=B and alpha is dropped, so every loaded
/// photo takes the color filters the same way.
pub fn from_dynamic_image(img: DynamicImage) -> Array3<u8> {
    let (width, height) = (img.width() as usize, img.height() as usize);
    Array3::from_shape_vec((height, width, 3), img.into_rgb8().into_raw())
        .expect("decoded buffer length is width * height * 3")
}

/// Convert an array into an `image` crate buffer.
///
/// # Errors
///
/// Returns [`Error::InvalidShape`] for channel counts other than 1, 3 or 4.
pub fn to_dynamic_image(array: ArrayView3<u8>) -> Result<DynamicImage> {
    let (height, width, channels) = array.dim();
    let shape_error = || Error::InvalidShape {
        expected: "(height, width, 1 | 3 | 4)".to_string(),
        actual: format!("({height}, {width}, {channels})"),
    };
    let raw: Vec<u8> = array.iter().copied().collect();
    let (w, h) = (width as u32, height as u32);

    let img = match channels {
        1 => GrayImage::from_raw(w, h, raw).map(DynamicImage::ImageLuma8),
        3 => RgbImage::from_raw(w, h, raw).map(DynamicImage::ImageRgb8),
        4 => RgbaImage::from_raw(w, h, raw).map(DynamicImage::ImageRgba8),
        _ => None,
    };
    img.ok_or_else(shape_error)
}

/// Load an image from disk.
///
/// # Errors
///
/// Returns an error if the extension is unsupported or decoding fails.
pub fn load_image<P: AsRef<Path>>(path: P) -> Result<Array3<u8>> {
    let path = path.as_ref();
    if !is_supported(path) {
        return Err(Error::UnsupportedFormat {
            path: path.to_path_buf(),
        });
    }

    let img = image::open(path).map_err(|source| Error::ImageLoad {
        path: path.to_path_buf(),
        source,
    })?;
    let array = from_dynamic_image(img);

    let (height, width, channels) = array.dim();
    tracing::info!(path = %path.display(), width, height, channels, "loaded image");
    Ok(array)
}

/// Resolve the final save path, appending the default extension if missing.
pub fn resolve_save_path(path: &Path) -> PathBuf {
    if path.extension().is_none() {
        path.with_extension(DEFAULT_EXTENSION)
    } else {
        path.to_path_buf()
    }
}

/// Save an image to disk, format inferred from the extension.
///
/// A path without extension gets `.jpg`. JPEG output drops alpha and uses
/// `jpeg_quality` (1-100).
///
/// # Returns
///
/// The path actually written.
///
/// # Errors
///
/// Returns an error if the extension is unsupported or encoding fails.
pub fn save_image<P: AsRef<Path>>(array: ArrayView3<u8>, path: P, jpeg_quality: u8) -> Result<PathBuf> {
    let path = resolve_save_path(path.as_ref());
    if !is_supported(&path) {
        return Err(Error::UnsupportedFormat { path });
    }
    let img = to_dynamic_image(array)?;

    match extension_of(&path).as_deref() {
        Some("jpg") | Some("jpeg") => {
            let img = match img {
                DynamicImage::ImageRgba8(_) => DynamicImage::ImageRgb8(img.into_rgb8()),
                other => other,
            };
            // Encode fully before touching the file so a failure leaves nothing behind
            let mut buffer = Vec::new();
            let encoder = JpegEncoder::new_with_quality(&mut buffer, jpeg_quality.clamp(1, 100));
            img.write_with_encoder(encoder)
                .map_err(|source| Error::ImageSave {
                    path: path.clone(),
                    source,
                })?;
            std::fs::write(&path, &buffer)?;
        }
        _ => {
            img.save(&path).map_err(|source| Error::ImageSave {
                path: path.clone(),
                source,
            })?;
        }
    }

    tracing::info!(path = %path.display(), "saved image");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_supported_case_insensitive() {
        assert!(is_supported(Path::new("a.JPG")));
        assert!(is_supported(Path::new("dir/b.png")));
        assert!(is_supported(Path::new("c.TIFF")));
        assert!(!is_supported(Path::new("d.gif")));
        assert!(!is_supported(Path::new("noext")));
    }

    #[test]
    fn test_resolve_save_path_defaults_to_jpg() {
        assert_eq!(resolve_save_path(Path::new("out")), PathBuf::from("out.jpg"));
        assert_eq!(resolve_save_path(Path::new("out.png")), PathBuf::from("out.png"));
    }

    #[test]
    fn test_from_dynamic_image_rgb() {
        let img = DynamicImage::new_rgb8(4, 2);
        let array = from_dynamic_image(img);
        assert_eq!(array.dim(), (2, 4, 3));
    }

    #[test]
    fn test_from_dynamic_image_gray_and_rgba() {
        let mut gray = GrayImage::new(3, 5);
        gray.put_pixel(1, 2, image::Luma([77]));
        let array = from_dynamic_image(DynamicImage::ImageLuma8(gray));
        assert_eq!(array.dim(), (5, 3, 3));
        assert_eq!(array.slice(ndarray::s![2, 1, ..]).to_vec(), vec![77, 77, 77]);

        // Alpha is dropped on load
        let rgba = DynamicImage::new_rgba8(2, 2);
        assert_eq!(from_dynamic_image(rgba).dim(), (2, 2, 3));
    }

    #[test]
    fn test_to_dynamic_image_pixel_layout() {
        let mut array = Array3::<u8>::zeros((2, 3, 3));
        array[[1, 2, 0]] = 10;
        array[[1, 2, 1]] = 20;
        array[[1, 2, 2]] = 30;

        let img = to_dynamic_image(array.view()).unwrap().into_rgb8();

        assert_eq!(img.dimensions(), (3, 2));
        assert_eq!(img.get_pixel(2, 1).0, [10, 20, 30]);
    }

    #[test]
    fn test_to_dynamic_image_rejects_two_channels() {
        let array = Array3::<u8>::zeros((2, 2, 2));
        assert!(matches!(
            to_dynamic_image(array.view()),
            Err(Error::InvalidShape { .. })
        ));
    }
}
