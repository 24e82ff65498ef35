//! Error types for photofilter.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the photofilter library.
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to decode an image file.
    #[error("failed to load image from {path}: {source}")]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Failed to encode or write an image file.
    #[error("failed to save image to {path}: {source}")]
    ImageSave {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// The file extension is not one of the supported raster formats.
    #[error("unsupported image format: {path}")]
    UnsupportedFormat { path: PathBuf },

    /// No filter is registered under this name.
    #[error("unknown filter {0:?}")]
    UnknownFilter(String),

    /// An operation needed an image but none is loaded.
    #[error("no image loaded")]
    NoImageLoaded,

    /// Array shape cannot be represented as an image.
    #[error("invalid image shape: expected {expected}, got {actual}")]
    InvalidShape { expected: String, actual: String },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for photofilter operations.
pub type Result<T> = std::result::Result<T, Error>;
