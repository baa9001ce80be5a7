//! Domain error types for thumbgrid
//!
//! Provides structured error types for different domains:
//! - `SearchError` for the search endpoint
//! - `ThumbnailError` for fetching and decoding thumbnails
//! - `GalleryError` as the top-level error type

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for thumbgrid
#[derive(Debug, Error)]
pub enum GalleryError {
    #[error("Search error: {0}")]
    Search(#[from] SearchError),

    #[error("Invalid config file {path}: {message}")]
    Config { path: PathBuf, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Terminal error: {0}")]
    Terminal(String),

    #[error("{0}")]
    Other(String),
}

/// Errors talking to the search endpoint
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Search endpoint returned HTTP {0}")]
    Status(u16),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Errors loading a single thumbnail
#[derive(Debug, Error)]
pub enum ThumbnailError {
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Thumbnail server returned HTTP {0}")]
    Status(u16),

    #[error("Failed to read thumbnail: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to decode thumbnail: {0}")]
    Decode(#[from] image::ImageError),
}

/// Result type alias for SearchError
pub type SearchResult<T> = std::result::Result<T, SearchError>;

/// Result type alias for ThumbnailError
pub type ThumbnailResult<T> = std::result::Result<T, ThumbnailError>;

impl From<anyhow::Error> for GalleryError {
    fn from(err: anyhow::Error) -> Self {
        GalleryError::Other(err.to_string())
    }
}
