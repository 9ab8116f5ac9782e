//! Error types for the try-on library.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading assets or exporting frames.
///
/// Per-frame rendering never fails: missing faces and unknown selections
/// degrade to passthrough instead.
#[derive(Error, Debug)]
pub enum TryOnError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Accessory manifest {0} contains no accessories")]
    EmptyCatalog(PathBuf),
    #[error("Duplicate accessory id: {0}")]
    DuplicateAccessory(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl TryOnError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, TryOnError>;
