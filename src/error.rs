use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced while reading a MAP file or producing its outputs.
///
/// Per-line problems (a coordinate-shaped line the fine parser rejects) are not
/// errors; they are counted in [`crate::parser::ScanStats`] and skipped.
#[derive(Debug, Error)]
pub enum MapError {
    #[error("file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no valid coordinates found in {origin}")]
    NoCoordinatesFound { origin: String },

    #[error("failed to write image: {0}")]
    Image(#[from] image::ImageError),

    #[error("failed to export coordinates to {}: {source}", path.display())]
    Export {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl MapError {
    /// Classify an IO failure on `path`, mapping `NotFound` to its own variant.
    pub fn from_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            MapError::FileNotFound { path }
        } else {
            MapError::Io { path, source }
        }
    }
}

pub type Result<T> = std::result::Result<T, MapError>;
