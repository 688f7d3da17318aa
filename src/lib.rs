use std::path::PathBuf;

pub mod audio;
pub mod catalog;
pub mod cli;
pub mod utils;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("IO error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Metadata extraction error for {}: {message}", .path.display())]
    Metadata { path: PathBuf, message: String },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl CatalogError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CatalogError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;

// Re-exports for convenience
pub use audio::metadata::{MetadataExtractor, RawTags, TagSource};
pub use catalog::model::{AlbumInfo, FolderMap, FolderNode, TrackMetadata};
pub use catalog::tree::{sort_roots, ScanStats, TrackScope, TreeBuilder};
