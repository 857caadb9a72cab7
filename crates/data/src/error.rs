use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading bookmarks
#[derive(Debug, Error)]
pub enum BookmarkError {
    /// The backup file could not be read
    #[error("failed to read {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The backup is not a valid bookmark tree
    #[error("invalid bookmark backup")]
    Parse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, BookmarkError>;
