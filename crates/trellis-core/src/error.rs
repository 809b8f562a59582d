//! Errors raised at the input boundary

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrellisError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid object document: {0}")]
    Document(#[from] serde_json::Error),

    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),
}

impl TrellisError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TrellisError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, TrellisError>;
