use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Path does not exist: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Cannot read directory {}: {source}", path.display())]
    Resolution {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot create compare folder {}: {source}", path.display())]
    CompareFolderCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid descriptor: {0}")]
    InvalidDescriptor(String),

    #[error("Cannot write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
