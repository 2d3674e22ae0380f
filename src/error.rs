use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read config {path:?}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config syntax error: {0}")]
    ConfigSyntax(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("covariance matrix is {0}")]
    Covariance(&'static str),

    #[error("failed to write frames to {path:?}: {source}")]
    Capture {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
