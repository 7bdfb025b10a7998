use std::path::PathBuf;

use reelshelf_model::ModelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {origin}: {reason}")]
    Parse { origin: String, reason: String },
    #[error("invalid value {value:?} for {var}: {reason}")]
    InvalidOverride {
        var: &'static str,
        value: String,
        reason: String,
    },
    #[error("invalid catalog base URL {url:?}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("catalog base URL {0:?} cannot carry path segments")]
    OpaqueBaseUrl(String),
    #[error("remote page size must be greater than zero")]
    ZeroRemotePageSize,
    #[error("invalid retry policy: {reason}")]
    InvalidRetry { reason: String },
    #[error(transparent)]
    Window(#[from] ModelError),
    #[error(transparent)]
    EnvFile(#[from] dotenvy::Error),
}
