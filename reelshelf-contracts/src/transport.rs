use std::fmt::{self, Display};
use std::time::Duration;

use async_trait::async_trait;
use reelshelf_model::RawHttpResponse;
use url::Url;

/// No response was obtained at all (DNS, connect, TLS, reset...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportError {
    pub message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "transport error: {}", self.message)
    }
}

impl std::error::Error for TransportError {}

/// Performs a single GET without interpreting the status code.
#[cfg_attr(feature = "mock", mockall::automock)]
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn get(&self, url: &Url) -> Result<RawHttpResponse, TransportError>;
}

/// Source of real elapsed-time delays, injectable so retry timing can be
/// observed without waiting.
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}
