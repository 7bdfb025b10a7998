use reelshelf_contracts::StoreError;
use thiserror::Error;

/// Classified outcome of a remote request that did not produce a usable body.
///
/// `RateLimited` is the only class the executor retries; it surfaces here
/// once the retry budget is spent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HttpFailure {
    #[error("rate limited; gave up after {attempts} attempts")]
    RateLimited { attempts: u32 },

    #[error("bad request (400)")]
    BadRequest,

    #[error("internal server error (500)")]
    InternalServerError,

    #[error("service unavailable (503)")]
    ServiceUnavailable,

    #[error("unexpected HTTP status {status}")]
    Unknown { status: u16 },

    #[error("connection failure: {reason}")]
    ConnectionFailure { reason: String },

    #[error("malformed response body: {reason}")]
    Malformed { reason: String },
}

impl HttpFailure {
    /// Whether a user-initiated retry has a reasonable chance to succeed.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            HttpFailure::RateLimited { .. }
                | HttpFailure::InternalServerError
                | HttpFailure::ServiceUnavailable
                | HttpFailure::ConnectionFailure { .. }
        )
    }

    /// Classification of a non-success status. The executor intercepts 429
    /// to retry before it ever gets here.
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => HttpFailure::BadRequest,
            500 => HttpFailure::InternalServerError,
            503 => HttpFailure::ServiceUnavailable,
            429 => HttpFailure::RateLimited { attempts: 1 },
            status => HttpFailure::Unknown { status },
        }
    }
}

/// Typed result of a remote request; never a panic or a silent empty value.
pub type HttpOutcome<T> = std::result::Result<T, HttpFailure>;

#[derive(Debug, Error)]
pub enum PagingError {
    #[error("pager controller was already initialized")]
    AlreadyInitialized,

    #[error("pager controller was invalidated and cannot be reused")]
    Invalidated,

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("invalid catalog base URL: {0}")]
    InvalidBaseUrl(String),
}

pub type Result<T> = std::result::Result<T, PagingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_classes() {
        assert_eq!(HttpFailure::from_status(400), HttpFailure::BadRequest);
        assert_eq!(
            HttpFailure::from_status(500),
            HttpFailure::InternalServerError
        );
        assert_eq!(
            HttpFailure::from_status(503),
            HttpFailure::ServiceUnavailable
        );
        assert_eq!(
            HttpFailure::from_status(418),
            HttpFailure::Unknown { status: 418 }
        );
    }

    #[test]
    fn transient_versus_terminal() {
        assert!(HttpFailure::ServiceUnavailable.is_transient());
        assert!(
            HttpFailure::ConnectionFailure {
                reason: "reset".into()
            }
            .is_transient()
        );
        assert!(!HttpFailure::BadRequest.is_transient());
        assert!(!HttpFailure::Unknown { status: 404 }.is_transient());
        assert!(
            !HttpFailure::Malformed {
                reason: "eof".into()
            }
            .is_transient()
        );
    }
}
