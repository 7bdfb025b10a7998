use std::fmt;
use std::future::Future;
use std::sync::Arc;

use reelshelf_contracts::{Sleeper, TransportError};
use reelshelf_model::RawHttpResponse;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::{RetryConfig, TokioSleeper};
use crate::error::{HttpFailure, HttpOutcome};

const STATUS_OK: u16 = 200;
const STATUS_TOO_MANY_REQUESTS: u16 = 429;

/// Runs one remote operation, retrying only while the server answers 429.
///
/// The backoff state lives on the stack of each [`Self::execute`] call, so
/// one executor can be shared by concurrent requests.
#[derive(Clone)]
pub struct RequestExecutor {
    config: RetryConfig,
    sleeper: Arc<dyn Sleeper>,
}

impl fmt::Debug for RequestExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestExecutor")
            .field("config", &self.config)
            .field("sleeper", &"dyn Sleeper")
            .finish()
    }
}

impl Default for RequestExecutor {
    fn default() -> Self {
        Self::new(RetryConfig::default())
    }
}

impl RequestExecutor {
    pub fn new(config: RetryConfig) -> Self {
        Self::with_sleeper(config, Arc::new(TokioSleeper))
    }

    pub fn with_sleeper(config: RetryConfig, sleeper: Arc<dyn Sleeper>) -> Self {
        Self { config, sleeper }
    }

    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    /// Execute `request` and return the body of the first 200 response.
    ///
    /// A transport error ends the call immediately with
    /// [`HttpFailure::ConnectionFailure`], whatever retries remain. Statuses
    /// other than 200 and 429 are terminal on first sight.
    pub async fn execute<F, Fut>(&self, mut request: F) -> HttpOutcome<Vec<u8>>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<RawHttpResponse, TransportError>>,
    {
        let max_retries = self.config.max_retries;
        let mut delay = self.config.initial_backoff();
        let mut attempt = 0u32;

        while attempt < max_retries {
            attempt += 1;

            let response = match request().await {
                Ok(response) => response,
                Err(err) => {
                    warn!(attempt, error = %err, "request failed without a response");
                    return Err(HttpFailure::ConnectionFailure {
                        reason: err.message,
                    });
                }
            };

            match response.status {
                STATUS_OK => return Ok(response.body),
                STATUS_TOO_MANY_REQUESTS => {
                    warn!(
                        attempt,
                        max_retries,
                        delay_ms = delay.as_millis() as u64,
                        "rate limited; backing off"
                    );
                    self.sleeper.sleep(delay).await;
                    delay = self.config.next_backoff(delay);
                }
                status => {
                    let failure = HttpFailure::from_status(status);
                    debug!(attempt, status, %failure, "request failed");
                    return Err(failure);
                }
            }
        }

        warn!(attempts = attempt, "rate limit retries exhausted");
        Err(HttpFailure::RateLimited { attempts: attempt })
    }

    /// [`Self::execute`] followed by JSON decoding of the success body.
    pub async fn execute_json<T, F, Fut>(&self, request: F) -> HttpOutcome<T>
    where
        T: DeserializeOwned,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<RawHttpResponse, TransportError>>,
    {
        let body = self.execute(request).await?;
        serde_json::from_slice(&body).map_err(|err| HttpFailure::Malformed {
            reason: err.to_string(),
        })
    }
}
