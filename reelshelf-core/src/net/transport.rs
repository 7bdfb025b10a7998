use async_trait::async_trait;
use reelshelf_contracts::{HttpTransport, TransportError};
use reelshelf_model::RawHttpResponse;
use tracing::trace;
use url::Url;

/// [`HttpTransport`] over a shared `reqwest` client. Status codes are passed
/// through untouched; only the absence of a response is an error here.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, url: &Url) -> Result<RawHttpResponse, TransportError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|err| TransportError::new(err.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|err| TransportError::new(err.to_string()))?;

        trace!(%url, status, bytes = body.len(), "http response received");
        Ok(RawHttpResponse::new(status, body.to_vec()))
    }
}
