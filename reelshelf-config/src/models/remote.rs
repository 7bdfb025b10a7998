use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ConfigError;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8080/api/v1";

/// Where the remote catalog lives and how much of it one session may walk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteConfig {
    /// Root the `search`, `top` and `seasons` endpoints hang off.
    pub base_url: String,
    /// Items requested per remote page.
    pub page_size: usize,
    /// Upper bound on items a single browse session yields. `None` walks
    /// until the catalog reports no further pages.
    pub item_cap: Option<usize>,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            page_size: 25,
            item_cap: None,
        }
    }
}

impl RemoteConfig {
    pub fn parsed_base_url(&self) -> Result<Url, ConfigError> {
        let url = Url::parse(&self.base_url).map_err(|source| {
            ConfigError::InvalidBaseUrl {
                url: self.base_url.clone(),
                source,
            }
        })?;
        if url.cannot_be_a_base() {
            return Err(ConfigError::OpaqueBaseUrl(self.base_url.clone()));
        }
        Ok(url)
    }
}
