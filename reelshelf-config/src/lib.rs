//! Configuration for the Reelshelf paging engine.
//!
//! [`CatalogConfig`] bundles the remote catalog settings, the retry policy
//! and the local window shape. It is read from a TOML or JSON file, inline
//! JSON in the environment, or defaults, then adjusted by single-value
//! environment overrides and checked by [`CatalogConfig::validate`].

#![allow(missing_docs)]

pub mod error;
pub mod models;
mod overrides;

pub use error::ConfigError;
pub use models::{CatalogConfig, ConfigSource, RemoteConfig};
pub use overrides::{
    ENV_API_BASE_URL, ENV_CONFIG_JSON, ENV_CONFIG_PATH, ENV_ITEM_CAP,
    ENV_MAX_BACKOFF, ENV_MAX_RETRIES,
};

pub type Result<T> = std::result::Result<T, ConfigError>;
