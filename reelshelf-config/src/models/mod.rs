mod catalog;
mod remote;

pub use catalog::{CatalogConfig, ConfigSource};
pub use remote::RemoteConfig;
