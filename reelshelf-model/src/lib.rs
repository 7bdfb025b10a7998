//! Core data model definitions shared across Reelshelf crates.
#![allow(missing_docs)]

pub mod catalog;
pub mod error;
pub mod http;
pub mod page;
pub mod pager_state;
pub mod remote;

// Intentionally curated re-exports for downstream consumers.
pub use catalog::CatalogEntry;
pub use error::{ModelError, Result as ModelResult};
pub use http::RawHttpResponse;
pub use page::{Page, PagingWindowConfig};
pub use pager_state::PagerState;
pub use remote::{DomainPagedResult, RawPagedResponse, RemotePageResult};
