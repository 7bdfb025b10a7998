//! Trait surfaces for the external collaborators of the paging engine: the
//! HTTP transport, the delay source used for backoff, and the local store.
#![allow(missing_docs)]

pub mod store;
pub mod transport;

pub use store::{LocalPageStore, PageFeed, StoreError};
pub use transport::{HttpTransport, Sleeper, TransportError};

#[cfg(feature = "mock")]
pub use transport::MockHttpTransport;

/// Frequently used contracts for engine and binary crates.
pub mod prelude {
    pub use super::store::{LocalPageStore, PageFeed, StoreError};
    pub use super::transport::{HttpTransport, Sleeper, TransportError};
}
