use std::fmt::{self, Display};

use async_trait::async_trait;
use tokio::sync::watch;

/// Live view of one page of a local store.
///
/// The receiver already holds the page's current rows when handed out and is
/// updated whenever the underlying rows change. Clones observe the same feed.
pub type PageFeed<T> = watch::Receiver<Vec<T>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreError {
    pub message: String,
}

impl StoreError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "local store error: {}", self.message)
    }
}

impl std::error::Error for StoreError {}

/// Offset/limit queryable store backing the local windowed pager.
#[async_trait]
pub trait LocalPageStore<T>: Send + Sync
where
    T: Send + Sync + 'static,
{
    /// Rows currently held by the store.
    async fn total_count(&self) -> Result<usize, StoreError>;

    /// Subscribe to `limit` rows starting at `offset`.
    async fn fetch_page(
        &self,
        limit: usize,
        offset: usize,
    ) -> Result<PageFeed<T>, StoreError>;
}
