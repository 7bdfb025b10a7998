#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One page as reported by a remote paged source, before domain mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RawPagedResponse<T> {
    pub data: Vec<T>,
    pub has_next_page: bool,
    pub total_items: u64,
}

/// A remote page after the caller's transform has mapped its items.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainPagedResult<R> {
    pub data: Vec<R>,
    pub has_next_page: bool,
}

impl<T> RawPagedResponse<T> {
    /// Map every item while keeping the pagination flags.
    pub fn map_items<R, F>(self, f: F) -> DomainPagedResult<R>
    where
        F: FnMut(T) -> R,
    {
        DomainPagedResult {
            data: self.data.into_iter().map(f).collect(),
            has_next_page: self.has_next_page,
        }
    }
}

/// Result of loading a single remote page, including the keys needed to
/// continue in either direction.
///
/// `prev_key` is `None` only for the first page. `next_key` is `None` when the
/// source has no further pages or the item cap was reached on this page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemotePageResult<R> {
    pub data: Vec<R>,
    pub prev_key: Option<u32>,
    pub next_key: Option<u32>,
}

impl<R> RemotePageResult<R> {
    pub fn is_last(&self) -> bool {
        self.next_key.is_none()
    }
}
