use std::fmt;
use std::sync::RwLock;

use async_trait::async_trait;
use reelshelf_contracts::{LocalPageStore, PageFeed, StoreError};
use tokio::sync::watch;
use tracing::trace;

struct LiveSlice<T> {
    limit: usize,
    offset: usize,
    sender: watch::Sender<Vec<T>>,
}

struct Rows<T> {
    rows: Vec<T>,
    live: Vec<LiveSlice<T>>,
}

/// The user's curated library held in memory, queryable by offset/limit.
///
/// Every feed handed out by [`LocalPageStore::fetch_page`] stays live: any
/// mutation recomputes the affected slices and pushes them to subscribers.
/// Slices nobody listens to any more are dropped on the next mutation.
pub struct MemoryPageStore<T> {
    inner: RwLock<Rows<T>>,
}

impl<T> fmt::Debug for MemoryPageStore<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (rows, live) = self
            .inner
            .try_read()
            .map(|guard| (guard.rows.len(), guard.live.len()))
            .unwrap_or_default();
        f.debug_struct("MemoryPageStore")
            .field("rows", &rows)
            .field("live_slices", &live)
            .finish()
    }
}

impl<T> Default for MemoryPageStore<T> {
    fn default() -> Self {
        Self {
            inner: RwLock::new(Rows {
                rows: Vec::new(),
                live: Vec::new(),
            }),
        }
    }
}

fn slice_of<T: Clone>(rows: &[T], limit: usize, offset: usize) -> Vec<T> {
    rows.iter().skip(offset).take(limit).cloned().collect()
}

fn poisoned() -> StoreError {
    StoreError::new("library lock poisoned")
}

impl<T> MemoryPageStore<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rows(rows: Vec<T>) -> Self {
        Self {
            inner: RwLock::new(Rows {
                rows,
                live: Vec::new(),
            }),
        }
    }

    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.inner.read().map_err(|_| poisoned())?.rows.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }

    /// Append a row to the end of the library.
    pub fn insert(&self, row: T) -> Result<(), StoreError> {
        self.mutate(|rows| rows.push(row))
    }

    /// Insert a row at `index`, shifting later rows down.
    pub fn insert_at(&self, index: usize, row: T) -> Result<(), StoreError> {
        self.mutate(|rows| {
            let index = index.min(rows.len());
            rows.insert(index, row);
        })
    }

    /// Remove every row matching `predicate`, returning how many went.
    pub fn remove_where<P>(&self, mut predicate: P) -> Result<usize, StoreError>
    where
        P: FnMut(&T) -> bool,
    {
        let mut removed = 0;
        self.mutate(|rows| {
            let before = rows.len();
            rows.retain(|row| !predicate(row));
            removed = before - rows.len();
        })?;
        Ok(removed)
    }

    pub fn replace_all(&self, rows: Vec<T>) -> Result<(), StoreError> {
        self.mutate(|current| *current = rows)
    }

    fn mutate<F>(&self, change: F) -> Result<(), StoreError>
    where
        F: FnOnce(&mut Vec<T>),
    {
        let mut guard = self.inner.write().map_err(|_| poisoned())?;
        change(&mut guard.rows);

        let Rows { rows, live } = &mut *guard;
        live.retain(|slice| !slice.sender.is_closed());
        for slice in live.iter() {
            let next = slice_of(rows, slice.limit, slice.offset);
            slice.sender.send_if_modified(|current| {
                if *current == next {
                    false
                } else {
                    *current = next;
                    true
                }
            });
        }
        trace!(rows = rows.len(), live = live.len(), "library changed");
        Ok(())
    }
}

#[async_trait]
impl<T> LocalPageStore<T> for MemoryPageStore<T>
where
    T: Clone + PartialEq + Send + Sync + 'static,
{
    async fn total_count(&self) -> Result<usize, StoreError> {
        self.len()
    }

    async fn fetch_page(
        &self,
        limit: usize,
        offset: usize,
    ) -> Result<PageFeed<T>, StoreError> {
        let mut guard = self.inner.write().map_err(|_| poisoned())?;
        guard.live.retain(|slice| !slice.sender.is_closed());
        let (sender, receiver) =
            watch::channel(slice_of(&guard.rows, limit, offset));
        guard.live.push(LiveSlice {
            limit,
            offset,
            sender,
        });
        Ok(receiver)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn feeds_follow_library_changes() {
        let store = MemoryPageStore::from_rows((0..10u32).collect());
        let mut page = store.fetch_page(3, 3).await.unwrap();
        assert_eq!(*page.borrow_and_update(), vec![3, 4, 5]);

        store.remove_where(|row| *row == 4).unwrap();
        assert!(page.has_changed().unwrap());
        assert_eq!(*page.borrow_and_update(), vec![3, 5, 6]);

        store.insert(99).unwrap();
        assert!(!page.has_changed().unwrap());
    }

    #[tokio::test]
    async fn abandoned_feeds_are_pruned() {
        let store = MemoryPageStore::from_rows(vec![1u32, 2, 3]);
        let page = store.fetch_page(2, 0).await.unwrap();
        drop(page);

        store.insert(4).unwrap();
        assert_eq!(store.inner.read().unwrap().live.len(), 0);
        assert_eq!(store.total_count().await.unwrap(), 4);
    }

    #[tokio::test]
    async fn scrolling_without_edits_does_not_accumulate_feeds() {
        let store = MemoryPageStore::from_rows((0..100u32).collect());
        for round in 0..1_000 {
            let page = store.fetch_page(20, (round % 5) * 20).await.unwrap();
            drop(page);
        }
        assert!(store.inner.read().unwrap().live.len() <= 1);

        let kept = store.fetch_page(20, 40).await.unwrap();
        let _ = store.fetch_page(20, 0).await.unwrap();
        let _ = store.fetch_page(20, 20).await.unwrap();
        assert_eq!(store.inner.read().unwrap().live.len(), 2);
        assert_eq!(kept.borrow().first(), Some(&40));
    }
}
