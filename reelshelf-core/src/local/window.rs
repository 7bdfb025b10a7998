use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use reelshelf_contracts::{LocalPageStore, PageFeed, StoreError};
use reelshelf_model::{Page, PagingWindowConfig};
use tracing::debug;

/// What a window mutation did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowChange {
    Appended { page: u32, evicted: Option<u32> },
    Prepended { page: u32, evicted: Option<u32> },
    Unchanged,
}

impl WindowChange {
    pub fn is_changed(&self) -> bool {
        !matches!(self, WindowChange::Unchanged)
    }
}

struct ResidentPage<T> {
    number: u32,
    feed: PageFeed<T>,
}

/// Bounded, contiguous run of pages held from a [`LocalPageStore`].
///
/// At most `max_pages` pages are resident. Appending to a full window evicts
/// the oldest page; prepending evicts the newest. Only the page adjacent to
/// the current edge can be loaded, so page numbers always form an ascending
/// run without gaps.
pub struct LocalPagingWindow<T, S> {
    config: PagingWindowConfig,
    store: Arc<S>,
    pages: VecDeque<ResidentPage<T>>,
    has_prev_page: bool,
    has_next_page: bool,
}

impl<T, S> fmt::Debug for LocalPagingWindow<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let resident: Vec<u32> = self.pages.iter().map(|page| page.number).collect();
        f.debug_struct("LocalPagingWindow")
            .field("config", &self.config)
            .field("resident", &resident)
            .field("has_prev_page", &self.has_prev_page)
            .field("has_next_page", &self.has_next_page)
            .finish()
    }
}

impl<T, S> LocalPagingWindow<T, S>
where
    T: Clone + Send + Sync + 'static,
    S: LocalPageStore<T>,
{
    pub fn new(config: PagingWindowConfig, store: Arc<S>) -> Self {
        Self {
            config,
            store,
            pages: VecDeque::with_capacity(config.max_pages()),
            has_prev_page: false,
            has_next_page: true,
        }
    }

    pub fn config(&self) -> &PagingWindowConfig {
        &self.config
    }

    pub fn has_prev_page(&self) -> bool {
        self.has_prev_page
    }

    pub fn has_next_page(&self) -> bool {
        self.has_next_page
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Resident page numbers in window order.
    pub fn resident_pages(&self) -> Vec<u32> {
        self.pages.iter().map(|page| page.number).collect()
    }

    /// Clones of the live feeds of every resident page, in window order.
    pub fn feeds(&self) -> Vec<PageFeed<T>> {
        self.pages.iter().map(|page| page.feed.clone()).collect()
    }

    /// Current contents of the resident pages.
    pub fn snapshot(&self) -> Vec<Page<T>> {
        self.pages
            .iter()
            .map(|page| Page::new(page.number, page.feed.borrow().clone()))
            .collect()
    }

    /// Append the page after the current tail (page 1 on an empty window).
    pub async fn append_next(&mut self) -> Result<WindowChange, StoreError> {
        let page = self.pages.back().map_or(1, |last| last.number + 1);
        self.append(page).await
    }

    /// Prepend the page before the current head.
    pub async fn prepend_previous(
        &mut self,
    ) -> Result<WindowChange, StoreError> {
        match self.pages.front() {
            Some(first) if first.number > 1 => {
                let page = first.number - 1;
                self.prepend(page).await
            }
            _ => Ok(WindowChange::Unchanged),
        }
    }

    pub async fn append(
        &mut self,
        page: u32,
    ) -> Result<WindowChange, StoreError> {
        if !self.has_next_page && !self.store_grew().await? {
            return Ok(WindowChange::Unchanged);
        }

        let expected = self.pages.back().map_or(1, |last| last.number + 1);
        if page != expected {
            debug!(page, expected, "ignoring non-adjacent append");
            return Ok(WindowChange::Unchanged);
        }

        let (feed, total) = self.load_page(page).await?;

        let evicted = if self.pages.len() >= self.config.max_pages() {
            self.pages.pop_front().map(|oldest| oldest.number)
        } else {
            None
        };
        self.pages.push_back(ResidentPage { number: page, feed });
        self.refresh_edges(total);

        debug!(page, ?evicted, resident = ?self.resident_pages(), "appended page");
        Ok(WindowChange::Appended { page, evicted })
    }

    pub async fn prepend(
        &mut self,
        page: u32,
    ) -> Result<WindowChange, StoreError> {
        if !self.has_prev_page {
            return Ok(WindowChange::Unchanged);
        }

        let expected = self
            .pages
            .front()
            .and_then(|first| first.number.checked_sub(1));
        if expected != Some(page) {
            debug!(page, ?expected, "ignoring non-adjacent prepend");
            return Ok(WindowChange::Unchanged);
        }

        let (feed, total) = self.load_page(page).await?;

        let evicted = if self.pages.len() >= self.config.max_pages() {
            self.pages.pop_back().map(|newest| newest.number)
        } else {
            None
        };
        self.pages.push_front(ResidentPage { number: page, feed });
        self.refresh_edges(total);

        debug!(page, ?evicted, resident = ?self.resident_pages(), "prepended page");
        Ok(WindowChange::Prepended { page, evicted })
    }

    async fn load_page(
        &self,
        page: u32,
    ) -> Result<(PageFeed<T>, usize), StoreError> {
        let offset = self.config.offset_of(page);
        let feed = self
            .store
            .fetch_page(self.config.page_size(), offset)
            .await?;
        let total = self.store.total_count().await?;
        Ok((feed, total))
    }

    /// Re-read the store size at the tail so rows added after the window
    /// reached the end become reachable.
    async fn store_grew(&mut self) -> Result<bool, StoreError> {
        let total = self.store.total_count().await?;
        self.refresh_edges(total);
        Ok(self.has_next_page)
    }

    fn refresh_edges(&mut self, total_items: usize) {
        self.has_prev_page =
            self.pages.front().is_some_and(|first| first.number > 1);
        self.has_next_page = match self.pages.back() {
            Some(last) => {
                let end = self.config.offset_of(last.number)
                    + last.feed.borrow().len();
                end < total_items
            }
            None => total_items > 0,
        };
    }
}
