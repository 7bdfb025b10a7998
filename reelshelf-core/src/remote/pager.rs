use std::future::Future;

use futures::Stream;
use reelshelf_model::{DomainPagedResult, RawPagedResponse, RemotePageResult};
use tracing::{debug, warn};

use crate::error::HttpOutcome;

/// Page index used when no key is supplied.
pub const INITIAL_PAGE: u32 = 1;

/// Forward-only pager over a page-indexed remote source.
///
/// Computes the neighbouring page keys and enforces an optional cap on the
/// total number of items handed out across one paging session. The cap is
/// applied by truncating the page that crosses it, never by skipping a fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemotePager {
    requested_size: usize,
    item_cap: Option<usize>,
}

impl RemotePager {
    pub fn new(requested_size: usize) -> Self {
        Self {
            requested_size,
            item_cap: None,
        }
    }

    pub fn with_item_cap(mut self, item_cap: Option<usize>) -> Self {
        self.item_cap = item_cap;
        self
    }

    pub fn requested_size(&self) -> usize {
        self.requested_size
    }

    pub fn item_cap(&self) -> Option<usize> {
        self.item_cap
    }

    /// Load the page at `page_key` (or the first page) through `fetch`, map it
    /// with `transform`, and attach the paging keys.
    ///
    /// A failed fetch is returned as-is without computing any keys.
    pub async fn load<T, R, F, Fut, M>(
        &self,
        page_key: Option<u32>,
        fetch: F,
        transform: M,
    ) -> HttpOutcome<RemotePageResult<R>>
    where
        F: FnOnce(u32) -> Fut,
        Fut: Future<Output = HttpOutcome<RawPagedResponse<T>>>,
        M: FnOnce(RawPagedResponse<T>) -> DomainPagedResult<R>,
    {
        let page = page_key.unwrap_or(INITIAL_PAGE);

        let raw = fetch(page).await.inspect_err(|failure| {
            warn!(page, %failure, transient = failure.is_transient(), "remote page load failed");
        })?;

        Ok(self.paginate(page, transform(raw)))
    }

    fn paginate<R>(
        &self,
        page: u32,
        result: DomainPagedResult<R>,
    ) -> RemotePageResult<R> {
        let DomainPagedResult {
            mut data,
            has_next_page,
        } = result;

        let seen_before =
            (page.saturating_sub(1) as usize).saturating_mul(self.requested_size);
        let total_seen = seen_before + data.len();

        let next_key = match self.item_cap {
            Some(cap) if total_seen >= cap => {
                data.truncate(cap.saturating_sub(seen_before));
                debug!(page, cap, kept = data.len(), "item cap reached");
                None
            }
            // The largest key has no successor.
            _ if has_next_page => page.checked_add(1),
            _ => None,
        };

        let prev_key = if page == INITIAL_PAGE {
            None
        } else {
            Some(page - 1)
        };

        RemotePageResult {
            data,
            prev_key,
            next_key,
        }
    }

    /// Walk the source from the first page until it runs out, the cap is hit,
    /// or a fetch fails. A failure is yielded once and ends the stream.
    pub fn pages<T, R, F, Fut, M>(
        self,
        mut fetch: F,
        mut transform: M,
    ) -> impl Stream<Item = HttpOutcome<RemotePageResult<R>>>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = HttpOutcome<RawPagedResponse<T>>>,
        M: FnMut(RawPagedResponse<T>) -> DomainPagedResult<R>,
    {
        async_stream::stream! {
            let mut key = Some(INITIAL_PAGE);
            while let Some(page) = key {
                match self.load(Some(page), &mut fetch, &mut transform).await {
                    Ok(result) => {
                        key = result.next_key;
                        yield Ok(result);
                    }
                    Err(failure) => {
                        yield Err(failure);
                        break;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use futures::StreamExt;

    use super::*;
    use crate::error::HttpFailure;

    fn raw_page(
        range: std::ops::Range<u32>,
        has_next_page: bool,
    ) -> RawPagedResponse<u32> {
        RawPagedResponse {
            data: range.collect(),
            has_next_page,
            total_items: 1_000,
        }
    }

    fn identity(raw: RawPagedResponse<u32>) -> DomainPagedResult<u32> {
        raw.map_items(|item| item)
    }

    #[tokio::test]
    async fn first_page_has_no_previous_key() {
        let pager = RemotePager::new(20);
        let result = pager
            .load(None, |page| async move {
                assert_eq!(page, INITIAL_PAGE);
                Ok(raw_page(0..20, true))
            }, identity)
            .await
            .unwrap();

        assert_eq!(result.prev_key, None);
        assert_eq!(result.next_key, Some(2));
        assert_eq!(result.data.len(), 20);
    }

    #[tokio::test]
    async fn later_pages_link_both_ways() {
        let pager = RemotePager::new(20);
        let result = pager
            .load(Some(3), |_| async { Ok(raw_page(40..60, true)) }, identity)
            .await
            .unwrap();

        assert_eq!(result.prev_key, Some(2));
        assert_eq!(result.next_key, Some(4));
    }

    #[tokio::test]
    async fn largest_page_key_is_the_last_page() {
        let pager = RemotePager::new(20);
        let result = pager
            .load(Some(u32::MAX), |_| async { Ok(raw_page(0..20, true)) }, identity)
            .await
            .unwrap();

        assert_eq!(result.prev_key, Some(u32::MAX - 1));
        assert_eq!(result.next_key, None);
        assert!(result.is_last());
        assert_eq!(result.data.len(), 20);
    }

    #[tokio::test]
    async fn source_exhaustion_ends_paging() {
        let pager = RemotePager::new(20);
        let result = pager
            .load(Some(2), |_| async { Ok(raw_page(20..31, false)) }, identity)
            .await
            .unwrap();

        assert_eq!(result.next_key, None);
        assert_eq!(result.data.len(), 11);
    }

    #[tokio::test]
    async fn cap_truncates_the_crossing_page() {
        let pager = RemotePager::new(20).with_item_cap(Some(25));

        let first = pager
            .load(Some(1), |_| async { Ok(raw_page(0..20, true)) }, identity)
            .await
            .unwrap();
        assert_eq!(first.next_key, Some(2));
        assert_eq!(first.data.len(), 20);

        let second = pager
            .load(Some(2), |_| async { Ok(raw_page(20..40, true)) }, identity)
            .await
            .unwrap();
        assert_eq!(second.next_key, None);
        assert_eq!(second.data, (20..25).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn cap_on_exact_page_boundary_stops_without_truncation() {
        let pager = RemotePager::new(20).with_item_cap(Some(20));
        let result = pager
            .load(None, |_| async { Ok(raw_page(0..20, true)) }, identity)
            .await
            .unwrap();

        assert_eq!(result.data.len(), 20);
        assert_eq!(result.next_key, None);
    }

    #[tokio::test]
    async fn failures_pass_through_untouched() {
        let pager = RemotePager::new(20);
        let transformed = Mutex::new(false);
        let outcome = pager
            .load(
                Some(2),
                |_| async { Err::<RawPagedResponse<u32>, _>(HttpFailure::ServiceUnavailable) },
                |raw| {
                    *transformed.lock().unwrap() = true;
                    identity(raw)
                },
            )
            .await;

        assert_eq!(outcome, Err(HttpFailure::ServiceUnavailable));
        assert!(!*transformed.lock().unwrap());
    }

    #[tokio::test]
    async fn stream_never_exceeds_the_cap() {
        let pager = RemotePager::new(20).with_item_cap(Some(45));
        let pages: Vec<_> = pager
            .pages(
                |page| async move {
                    let start = (page - 1) * 20;
                    Ok(raw_page(start..start + 20, true))
                },
                identity,
            )
            .collect()
            .await;

        let sizes: Vec<usize> = pages
            .iter()
            .map(|page| page.as_ref().unwrap().data.len())
            .collect();
        assert_eq!(sizes, vec![20, 20, 5]);
        let last = pages.last().unwrap().as_ref().unwrap();
        assert_eq!(last.data, (40..45).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn stream_stops_after_first_failure() {
        let pager = RemotePager::new(10);
        let calls = Mutex::new(Vec::new());
        let pages: Vec<_> = pager
            .pages(
                |page| {
                    calls.lock().unwrap().push(page);
                    async move {
                        if page == 2 {
                            Err(HttpFailure::InternalServerError)
                        } else {
                            Ok(raw_page(0..10, true))
                        }
                    }
                },
                identity,
            )
            .collect()
            .await;

        assert_eq!(pages.len(), 2);
        assert_eq!(pages[1], Err(HttpFailure::InternalServerError));
        assert_eq!(*calls.lock().unwrap(), vec![1, 2]);
    }
}
