//! # Reelshelf Core
//!
//! Paging and windowed-caching engine for the Reelshelf catalog browser.
//!
//! Two halves share one problem, feeding an unbounded page-indexed source to
//! a list that scrolls:
//!
//! - [`remote`]: a forward-only [`RemotePager`] over the HTTP catalog, with
//!   paging keys, an optional item cap, and rate-limit retries through
//!   [`RequestExecutor`].
//! - [`local`]: a [`WindowedPagerController`] keeping at most `max_pages`
//!   pages of the local library resident, moved by scroll position and
//!   merged into one observable [`PagerState`](reelshelf_model::PagerState).
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use reelshelf_core::local::{MemoryPageStore, WindowedPagerController};
//! use reelshelf_model::{CatalogEntry, PagingWindowConfig};
//!
//! async fn browse(rows: Vec<CatalogEntry>) -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(MemoryPageStore::from_rows(rows));
//!     let config = PagingWindowConfig::new(20, 3)?;
//!     let mut pager = WindowedPagerController::new(config, store, |entry: &CatalogEntry| {
//!         entry.title.clone()
//!     });
//!
//!     let scroll = futures::stream::iter([0usize, 45, 12]);
//!     pager.initialize(scroll).await?;
//!     pager.scroll_finished().await;
//!     println!("resident pages: {:?}", pager.resident_pages());
//!     pager.invalidate();
//!     Ok(())
//! }
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(missing_docs)]

/// Error types and the typed HTTP outcome
pub mod error;

/// Local windowed paging
pub mod local;

/// Request execution, retry policy and transport adapters
pub mod net;

/// Remote forward-only paging and the catalog page source
pub mod remote;

pub use error::{HttpFailure, HttpOutcome, PagingError};
pub use local::{
    LocalPagingWindow, MemoryPageStore, WindowChange, WindowedPagerController,
};
pub use net::{RequestExecutor, RetryConfig};
pub use remote::{CatalogApi, CatalogQuery, RemotePager, Season};
