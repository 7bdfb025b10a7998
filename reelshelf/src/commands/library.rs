use std::{fs, path::PathBuf, sync::Arc, time::Duration};

use anyhow::{Context, bail};
use clap::Args;
use reelshelf_config::CatalogConfig;
use reelshelf_core::{MemoryPageStore, WindowedPagerController};
use reelshelf_model::{CatalogEntry, PagerState, PagingWindowConfig};
use tracing::warn;

const SETTLE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Args, Debug)]
pub struct LibraryArgs {
    /// JSON array of catalog entries
    file: PathBuf,

    /// First-visible item indices to replay, in order
    #[arg(long, value_delimiter = ',', required = true, value_name = "I,I,...")]
    scroll: Vec<usize>,
}

pub async fn run(config: &CatalogConfig, args: LibraryArgs) -> anyhow::Result<()> {
    let raw = fs::read_to_string(&args.file).with_context(|| {
        format!("failed to read library {}", args.file.display())
    })?;
    let rows: Vec<CatalogEntry> = serde_json::from_str(&raw).with_context(|| {
        format!("library {} is not a JSON array of entries", args.file.display())
    })?;
    let total = rows.len();

    let window = config.window;
    let store = Arc::new(MemoryPageStore::from_rows(rows));
    let mut pager = WindowedPagerController::new(window, store, |entry: &CatalogEntry| {
        entry.title.clone()
    });

    let thresholds = pager.thresholds();
    println!(
        "library: {total} entries, page size {}, {} resident pages (prepend < {}, append >= {})",
        window.page_size(),
        window.max_pages(),
        thresholds.prepend_fetch_limit,
        thresholds.append_fetch_limit,
    );

    pager
        .initialize(futures::stream::iter(args.scroll))
        .await
        .context("failed to load the library window")?;
    pager.scroll_finished().await;

    let resident = pager.resident_pages();
    let expected = resident_items(&window, &resident, total);
    let mut states = pager.subscribe();
    let settled = tokio::time::timeout(
        SETTLE_TIMEOUT,
        states.wait_for(|state| {
            state.items().is_some_and(|items| items.len() == expected)
        }),
    )
    .await
    .is_ok_and(|waited| waited.is_ok());

    let state = pager.state();
    pager.invalidate();

    if !settled {
        warn!(expected, "merged state did not settle in time");
    }

    match state {
        PagerState::Loaded(items) => {
            println!("resident pages: {resident:?}");
            println!("merged items: {}", items.len());
            if let (Some(first), Some(last)) = (items.first(), items.last()) {
                println!("first: {first}");
                println!("last: {last}");
            }
            Ok(())
        }
        PagerState::Loading => bail!("library window never finished loading"),
        PagerState::Failed { reason } => bail!("library window failed: {reason}"),
    }
}

/// Item count covered by `resident` once every page's feed has delivered.
fn resident_items(
    window: &PagingWindowConfig,
    resident: &[u32],
    total: usize,
) -> usize {
    match (resident.first(), resident.last()) {
        (Some(&first), Some(&last)) => {
            let end = (window.offset_of(last) + window.page_size()).min(total);
            end.saturating_sub(window.offset_of(first))
        }
        _ => 0,
    }
}
