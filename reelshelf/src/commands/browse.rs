use std::sync::Arc;

use anyhow::{Context, bail};
use clap::{Args, Subcommand};
use futures::StreamExt;
use reelshelf_config::CatalogConfig;
use reelshelf_core::{
    CatalogApi, CatalogQuery, RemotePager, RequestExecutor, Season,
    net::ReqwestTransport,
};
use reelshelf_model::{CatalogEntry, RawPagedResponse};
use tracing::debug;

#[derive(Args, Debug)]
pub struct BrowseArgs {
    /// Stop after this many entries (overrides `remote.item_cap`)
    #[arg(long, global = true, value_name = "N")]
    cap: Option<usize>,

    #[command(subcommand)]
    listing: Listing,
}

#[derive(Subcommand, Debug)]
enum Listing {
    /// Full-text search
    Search {
        /// Search terms
        query: String,
    },
    /// Highest-ranked entries
    Top,
    /// Entries airing in a season
    Season {
        year: u16,
        /// winter, spring, summer or fall
        season: Season,
    },
}

impl From<Listing> for CatalogQuery {
    fn from(listing: Listing) -> Self {
        match listing {
            Listing::Search { query } => CatalogQuery::Search { query },
            Listing::Top => CatalogQuery::Top,
            Listing::Season { year, season } => {
                CatalogQuery::Season { year, season }
            }
        }
    }
}

pub async fn run(config: &CatalogConfig, args: BrowseArgs) -> anyhow::Result<()> {
    let base_url = config.remote.parsed_base_url()?;
    let api = CatalogApi::new(
        base_url,
        config.remote.page_size,
        Arc::new(ReqwestTransport::new()),
        RequestExecutor::new(config.retry),
    )
    .context("failed to build catalog client")?;

    let query = CatalogQuery::from(args.listing);
    let cap = args.cap.or(config.remote.item_cap);
    debug!(?query, ?cap, "browsing catalog");

    let pager = RemotePager::new(api.page_size()).with_item_cap(cap);
    let pages = pager.pages(
        |page| {
            let api = api.clone();
            let query = query.clone();
            async move { api.fetch_page::<CatalogEntry>(&query, page).await }
        },
        |raw: RawPagedResponse<CatalogEntry>| raw.map_items(|entry| entry),
    );
    let mut pages = std::pin::pin!(pages);

    let mut shown = 0usize;
    while let Some(outcome) = pages.next().await {
        match outcome {
            Ok(page) => {
                for entry in &page.data {
                    shown += 1;
                    println!("{}", format_entry(shown, entry));
                }
            }
            Err(failure) if failure.is_transient() => {
                bail!("temporary failure after {shown} entries ({failure}); try again")
            }
            Err(failure) => {
                bail!("request failed after {shown} entries: {failure}")
            }
        }
    }

    println!("-- {shown} entries");
    Ok(())
}

fn format_entry(position: usize, entry: &CatalogEntry) -> String {
    let mut line = format!("{position:>4}. {}", entry.title);
    if let Some(year) = entry.year {
        line.push_str(&format!(" ({year})"));
    }
    if let Some(score) = entry.score {
        line.push_str(&format!(" [{score:.2}]"));
    }
    line.push_str(&format!("  #{}", entry.id));
    line
}
