use std::fmt;
use std::sync::Arc;

use reelshelf_contracts::HttpTransport;
use reelshelf_model::RawPagedResponse;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::{HttpOutcome, PagingError};
use crate::net::RequestExecutor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Fall,
}

impl Season {
    pub fn as_str(&self) -> &'static str {
        match self {
            Season::Winter => "winter",
            Season::Spring => "spring",
            Season::Summer => "summer",
            Season::Fall => "fall",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Season {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "winter" => Ok(Season::Winter),
            "spring" => Ok(Season::Spring),
            "summer" => Ok(Season::Summer),
            "fall" | "autumn" => Ok(Season::Fall),
            other => Err(format!("unknown season '{other}'")),
        }
    }
}

/// The listings the browser pages through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogQuery {
    Search { query: String },
    Top,
    Season { year: u16, season: Season },
}

#[derive(Debug, Deserialize)]
struct PageEnvelope<T> {
    #[serde(default)]
    pagination: Pagination,
    #[serde(default = "Vec::new")]
    data: Vec<T>,
}

#[derive(Debug, Default, Deserialize)]
struct Pagination {
    #[serde(default)]
    has_next_page: bool,
    #[serde(default)]
    items: PaginationItems,
}

#[derive(Debug, Default, Deserialize)]
struct PaginationItems {
    #[serde(default)]
    total: u64,
}

impl<T> From<PageEnvelope<T>> for RawPagedResponse<T> {
    fn from(envelope: PageEnvelope<T>) -> Self {
        RawPagedResponse {
            data: envelope.data,
            has_next_page: envelope.pagination.has_next_page,
            total_items: envelope.pagination.items.total,
        }
    }
}

/// Page source for the remote catalog API. Every request runs through the
/// shared [`RequestExecutor`] so rate limits are absorbed here.
#[derive(Clone)]
pub struct CatalogApi {
    base_url: Url,
    page_size: usize,
    transport: Arc<dyn HttpTransport>,
    executor: RequestExecutor,
}

impl fmt::Debug for CatalogApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatalogApi")
            .field("base_url", &self.base_url.as_str())
            .field("page_size", &self.page_size)
            .field("transport", &"dyn HttpTransport")
            .field("executor", &self.executor)
            .finish()
    }
}

impl CatalogApi {
    pub fn new(
        base_url: Url,
        page_size: usize,
        transport: Arc<dyn HttpTransport>,
        executor: RequestExecutor,
    ) -> Result<Self, PagingError> {
        if base_url.cannot_be_a_base() {
            return Err(PagingError::InvalidBaseUrl(base_url.to_string()));
        }

        Ok(Self {
            base_url,
            page_size,
            transport,
            executor,
        })
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn page_url(&self, query: &CatalogQuery, page: u32) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty();
            match query {
                CatalogQuery::Search { .. } => {
                    segments.push("search");
                }
                CatalogQuery::Top => {
                    segments.push("top");
                }
                CatalogQuery::Season { year, season } => {
                    segments
                        .push("seasons")
                        .push(&year.to_string())
                        .push(season.as_str());
                }
            }
        }

        {
            let mut pairs = url.query_pairs_mut();
            if let CatalogQuery::Search { query } = query {
                pairs.append_pair("q", query);
            }
            pairs
                .append_pair("page", &page.to_string())
                .append_pair("limit", &self.page_size.to_string());
        }

        url
    }

    /// Fetch and decode one page of `query`.
    pub async fn fetch_page<T>(
        &self,
        query: &CatalogQuery,
        page: u32,
    ) -> HttpOutcome<RawPagedResponse<T>>
    where
        T: DeserializeOwned,
    {
        let url = self.page_url(query, page);
        let url = &url;
        let transport = &self.transport;

        let envelope: PageEnvelope<T> = self
            .executor
            .execute_json(move || transport.get(url))
            .await?;

        Ok(envelope.into())
    }
}
