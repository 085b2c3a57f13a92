// src/services/search.rs

//! Catalog search client.
//!
//! Queries the catalog's search page and lists candidate series in the order
//! the site returns them.

use reqwest::Client;
use scraper::Html;
use url::Url;

use crate::error::{AppError, Result};
use crate::models::{CatalogSelectors, SearchHit, parse_selector};
use crate::utils::http::fetch_page_async;
use crate::utils::resolve_url;

/// Service for querying the catalog search endpoint.
pub struct CatalogSearchClient {
    client: Client,
    base_url: Url,
    selectors: CatalogSelectors,
}

impl CatalogSearchClient {
    /// Create a new search client for the catalog rooted at `base_url`.
    pub fn new(client: Client, base_url: &str, selectors: CatalogSelectors) -> Result<Self> {
        Ok(Self {
            client,
            base_url: Url::parse(base_url)?,
            selectors,
        })
    }

    /// Search the catalog for `keyword`.
    pub async fn search(&self, keyword: &str) -> Result<Vec<SearchHit>> {
        let url = self.search_url(keyword);
        log::debug!("Searching catalog: {}", url);

        let document = fetch_page_async(&self.client, &url).await?;
        parse_search_results(&document, &self.selectors, &self.base_url)
    }

    /// The keyword is inserted verbatim; the HTTP layer percent-encodes it.
    fn search_url(&self, keyword: &str) -> String {
        format!("{}/?s={}", self.base_url.as_str().trim_end_matches('/'), keyword)
    }
}

/// Parse a search result page into hits, in document order.
///
/// Entries without a title element or link attribute are skipped.
pub fn parse_search_results(
    document: &Html,
    selectors: &CatalogSelectors,
    base_url: &Url,
) -> Result<Vec<SearchHit>> {
    let entry_sel = parse_selector(&selectors.search_entry)?;
    let title_sel = parse_selector(&selectors.search_title)?;

    let mut hits = Vec::new();
    for entry in document.select(&entry_sel) {
        let Some(title_elem) = entry.select(&title_sel).next() else {
            log::debug!("Search entry without title: {}", entry.html());
            continue;
        };
        let title = title_elem.text().collect::<String>().trim().to_string();
        let Some(href) = entry.value().attr(&selectors.link_attr) else {
            log::debug!("Search entry '{}' has no link", title);
            continue;
        };
        if title.is_empty() {
            continue;
        }

        hits.push(SearchHit::new(title, resolve_url(base_url, href.trim())));
    }

    if hits.is_empty() && document.select(&entry_sel).next().is_some() {
        return Err(AppError::parse(
            "search results",
            "entries found but none had a usable title and link",
        ));
    }

    Ok(hits)
}
