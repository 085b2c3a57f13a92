// src/services/matcher.rs

//! Keyword-to-series matching.
//!
//! The first search hit whose page names the keyword wins. When none does,
//! the first hit whose title contains the keyword is used as a closest match.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;

use crate::error::Result;
use crate::models::{CatalogConfig, Entity, SearchHit};
use crate::services::{CatalogDetailResolver, CatalogSearchClient};
use crate::utils::http::create_async_client;

/// Search and detail lookups against the catalog.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// List candidates for `keyword` in listing order.
    async fn search(&self, keyword: &str) -> Result<Vec<SearchHit>>;

    /// Resolve a candidate; see [`CatalogDetailResolver::resolve`].
    async fn resolve(&self, keyword: &str, link: &str, force: bool) -> Result<Option<Entity>>;
}

/// Catalog backed by the live site over HTTP.
pub struct HttpCatalog {
    search: CatalogSearchClient,
    resolver: CatalogDetailResolver,
}

impl HttpCatalog {
    /// Build the search client and resolver around one shared HTTP client.
    pub fn new(config: &CatalogConfig) -> Result<Self> {
        let client = create_async_client(&config.user_agent, config.timeout_secs)?;
        Self::with_client(client, config)
    }

    pub fn with_client(client: Client, config: &CatalogConfig) -> Result<Self> {
        Ok(Self {
            search: CatalogSearchClient::new(
                client.clone(),
                &config.base_url,
                config.selectors.clone(),
            )?,
            resolver: CatalogDetailResolver::new(client, config.selectors.clone()),
        })
    }
}

#[async_trait]
impl Catalog for HttpCatalog {
    async fn search(&self, keyword: &str) -> Result<Vec<SearchHit>> {
        self.search.search(keyword).await
    }

    async fn resolve(&self, keyword: &str, link: &str, force: bool) -> Result<Option<Entity>> {
        self.resolver.resolve(keyword, link, force).await
    }
}

/// Resolves comment keywords to catalog entities.
pub struct NovelMatcher {
    catalog: Arc<dyn Catalog>,
}

impl NovelMatcher {
    pub fn new(catalog: Arc<dyn Catalog>) -> Self {
        Self { catalog }
    }

    /// Find the series `keyword` refers to.
    ///
    /// Returns `Ok(None)` when nothing in the listing matches. Search and
    /// resolution errors are returned as-is.
    pub async fn find_match(&self, keyword: &str) -> Result<Option<Entity>> {
        let hits = self.catalog.search(keyword).await?;

        for hit in &hits {
            if let Some(entity) = self.catalog.resolve(keyword, &hit.link, false).await? {
                return Ok(Some(entity.with_search_term(keyword)));
            }
        }

        let Some(closest) = closest_hit(&hits, keyword) else {
            return Ok(None);
        };

        log::info!(
            "No exact match for '{}', using closest: '{}'",
            keyword,
            closest.title
        );

        let entity = self
            .catalog
            .resolve(&closest.title, &closest.link, true)
            .await?;
        Ok(entity.map(|e| e.with_search_term(keyword)))
    }
}

/// First hit, in listing order, whose title contains `keyword` ignoring case.
fn closest_hit<'a>(hits: &'a [SearchHit], keyword: &str) -> Option<&'a SearchHit> {
    let needle = keyword.to_lowercase();
    hits.iter()
        .find(|hit| hit.title.to_lowercase().contains(&needle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::services::fake::FakeCatalog;

    fn matcher(catalog: &Arc<FakeCatalog>) -> NovelMatcher {
        NovelMatcher::new(catalog.clone())
    }

    #[tokio::test]
    async fn test_first_exact_wins_over_listing_order() {
        let catalog = Arc::new(
            FakeCatalog::new()
                .with_results("Foo", &[("Foo Bar", "L1"), ("Foo", "L2"), ("Foo", "L3")])
                .with_page("L1", "Foo Bar", &[])
                .with_page("L2", "Foo", &[])
                .with_page("L3", "Foo", &[]),
        );

        let entity = matcher(&catalog).find_match("Foo").await.unwrap().unwrap();

        assert_eq!(entity.link, "L2");
        assert!(entity.exact_match);
        assert_eq!(entity.search_term, "Foo");
        assert_eq!(catalog.resolved_links(), ["L1", "L2"]);
    }

    #[tokio::test]
    async fn test_associated_title_counts_as_exact() {
        let catalog = Arc::new(
            FakeCatalog::new()
                .with_results("tbate", &[("The Beginning After the End", "L1")])
                .with_page("L1", "The Beginning After the End", &["TBATE"]),
        );

        let entity = matcher(&catalog).find_match("tbate").await.unwrap().unwrap();
        assert!(entity.exact_match);
        assert_eq!(entity.title, "The Beginning After the End");
    }

    #[tokio::test]
    async fn test_fallback_picks_first_substring_hit() {
        let catalog = Arc::new(
            FakeCatalog::new()
                .with_results(
                    "reader",
                    &[
                        ("Unrelated", "L0"),
                        ("Omniscient Reader's Viewpoint", "L1"),
                        ("Reader", "L2x"),
                    ],
                )
                .with_page("L0", "Unrelated", &[])
                .with_page("L1", "Omniscient Reader's Viewpoint", &[])
                .with_page("L2x", "The Reader Returns", &[]),
        );

        let entity = matcher(&catalog).find_match("reader").await.unwrap().unwrap();

        assert_eq!(entity.link, "L1");
        assert!(!entity.exact_match);
        assert_eq!(entity.search_term, "reader");
        assert_eq!(entity.title, "Omniscient Reader's Viewpoint");
    }

    #[tokio::test]
    async fn test_no_candidates_is_none() {
        let catalog = Arc::new(
            FakeCatalog::new()
                .with_results("zzz", &[("Something Else", "L1")])
                .with_page("L1", "Something Else", &[]),
        );
        assert!(matcher(&catalog).find_match("zzz").await.unwrap().is_none());

        let empty = Arc::new(FakeCatalog::new());
        assert!(matcher(&empty).find_match("zzz").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_search_failure_is_surfaced() {
        let catalog = Arc::new(FakeCatalog::new().failing_search("boom"));
        let result = matcher(&catalog).find_match("boom").await;
        assert!(matches!(result, Err(AppError::Parse { .. })));
    }

    #[test]
    fn test_http_catalog_from_config() {
        assert!(HttpCatalog::new(&CatalogConfig::default()).is_ok());

        let config = CatalogConfig {
            base_url: "not a url".to_string(),
            ..CatalogConfig::default()
        };
        assert!(matches!(HttpCatalog::new(&config), Err(AppError::Url(_))));
    }

    #[test]
    fn test_closest_hit_ignores_case() {
        let hits = vec![
            SearchHit::new("Alpha", "a"),
            SearchHit::new("SOLO Leveling", "b"),
            SearchHit::new("Solo", "c"),
        ];
        assert_eq!(closest_hit(&hits, "solo").map(|h| h.link.as_str()), Some("b"));
        assert!(closest_hit(&hits, "omega").is_none());
    }
}
