//! In-memory catalog for tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::{AppError, Result};
use crate::models::{Entity, SearchHit};
use crate::services::{Catalog, DetailPage};

#[derive(Default)]
pub struct FakeCatalog {
    results: HashMap<String, Vec<SearchHit>>,
    pages: HashMap<String, DetailPage>,
    failing: HashSet<String>,
    resolved: Mutex<Vec<String>>,
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_results(mut self, keyword: &str, hits: &[(&str, &str)]) -> Self {
        let hits = hits
            .iter()
            .map(|(title, link)| SearchHit::new(*title, *link))
            .collect();
        self.results.insert(keyword.to_string(), hits);
        self
    }

    pub fn with_page(self, link: &str, title: &str, associated: &[&str]) -> Self {
        self.with_detail(
            link,
            DetailPage {
                title: title.to_string(),
                associated: associated.iter().map(|s| s.to_string()).collect(),
                description: format!("About {title}."),
                kind: "Web Novel".to_string(),
                genres: vec!["Action".to_string()],
                tags: vec!["Magic".to_string()],
            },
        )
    }

    pub fn with_detail(mut self, link: &str, page: DetailPage) -> Self {
        self.pages.insert(link.to_string(), page);
        self
    }

    pub fn failing_search(mut self, keyword: &str) -> Self {
        self.failing.insert(keyword.to_string());
        self
    }

    /// Links passed to `resolve`, in call order.
    pub fn resolved_links(&self) -> Vec<String> {
        self.resolved.lock().unwrap().clone()
    }
}

#[async_trait]
impl Catalog for FakeCatalog {
    async fn search(&self, keyword: &str) -> Result<Vec<SearchHit>> {
        if self.failing.contains(keyword) {
            return Err(AppError::parse("search results", "simulated failure"));
        }
        Ok(self.results.get(keyword).cloned().unwrap_or_default())
    }

    async fn resolve(&self, keyword: &str, link: &str, force: bool) -> Result<Option<Entity>> {
        self.resolved.lock().unwrap().push(link.to_string());

        let page = self
            .pages
            .get(link)
            .cloned()
            .ok_or_else(|| AppError::parse(format!("detail page {link}"), "not found"))?;

        if !force && !page.identifies(keyword) {
            return Ok(None);
        }
        Ok(Some(page.into_entity(link, keyword, !force)))
    }
}
