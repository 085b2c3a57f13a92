// src/services/detail.rs

//! Catalog detail page resolver.
//!
//! Fetches a series page, extracts its fields, and decides whether a keyword
//! actually names that series.

use reqwest::Client;
use scraper::{ElementRef, Html, Node};

use crate::error::{AppError, Result};
use crate::models::{CatalogSelectors, Entity, parse_selector};
use crate::utils::http::fetch_page_async;
use crate::utils::text::normalize_whitespace;

/// Fields scraped from a series detail page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailPage {
    pub title: String,
    /// Alternate names, one per line of the associated-titles block
    pub associated: Vec<String>,
    pub description: String,
    pub kind: String,
    pub genres: Vec<String>,
    pub tags: Vec<String>,
}

impl DetailPage {
    /// Whether `keyword` is this series' title or one of its associated titles,
    /// ignoring case.
    pub fn identifies(&self, keyword: &str) -> bool {
        let keyword = keyword.trim().to_lowercase();
        self.title.to_lowercase() == keyword
            || self.associated.iter().any(|a| a.to_lowercase() == keyword)
    }

    pub fn into_entity(self, link: &str, search_term: &str, exact_match: bool) -> Entity {
        Entity {
            title: self.title,
            link: link.to_string(),
            description: self.description,
            kind: self.kind,
            genres: self.genres,
            tags: self.tags,
            search_term: search_term.to_string(),
            exact_match,
        }
    }
}

/// Service for fetching and verifying catalog detail pages.
pub struct CatalogDetailResolver {
    client: Client,
    selectors: CatalogSelectors,
}

impl CatalogDetailResolver {
    pub fn new(client: Client, selectors: CatalogSelectors) -> Self {
        Self { client, selectors }
    }

    /// Resolve the series at `link` for `keyword`.
    ///
    /// Without `force`, returns `None` unless the keyword names the series.
    /// With `force`, the series is always accepted and marked non-exact.
    pub async fn resolve(&self, keyword: &str, link: &str, force: bool) -> Result<Option<Entity>> {
        let document = fetch_page_async(&self.client, link).await?;
        let page = parse_detail(&document, &self.selectors, link)?;

        if !force && !page.identifies(keyword) {
            log::debug!(
                "'{}' does not name '{}' (associated: {:?})",
                keyword,
                page.title,
                page.associated
            );
            return Ok(None);
        }

        Ok(Some(page.into_entity(link, keyword, !force)))
    }
}

/// Parse a detail page. Only the title is mandatory.
pub fn parse_detail(document: &Html, selectors: &CatalogSelectors, link: &str) -> Result<DetailPage> {
    let title_sel = parse_selector(&selectors.title)?;
    let title = document
        .select(&title_sel)
        .next()
        .map(|el| normalize_title(&el.text().collect::<String>()))
        .unwrap_or_default();
    if title.is_empty() {
        return Err(AppError::parse(
            format!("detail page {link}"),
            "missing series title",
        ));
    }

    let associated_sel = parse_selector(&selectors.associated)?;
    let associated = document
        .select(&associated_sel)
        .next()
        .map(split_lines)
        .unwrap_or_default();

    let description = first_text(document, &selectors.description)?;
    let kind = first_text(document, &selectors.kind)?;
    let genres = all_texts(document, &selectors.genres)?;
    let tags = all_texts(document, &selectors.tags)?;

    Ok(DetailPage {
        title,
        associated,
        description,
        kind,
        genres,
        tags,
    })
}

/// Straighten curly apostrophes and trim.
fn normalize_title(raw: &str) -> String {
    raw.replace(['\u{2018}', '\u{2019}'], "'").trim().to_string()
}

/// Split an element's content on `<br>` into trimmed, non-empty lines.
fn split_lines(container: ElementRef<'_>) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for child in container.children() {
        match child.value() {
            Node::Text(text) => current.push_str(text),
            Node::Element(el) if el.name() == "br" => {
                lines.push(std::mem::take(&mut current));
            }
            Node::Element(_) => {
                if let Some(el) = ElementRef::wrap(child) {
                    current.extend(el.text());
                }
            }
            _ => {}
        }
    }
    lines.push(current);

    lines
        .into_iter()
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
        .collect()
}

fn first_text(document: &Html, selector: &str) -> Result<String> {
    let sel = parse_selector(selector)?;
    Ok(document
        .select(&sel)
        .next()
        .map(|el| normalize_whitespace(&el.text().collect::<String>()))
        .unwrap_or_default())
}

fn all_texts(document: &Html, selector: &str) -> Result<Vec<String>> {
    let sel = parse_selector(selector)?;
    Ok(document
        .select(&sel)
        .map(|el| el.text().collect::<String>().trim().to_string())
        .filter(|text| !text.is_empty())
        .collect())
}
