// src/models/selectors.rs

//! CSS selectors for scraping the catalog site.

use scraper::Selector;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// CSS selectors addressing the regions of the catalog's search and detail pages.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogSelectors {
    /// Selector for each result entry link in the search listing
    #[serde(default = "defaults::search_entry")]
    pub search_entry: String,

    /// Selector for the title element within a result entry
    #[serde(default = "defaults::search_title")]
    pub search_title: String,

    /// HTML attribute holding the result entry link (usually "href")
    #[serde(default = "defaults::link_attr")]
    pub link_attr: String,

    /// Selector for the series title on the detail page
    #[serde(default = "defaults::title")]
    pub title: String,

    /// Container of `<br>`-separated alternate titles
    #[serde(default = "defaults::associated")]
    pub associated: String,

    #[serde(default = "defaults::description")]
    pub description: String,

    /// Element holding the type label
    #[serde(default = "defaults::kind")]
    pub kind: String,

    /// Genre anchors
    #[serde(default = "defaults::genres")]
    pub genres: String,

    /// Tag anchors; same anchor class as genres under a different parent
    #[serde(default = "defaults::tags")]
    pub tags: String,
}

impl Default for CatalogSelectors {
    fn default() -> Self {
        Self {
            search_entry: defaults::search_entry(),
            search_title: defaults::search_title(),
            link_attr: defaults::link_attr(),
            title: defaults::title(),
            associated: defaults::associated(),
            description: defaults::description(),
            kind: defaults::kind(),
            genres: defaults::genres(),
            tags: defaults::tags(),
        }
    }
}

impl CatalogSelectors {
    /// Check that every selector parses.
    pub fn validate(&self) -> Result<()> {
        for s in [
            &self.search_entry,
            &self.search_title,
            &self.title,
            &self.associated,
            &self.description,
            &self.kind,
            &self.genres,
            &self.tags,
        ] {
            parse_selector(s)?;
        }
        Ok(())
    }
}

/// Parse a CSS selector, mapping failures into [`AppError::Selector`].
pub fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}

mod defaults {
    pub fn search_entry() -> String {
        ".w-blog-list a.w-blog-entry-link".into()
    }
    pub fn search_title() -> String {
        ".entry-title".into()
    }
    pub fn link_attr() -> String {
        "href".into()
    }
    pub fn title() -> String {
        ".seriestitlenu".into()
    }
    pub fn associated() -> String {
        "#editassociated".into()
    }
    pub fn description() -> String {
        "#editdescription".into()
    }
    pub fn kind() -> String {
        "#showtype".into()
    }
    pub fn genres() -> String {
        "#seriesgenre a.genre".into()
    }
    pub fn tags() -> String {
        "#showtags a.genre".into()
    }
}
