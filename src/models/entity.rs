//! Catalog entity data structures.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// A candidate from the catalog search listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub title: String,
    pub link: String,
}

impl SearchHit {
    pub fn new(title: impl Into<String>, link: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
        }
    }
}

/// A resolved catalog entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Entity {
    /// Canonical series title (never empty)
    pub title: String,

    /// Detail page URL
    pub link: String,

    pub description: String,

    /// Category label, e.g. "Web Novel"
    pub kind: String,

    /// Genres in page order
    pub genres: Vec<String>,

    /// Tags in page order
    pub tags: Vec<String>,

    /// Keyword from the comment that led to this entity
    pub search_term: String,

    /// False when found through the closest-substring fallback
    pub exact_match: bool,
}

impl Entity {
    /// Return the same entity labelled with a different search term.
    pub fn with_search_term(self, search_term: impl Into<String>) -> Self {
        Self {
            search_term: search_term.into(),
            ..self
        }
    }
}

/// Remove entities whose title was already seen, keeping first occurrences in order.
pub fn dedup_by_title(entities: Vec<Entity>) -> Vec<Entity> {
    let mut seen = HashSet::new();
    entities
        .into_iter()
        .filter(|e| seen.insert(e.title.clone()))
        .collect()
}
