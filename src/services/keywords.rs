// src/services/keywords.rs

//! Keyword extraction from comment bodies.

use regex::Regex;

use crate::error::Result;

/// `[[Title]]`, optionally surrounded by one whitespace character.
/// A lone `]` inside the brackets is allowed; `]]` always closes.
/// An unclosed `[[` runs on to the next `]]`, and line breaks are kept.
const KEYWORD_PATTERN: &str = r"\s?\[\[(?P<keyword>(?:.?[^\]])+)\]\]\s?";

/// Pulls bracket-delimited search terms out of comment text.
#[derive(Debug, Clone)]
pub struct KeywordExtractor {
    pattern: Regex,
}

impl KeywordExtractor {
    /// Compile the keyword pattern.
    pub fn new() -> Result<Self> {
        Ok(Self {
            pattern: Regex::new(KEYWORD_PATTERN)?,
        })
    }

    /// Extract trimmed keywords in order of first appearance.
    pub fn extract(&self, body: &str) -> Vec<String> {
        self.pattern
            .captures_iter(body)
            .filter_map(|caps| caps.name("keyword"))
            .map(|m| m.as_str().trim().to_string())
            .filter(|keyword| !keyword.is_empty())
            .collect()
    }
}
