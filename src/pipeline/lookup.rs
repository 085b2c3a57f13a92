// src/pipeline/lookup.rs

//! One-shot lookups without the forum.

use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::error::Result;
use crate::models::Config;
use crate::pipeline::Responder;
use crate::services::{HttpCatalog, KeywordExtractor, NovelMatcher, ReplyComposer};

/// Wire up the extractor, live catalog and composer from configuration.
pub fn build_responder(config: &Config) -> Result<Responder> {
    let catalog = HttpCatalog::new(&config.catalog)?;
    Ok(Responder::new(
        KeywordExtractor::new()?,
        NovelMatcher::new(Arc::new(catalog)),
        ReplyComposer::new(config.reply.clone(), StdRng::from_os_rng()),
    ))
}

/// Render the reply the bot would post for `text` against the live catalog.
pub async fn run_lookup(config: &Config, text: &str) -> Result<String> {
    let mut responder = build_responder(config)?;
    Ok(lookup_with(&mut responder, text).await)
}

/// Text without any `[[...]]` is looked up as a single keyword.
pub async fn lookup_with(responder: &mut Responder, text: &str) -> String {
    let mut keywords = responder.keywords(text);
    if keywords.is_empty() && !text.trim().is_empty() {
        keywords.push(text.trim().to_string());
    }

    let entities = responder.resolve(&keywords).await;
    responder.compose(&entities)
}
