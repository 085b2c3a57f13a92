// src/pipeline/responder.rs

//! Turns comment text into a reply body.

use crate::models::{Entity, dedup_by_title};
use crate::services::{KeywordExtractor, NovelMatcher, ReplyComposer};

/// Extract → match → dedup → compose, without touching the forum.
pub struct Responder {
    extractor: KeywordExtractor,
    matcher: NovelMatcher,
    composer: ReplyComposer,
}

impl Responder {
    pub fn new(extractor: KeywordExtractor, matcher: NovelMatcher, composer: ReplyComposer) -> Self {
        Self {
            extractor,
            matcher,
            composer,
        }
    }

    pub fn keywords(&self, body: &str) -> Vec<String> {
        self.extractor.extract(body)
    }

    /// Resolve each keyword in turn.
    ///
    /// A keyword whose lookup fails is logged and skipped. The result is
    /// deduplicated by title and capped at the reply size.
    pub async fn resolve(&self, keywords: &[String]) -> Vec<Entity> {
        let mut found = Vec::new();

        for keyword in keywords {
            log::debug!("Got match: {}", keyword);
            match self.matcher.find_match(keyword).await {
                Ok(Some(entity)) => {
                    log::debug!("Found novel: {}", entity.title);
                    found.push(entity);
                }
                Ok(None) => log::debug!("No catalog entry for '{}'", keyword),
                Err(e) => log::warn!("Skipping keyword '{}': {}", keyword, e),
            }
        }

        let mut entities = dedup_by_title(found);
        entities.truncate(self.composer.max_entities());
        entities
    }

    pub fn compose(&mut self, entities: &[Entity]) -> String {
        self.composer.compose(entities)
    }
}
