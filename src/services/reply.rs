// src/services/reply.rs

//! Reply body rendering.

use std::fmt::Write;

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;

use crate::models::{Entity, ReplyConfig};
use crate::utils::text::truncate;

/// Renders matched entities into a Markdown reply.
pub struct ReplyComposer {
    config: ReplyConfig,
    rng: StdRng,
}

impl ReplyComposer {
    /// Create a composer. The RNG drives tag sampling.
    pub fn new(config: ReplyConfig, rng: StdRng) -> Self {
        Self { config, rng }
    }

    /// Maximum number of entities a reply will include.
    pub fn max_entities(&self) -> usize {
        self.config.max_entities
    }

    /// Render a reply for `entities`, which should already be deduplicated.
    ///
    /// Returns an empty string when there is nothing to say.
    pub fn compose(&mut self, entities: &[Entity]) -> String {
        if entities.is_empty() {
            return String::new();
        }

        let blocks: Vec<String> = entities
            .iter()
            .take(self.config.max_entities)
            .map(|entity| self.render_entity(entity))
            .collect();

        let mut body = blocks.join("\n");
        body.push_str("\n---\n");
        let _ = writeln!(body, "^[Source]({})", self.config.source_url);
        body
    }

    fn render_entity(&mut self, entity: &Entity) -> String {
        let genres = entity
            .genres
            .iter()
            .take(self.config.max_genres)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        let tags = entity
            .tags
            .choose_multiple(&mut self.rng, self.config.max_tags)
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(", ");
        let description = truncate(&entity.description, self.config.description_limit);

        let mut block = String::new();
        if !entity.exact_match {
            let _ = write!(block, "Closest match for:\n\n> {}\n\n", entity.search_term);
        }
        let _ = write!(
            block,
            "**{}** - ([{}]({}))\n\n",
            entity.title, self.config.catalog_label, entity.link
        );
        let _ = write!(block, "Description: {description}\n\n");
        let _ = writeln!(block, "{} | Genres: {} | Tags: {}", entity.kind, genres, tags);
        block
    }
}
