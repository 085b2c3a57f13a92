// src/models/mod.rs

//! Domain models for the bot.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod comment;
mod config;
mod entity;
mod selectors;

// Re-export all public types
pub use comment::{CommentRef, DELETED_AUTHOR};
pub use config::{CatalogConfig, Config, ForumConfig, PollerConfig, ReplyConfig};
pub use entity::{Entity, SearchHit, dedup_by_title};
pub use selectors::{CatalogSelectors, parse_selector};
