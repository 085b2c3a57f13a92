//! Forum API abstraction.
//!
//! The bot only needs a handful of calls: list recent comments, look a
//! comment up, read its replies, and post replies. `RedditClient` is the
//! production implementation.

#[cfg(test)]
pub(crate) mod fake;
pub mod reddit;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;
use crate::models::CommentRef;

pub use reddit::RedditClient;

/// Operations the bot performs against the forum.
#[async_trait]
pub trait ForumApi: Send + Sync {
    /// Newest-first comments, up to `limit`, newer than `before` when given.
    async fn list_comments(&self, limit: usize, before: Option<&str>) -> Result<Vec<CommentRef>>;

    /// Look up a single comment by full name. `None` if it no longer exists.
    async fn fetch_comment(&self, full_name: &str) -> Result<Option<CommentRef>>;

    /// Direct replies to `comment`.
    async fn fetch_replies(&self, comment: &CommentRef) -> Result<Vec<CommentRef>>;

    /// Post `text` as a reply to the thing with id `thing_id`; returns the raw response.
    async fn submit_comment(&self, thing_id: &str, text: &str) -> Result<Value>;

    /// Reply directly to `comment`; returns the raw response.
    async fn reply(&self, comment: &CommentRef, text: &str) -> Result<Value>;
}
