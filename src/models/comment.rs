//! Forum comment identity.

use serde::{Deserialize, Serialize};

/// Author name the forum shows once an account or comment is deleted.
pub const DELETED_AUTHOR: &str = "[deleted]";

/// Minimal view of a forum comment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CommentRef {
    /// Short id (e.g. `abc123`)
    pub id: String,

    /// Full name of the submission the comment belongs to (e.g. `t3_xyz`)
    pub link_id: String,

    pub author: String,

    pub body: String,

    /// Full name of the comment itself (e.g. `t1_abc123`); used as the cursor
    #[serde(rename = "name")]
    pub full_name: String,

    /// Title of the parent submission, when the listing includes it
    #[serde(default)]
    pub link_title: Option<String>,
}

impl CommentRef {
    /// Whether the comment has been deleted by its author or a moderator.
    pub fn is_deleted(&self) -> bool {
        self.author == DELETED_AUTHOR
    }

    /// Whether `username` wrote this comment. Reddit usernames are case-insensitive.
    pub fn is_authored_by(&self, username: &str) -> bool {
        self.author.eq_ignore_ascii_case(username)
    }

    /// Submission id without its `t3_` kind prefix.
    pub fn article_id(&self) -> &str {
        self.link_id
            .split_once('_')
            .map_or(self.link_id.as_str(), |(_, id)| id)
    }
}
