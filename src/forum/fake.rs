//! Scripted in-memory forum for tests.

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::error::{AppError, Result};
use crate::forum::ForumApi;
use crate::models::{CommentRef, DELETED_AUTHOR};

/// A call made against [`FakeForum`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    List { before: Option<String> },
    Fetch(String),
    Replies(String),
    Submit { thing_id: String, text: String },
    Reply { comment_id: String, text: String },
}

#[derive(Default)]
pub struct FakeForum {
    listings: Mutex<VecDeque<Result<Vec<CommentRef>>>>,
    known: Mutex<HashMap<String, CommentRef>>,
    gone: Mutex<HashSet<String>>,
    replies: Mutex<HashMap<String, Vec<CommentRef>>>,
    failing_replies: HashSet<String>,
    failing_fetch: HashSet<String>,
    submit_delay: Option<Duration>,
    submit_responses: Mutex<VecDeque<Value>>,
    reply_responses: Mutex<VecDeque<Value>>,
    calls: Mutex<Vec<Call>>,
}

pub fn comment(id: &str, author: &str, body: &str) -> CommentRef {
    CommentRef {
        id: id.to_string(),
        link_id: "t3_post".to_string(),
        author: author.to_string(),
        body: body.to_string(),
        full_name: format!("t1_{id}"),
        link_title: Some("Weekly recommendations".to_string()),
    }
}

impl FakeForum {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue the result of the next `list_comments` call. Once the queue
    /// runs dry, listings are empty.
    pub fn push_listing(&self, comments: Vec<CommentRef>) {
        self.listings.lock().unwrap().push_back(Ok(comments));
    }

    pub fn push_listing_error(&self) {
        self.listings
            .lock()
            .unwrap()
            .push_back(Err(AppError::parse("listing", "simulated failure")));
    }

    /// Mark a previously listed comment as deleted.
    pub fn delete(&self, full_name: &str) {
        if let Some(c) = self.known.lock().unwrap().get_mut(full_name) {
            c.author = DELETED_AUTHOR.to_string();
        }
    }

    /// Make lookups of a comment come back empty, as if it were removed.
    pub fn remove(&self, full_name: &str) {
        self.gone.lock().unwrap().insert(full_name.to_string());
    }

    pub fn add_reply(&self, parent_id: &str, reply: CommentRef) {
        self.replies
            .lock()
            .unwrap()
            .entry(parent_id.to_string())
            .or_default()
            .push(reply);
    }

    pub fn failing_replies_for(mut self, comment_id: &str) -> Self {
        self.failing_replies.insert(comment_id.to_string());
        self
    }

    pub fn failing_fetch_for(mut self, full_name: &str) -> Self {
        self.failing_fetch.insert(full_name.to_string());
        self
    }

    /// Make `submit_comment` take `delay` before it is recorded and answered.
    pub fn with_submit_delay(mut self, delay: Duration) -> Self {
        self.submit_delay = Some(delay);
        self
    }

    pub fn push_submit_response(&self, response: Value) {
        self.submit_responses.lock().unwrap().push_back(response);
    }

    pub fn push_reply_response(&self, response: Value) {
        self.reply_responses.lock().unwrap().push_back(response);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// Bodies posted through either submit or reply, in order.
    pub fn posted(&self) -> Vec<(String, String)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Submit { thing_id, text } => Some((thing_id, text)),
                Call::Reply { comment_id, text } => Some((comment_id, text)),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

fn ok_response() -> Value {
    json!({ "json": { "errors": [] } })
}

#[async_trait]
impl ForumApi for FakeForum {
    async fn list_comments(&self, _limit: usize, before: Option<&str>) -> Result<Vec<CommentRef>> {
        self.record(Call::List {
            before: before.map(str::to_string),
        });
        let next = self.listings.lock().unwrap().pop_front();
        let comments = next.unwrap_or_else(|| Ok(Vec::new()))?;

        let mut known = self.known.lock().unwrap();
        for c in &comments {
            known
                .entry(c.full_name.clone())
                .or_insert_with(|| c.clone());
        }
        Ok(comments)
    }

    async fn fetch_comment(&self, full_name: &str) -> Result<Option<CommentRef>> {
        self.record(Call::Fetch(full_name.to_string()));
        if self.failing_fetch.contains(full_name) {
            return Err(AppError::parse("comment info", "simulated failure"));
        }
        if self.gone.lock().unwrap().contains(full_name) {
            return Ok(None);
        }
        Ok(self.known.lock().unwrap().get(full_name).cloned())
    }

    async fn fetch_replies(&self, comment: &CommentRef) -> Result<Vec<CommentRef>> {
        self.record(Call::Replies(comment.id.clone()));
        if self.failing_replies.contains(&comment.id) {
            return Err(AppError::parse("reply tree", "simulated failure"));
        }
        Ok(self
            .replies
            .lock()
            .unwrap()
            .get(&comment.id)
            .cloned()
            .unwrap_or_default())
    }

    async fn submit_comment(&self, thing_id: &str, text: &str) -> Result<Value> {
        if let Some(delay) = self.submit_delay {
            tokio::time::sleep(delay).await;
        }
        self.record(Call::Submit {
            thing_id: thing_id.to_string(),
            text: text.to_string(),
        });
        Ok(self
            .submit_responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(ok_response))
    }

    async fn reply(&self, comment: &CommentRef, text: &str) -> Result<Value> {
        self.record(Call::Reply {
            comment_id: comment.id.clone(),
            text: text.to_string(),
        });
        Ok(self
            .reply_responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(ok_response))
    }
}
