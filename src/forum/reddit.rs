// src/forum/reddit.rs

//! Reddit implementation of [`ForumApi`].
//!
//! Authenticates with the OAuth2 password grant (script apps) and talks to
//! the `oauth.reddit.com` JSON API.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::error::{AppError, Result};
use crate::forum::ForumApi;
use crate::models::{CommentRef, ForumConfig};
use crate::utils::http::create_async_client;

/// Refresh tokens this long before Reddit says they expire.
const TOKEN_REFRESH_MARGIN: Duration = Duration::from_secs(60);

/// Thing kind prefix for comments.
const COMMENT_KIND: &str = "t1";

#[derive(Debug, Clone)]
struct AccessToken {
    value: String,
    expires_at: Instant,
}

impl AccessToken {
    fn is_fresh(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    expires_in: Option<u64>,
    #[serde(default)]
    error: Option<String>,
}

impl TokenResponse {
    fn into_token(self, now: Instant) -> Result<AccessToken> {
        match self.access_token {
            Some(value) if !value.is_empty() => {
                let lifetime = Duration::from_secs(self.expires_in.unwrap_or(3600));
                Ok(AccessToken {
                    value,
                    expires_at: now + lifetime.saturating_sub(TOKEN_REFRESH_MARGIN),
                })
            }
            _ => Err(AppError::auth(
                self.error
                    .unwrap_or_else(|| "no access token in response".to_string()),
            )),
        }
    }
}

/// Reddit API client scoped to one subreddit and one bot account.
pub struct RedditClient {
    client: Client,
    config: ForumConfig,
    token: Mutex<Option<AccessToken>>,
}

impl RedditClient {
    /// Create a client. No request is made until the first API call.
    pub fn new(config: &ForumConfig) -> Result<Self> {
        let client = create_async_client(&config.user_agent, config.timeout_secs)?;
        Ok(Self {
            client,
            config: config.clone(),
            token: Mutex::new(None),
        })
    }

    /// Fetch a token up front so bad credentials fail fast.
    pub async fn authenticate(&self) -> Result<()> {
        self.access_token().await.map(|_| ())
    }

    async fn access_token(&self) -> Result<String> {
        let mut guard = self.token.lock().await;
        if let Some(token) = guard.as_ref().filter(|t| t.is_fresh(Instant::now())) {
            return Ok(token.value.clone());
        }

        log::debug!("Requesting Reddit access token for {}", self.config.username);
        let response: TokenResponse = self
            .client
            .post(&self.config.auth_url)
            .basic_auth(&self.config.client_id, Some(&self.config.client_secret))
            .form(&[
                ("grant_type", "password"),
                ("username", self.config.username.as_str()),
                ("password", self.config.password.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let token = response.into_token(Instant::now())?;
        let value = token.value.clone();
        *guard = Some(token);
        Ok(value)
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.config.api_base_url.trim_end_matches('/'), path)
    }

    async fn get_json(&self, path: &str, query: &[(&str, &str)]) -> Result<Value> {
        let token = self.access_token().await?;
        let value = self
            .client
            .get(self.api_url(path))
            .bearer_auth(token)
            .query(query)
            .query(&[("raw_json", "1")])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(value)
    }

    async fn post_comment(&self, thing_id: &str, text: &str) -> Result<Value> {
        let token = self.access_token().await?;
        let value = self
            .client
            .post(self.api_url("/api/comment"))
            .bearer_auth(token)
            .form(&[("api_type", "json"), ("thing_id", thing_id), ("text", text)])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(value)
    }
}

#[async_trait]
impl ForumApi for RedditClient {
    async fn list_comments(&self, limit: usize, before: Option<&str>) -> Result<Vec<CommentRef>> {
        let path = format!("/r/{}/comments", self.config.subreddit);
        let limit = limit.to_string();
        let mut query = vec![("limit", limit.as_str()), ("sort", "new")];
        if let Some(before) = before {
            query.push(("before", before));
        }

        let listing = self.get_json(&path, &query).await?;
        parse_comment_listing(&listing)
    }

    async fn fetch_comment(&self, full_name: &str) -> Result<Option<CommentRef>> {
        let listing = self.get_json("/api/info", &[("id", full_name)]).await?;
        Ok(parse_comment_listing(&listing)?.into_iter().next())
    }

    async fn fetch_replies(&self, comment: &CommentRef) -> Result<Vec<CommentRef>> {
        let path = format!("/comments/{}", comment.article_id());
        let tree = self.get_json(&path, &[("comment", comment.id.as_str())]).await?;
        parse_reply_tree(&tree)
    }

    async fn submit_comment(&self, thing_id: &str, text: &str) -> Result<Value> {
        self.post_comment(thing_id, text).await
    }

    async fn reply(&self, comment: &CommentRef, text: &str) -> Result<Value> {
        self.post_comment(&comment.full_name, text).await
    }
}

/// Extract the comments (`t1` things) from a listing, in listing order.
pub fn parse_comment_listing(listing: &Value) -> Result<Vec<CommentRef>> {
    let children = listing
        .pointer("/data/children")
        .and_then(Value::as_array)
        .ok_or_else(|| AppError::parse("comment listing", "missing data.children"))?;

    children
        .iter()
        .filter(|child| child.get("kind").and_then(Value::as_str) == Some(COMMENT_KIND))
        .map(|child| {
            let data = child
                .get("data")
                .ok_or_else(|| AppError::parse("comment listing", "child without data"))?;
            Ok(CommentRef::deserialize(data)?)
        })
        .collect()
}

/// Extract the direct replies from a `/comments/{article}?comment={id}` response.
///
/// The response is `[submission listing, comment listing]`; the focused
/// comment is the first `t1` of the second listing. Its `replies` field is
/// either an empty string or another listing.
pub fn parse_reply_tree(tree: &Value) -> Result<Vec<CommentRef>> {
    let comments = tree
        .get(1)
        .ok_or_else(|| AppError::parse("reply tree", "missing comment listing"))?;

    let Some(focused) = comments
        .pointer("/data/children")
        .and_then(Value::as_array)
        .and_then(|children| {
            children
                .iter()
                .find(|c| c.get("kind").and_then(Value::as_str) == Some(COMMENT_KIND))
        })
    else {
        return Ok(Vec::new());
    };

    match focused.pointer("/data/replies") {
        Some(replies) if replies.is_object() => parse_comment_listing(replies),
        _ => Ok(Vec::new()),
    }
}
