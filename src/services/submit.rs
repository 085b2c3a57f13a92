// src/services/submit.rs

//! Reply submission with a single rate-limit retry.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use crate::error::{AppError, Result};
use crate::forum::ForumApi;
use crate::models::CommentRef;

/// Longest rate-limit wait we are willing to honor, in seconds.
const MAX_RATE_LIMIT_SECS: f64 = 60.0 * 60.0;

/// How a reply ended up being delivered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SubmitOutcome {
    /// Accepted on the first attempt
    Sent,
    /// Rate limited first, then accepted on the retry
    SentAfterRetry { waited: Duration },
}

/// Posts replies and handles the forum's rate-limit signal.
pub struct Submitter {
    forum: Arc<dyn ForumApi>,
}

impl Submitter {
    pub fn new(forum: Arc<dyn ForumApi>) -> Self {
        Self { forum }
    }

    /// Post `body` as a reply to `comment`.
    ///
    /// If the response carries a rate limit, waits it out (plus one second)
    /// and retries once. Waits longer than an hour are capped at an hour.
    /// A second rate limit is returned as [`AppError::RateLimited`].
    pub async fn submit(&self, comment: &CommentRef, body: &str) -> Result<SubmitOutcome> {
        let response = self.forum.submit_comment(&comment.full_name, body).await?;
        log::debug!("Got response {}", response);

        let Some(seconds) = rate_limit_seconds(&response) else {
            return Ok(SubmitOutcome::Sent);
        };

        let waited = retry_delay(seconds);
        log::warn!(
            "Reached the rate limit! Will retry in {} minutes ({} seconds)",
            waited.as_secs() / 60,
            seconds
        );
        tokio::time::sleep(waited).await;

        let retry = self.forum.reply(comment, body).await?;
        log::debug!("Got retry response {}", retry);

        if let Some(seconds) = rate_limit_seconds(&retry) {
            return Err(AppError::RateLimited { seconds });
        }

        Ok(SubmitOutcome::SentAfterRetry { waited })
    }
}

/// Read the `ratelimit` field, which may be nested under `json`.
pub fn rate_limit_seconds(response: &Value) -> Option<f64> {
    let payload = response.get("json").unwrap_or(response);
    payload.get("ratelimit").and_then(Value::as_f64)
}

fn retry_delay(seconds: f64) -> Duration {
    Duration::from_secs_f64(seconds.clamp(0.0, MAX_RATE_LIMIT_SECS)) + Duration::from_secs(1)
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tokio::time::Instant;

    use super::*;
    use crate::forum::fake::{Call, FakeForum, comment};

    fn setup() -> (Arc<FakeForum>, Submitter) {
        let forum = Arc::new(FakeForum::new());
        let submitter = Submitter::new(forum.clone());
        (forum, submitter)
    }

    #[test]
    fn test_rate_limit_field_shapes() {
        assert_eq!(rate_limit_seconds(&json!({ "ratelimit": 5 })), Some(5.0));
        assert_eq!(
            rate_limit_seconds(&json!({ "json": { "ratelimit": 12.5, "errors": [] } })),
            Some(12.5)
        );
        assert_eq!(rate_limit_seconds(&json!({ "json": { "errors": [] } })), None);
        assert_eq!(rate_limit_seconds(&json!({})), None);
    }

    #[test]
    fn test_retry_delay_adds_a_second() {
        assert_eq!(retry_delay(5.0), Duration::from_secs(6));
        assert_eq!(retry_delay(-3.0), Duration::from_secs(1));
        assert_eq!(retry_delay(7200.0), Duration::from_secs(3601));
    }

    #[tokio::test(start_paused = true)]
    async fn test_sent_without_rate_limit() {
        let (forum, submitter) = setup();
        let c = comment("c1", "reader", "[[x]]");

        let outcome = submitter.submit(&c, "body").await.unwrap();

        assert_eq!(outcome, SubmitOutcome::Sent);
        assert_eq!(
            forum.calls(),
            [Call::Submit {
                thing_id: "t1_c1".to_string(),
                text: "body".to_string()
            }]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_rate_limit_retries_once_after_waiting() {
        let (forum, submitter) = setup();
        forum.push_submit_response(json!({ "ratelimit": 5 }));
        let c = comment("c1", "reader", "[[x]]");

        let start = Instant::now();
        let outcome = submitter.submit(&c, "body").await.unwrap();

        assert!(start.elapsed() >= Duration::from_secs(6));
        assert_eq!(
            outcome,
            SubmitOutcome::SentAfterRetry {
                waited: Duration::from_secs(6)
            }
        );
        assert_eq!(forum.posted().len(), 2);
        assert!(matches!(forum.calls()[1], Call::Reply { .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_rate_limit_is_final() {
        let (forum, submitter) = setup();
        forum.push_submit_response(json!({ "json": { "ratelimit": 5 } }));
        forum.push_reply_response(json!({ "json": { "ratelimit": 30 } }));
        let c = comment("c1", "reader", "[[x]]");

        let result = submitter.submit(&c, "body").await;

        assert!(matches!(result, Err(AppError::RateLimited { seconds }) if seconds == 30.0));
        assert_eq!(forum.posted().len(), 2);
    }
}
