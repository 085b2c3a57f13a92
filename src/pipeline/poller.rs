// src/pipeline/poller.rs

//! Comment polling loop.
//!
//! Each cycle fetches the newest comments past the "before" cursor, checks
//! that the cursor comment still exists, resets the cursor after a long quiet
//! stretch, and answers every comment that mentions a `[[Title]]`. Cycles are
//! separated by a cancellable sleep.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::error::Result;
use crate::forum::ForumApi;
use crate::models::{CommentRef, PollerConfig};
use crate::pipeline::Responder;
use crate::services::{SubmitOutcome, Submitter};

/// The "before" marker: full name of the newest comment already seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cursor {
    before: Option<String>,
}

impl Cursor {
    pub fn before(&self) -> Option<&str> {
        self.before.as_deref()
    }

    pub fn advance(&mut self, full_name: &str) {
        self.before = Some(full_name.to_string());
    }

    pub fn reset(&mut self) {
        self.before = None;
    }
}

/// Detects quiet stretches with no new comments.
///
/// Fires once when the quiet period first exceeds the threshold and stays
/// silent until comments show up again.
#[derive(Debug, Clone)]
pub struct StalenessTracker {
    stale_after: Duration,
    last_activity: Instant,
    tripped: bool,
}

impl StalenessTracker {
    pub fn new(stale_after: Duration, now: Instant) -> Self {
        Self {
            stale_after,
            last_activity: now,
            tripped: false,
        }
    }

    /// Record a fetch of `fetched` comments at `now`.
    ///
    /// Returns the length of the quiet period when it has just crossed the
    /// threshold.
    pub fn observe(&mut self, fetched: usize, now: Instant) -> Option<Duration> {
        if fetched > 0 {
            self.last_activity = now;
            self.tripped = false;
            return None;
        }

        let quiet = now.saturating_duration_since(self.last_activity);
        if !self.tripped && quiet > self.stale_after {
            self.tripped = true;
            return Some(quiet);
        }
        None
    }
}

/// What happened to a single comment.
#[derive(Debug, Clone, PartialEq)]
pub enum CommentOutcome {
    NoKeywords,
    AlreadyReplied,
    NoMatches,
    Replied(SubmitOutcome),
}

/// Result of one poll cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The cursor comment vanished; the cycle should restart right away.
    CursorReset,
    Processed {
        fetched: usize,
        replied: usize,
        /// The cursor was dropped because the feed went quiet
        stale_reset: bool,
    },
}

/// Top-level loop watching the forum for keyword mentions.
pub struct CommentStreamPoller {
    forum: Arc<dyn ForumApi>,
    responder: Responder,
    submitter: Submitter,
    username: String,
    config: PollerConfig,
    cursor: Cursor,
    staleness: StalenessTracker,
}

impl CommentStreamPoller {
    pub fn new(
        forum: Arc<dyn ForumApi>,
        responder: Responder,
        username: impl Into<String>,
        config: PollerConfig,
    ) -> Self {
        let staleness = StalenessTracker::new(config.stale_after(), Instant::now());
        Self {
            submitter: Submitter::new(Arc::clone(&forum)),
            forum,
            responder,
            username: username.into(),
            config,
            cursor: Cursor::default(),
            staleness,
        }
    }

    pub fn cursor(&self) -> &Cursor {
        &self.cursor
    }

    /// Poll until `cancel` fires.
    ///
    /// Cancellation is checked before each cycle and during the sleep
    /// between cycles; a cycle in progress always runs to completion.
    pub async fn run(&mut self, cancel: CancellationToken) {
        log::info!(
            "Polling for comments every {}s as {}",
            self.config.interval_secs,
            self.username
        );

        let mut restarted = false;
        loop {
            if cancel.is_cancelled() {
                break;
            }

            match self.poll_cycle().await {
                // Restart immediately, but only once in a row so a listing
                // whose newest comment is deleted cannot spin the loop.
                Ok(CycleOutcome::CursorReset) if !restarted => {
                    restarted = true;
                    continue;
                }
                Ok(outcome) => log::debug!("Cycle finished: {:?}", outcome),
                Err(e) => log::error!(
                    "An error has occurred while trying to retrieve comments: {}",
                    e
                ),
            }
            restarted = false;

            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(self.config.interval()) => {}
            }
        }

        log::info!("Cancelled.");
    }

    /// Run one fetch → validate → process cycle.
    ///
    /// Errors fetching or validating the listing abort the cycle. Errors
    /// while handling a single comment are logged and do not.
    pub async fn poll_cycle(&mut self) -> Result<CycleOutcome> {
        let comments = self
            .forum
            .list_comments(self.config.fetch_limit, self.cursor.before())
            .await?;

        if let Some(newest) = comments.first() {
            self.cursor.advance(&newest.full_name);
        }

        if let Some(before) = self.cursor.before().map(str::to_string) {
            let alive = self
                .forum
                .fetch_comment(&before)
                .await?
                .is_some_and(|c| !c.is_deleted());
            if !alive {
                log::warn!("The 'before' comment {} has been deleted, resetting...", before);
                self.cursor.reset();
                return Ok(CycleOutcome::CursorReset);
            }
        }

        let stale_reset = match self.staleness.observe(comments.len(), Instant::now()) {
            Some(quiet) => {
                log::warn!(
                    "No comments found in the last {} minutes (last before fullname: {:?})",
                    quiet.as_secs() / 60,
                    self.cursor.before()
                );
                self.cursor.reset();
                true
            }
            None => false,
        };

        if !comments.is_empty() {
            log::debug!("Processing {} new comments...", comments.len());
        }

        let mut replied = 0;
        for comment in &comments {
            match self.process_comment(comment).await {
                Ok(CommentOutcome::Replied(_)) => replied += 1,
                Ok(_) => {}
                Err(e) => log::error!(
                    "An error has occurred while processing comment {} by {}: {}",
                    comment.id,
                    comment.author,
                    e
                ),
            }
        }

        Ok(CycleOutcome::Processed {
            fetched: comments.len(),
            replied,
            stale_reset,
        })
    }

    /// Answer a single comment if it mentions anything and we have not
    /// answered it before.
    pub async fn process_comment(&mut self, comment: &CommentRef) -> Result<CommentOutcome> {
        let keywords = self.responder.keywords(&comment.body);
        if keywords.is_empty() {
            return Ok(CommentOutcome::NoKeywords);
        }

        let replies = self.forum.fetch_replies(comment).await?;
        if replies.iter().any(|r| r.is_authored_by(&self.username)) {
            log::warn!(
                "Already replied to comment by {}, skipping...",
                comment.author
            );
            return Ok(CommentOutcome::AlreadyReplied);
        }

        log::info!(
            "Processing comment by {} in {}...",
            comment.author,
            comment.link_title.as_deref().unwrap_or(&comment.link_id)
        );

        let entities = self.responder.resolve(&keywords).await;
        let body = self.responder.compose(&entities);
        if body.is_empty() {
            log::debug!("Nothing found for {:?}", keywords);
            return Ok(CommentOutcome::NoMatches);
        }

        let outcome = self.submitter.submit(comment, &body).await?;
        log::info!(
            "Sent reply to {} containing novels {:?}",
            comment.author,
            entities.iter().map(|e| e.title.as_str()).collect::<Vec<_>>()
        );

        Ok(CommentOutcome::Replied(outcome))
    }
}
