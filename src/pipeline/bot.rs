// src/pipeline/bot.rs

//! Long-running bot entry point.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::error::Result;
use crate::forum::RedditClient;
use crate::models::Config;
use crate::pipeline::{CommentStreamPoller, build_responder};

/// Authenticate with Reddit and answer comments until `cancel` fires.
pub async fn run_bot(config: &Config, cancel: CancellationToken) -> Result<()> {
    config.validate_credentials()?;

    let forum = RedditClient::new(&config.forum)?;
    forum.authenticate().await?;
    log::info!(
        "Authenticated as {}, watching r/{}",
        config.forum.username,
        config.forum.subreddit
    );

    let responder = build_responder(config)?;
    let mut poller = CommentStreamPoller::new(
        Arc::new(forum),
        responder,
        config.forum.username.clone(),
        config.poller.clone(),
    );

    poller.run(cancel).await;
    Ok(())
}
