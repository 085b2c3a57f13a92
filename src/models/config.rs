//! Application configuration structures.

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::CatalogSelectors;

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Reddit account and API settings
    #[serde(default)]
    pub forum: ForumConfig,

    /// Novel Updates scraping settings
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Comment polling loop settings
    #[serde(default)]
    pub poller: PollerConfig,

    /// Reply rendering settings
    #[serde(default)]
    pub reply: ReplyConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Load configuration or return default if loading fails.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        Self::load(&path).unwrap_or_else(|e| {
            log::warn!(
                "Config load failed from {:?}: {}. Using defaults.",
                path.as_ref(),
                e
            );
            Self::default()
        })
    }

    /// Override secrets from the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_env_overrides_with(|key| std::env::var(key).ok());
    }

    /// Override secrets using the given lookup. Empty values are ignored.
    pub fn apply_env_overrides_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let targets = [
            ("NOVELBOT_CLIENT_ID", &mut self.forum.client_id),
            ("NOVELBOT_CLIENT_SECRET", &mut self.forum.client_secret),
            ("NOVELBOT_PASSWORD", &mut self.forum.password),
        ];

        for (key, field) in targets {
            if let Some(value) = lookup(key).filter(|v| !v.trim().is_empty()) {
                *field = value;
            }
        }
    }

    /// Validate configuration values for basic sanity.
    pub fn validate(&self) -> Result<()> {
        if self.forum.user_agent.trim().is_empty() {
            return Err(AppError::validation("forum.user_agent is empty"));
        }
        if self.forum.subreddit.trim().is_empty() {
            return Err(AppError::validation("forum.subreddit is empty"));
        }
        if self.forum.username.trim().is_empty() {
            return Err(AppError::validation("forum.username is empty"));
        }
        if self.forum.timeout_secs == 0 {
            return Err(AppError::validation("forum.timeout_secs must be > 0"));
        }
        if self.catalog.user_agent.trim().is_empty() {
            return Err(AppError::validation("catalog.user_agent is empty"));
        }
        if self.catalog.timeout_secs == 0 {
            return Err(AppError::validation("catalog.timeout_secs must be > 0"));
        }
        url::Url::parse(&self.catalog.base_url)
            .map_err(|e| AppError::validation(format!("catalog.base_url is invalid: {e}")))?;
        if self.poller.interval_secs == 0 {
            return Err(AppError::validation("poller.interval_secs must be > 0"));
        }
        if self.poller.fetch_limit == 0 {
            return Err(AppError::validation("poller.fetch_limit must be > 0"));
        }
        if self.reply.max_entities == 0 {
            return Err(AppError::validation("reply.max_entities must be > 0"));
        }
        self.catalog.selectors.validate()
    }

    /// Validate and additionally require credentials for talking to Reddit.
    pub fn validate_credentials(&self) -> Result<()> {
        self.validate()?;
        for (name, env, value) in [
            ("forum.client_id", "NOVELBOT_CLIENT_ID", &self.forum.client_id),
            ("forum.client_secret", "NOVELBOT_CLIENT_SECRET", &self.forum.client_secret),
            ("forum.password", "NOVELBOT_PASSWORD", &self.forum.password),
        ] {
            if value.trim().is_empty() {
                return Err(AppError::config(format!("{name} is not set (or set {env})")));
            }
        }
        Ok(())
    }
}

/// Reddit account and endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForumConfig {
    /// Subreddit to watch, without the `r/` prefix
    #[serde(default = "defaults::subreddit")]
    pub subreddit: String,

    /// Bot account name; replies by this account mark a comment as handled
    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub password: String,

    #[serde(default)]
    pub client_id: String,

    #[serde(default)]
    pub client_secret: String,

    /// User-Agent header for Reddit requests
    #[serde(default = "defaults::forum_user_agent")]
    pub user_agent: String,

    /// OAuth token endpoint
    #[serde(default = "defaults::auth_url")]
    pub auth_url: String,

    /// Base URL for authenticated API calls
    #[serde(default = "defaults::api_base_url")]
    pub api_base_url: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,
}

impl Default for ForumConfig {
    fn default() -> Self {
        Self {
            subreddit: defaults::subreddit(),
            username: String::new(),
            password: String::new(),
            client_id: String::new(),
            client_secret: String::new(),
            user_agent: defaults::forum_user_agent(),
            auth_url: defaults::auth_url(),
            api_base_url: defaults::api_base_url(),
            timeout_secs: defaults::timeout(),
        }
    }
}

/// Catalog site settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Site root; searches go to `{base_url}/?s={keyword}`
    #[serde(default = "defaults::catalog_base_url")]
    pub base_url: String,

    /// User-Agent header for catalog requests
    #[serde(default = "defaults::catalog_user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Page regions used when scraping
    #[serde(default)]
    pub selectors: CatalogSelectors,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::catalog_base_url(),
            user_agent: defaults::catalog_user_agent(),
            timeout_secs: defaults::timeout(),
            selectors: CatalogSelectors::default(),
        }
    }
}

/// Polling loop settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollerConfig {
    /// Pause between fetch cycles
    #[serde(default = "defaults::interval")]
    pub interval_secs: u64,

    /// Quiet period after which the cursor is considered stale
    #[serde(default = "defaults::stale_after")]
    pub stale_after_secs: u64,

    /// Maximum comments requested per cycle
    #[serde(default = "defaults::fetch_limit")]
    pub fetch_limit: usize,
}

impl PollerConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn stale_after(&self) -> Duration {
        Duration::from_secs(self.stale_after_secs)
    }
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval_secs: defaults::interval(),
            stale_after_secs: defaults::stale_after(),
            fetch_limit: defaults::fetch_limit(),
        }
    }
}

/// Reply rendering settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplyConfig {
    /// Maximum entities rendered in a single reply
    #[serde(default = "defaults::six")]
    pub max_entities: usize,

    /// Maximum genres listed per entity (first N, in page order)
    #[serde(default = "defaults::six")]
    pub max_genres: usize,

    /// Maximum tags listed per entity (random sample)
    #[serde(default = "defaults::six")]
    pub max_tags: usize,

    /// Description length before whole-word truncation kicks in
    #[serde(default = "defaults::description_limit")]
    pub description_limit: usize,

    /// Link text shown next to each title
    #[serde(default = "defaults::catalog_label")]
    pub catalog_label: String,

    /// Attribution link in the footer
    #[serde(default = "defaults::source_url")]
    pub source_url: String,
}

impl Default for ReplyConfig {
    fn default() -> Self {
        Self {
            max_entities: defaults::six(),
            max_genres: defaults::six(),
            max_tags: defaults::six(),
            description_limit: defaults::description_limit(),
            catalog_label: defaults::catalog_label(),
            source_url: defaults::source_url(),
        }
    }
}

mod defaults {
    // Forum defaults
    pub fn subreddit() -> String {
        "noveltranslations".into()
    }
    pub fn forum_user_agent() -> String {
        "linux:novelbot:v0.1.0".into()
    }
    pub fn auth_url() -> String {
        "https://www.reddit.com/api/v1/access_token".into()
    }
    pub fn api_base_url() -> String {
        "https://oauth.reddit.com".into()
    }
    pub fn timeout() -> u64 {
        30
    }

    // Catalog defaults
    pub fn catalog_base_url() -> String {
        "https://www.novelupdates.com".into()
    }
    pub fn catalog_user_agent() -> String {
        "Mozilla/5.0 (compatible; novelbot/0.1)".into()
    }

    // Poller defaults
    pub fn interval() -> u64 {
        15
    }
    pub fn stale_after() -> u64 {
        15 * 60
    }
    pub fn fetch_limit() -> usize {
        100
    }

    // Reply defaults
    pub fn six() -> usize {
        6
    }
    pub fn description_limit() -> usize {
        256
    }
    pub fn catalog_label() -> String {
        "Novel Updates".into()
    }
    pub fn source_url() -> String {
        "https://github.com/Mitch528/F5SectMemberBot".into()
    }
}
