//! Configuration types for podcast-dl

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Default root directory for downloaded episodes when no override is given.
///
/// When the default is in effect, a sanitized copy of the feed title is
/// appended as a subdirectory so runs against different feeds do not collide.
pub const DEFAULT_OUTPUT_ROOT: &str = "podcast_episodes";

/// Configuration for one acquisition run
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// URL of the podcast feed (RSS 2.0 or Atom)
    pub feed_url: String,

    /// Explicit output directory, used verbatim when set.
    /// `None` resolves to [`DEFAULT_OUTPUT_ROOT`] plus the sanitized feed title.
    #[serde(default)]
    pub output_dir: Option<PathBuf>,

    /// Maximum concurrent episode downloads (default: 3, minimum: 1)
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Per-request HTTP timeout in seconds (default: 30)
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// User-agent string sent with every request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Config {
    /// Create a configuration for the given feed URL with default settings.
    pub fn new(feed_url: impl Into<String>) -> Self {
        Self {
            feed_url: feed_url.into(),
            ..Self::default()
        }
    }

    /// Validate the configuration before any network activity.
    ///
    /// # Errors
    /// Returns [`Error::Config`] if the feed URL is empty or the concurrency
    /// bound is below 1.
    pub fn validate(&self) -> Result<()> {
        if self.feed_url.trim().is_empty() {
            return Err(Error::Config {
                message: "feed_url must not be empty".to_string(),
            });
        }
        if self.concurrency < 1 {
            return Err(Error::Config {
                message: format!("concurrency must be at least 1, got {}", self.concurrency),
            });
        }
        Ok(())
    }

    /// Per-request timeout as a [`Duration`].
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            feed_url: String::new(),
            output_dir: None,
            concurrency: default_concurrency(),
            request_timeout_secs: default_request_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_concurrency() -> usize {
    3
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    concat!("podcast-dl/", env!("CARGO_PKG_VERSION")).to_string()
}
