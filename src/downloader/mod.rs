//! Acquisition pipeline orchestration.
//!
//! The [`PodcastDownloader`] drives one run end to end: fetch the feed,
//! normalize it into an ordered episode list, resolve the output directory,
//! fan out one work unit per episode under the configured concurrency bound,
//! and tally the collected outcomes into a [`RunSummary`]. Work units are
//! independent; a failure inside one is converted to a failed outcome and
//! never aborts siblings or the run.

mod fetch;

pub use fetch::DownloadOutcome;

use crate::config::{Config, DEFAULT_OUTPUT_ROOT};
use crate::error::{Error, Result};
use crate::feed::{self, Episode};
use crate::metadata;
use crate::utils::sanitize_filename;
use futures::stream::{self, StreamExt};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Summary of one completed acquisition run.
///
/// Invariant: `newly_downloaded + already_existed + failed == total_episodes`.
#[derive(Clone, Debug)]
pub struct RunSummary {
    /// Feed-level podcast title, or `Unknown Podcast`
    pub podcast_title: String,

    /// Absolute path episodes were written to
    pub output_dir: PathBuf,

    /// Number of episodes found in the feed
    pub total_episodes: usize,

    /// Episodes fetched during this run
    pub newly_downloaded: usize,

    /// Episodes already present and complete, left untouched
    pub already_existed: usize,

    /// Episodes that failed resolution or download
    pub failed: usize,
}

/// Downloads all episodes of one podcast feed, oldest first.
pub struct PodcastDownloader {
    config: Config,
    http_client: reqwest::Client,
}

impl PodcastDownloader {
    /// Create a downloader for the given configuration.
    ///
    /// # Errors
    /// Returns [`Error::Config`] for an invalid configuration (empty feed
    /// URL, concurrency below 1) before any network activity, or
    /// [`Error::Network`] if the HTTP client cannot be built.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let http_client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .user_agent(&config.user_agent)
            .build()
            .map_err(Error::Network)?;

        Ok(Self {
            config,
            http_client,
        })
    }

    /// Run the acquisition pipeline to completion.
    ///
    /// The run always completes and reports a summary once the feed has been
    /// fetched, even if every episode fails.
    ///
    /// # Errors
    /// Returns an error only for run-level faults: feed fetch or parse
    /// failure, or an uncreatable output directory.
    pub async fn run(&self) -> Result<RunSummary> {
        info!(url = %self.config.feed_url, "fetching feed");
        let content = feed::fetch_feed(&self.http_client, &self.config.feed_url).await?;
        let parsed = feed::parse_feed(&content)?;

        if let Some(reason) = &parsed.warning {
            warn!(reason, "feed may be malformed");
        }

        let podcast_title = parsed
            .title
            .clone()
            .unwrap_or_else(|| "Unknown Podcast".to_string());
        let output_dir = self.resolve_output_dir(parsed.title.as_deref());
        let episodes = feed::normalize(parsed.entries);

        if episodes.is_empty() {
            info!(podcast = %podcast_title, "no episodes found in the feed");
            return Ok(RunSummary {
                podcast_title,
                output_dir: std::path::absolute(&output_dir)?,
                total_episodes: 0,
                newly_downloaded: 0,
                already_existed: 0,
                failed: 0,
            });
        }

        tokio::fs::create_dir_all(&output_dir)
            .await
            .map_err(|source| Error::CreateDir {
                path: output_dir.clone(),
                source,
            })?;

        let total = episodes.len();
        info!(
            podcast = %podcast_title,
            total,
            concurrency = self.config.concurrency,
            "starting downloads, oldest first"
        );

        // Fan out one work unit per episode; outcomes are collected and
        // tallied after all units finish, so no shared counters are needed.
        // A bound of 1 serializes the units in feed-sorted order.
        let outcomes: Vec<DownloadOutcome> = stream::iter(episodes.iter().enumerate())
            .map(|(index, episode)| self.process_episode(index, total, episode, &output_dir))
            .buffer_unordered(self.config.concurrency)
            .collect()
            .await;

        let mut newly_downloaded = 0;
        let mut already_existed = 0;
        let mut failed = 0;
        for outcome in &outcomes {
            match outcome {
                DownloadOutcome::Downloaded { .. } => newly_downloaded += 1,
                DownloadOutcome::AlreadyComplete { .. } => already_existed += 1,
                DownloadOutcome::Failed => failed += 1,
            }
        }

        let summary = RunSummary {
            podcast_title,
            output_dir: std::path::absolute(&output_dir)?,
            total_episodes: total,
            newly_downloaded,
            already_existed,
            failed,
        };

        info!(
            podcast = %summary.podcast_title,
            total = summary.total_episodes,
            new = summary.newly_downloaded,
            existing = summary.already_existed,
            failed = summary.failed,
            "run complete"
        );

        Ok(summary)
    }

    /// One work unit: resolve the audio URL, download, write the sidecar.
    async fn process_episode(
        &self,
        index: usize,
        total: usize,
        episode: &Episode,
        output_dir: &Path,
    ) -> DownloadOutcome {
        info!(
            episode = %episode.title,
            published = %episode.date_prefix(),
            "processing episode {}/{}",
            index + 1,
            total
        );

        let Some(url) = feed::resolve_audio_url(&episode.entry) else {
            warn!(episode = %episode.title, "no audio enclosure or suitable link, skipping");
            return DownloadOutcome::Failed;
        };

        let outcome =
            fetch::download_episode(&self.http_client, &url, output_dir, &episode.prefixed_title())
                .await;

        // Sidecar failures are best-effort and never mark the episode failed
        if !matches!(outcome, DownloadOutcome::Failed) {
            metadata::write_sidecar(episode, output_dir).await;
        }

        outcome
    }

    /// Resolve the output directory once, before any download starts.
    ///
    /// An explicit override is used verbatim. The default root gains a
    /// sanitized-feed-title subdirectory so different feeds do not collide.
    fn resolve_output_dir(&self, feed_title: Option<&str>) -> PathBuf {
        if let Some(dir) = &self.config.output_dir {
            return dir.clone();
        }

        let root = PathBuf::from(DEFAULT_OUTPUT_ROOT);
        match feed_title
            .map(sanitize_filename)
            .filter(|title| !title.is_empty())
        {
            Some(title) => root.join(title),
            None => root,
        }
    }
}
