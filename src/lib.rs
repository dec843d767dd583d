//! # podcast-dl
//!
//! Downloads all episodes referenced by a podcast syndication feed (RSS 2.0
//! or Atom) to local storage, oldest episode first. Already-complete files
//! are skipped, partial downloads are cleaned up, and each episode gets a
//! plain-text metadata sidecar next to its audio file.
//!
//! One invocation processes one feed to completion; there is no persistent
//! state between runs beyond the downloaded files themselves.
//!
//! ## Quick Start
//!
//! ```no_run
//! use podcast_dl::{Config, PodcastDownloader};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::new("https://example.com/feed.xml");
//!     let downloader = PodcastDownloader::new(config)?;
//!     let summary = downloader.run().await?;
//!
//!     println!(
//!         "{}: {} new, {} existing, {} failed",
//!         summary.podcast_title,
//!         summary.newly_downloaded,
//!         summary.already_existed,
//!         summary.failed
//!     );
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Configuration types
pub mod config;
/// Acquisition pipeline orchestration
pub mod downloader;
/// Error types
pub mod error;
/// Feed fetching, parsing, and normalization
pub mod feed;
/// Episode sidecar metadata
pub mod metadata;
/// Filename and URL helpers
pub mod utils;

// Re-export commonly used types
pub use config::{Config, DEFAULT_OUTPUT_ROOT};
pub use downloader::{DownloadOutcome, PodcastDownloader, RunSummary};
pub use error::{Error, FetchError, Result};
pub use feed::{Enclosure, Episode, FeedEntry, ParsedFeed};
