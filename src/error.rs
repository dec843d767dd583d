//! Error types for podcast-dl
//!
//! Two layers of failure exist in the pipeline:
//! - [`Error`] covers run-level faults (bad configuration, unreachable or
//!   unparseable feed, uncreatable output directory). These abort the run.
//! - [`FetchError`] covers per-episode download faults. These never cross the
//!   work-unit boundary: they are converted to a failed outcome so one bad
//!   episode cannot abort its siblings.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for podcast-dl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Run-level error type for podcast-dl
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
    },

    /// Feed could not be fetched over HTTP
    #[error("failed to fetch feed '{url}': {reason}")]
    FeedFetch {
        /// The feed URL that could not be fetched
        url: String,
        /// Underlying cause (transport error, timeout, HTTP status)
        reason: String,
    },

    /// Feed document could not be parsed as RSS or Atom
    #[error("failed to parse feed as RSS or Atom. RSS error: {rss}. Atom error: {atom}")]
    FeedParse {
        /// Error from the RSS parser
        rss: String,
        /// Error from the Atom parser
        atom: String,
    },

    /// Output directory could not be created
    #[error("failed to create output directory '{path}': {source}")]
    CreateDir {
        /// The directory that could not be created
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Network error
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Per-episode download errors.
///
/// Each variant distinguishes one failure mode so the log line names the
/// cause. Callers convert these into a failed
/// [`DownloadOutcome`](crate::downloader::DownloadOutcome) at the work-unit
/// boundary instead of propagating them.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request exceeded the configured timeout
    #[error("request timed out")]
    Timeout,

    /// Transport or protocol error from the HTTP client
    #[error("transport error: {0}")]
    Transport(reqwest::Error),

    /// Server responded with a non-success status
    #[error("server returned HTTP {status}")]
    HttpStatus {
        /// The HTTP status code
        status: u16,
    },

    /// The bytes written to disk do not match the declared content length
    #[error("size mismatch: expected {expected} bytes, wrote {actual}")]
    SizeMismatch {
        /// Server-declared content length
        expected: u64,
        /// Bytes actually written
        actual: u64,
    },

    /// I/O error while writing the file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
