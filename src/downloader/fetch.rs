//! Single-episode streaming download.

use crate::error::FetchError;
use crate::utils::{infer_extension, sanitize_filename};
use futures::StreamExt;
use std::path::Path;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

/// Result of one episode download attempt
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// Newly fetched to disk
    Downloaded {
        /// Final filename within the output directory
        filename: String,
    },

    /// A file of the declared size already existed; nothing was written
    AlreadyComplete {
        /// Filename of the existing complete file
        filename: String,
    },

    /// Resolution or download failed; any partial file was removed
    Failed,
}

/// Log a progress line roughly once per this many bytes.
const PROGRESS_LOG_INTERVAL: u64 = 1024 * 1024;

/// Download one episode to `output_dir`.
///
/// All failure modes — timeout, transport error, HTTP error status, size
/// mismatch, I/O error — are caught here and converted to
/// [`DownloadOutcome::Failed`]. A fault in one episode must never abort
/// sibling downloads, so this function does not return a `Result`.
pub(crate) async fn download_episode(
    client: &reqwest::Client,
    url: &str,
    output_dir: &Path,
    prefixed_title: &str,
) -> DownloadOutcome {
    match try_download(client, url, output_dir, prefixed_title).await {
        Ok(outcome) => outcome,
        Err(FetchError::Timeout) => {
            warn!(url, title = prefixed_title, "download timed out");
            DownloadOutcome::Failed
        }
        Err(err) => {
            warn!(url, title = prefixed_title, error = %err, "download failed");
            DownloadOutcome::Failed
        }
    }
}

async fn try_download(
    client: &reqwest::Client,
    url: &str,
    output_dir: &Path,
    prefixed_title: &str,
) -> Result<DownloadOutcome, FetchError> {
    let response = client.get(url).send().await.map_err(classify)?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::HttpStatus {
            status: status.as_u16(),
        });
    }

    let total_size = response.content_length().unwrap_or(0);
    let filename = format!(
        "{}{}",
        sanitize_filename(prefixed_title),
        infer_extension(url)
    );
    let target = output_dir.join(&filename);

    if fs::try_exists(&target).await.unwrap_or(false) {
        let existing_size = fs::metadata(&target).await.map(|m| m.len()).unwrap_or(0);
        if total_size > 0 && existing_size == total_size {
            info!(filename, size = total_size, "already exists and is complete, skipping");
            return Ok(DownloadOutcome::AlreadyComplete { filename });
        }
        info!(filename, "exists but is incomplete or of unknown size, re-downloading");
    } else {
        info!(filename, "downloading");
    }

    let written = match stream_to_file(response, &target, total_size, &filename).await {
        Ok(written) => written,
        Err(err) => {
            remove_partial(&target).await;
            return Err(err);
        }
    };

    if total_size != 0 && written != total_size {
        remove_partial(&target).await;
        return Err(FetchError::SizeMismatch {
            expected: total_size,
            actual: written,
        });
    }

    Ok(DownloadOutcome::Downloaded { filename })
}

/// Stream the response body to `target` chunk by chunk, returning the number
/// of bytes written. The caller removes the file on error.
async fn stream_to_file(
    response: reqwest::Response,
    target: &Path,
    total_size: u64,
    filename: &str,
) -> Result<u64, FetchError> {
    let mut file = fs::File::create(target).await?;
    let mut stream = response.bytes_stream();
    let mut written: u64 = 0;
    let mut next_progress = PROGRESS_LOG_INTERVAL;

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(classify)?;
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
        if written >= next_progress {
            debug!(filename, written, total = total_size, "download progress");
            next_progress += PROGRESS_LOG_INTERVAL;
        }
    }

    file.flush().await?;
    Ok(written)
}

/// Best-effort removal of an incomplete file.
async fn remove_partial(target: &Path) {
    if let Err(err) = fs::remove_file(target).await {
        debug!(path = %target.display(), error = %err, "could not remove partial file");
    }
}

fn classify(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout
    } else {
        FetchError::Transport(err)
    }
}
