//! Filename and URL helper functions

/// Characters that are illegal or unsafe in filenames on common filesystems.
const ILLEGAL_FILENAME_CHARS: &[char] = &['\\', '/', '*', '?', ':', '"', '<', '>', '|'];

/// Fallback extension when the URL path does not carry a plausible one.
const DEFAULT_EXTENSION: &str = ".mp3";

/// Remove filesystem-illegal characters from a candidate filename.
///
/// Characters are removed, not replaced, so the result may be shorter than
/// the input. Sanitizing an already-clean string is a no-op.
///
/// # Examples
///
/// ```
/// use podcast_dl::utils::sanitize_filename;
///
/// assert_eq!(sanitize_filename("Episode 1: The Start?"), "Episode 1 The Start");
/// assert_eq!(sanitize_filename("plain title"), "plain title");
/// ```
#[must_use]
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .filter(|c| !ILLEGAL_FILENAME_CHARS.contains(c))
        .collect()
}

/// Infer a file extension from a download URL.
///
/// The extension is taken from the URL path with any query string stripped.
/// It is accepted only if its length including the dot is between 2 and 5
/// characters; anything else falls back to `.mp3`.
///
/// # Examples
///
/// ```
/// use podcast_dl::utils::infer_extension;
///
/// assert_eq!(infer_extension("https://cdn.example.com/ep1.mp3?x=1"), ".mp3");
/// assert_eq!(infer_extension("https://cdn.example.com/stream"), ".mp3");
/// assert_eq!(infer_extension("https://cdn.example.com/ep1.m4a"), ".m4a");
/// ```
#[must_use]
pub fn infer_extension(url: &str) -> String {
    let path = match url::Url::parse(url) {
        Ok(parsed) => parsed.path().to_string(),
        // Relative or otherwise unparseable URL: strip the query by hand
        Err(_) => url.split('?').next().unwrap_or(url).to_string(),
    };

    let Some(segment) = path.rsplit('/').next() else {
        return DEFAULT_EXTENSION.to_string();
    };

    match segment.rfind('.') {
        Some(idx) if idx > 0 => {
            let ext = &segment[idx..];
            if (2..=5).contains(&ext.len()) {
                ext.to_string()
            } else {
                DEFAULT_EXTENSION.to_string()
            }
        }
        _ => DEFAULT_EXTENSION.to_string(),
    }
}
