//! Episode sidecar metadata extraction and formatting.
//!
//! Every successfully downloaded episode gets a plain-text sidecar file
//! sharing its base name. The sidecar is written once and never overwritten;
//! any failure in extraction or writing is swallowed so it can never mark the
//! episode download itself as failed.

use crate::feed::Episode;
use crate::utils::sanitize_filename;
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;
use tracing::debug;

/// Write the sidecar for one episode, best-effort.
///
/// No-op if the sidecar already exists. Errors are logged at debug level and
/// swallowed.
pub async fn write_sidecar(episode: &Episode, output_dir: &Path) {
    if let Err(err) = try_write_sidecar(episode, output_dir).await {
        debug!(episode = %episode.title, error = %err, "sidecar write skipped");
    }
}

async fn try_write_sidecar(episode: &Episode, output_dir: &Path) -> std::io::Result<()> {
    let filename = format!("{}.txt", sanitize_filename(&episode.prefixed_title()));
    let path = output_dir.join(filename);

    if tokio::fs::try_exists(&path).await? {
        return Ok(());
    }

    tokio::fs::write(&path, format_episode(episode)).await
}

/// Render the sidecar body for one episode.
///
/// Fields appear in a fixed order; absent fields are omitted entirely. An
/// extended content block that differs from the short description is appended
/// last as best-effort plain text.
#[must_use]
pub fn format_episode(episode: &Episode) -> String {
    let entry = &episode.entry;
    let mut out = String::new();

    out.push_str(&format!("Title: {}\n", episode.title));

    let published = match episode.published {
        Some(date) => date.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => "Unknown".to_string(),
    };
    out.push_str(&format!("Published: {published}\n"));

    if let Some(summary) = &entry.summary {
        let cleaned = clean_inline_html(summary);
        if !cleaned.is_empty() {
            out.push_str(&format!("Description: {cleaned}\n"));
        }
    }
    if let Some(author) = &entry.author {
        out.push_str(&format!("Author: {author}\n"));
    }
    if let Some(duration) = &entry.duration {
        out.push_str(&format!("Duration: {duration}\n"));
    }
    if let Some(link) = &entry.link {
        out.push_str(&format!("Link: {link}\n"));
    }
    if let Some(episode_number) = &entry.episode {
        out.push_str(&format!("Episode: {episode_number}\n"));
    }
    if let Some(season) = &entry.season {
        out.push_str(&format!("Season: {season}\n"));
    }
    if !entry.tags.is_empty() {
        out.push_str(&format!("Tags: {}\n", entry.tags.join(", ")));
    }

    if let Some(content) = &entry.content
        && entry.summary.as_deref() != Some(content.as_str())
    {
        out.push_str("\nExtended Shownotes:\n");
        out.push_str(html_to_text(content).trim());
        out.push('\n');
    }

    out
}

/// Reduce an HTML fragment to a single line of plain text: entities
/// unescaped, tags stripped, whitespace collapsed to single spaces.
#[must_use]
pub fn clean_inline_html(input: &str) -> String {
    let stripped = ANY_TAG.replace_all(input, " ");
    let unescaped = unescape_entities(&stripped);
    INLINE_WHITESPACE
        .replace_all(unescaped.trim(), " ")
        .into_owned()
}

/// Best-effort HTML-to-text conversion for extended shownotes.
///
/// The transform is an ordered rule pipeline; order is significant because
/// later rules assume earlier ones already rewrote their tags:
/// 1. headings become `=== text ===` lines
/// 2. list items become `- text` lines
/// 3. anchors become `text (href)`
/// 4. paragraph, break, and list-container tags become newlines
/// 5. remaining tags are stripped
/// 6. entities are unescaped and runs of 3+ newlines collapse to exactly 2
#[must_use]
pub fn html_to_text(input: &str) -> String {
    let mut text = input.to_string();
    for (pattern, replacement) in BLOCK_RULES.iter() {
        text = pattern.replace_all(&text, *replacement).into_owned();
    }
    let text = ANY_TAG.replace_all(&text, "");
    let text = unescape_entities(&text);
    EXCESS_NEWLINES.replace_all(&text, "\n\n").into_owned()
}

// Regexes are compiled from literals; a panic here is a programming error.
#[allow(clippy::expect_used)]
static BLOCK_RULES: LazyLock<Vec<(Regex, &'static str)>> = LazyLock::new(|| {
    [
        (r"(?is)<h[1-6][^>]*>(.*?)</h[1-6]>", "\n=== $1 ===\n"),
        (r"(?is)<li[^>]*>(.*?)</li>", "\n- $1"),
        (r#"(?is)<a\s[^>]*href\s*=\s*"([^"]*)"[^>]*>(.*?)</a>"#, "$2 ($1)"),
        (r"(?i)</?(?:p|div|ul|ol)[^>]*>|<br\s*/?>", "\n"),
    ]
    .into_iter()
    .map(|(pattern, replacement)| {
        (
            Regex::new(pattern).expect("block rule pattern is valid"),
            replacement,
        )
    })
    .collect()
});

#[allow(clippy::expect_used)]
static ANY_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<[^>]+>").expect("tag pattern is valid"));

#[allow(clippy::expect_used)]
static INLINE_WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

#[allow(clippy::expect_used)]
static EXCESS_NEWLINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("newline pattern is valid"));

#[allow(clippy::expect_used)]
static NUMERIC_ENTITY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&#(x[0-9a-fA-F]+|[0-9]+);").expect("entity pattern is valid"));

/// Unescape the HTML entities that commonly appear in feed descriptions.
/// `&amp;` is handled last so doubly-escaped input resolves one level only.
fn unescape_entities(input: &str) -> String {
    let text = NUMERIC_ENTITY.replace_all(input, |caps: &regex::Captures<'_>| {
        let body = &caps[1];
        let code = if let Some(hex) = body.strip_prefix('x') {
            u32::from_str_radix(hex, 16).ok()
        } else {
            body.parse::<u32>().ok()
        };
        code.and_then(char::from_u32)
            .map(String::from)
            .unwrap_or_else(|| caps[0].to_string())
    });

    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}
