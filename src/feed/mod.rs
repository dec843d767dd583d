//! Feed fetching, parsing, and normalization.
//!
//! This module turns a raw syndication document into a uniform, ordered
//! episode list. It supports both RSS 2.0 and Atom feed formats: documents
//! are parsed as RSS first with a fallback to Atom. Every optional field of
//! an entry is resolved once here into a typed [`FeedEntry`] record, so the
//! rest of the pipeline never probes the raw document.

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use tracing::debug;

/// Link-path suffixes accepted when an entry has no enclosures at all.
pub const AUDIO_EXTENSIONS: &[&str] = &[".mp3", ".m4a", ".ogg", ".wav", ".aac"];

/// A declared media attachment on a feed entry
#[derive(Clone, Debug, Default)]
pub struct Enclosure {
    /// Resource URL
    pub url: String,

    /// Declared media type, e.g. `audio/mpeg`
    pub mime_type: Option<String>,
}

/// A feed entry with every optional field resolved once at parse time
#[derive(Clone, Debug, Default)]
pub struct FeedEntry {
    /// Entry title
    pub title: Option<String>,

    /// Structured publication timestamp
    pub published: Option<DateTime<Utc>>,

    /// Structured last-updated timestamp (publication fallback)
    pub updated: Option<DateTime<Utc>>,

    /// Declared media attachments, in document order
    pub enclosures: Vec<Enclosure>,

    /// Direct item link
    pub link: Option<String>,

    /// Short description/summary (may contain HTML)
    pub summary: Option<String>,

    /// Extended content block (may contain HTML)
    pub content: Option<String>,

    /// Author name
    pub author: Option<String>,

    /// Declared episode duration, as published (e.g. `42:17`)
    pub duration: Option<String>,

    /// Episode number, as published
    pub episode: Option<String>,

    /// Season number, as published
    pub season: Option<String>,

    /// Category tags
    pub tags: Vec<String>,
}

/// A parsed feed document
#[derive(Clone, Debug)]
pub struct ParsedFeed {
    /// Feed-level title
    pub title: Option<String>,

    /// Set when the document deviated from its declared format but was still
    /// readable. Malformed feeds are reported, never fatal.
    pub warning: Option<String>,

    /// Entries in original document order
    pub entries: Vec<FeedEntry>,
}

/// One episode, normalized and ready for download
#[derive(Clone, Debug)]
pub struct Episode {
    /// Display title; synthesized from the original feed position when the
    /// entry carries none
    pub title: String,

    /// Publication date used for ordering; `None` sorts as earliest
    pub published: Option<DateTime<Utc>>,

    /// The raw entry, kept for metadata extraction
    pub entry: FeedEntry,
}

impl Episode {
    /// Date prefix for filenames: `YYYY-MM-DD`, or `nodate` when unknown.
    #[must_use]
    pub fn date_prefix(&self) -> String {
        match self.published {
            Some(date) => date.format("%Y-%m-%d").to_string(),
            None => "nodate".to_string(),
        }
    }

    /// Title prefixed with the date string, the base name for all files of
    /// this episode.
    #[must_use]
    pub fn prefixed_title(&self) -> String {
        format!("{} - {}", self.date_prefix(), self.title)
    }
}

/// Fetch a feed document over HTTP.
///
/// # Errors
/// Returns [`Error::FeedFetch`] on transport failure, timeout, or a
/// non-success HTTP status. Feed fetch failure aborts the whole run.
pub async fn fetch_feed(client: &reqwest::Client, url: &str) -> Result<String> {
    let response = client.get(url).send().await.map_err(|e| Error::FeedFetch {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(Error::FeedFetch {
            url: url.to_string(),
            reason: format!("HTTP {}", status.as_u16()),
        });
    }

    response.text().await.map_err(|e| Error::FeedFetch {
        url: url.to_string(),
        reason: format!("failed to read response body: {e}"),
    })
}

/// Parse a feed document into a [`ParsedFeed`].
///
/// Tries RSS 2.0 first, then Atom. A document that carries an `<rss` root
/// yet only parses via the Atom fallback is flagged as malformed on
/// [`ParsedFeed::warning`]; a plain Atom feed is not.
///
/// # Errors
/// Returns [`Error::FeedParse`] with both parser errors when neither format
/// matches.
pub fn parse_feed(content: &str) -> Result<ParsedFeed> {
    match parse_as_rss(content) {
        Ok(feed) => {
            debug!(entries = feed.entries.len(), "parsed feed as RSS");
            Ok(feed)
        }
        Err(rss_err) => match parse_as_atom(content) {
            Ok(mut feed) => {
                debug!(entries = feed.entries.len(), "parsed feed as Atom");
                if content.contains("<rss") {
                    feed.warning = Some(format!(
                        "document declares RSS but only parsed as Atom: {rss_err}"
                    ));
                }
                Ok(feed)
            }
            Err(atom_err) => Err(Error::FeedParse {
                rss: rss_err,
                atom: atom_err,
            }),
        },
    }
}

/// Parse feed content as RSS 2.0
fn parse_as_rss(content: &str) -> std::result::Result<ParsedFeed, String> {
    let channel = content
        .parse::<rss::Channel>()
        .map_err(|e| format!("RSS parse error: {e}"))?;

    let entries = channel
        .items()
        .iter()
        .map(|item| {
            let published = item.pub_date().and_then(|date_str| {
                DateTime::parse_from_rfc2822(date_str)
                    .ok()
                    .map(|dt| dt.with_timezone(&Utc))
            });

            let enclosures = item
                .enclosure()
                .map(|enc| {
                    vec![Enclosure {
                        url: enc.url().to_string(),
                        mime_type: Some(enc.mime_type().to_string())
                            .filter(|t| !t.is_empty()),
                    }]
                })
                .unwrap_or_default();

            let itunes = item.itunes_ext();

            FeedEntry {
                title: item.title().map(str::to_string),
                published,
                updated: None,
                enclosures,
                link: item.link().map(str::to_string),
                summary: item.description().map(str::to_string),
                content: item.content().map(str::to_string),
                author: item
                    .author()
                    .map(str::to_string)
                    .or_else(|| itunes.and_then(|i| i.author()).map(str::to_string)),
                duration: itunes.and_then(|i| i.duration()).map(str::to_string),
                episode: itunes.and_then(|i| i.episode()).map(str::to_string),
                season: itunes.and_then(|i| i.season()).map(str::to_string),
                tags: item
                    .categories()
                    .iter()
                    .map(|c| c.name().to_string())
                    .collect(),
            }
        })
        .collect();

    Ok(ParsedFeed {
        title: Some(channel.title().to_string()).filter(|t| !t.is_empty()),
        warning: None,
        entries,
    })
}

/// Parse feed content as Atom
fn parse_as_atom(content: &str) -> std::result::Result<ParsedFeed, String> {
    let feed = atom_syndication::Feed::read_from(content.as_bytes())
        .map_err(|e| format!("Atom parse error: {e}"))?;

    let entries = feed
        .entries()
        .iter()
        .map(|entry| {
            let enclosures = entry
                .links()
                .iter()
                .filter(|link| link.rel() == "enclosure")
                .map(|link| Enclosure {
                    url: link.href().to_string(),
                    mime_type: link.mime_type().map(str::to_string),
                })
                .collect();

            // Prefer the alternate link over enclosure-style links
            let link = entry
                .links()
                .iter()
                .find(|l| l.rel() == "alternate")
                .or_else(|| entry.links().first())
                .map(|l| l.href().to_string());

            FeedEntry {
                title: Some(entry.title().as_str().to_string()).filter(|t| !t.is_empty()),
                published: entry.published().map(|dt| dt.with_timezone(&Utc)),
                updated: Some(entry.updated().with_timezone(&Utc)),
                enclosures,
                link,
                summary: entry.summary().map(|s| s.as_str().to_string()),
                content: entry
                    .content()
                    .and_then(|c| c.value().map(str::to_string)),
                author: entry.authors().first().map(|p| p.name().to_string()),
                duration: None,
                episode: None,
                season: None,
                tags: entry
                    .categories()
                    .iter()
                    .map(|c| c.term().to_string())
                    .collect(),
            }
        })
        .collect();

    Ok(ParsedFeed {
        title: Some(feed.title().as_str().to_string()).filter(|t| !t.is_empty()),
        warning: None,
        entries,
    })
}

/// Normalize raw entries into an ordered episode list.
///
/// The publish date comes from the published timestamp, falling back to the
/// updated timestamp. Entries without either sort as earliest. Missing titles
/// become `Untitled Episode {n}` where `n` is the 1-based position in the
/// original feed order, assigned before sorting. The sort is stable, so equal
/// dates keep their original relative order.
#[must_use]
pub fn normalize(entries: Vec<FeedEntry>) -> Vec<Episode> {
    let mut episodes: Vec<Episode> = entries
        .into_iter()
        .enumerate()
        .map(|(index, entry)| {
            let published = entry.published.or(entry.updated);
            let title = entry
                .title
                .clone()
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| format!("Untitled Episode {}", index + 1));
            Episode {
                title,
                published,
                entry,
            }
        })
        .collect();

    // Oldest first; None < Some(_) puts unknown dates at the front
    episodes.sort_by_key(|e| e.published);
    episodes
}

/// Resolve the audio URL for one episode.
///
/// Policy, in order: the first enclosure whose declared media type begins
/// with `audio`; else the first enclosure regardless of type; else the direct
/// link, but only if its URL path ends in one of [`AUDIO_EXTENSIONS`].
/// Returns `None` when nothing qualifies — the episode is then counted as
/// failed without a download attempt.
#[must_use]
pub fn resolve_audio_url(entry: &FeedEntry) -> Option<String> {
    if !entry.enclosures.is_empty() {
        if let Some(enc) = entry.enclosures.iter().find(|e| {
            e.mime_type
                .as_deref()
                .is_some_and(|t| t.starts_with("audio"))
        }) {
            return Some(enc.url.clone());
        }
        return entry.enclosures.first().map(|e| e.url.clone());
    }

    entry
        .link
        .as_ref()
        .filter(|link| {
            let path = url::Url::parse(link)
                .map(|u| u.path().to_string())
                .unwrap_or_else(|_| link.to_string());
            AUDIO_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
        })
        .cloned()
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests;
