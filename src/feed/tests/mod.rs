use super::*;
use chrono::TimeZone;

#[test]
fn parse_rss_feed_with_itunes_fields() {
    let rss_content = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:itunes="http://www.itunes.com/dtds/podcast-1.0.dtd">
    <channel>
        <title>Test Podcast</title>
        <link>https://example.com</link>
        <description>A test feed</description>
        <item>
            <title>Episode One</title>
            <link>https://example.com/ep/1</link>
            <pubDate>Fri, 01 Jan 2021 12:00:00 GMT</pubDate>
            <description>First episode</description>
            <author>host@example.com</author>
            <category>News</category>
            <category>Tech</category>
            <itunes:duration>42:17</itunes:duration>
            <itunes:episode>1</itunes:episode>
            <itunes:season>2</itunes:season>
            <enclosure url="https://cdn.example.com/1.mp3" length="1024" type="audio/mpeg"/>
        </item>
        <item>
            <title>Episode Two</title>
        </item>
    </channel>
</rss>"#;

    let feed = parse_feed(rss_content).expect("Failed to parse RSS");

    assert_eq!(feed.title.as_deref(), Some("Test Podcast"));
    assert!(feed.warning.is_none());
    assert_eq!(feed.entries.len(), 2);

    let entry = &feed.entries[0];
    assert_eq!(entry.title.as_deref(), Some("Episode One"));
    assert!(entry.published.is_some());
    assert_eq!(entry.enclosures.len(), 1);
    assert_eq!(entry.enclosures[0].url, "https://cdn.example.com/1.mp3");
    assert_eq!(entry.enclosures[0].mime_type.as_deref(), Some("audio/mpeg"));
    assert_eq!(entry.summary.as_deref(), Some("First episode"));
    assert_eq!(entry.author.as_deref(), Some("host@example.com"));
    assert_eq!(entry.duration.as_deref(), Some("42:17"));
    assert_eq!(entry.episode.as_deref(), Some("1"));
    assert_eq!(entry.season.as_deref(), Some("2"));
    assert_eq!(entry.tags, vec!["News".to_string(), "Tech".to_string()]);

    // Second item has almost nothing
    let sparse = &feed.entries[1];
    assert!(sparse.published.is_none());
    assert!(sparse.enclosures.is_empty());
}

#[test]
fn parse_atom_feed_with_enclosure_links() {
    let atom_content = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
    <title>Atom Cast</title>
    <id>https://example.com/atom</id>
    <updated>2024-01-01T12:00:00Z</updated>
    <entry>
        <title>Atom Episode</title>
        <id>entry-1</id>
        <updated>2024-01-01T12:00:00Z</updated>
        <published>2024-01-01T10:00:00Z</published>
        <summary>An atom episode</summary>
        <author><name>Alex</name></author>
        <category term="tech"/>
        <link href="https://example.com/details/1" rel="alternate"/>
        <link href="https://cdn.example.com/1.m4a" rel="enclosure" type="audio/mp4" length="2048"/>
    </entry>
    <entry>
        <title>Updated Only</title>
        <id>entry-2</id>
        <updated>2024-01-02T14:30:00Z</updated>
    </entry>
</feed>"#;

    let feed = parse_feed(atom_content).expect("Failed to parse Atom");

    assert_eq!(feed.title.as_deref(), Some("Atom Cast"));
    // A plain Atom feed is not malformed
    assert!(feed.warning.is_none());
    assert_eq!(feed.entries.len(), 2);

    let entry = &feed.entries[0];
    assert_eq!(entry.title.as_deref(), Some("Atom Episode"));
    assert!(entry.published.is_some());
    assert_eq!(entry.enclosures.len(), 1);
    assert_eq!(entry.enclosures[0].url, "https://cdn.example.com/1.m4a");
    assert_eq!(entry.enclosures[0].mime_type.as_deref(), Some("audio/mp4"));
    assert_eq!(entry.link.as_deref(), Some("https://example.com/details/1"));
    assert_eq!(entry.author.as_deref(), Some("Alex"));
    assert_eq!(entry.tags, vec!["tech".to_string()]);

    // published falls back to updated during normalization
    let episodes = normalize(feed.entries);
    assert!(episodes[0].published.is_some());
    assert!(episodes.iter().all(|e| e.published.is_some()));
}

#[test]
fn parse_invalid_feed_reports_both_errors() {
    let err = parse_feed("This is not XML at all!").unwrap_err();
    let message = err.to_string();
    assert!(message.contains("RSS error"), "got: {message}");
    assert!(message.contains("Atom error"), "got: {message}");
}

#[test]
fn normalize_sorts_oldest_first_with_unknown_dates_first() {
    let dated = |y: i32, m: u32, d: u32| {
        Some(Utc.with_ymd_and_hms(y, m, d, 0, 0, 0).unwrap())
    };

    let entries = vec![
        FeedEntry {
            title: Some("Newest".to_string()),
            published: dated(2021, 1, 1),
            ..FeedEntry::default()
        },
        FeedEntry {
            title: Some("Undated".to_string()),
            ..FeedEntry::default()
        },
        FeedEntry {
            title: Some("Middle".to_string()),
            published: dated(2020, 6, 15),
            ..FeedEntry::default()
        },
    ];

    let episodes = normalize(entries);
    let titles: Vec<&str> = episodes.iter().map(|e| e.title.as_str()).collect();
    assert_eq!(titles, vec!["Undated", "Middle", "Newest"]);

    assert_eq!(episodes[0].date_prefix(), "nodate");
    assert_eq!(episodes[1].date_prefix(), "2020-06-15");
    assert_eq!(episodes[1].prefixed_title(), "2020-06-15 - Middle");
}

#[test]
fn normalize_is_stable_for_equal_dates() {
    let date = Some(Utc.with_ymd_and_hms(2022, 3, 3, 9, 0, 0).unwrap());
    let entries = vec![
        FeedEntry {
            title: Some("First".to_string()),
            published: date,
            ..FeedEntry::default()
        },
        FeedEntry {
            title: Some("Second".to_string()),
            published: date,
            ..FeedEntry::default()
        },
    ];

    let episodes = normalize(entries);
    assert_eq!(episodes[0].title, "First");
    assert_eq!(episodes[1].title, "Second");

    // Sorting the already-sorted output again yields the same order
    let entries: Vec<FeedEntry> = episodes.iter().map(|e| e.entry.clone()).collect();
    let resorted = normalize(entries);
    assert_eq!(resorted[0].entry.title.as_deref(), Some("First"));
    assert_eq!(resorted[1].entry.title.as_deref(), Some("Second"));
}

#[test]
fn normalize_synthesizes_placeholder_titles_from_feed_order() {
    let entries = vec![
        FeedEntry {
            published: Some(Utc.with_ymd_and_hms(2021, 5, 5, 0, 0, 0).unwrap()),
            ..FeedEntry::default()
        },
        FeedEntry::default(),
    ];

    let episodes = normalize(entries);
    // The undated entry was second in the feed but sorts first; its
    // placeholder index still reflects the original feed position.
    assert_eq!(episodes[0].title, "Untitled Episode 2");
    assert_eq!(episodes[1].title, "Untitled Episode 1");
}

#[test]
fn resolve_prefers_audio_typed_enclosure() {
    let entry = FeedEntry {
        enclosures: vec![
            Enclosure {
                url: "https://cdn.example.com/cover.jpg".to_string(),
                mime_type: Some("image/jpeg".to_string()),
            },
            Enclosure {
                url: "https://cdn.example.com/ep.mp3".to_string(),
                mime_type: Some("audio/mpeg".to_string()),
            },
        ],
        ..FeedEntry::default()
    };
    assert_eq!(
        resolve_audio_url(&entry).as_deref(),
        Some("https://cdn.example.com/ep.mp3")
    );
}

#[test]
fn resolve_falls_back_to_first_enclosure() {
    let entry = FeedEntry {
        enclosures: vec![Enclosure {
            url: "https://cdn.example.com/mystery".to_string(),
            mime_type: Some("application/octet-stream".to_string()),
        }],
        ..FeedEntry::default()
    };
    assert_eq!(
        resolve_audio_url(&entry).as_deref(),
        Some("https://cdn.example.com/mystery")
    );
}

#[test]
fn resolve_accepts_audio_suffixed_link_without_enclosures() {
    let entry = FeedEntry {
        link: Some("https://example.com/audio/ep5.m4a?token=abc".to_string()),
        ..FeedEntry::default()
    };
    assert_eq!(
        resolve_audio_url(&entry).as_deref(),
        Some("https://example.com/audio/ep5.m4a?token=abc")
    );
}

#[test]
fn resolve_rejects_non_audio_link() {
    let entry = FeedEntry {
        link: Some("https://example.com/episode/5".to_string()),
        ..FeedEntry::default()
    };
    assert!(resolve_audio_url(&entry).is_none());

    assert!(resolve_audio_url(&FeedEntry::default()).is_none());
}
