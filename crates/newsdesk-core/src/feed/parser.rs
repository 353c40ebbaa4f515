use feed_rs::parser;
use html_escape::decode_html_entities;

use super::models::{ContentVariant, RawEntry};
use crate::{Error, Result};

/// Parse RSS/Atom/JSON Feed content into raw entries, in document order
pub fn parse_feed(content: &[u8]) -> Result<Vec<RawEntry>> {
    let feed = parser::parse(content)
        .map_err(|e| Error::FeedParse(e.to_string()))?;

    let entries = feed.entries.into_iter().map(|entry| {
        let title = entry.title
            .map(|t| decode_html_entities(&t.content).to_string())
            .unwrap_or_else(|| "Untitled".to_string());

        let link = entry.links.first().map(|l| l.href.clone());

        let author = entry.authors.first()
            .map(|a| a.name.clone())
            .filter(|name| !name.trim().is_empty());

        let published = entry.published.or(entry.updated);

        let content = entry.content
            .and_then(|c| {
                let mime_type = c.content_type.essence().to_string();
                c.body.map(|body| ContentVariant::new(mime_type, body))
            })
            .into_iter()
            .collect();

        let summary = entry.summary.map(|s| s.content);

        let categories = entry.categories.into_iter()
            .map(|c| c.term)
            .filter(|term| !term.trim().is_empty())
            .collect();

        RawEntry {
            title,
            link,
            author,
            // feed-rs only exposes the parsed timestamp
            published_raw: None,
            published,
            content,
            summary,
            categories,
        }
    }).collect();

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RSS_SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:content="http://purl.org/rss/1.0/modules/content/">
  <channel>
    <title>Test Feed</title>
    <item>
      <title>Tom &amp;amp; Jerry</title>
      <link>https://example.com/item1</link>
      <guid>item-1</guid>
      <pubDate>Mon, 01 Jan 2024 00:00:00 GMT</pubDate>
      <category>Tech</category>
      <category>Science</category>
      <description>Short summary</description>
      <content:encoded><![CDATA[<p>Full <b>body</b></p>]]></content:encoded>
    </item>
    <item>
      <link>https://example.com/item2</link>
      <guid>item-2</guid>
      <description>Only a summary</description>
    </item>
  </channel>
</rss>"#;

    const ATOM_SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Atom Test Feed</title>
  <entry>
    <title>Atom Entry 1</title>
    <link href="https://example.com/atom1"/>
    <id>atom-entry-1</id>
    <author><name>Jane Doe</name></author>
    <updated>2024-01-01T00:00:00Z</updated>
    <summary>This is Atom entry 1</summary>
  </entry>
</feed>"#;

    #[test]
    fn test_parse_rss() {
        let entries = parse_feed(RSS_SAMPLE.as_bytes()).unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].title, "Tom & Jerry");
        assert_eq!(entries[0].link.as_deref(), Some("https://example.com/item1"));
        assert!(entries[0].published.is_some());
        assert_eq!(entries[0].content.len(), 1);
        assert_eq!(entries[0].content[0].mime_type, "text/html");
        assert!(entries[0].content[0].value.contains("<b>body</b>"));
        assert_eq!(entries[0].summary.as_deref(), Some("Short summary"));
        assert_eq!(entries[0].categories, vec!["Tech", "Science"]);
    }

    #[test]
    fn test_missing_fields_default() {
        let entries = parse_feed(RSS_SAMPLE.as_bytes()).unwrap();

        assert_eq!(entries[1].title, "Untitled");
        assert!(entries[1].published.is_none());
        assert!(entries[1].author.is_none());
        assert!(entries[1].published_raw.is_none());
        assert!(entries[1].categories.is_empty());
    }

    #[test]
    fn test_parse_atom() {
        let entries = parse_feed(ATOM_SAMPLE.as_bytes()).unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].title, "Atom Entry 1");
        assert_eq!(entries[0].author.as_deref(), Some("Jane Doe"));
        assert_eq!(
            entries[0].published.map(|dt| dt.to_rfc3339()),
            Some("2024-01-01T00:00:00+00:00".to_string())
        );
    }

    #[test]
    fn test_not_a_feed() {
        let result = parse_feed(b"<html><body>Just a moment...</body></html>");
        assert!(matches!(result, Err(Error::FeedParse(_))));
    }
}
