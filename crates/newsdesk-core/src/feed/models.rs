use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A configured feed endpoint. `index` is its position in the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedSource {
    pub index: usize,
    pub name: String,
    pub url: String,
}

/// One body representation offered by an entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentVariant {
    pub mime_type: String,
    pub value: String,
}

impl ContentVariant {
    pub fn new(mime_type: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            value: value.into(),
        }
    }
}

/// An entry as returned by the fetch adapter, before normalization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEntry {
    pub title: String,
    pub link: Option<String>,
    pub author: Option<String>,
    /// Publication date exactly as the feed wrote it
    pub published_raw: Option<String>,
    pub published: Option<DateTime<Utc>>,
    pub content: Vec<ContentVariant>,
    pub summary: Option<String>,
    /// Category terms, in document order
    #[serde(default)]
    pub categories: Vec<String>,
}

impl RawEntry {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            link: None,
            author: None,
            published_raw: None,
            published: None,
            content: Vec::new(),
            summary: None,
            categories: Vec::new(),
        }
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    pub fn with_category(mut self, term: impl Into<String>) -> Self {
        self.categories.push(term.into());
        self
    }

    pub fn with_published(mut self, published: DateTime<Utc>) -> Self {
        self.published = Some(published);
        self
    }

    /// Date for display: the feed's own string, then the parsed timestamp
    pub fn published_display(&self) -> Option<String> {
        self.published_raw
            .clone()
            .or_else(|| self.published.map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_published_display_prefers_raw_string() {
        let mut entry = RawEntry::new("a")
            .with_published(Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap());
        assert_eq!(entry.published_display().as_deref(), Some("2026-01-02 03:04:05 UTC"));

        entry.published_raw = Some("Fri, 02 Jan 2026 03:04:05 GMT".into());
        assert_eq!(
            entry.published_display().as_deref(),
            Some("Fri, 02 Jan 2026 03:04:05 GMT")
        );
    }

    #[test]
    fn test_published_display_absent() {
        assert_eq!(RawEntry::new("a").published_display(), None);
    }
}
