//! Canned [`FetchFeed`] used by the unit tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};

use crate::config::FeedConfig;
use crate::feed::{FetchFeed, RawEntry, Registry};
use crate::{Error, Result};

pub enum StubFeed {
    Entries(Vec<RawEntry>),
    Fail,
    Hang(Duration),
}

#[derive(Default)]
pub struct StubFetcher {
    feeds: HashMap<String, StubFeed>,
    calls: AtomicUsize,
}

impl StubFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, url: &str, feed: StubFeed) -> Self {
        self.feeds.insert(url.to_string(), feed);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FetchFeed for StubFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<RawEntry>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.feeds.get(url) {
            Some(StubFeed::Entries(entries)) => Ok(entries.clone()),
            Some(StubFeed::Fail) | None => {
                Err(Error::FeedParse(format!("HTTP 503 Service Unavailable for URL: {}", url)))
            }
            Some(StubFeed::Hang(duration)) => {
                tokio::time::sleep(*duration).await;
                Ok(Vec::new())
            }
        }
    }
}

pub fn feed_url(index: usize) -> String {
    format!("https://feed{}.example/rss", index)
}

/// Registry of sources named "Feed0", "Feed1", ... at [`feed_url`]
pub fn registry(len: usize) -> Registry {
    let feeds: Vec<FeedConfig> = (0..len)
        .map(|i| FeedConfig::new(format!("Feed{}", i), feed_url(i)))
        .collect();
    Registry::new(&feeds).expect("non-empty registry")
}

/// Entry published at the given hour of 2026-01-01, linked to `https://example.com/<title>`
pub fn entry_at(title: &str, hour: Option<u32>) -> RawEntry {
    let entry = RawEntry::new(title).with_link(format!("https://example.com/{}", title));
    match hour {
        Some(h) => entry.with_published(Utc.with_ymd_and_hms(2026, 1, 1, h, 0, 0).unwrap()),
        None => entry,
    }
}
