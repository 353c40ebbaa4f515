use super::models::FeedSource;
use crate::config::{AppConfig, FeedConfig};
use crate::{Error, Result};

/// Ordered, fixed list of feed sources.
///
/// A source's index is its identity in toggle tokens and article ids, so
/// reordering the configured feeds invalidates links issued earlier.
#[derive(Debug, Clone)]
pub struct Registry {
    sources: Vec<FeedSource>,
}

impl Registry {
    pub fn new(feeds: &[FeedConfig]) -> Result<Self> {
        if feeds.is_empty() {
            return Err(Error::Config("no feeds configured".into()));
        }

        let sources = feeds
            .iter()
            .enumerate()
            .map(|(index, feed)| FeedSource {
                index,
                name: feed.name.clone(),
                url: feed.url.clone(),
            })
            .collect();

        Ok(Self { sources })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self> {
        Self::new(&config.feeds)
    }

    pub fn list(&self) -> &[FeedSource] {
        &self.sources
    }

    pub fn get(&self, index: usize) -> Option<&FeedSource> {
        self.sources.get(index)
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}
