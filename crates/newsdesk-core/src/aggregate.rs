use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::config::{AddressingMode, AppConfig};
use crate::feed::{FeedSource, FetchFeed, RawEntry, Registry};
use crate::filter::EntryFilter;
use crate::locate::{ArticleRef, CompositeArticleId};
use crate::toggle::ToggleState;
use crate::{Error, Result};

pub const UNKNOWN_DATE: &str = "Unknown Date";

/// An entry normalized for the list view
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Article {
    pub display_title: String,
    pub url: String,
    pub published_display: String,
    /// Sort key only. `None` sorts after every known instant.
    #[serde(skip)]
    pub published_instant: Option<DateTime<Utc>>,
    pub detail_address: String,
    pub source_index: usize,
    pub source_name: String,
}

impl Article {
    fn from_entry(source: &FeedSource, entry_index: usize, entry: RawEntry, addressing: AddressingMode) -> Self {
        let url = entry.link.clone().unwrap_or_default();

        let (display_title, reference) = match addressing {
            AddressingMode::Composite => (
                format!("[{}] {}", source.name, entry.title),
                ArticleRef::ByComposite(CompositeArticleId::new(source.index, entry_index)),
            ),
            AddressingMode::Url => (entry.title.clone(), ArticleRef::ByUrl(url.clone())),
        };

        Self {
            display_title,
            published_display: entry.published_display().unwrap_or_else(|| UNKNOWN_DATE.to_string()),
            published_instant: entry.published,
            detail_address: reference.address(),
            url,
            source_index: source.index,
            source_name: source.name.clone(),
        }
    }
}

/// Fans out one fetch per enabled source and merges the results by time
pub struct Aggregator {
    fetcher: Arc<dyn FetchFeed>,
    semaphore: Arc<Semaphore>,
    timeout: Duration,
    addressing: AddressingMode,
    max_articles: usize,
}

impl Aggregator {
    pub fn new(fetcher: Arc<dyn FetchFeed>, config: &AppConfig) -> Self {
        Self {
            fetcher,
            semaphore: Arc::new(Semaphore::new(config.fetch.concurrency.max(1))),
            timeout: Duration::from_secs(config.fetch.request_timeout_secs),
            addressing: config.view.addressing,
            max_articles: config.view.max_articles,
        }
    }

    /// Newest-first articles from every source not disabled in `toggles`.
    ///
    /// A source that fails or times out is logged and left out; it never
    /// fails the aggregation as a whole.
    pub async fn aggregate(&self, registry: &Registry, toggles: &ToggleState) -> Vec<Article> {
        self.aggregate_filtered(registry, toggles, &EntryFilter::default())
            .await
    }

    /// Like [`Aggregator::aggregate`], keeping only entries `filter` matches.
    /// Entry indices are taken before filtering, so detail addresses stay valid.
    pub async fn aggregate_filtered(
        &self,
        registry: &Registry,
        toggles: &ToggleState,
        filter: &EntryFilter,
    ) -> Vec<Article> {
        let fetched = self.fetch_enabled(registry, toggles).await;
        let addressing = self.addressing;

        let mut articles: Vec<Article> = fetched
            .into_values()
            .flat_map(|(source, entries)| {
                entries
                    .into_iter()
                    .enumerate()
                    .filter(|(_, entry)| filter.matches(entry))
                    .filter(|(j, entry)| addressable(&source, *j, entry, addressing))
                    .map(|(j, entry)| Article::from_entry(&source, j, entry, addressing))
                    .collect::<Vec<_>>()
            })
            .collect();

        // Stable: equal instants keep registry-then-entry order
        articles.sort_by(|a, b| b.published_instant.cmp(&a.published_instant));
        articles.truncate(self.max_articles);

        tracing::info!(
            "Aggregated {} articles from {} enabled sources",
            articles.len(),
            registry.list().iter().filter(|s| toggles.is_enabled(s.index)).count()
        );

        articles
    }

    /// Successful fetches keyed by source index
    async fn fetch_enabled(
        &self,
        registry: &Registry,
        toggles: &ToggleState,
    ) -> BTreeMap<usize, (FeedSource, Vec<RawEntry>)> {
        let mut join_set = JoinSet::new();

        for source in registry.list().iter().filter(|s| toggles.is_enabled(s.index)) {
            let source = source.clone();
            let fetcher = Arc::clone(&self.fetcher);
            let semaphore = Arc::clone(&self.semaphore);
            let timeout = self.timeout;

            join_set.spawn(async move {
                let _permit = semaphore.acquire_owned().await.ok();
                let result = fetch_with_timeout(fetcher.as_ref(), &source.url, timeout).await;
                (source, result)
            });
        }

        let mut fetched = BTreeMap::new();
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((source, Ok(entries))) => {
                    tracing::debug!("Feed '{}': {} entries", source.name, entries.len());
                    fetched.insert(source.index, (source, entries));
                }
                Ok((source, Err(e))) => {
                    tracing::warn!("Skipping feed '{}': {}", source.name, e);
                }
                Err(e) => {
                    tracing::error!("Task join error: {}", e);
                }
            }
        }

        fetched
    }
}

/// URL addressing needs a link to find the entry again
fn addressable(source: &FeedSource, entry_index: usize, entry: &RawEntry, addressing: AddressingMode) -> bool {
    if addressing == AddressingMode::Url && entry.link.as_deref().map_or(true, str::is_empty) {
        tracing::debug!(
            "Skipping entry {} of '{}' without a link: '{}'",
            entry_index,
            source.name,
            entry.title
        );
        return false;
    }
    true
}

pub(crate) async fn fetch_with_timeout(
    fetcher: &dyn FetchFeed,
    url: &str,
    timeout: Duration,
) -> Result<Vec<RawEntry>> {
    tokio::time::timeout(timeout, fetcher.fetch(url))
        .await
        .map_err(|_| Error::Timeout {
            url: url.to_string(),
            secs: timeout.as_secs(),
        })?
}
