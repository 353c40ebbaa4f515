use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;

use crate::aggregate::{Aggregator, Article};
use crate::config::{AddressingMode, AppConfig};
use crate::content::{extract_body, sanitize};
use crate::feed::{FeedFetcher, FetchFeed, Registry};
use crate::filter::ListQuery;
use crate::locate::{ArticleRef, Locator};
use crate::{Error, Result};

pub const UNKNOWN_AUTHOR: &str = "Unknown Author";

#[derive(Debug, Clone, Serialize)]
pub struct FeedToggle {
    pub name: String,
    pub enabled: bool,
    /// List address with this source flipped
    pub toggle_address: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListView {
    pub articles: Vec<Article>,
    pub feed_toggles: Vec<FeedToggle>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArticleDetail {
    pub title: String,
    pub author: String,
    /// Sanitized HTML
    pub body: String,
    pub original_url: String,
}

/// Entry point for consumers: builds list and detail views from live feeds
pub struct Newsdesk {
    registry: Registry,
    aggregator: Aggregator,
    locator: Locator,
    addressing: AddressingMode,
}

impl Newsdesk {
    /// Build with the reqwest/feed-rs fetcher
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let fetcher = Arc::new(FeedFetcher::new(&config.fetch)?);
        Self::new(config, fetcher)
    }

    pub fn new(config: &AppConfig, fetcher: Arc<dyn FetchFeed>) -> Result<Self> {
        config.validate()?;
        let registry = Registry::from_config(config)?;
        let timeout = Duration::from_secs(config.fetch.request_timeout_secs);

        Ok(Self {
            registry,
            aggregator: Aggregator::new(Arc::clone(&fetcher), config),
            locator: Locator::new(fetcher, timeout),
            addressing: config.view.addressing,
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Articles and per-source toggles for one list address
    pub async fn list_view(&self, query: &ListQuery) -> ListView {
        let toggles = &query.toggles;
        let articles = self
            .aggregator
            .aggregate_filtered(&self.registry, toggles, &query.filter)
            .await;

        let feed_toggles = self
            .registry
            .list()
            .iter()
            .map(|source| FeedToggle {
                name: source.name.clone(),
                enabled: toggles.is_enabled(source.index),
                toggle_address: query.toggle_link(source.index),
            })
            .collect();

        ListView {
            articles,
            feed_toggles,
        }
    }

    pub async fn detail_view(&self, reference: &ArticleRef) -> Result<ArticleDetail> {
        if matches!(reference, ArticleRef::ByUrl(_)) && self.registry.len() != 1 {
            return Err(Error::Config(format!(
                "url lookup needs a single feed source, {} configured",
                self.registry.len()
            )));
        }

        let (source, entry) = self.locator.locate(&self.registry, reference).await?;
        tracing::info!("Loaded '{}' from '{}'", entry.title, source.name);

        let body = sanitize(&extract_body(&entry));

        Ok(ArticleDetail {
            author: entry.author.unwrap_or_else(|| UNKNOWN_AUTHOR.to_string()),
            original_url: entry.link.unwrap_or_default(),
            title: entry.title,
            body,
        })
    }

    /// Resolve a full address such as `/?disabled=1&q=rust` or `/article?id=0-3`
    pub async fn open(&self, address: &str) -> Result<View> {
        let (path, query) = address.split_once('?').unwrap_or((address, ""));

        match path {
            "" | "/" => Ok(View::List(self.list_view(&ListQuery::from_query(query)).await)),
            crate::locate::ARTICLE_PATH => {
                let reference = ArticleRef::from_query(query)?;
                Ok(View::Detail(self.detail_view(&reference).await?))
            }
            other => Err(Error::EntryNotFound(other.to_string())),
        }
    }

    pub fn addressing(&self) -> AddressingMode {
        self.addressing
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "view", rename_all = "lowercase")]
pub enum View {
    List(ListView),
    Detail(ArticleDetail),
}
