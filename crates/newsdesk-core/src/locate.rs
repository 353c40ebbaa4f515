//! Stateless re-location of a single entry.
//!
//! The list view hands out addresses that carry enough to find the entry
//! again in the live feed; nothing is remembered between requests.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use url::form_urlencoded;

use crate::aggregate::fetch_with_timeout;
use crate::feed::{FeedSource, FetchFeed, RawEntry, Registry};
use crate::{Error, Result};

pub const ARTICLE_PATH: &str = "/article";

/// Left literal in `url=` values: alphanumerics plus `_.-~/`
const URL_VALUE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'_')
    .remove(b'.')
    .remove(b'-')
    .remove(b'~')
    .remove(b'/');

/// `<source_index>-<entry_index>`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CompositeArticleId {
    pub source_index: usize,
    pub entry_index: usize,
}

impl CompositeArticleId {
    pub fn new(source_index: usize, entry_index: usize) -> Self {
        Self {
            source_index,
            entry_index,
        }
    }
}

impl FromStr for CompositeArticleId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let malformed = || Error::MalformedId(s.to_string());

        let mut parts = s.split('-');
        let (source, entry) = match (parts.next(), parts.next(), parts.next()) {
            (Some(source), Some(entry), None) => (source, entry),
            _ => return Err(malformed()),
        };

        Ok(Self {
            source_index: parse_index(source).ok_or_else(malformed)?,
            entry_index: parse_index(entry).ok_or_else(malformed)?,
        })
    }
}

impl fmt::Display for CompositeArticleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.source_index, self.entry_index)
    }
}

/// Digits only: rejects signs, whitespace and empty components
fn parse_index(part: &str) -> Option<usize> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

/// How a detail request names its article
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArticleRef {
    ByComposite(CompositeArticleId),
    /// Only meaningful for a single-source configuration
    ByUrl(String),
}

impl ArticleRef {
    /// Parse `id=<s>-<e>` or `url=<link>` out of a raw query string.
    /// `id` wins when both are present.
    pub fn from_query(query: &str) -> Result<Self> {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut id = None;
        let mut url = None;

        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "id" if id.is_none() => id = Some(value.into_owned()),
                "url" if url.is_none() => url = Some(value.into_owned()),
                _ => {}
            }
        }

        match (id, url) {
            (Some(id), _) => Ok(ArticleRef::ByComposite(id.parse()?)),
            (None, Some(url)) if !url.is_empty() => Ok(ArticleRef::ByUrl(url)),
            _ => Err(Error::MissingId),
        }
    }

    /// Detail address, e.g. `/article?id=0-3` or
    /// `/article?url=http%3A//example.com/1`
    pub fn address(&self) -> String {
        match self {
            ArticleRef::ByComposite(id) => format!("{}?id={}", ARTICLE_PATH, id),
            ArticleRef::ByUrl(url) => format!(
                "{}?url={}",
                ARTICLE_PATH,
                utf8_percent_encode(url, URL_VALUE_SET)
            ),
        }
    }
}

/// Re-fetches one source and resolves one entry in it
pub struct Locator {
    fetcher: Arc<dyn FetchFeed>,
    timeout: Duration,
}

impl Locator {
    pub fn new(fetcher: Arc<dyn FetchFeed>, timeout: Duration) -> Self {
        Self { fetcher, timeout }
    }

    /// Returns the source the entry came from along with the entry
    pub async fn locate(&self, registry: &Registry, reference: &ArticleRef) -> Result<(FeedSource, RawEntry)> {
        match reference {
            ArticleRef::ByComposite(id) => self.locate_by_composite(registry, *id).await,
            ArticleRef::ByUrl(url) => self.locate_by_url(registry, url).await,
        }
    }

    pub async fn locate_by_composite(
        &self,
        registry: &Registry,
        id: CompositeArticleId,
    ) -> Result<(FeedSource, RawEntry)> {
        let source = registry
            .get(id.source_index)
            .ok_or(Error::SourceNotFound(id.source_index))?;

        let entries = self.fetch_source(source).await?;
        let entry_count = entries.len();

        let entry = entries
            .into_iter()
            .nth(id.entry_index)
            .ok_or_else(|| {
                tracing::debug!(
                    "Entry {} out of range for '{}' ({} entries)",
                    id,
                    source.name,
                    entry_count
                );
                Error::EntryNotFound(id.to_string())
            })?;

        Ok((source.clone(), entry))
    }

    /// Scan the first source for an entry whose link equals `url`
    pub async fn locate_by_url(&self, registry: &Registry, url: &str) -> Result<(FeedSource, RawEntry)> {
        let source = registry.get(0).ok_or(Error::SourceNotFound(0))?;

        let entry = self
            .fetch_source(source)
            .await?
            .into_iter()
            .find(|entry| entry.link.as_deref() == Some(url))
            .ok_or_else(|| Error::EntryNotFound(url.to_string()))?;

        Ok((source.clone(), entry))
    }

    async fn fetch_source(&self, source: &FeedSource) -> Result<Vec<RawEntry>> {
        fetch_with_timeout(self.fetcher.as_ref(), &source.url, self.timeout)
            .await
            .map_err(|e| {
                tracing::warn!("Detail fetch failed for '{}': {}", source.name, e);
                Error::Upstream {
                    source_name: source.name.clone(),
                    message: e.to_string(),
                }
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{entry_at, feed_url, registry, StubFeed, StubFetcher};

    fn locator(fetcher: StubFetcher) -> Locator {
        Locator::new(Arc::new(fetcher), Duration::from_secs(10))
    }

    #[test]
    fn test_parse_composite_id() {
        assert_eq!("3-7".parse::<CompositeArticleId>().unwrap(), CompositeArticleId::new(3, 7));
        assert_eq!("0-0".parse::<CompositeArticleId>().unwrap().to_string(), "0-0");
    }

    #[test]
    fn test_malformed_ids() {
        for bad in ["abc", "1", "", "1-", "-1", "1-2-3", "1--2", "-1-2", "+1-2", "1 -2", "a-2", "1-b"] {
            assert!(
                matches!(bad.parse::<CompositeArticleId>(), Err(Error::MalformedId(_))),
                "{bad:?} should be malformed"
            );
        }
    }

    #[test]
    fn test_article_ref_from_query() {
        assert_eq!(
            ArticleRef::from_query("?id=1-4").unwrap(),
            ArticleRef::ByComposite(CompositeArticleId::new(1, 4))
        );
        assert_eq!(
            ArticleRef::from_query("url=http%3A//example.com/1").unwrap(),
            ArticleRef::ByUrl("http://example.com/1".into())
        );
        assert!(matches!(ArticleRef::from_query("id=x"), Err(Error::MalformedId(_))));
        assert!(matches!(ArticleRef::from_query(""), Err(Error::MissingId)));
        assert!(matches!(ArticleRef::from_query("url="), Err(Error::MissingId)));
    }

    #[test]
    fn test_address_round_trip() {
        let by_id = ArticleRef::ByComposite(CompositeArticleId::new(2, 11));
        assert_eq!(by_id.address(), "/article?id=2-11");

        let by_url = ArticleRef::ByUrl("https://example.com/a?b=c&d=e f".into());
        let address = by_url.address();
        assert_eq!(address, "/article?url=https%3A//example.com/a%3Fb%3Dc%26d%3De%20f");
        let query = address.strip_prefix("/article").unwrap();
        assert_eq!(ArticleRef::from_query(query).unwrap(), by_url);
    }

    #[test]
    fn test_url_address_keeps_slashes_literal() {
        let by_url = ArticleRef::ByUrl("http://example.com/1".into());
        assert_eq!(by_url.address(), "/article?url=http%3A//example.com/1");
        assert_eq!(
            ArticleRef::from_query("url=http%3A//example.com/1").unwrap(),
            by_url
        );

        let plus = ArticleRef::ByUrl("https://example.com/a+b_c.d-e~f".into());
        assert_eq!(plus.address(), "/article?url=https%3A//example.com/a%2Bb_c.d-e~f");
        let query = plus.address().split_once('?').unwrap().1.to_string();
        assert_eq!(ArticleRef::from_query(&query).unwrap(), plus);
    }

    #[tokio::test]
    async fn test_locate_by_composite() {
        let fetcher = StubFetcher::new()
            .with(&feed_url(1), StubFeed::Entries(vec![entry_at("first", None), entry_at("second", None)]));

        let (source, entry) = locator(fetcher)
            .locate(&registry(2), &ArticleRef::ByComposite(CompositeArticleId::new(1, 1)))
            .await
            .unwrap();

        assert_eq!(source.name, "Feed1");
        assert_eq!(entry.title, "second");
    }

    #[tokio::test]
    async fn test_source_out_of_range_is_not_fetched() {
        let fetcher = Arc::new(StubFetcher::new());
        let locator = Locator::new(fetcher.clone(), Duration::from_secs(10));

        let result = locator
            .locate_by_composite(&registry(2), "3-7".parse().unwrap())
            .await;

        assert!(matches!(result, Err(Error::SourceNotFound(3))));
        assert_eq!(fetcher.calls(), 0);
    }

    #[tokio::test]
    async fn test_entry_out_of_range() {
        let fetcher = StubFetcher::new()
            .with(&feed_url(0), StubFeed::Entries(vec![entry_at("only", None)]));

        let result = locator(fetcher)
            .locate_by_composite(&registry(1), CompositeArticleId::new(0, 1))
            .await;

        assert!(matches!(result, Err(Error::EntryNotFound(ref id)) if id == "0-1"));
    }

    #[tokio::test]
    async fn test_fetch_failure_is_upstream() {
        let fetcher = StubFetcher::new().with(&feed_url(0), StubFeed::Fail);

        let result = locator(fetcher)
            .locate_by_composite(&registry(1), CompositeArticleId::new(0, 0))
            .await;

        assert!(matches!(result, Err(Error::Upstream { ref source_name, .. }) if source_name == "Feed0"));
    }

    #[tokio::test]
    async fn test_locate_by_url() {
        let fetcher = Arc::new(
            StubFetcher::new()
                .with(&feed_url(0), StubFeed::Entries(vec![entry_at("a", None), entry_at("b", None)])),
        );
        let locator = Locator::new(fetcher.clone(), Duration::from_secs(10));

        let (_, entry) = locator
            .locate_by_url(&registry(1), "https://example.com/b")
            .await
            .unwrap();
        assert_eq!(entry.title, "b");

        let missing = locator.locate_by_url(&registry(1), "https://example.com/zzz").await;
        assert!(matches!(missing, Err(Error::EntryNotFound(_))));
        assert_eq!(fetcher.calls(), 2);
    }
}
