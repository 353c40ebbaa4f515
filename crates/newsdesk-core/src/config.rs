use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
    #[serde(default)]
    pub view: ViewConfig,
    /// Feed sources, in registry order
    #[serde(default = "default_feeds")]
    pub feeds: Vec<FeedConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            general: GeneralConfig::default(),
            fetch: FetchConfig::default(),
            view: ViewConfig::default(),
            feeds: default_feeds(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    /// Per-feed request timeout in seconds
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
    /// Maximum number of feeds fetched at once
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    /// HTTP proxy URL for feed fetching (e.g., "http://127.0.0.1:7890" or "socks5://127.0.0.1:1080")
    #[serde(default)]
    pub proxy_url: Option<String>,
    /// Fixed User-Agent; a browser-like one is used when unset
    #[serde(default)]
    pub user_agent: Option<String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            request_timeout_secs: default_timeout(),
            concurrency: default_concurrency(),
            proxy_url: None,
            user_agent: None,
        }
    }
}

/// How detail links identify an article
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressingMode {
    /// `/article?id=<source>-<entry>`, works with any number of feeds
    #[default]
    Composite,
    /// `/article?url=<link>`, single-feed configurations only
    Url,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewConfig {
    #[serde(default)]
    pub addressing: AddressingMode,
    /// Size of the recent-entries window shown in the list view
    #[serde(default = "default_max_articles")]
    pub max_articles: usize,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            addressing: AddressingMode::default(),
            max_articles: default_max_articles(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedConfig {
    pub name: String,
    pub url: String,
}

impl FeedConfig {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_timeout() -> u64 {
    10
}

fn default_concurrency() -> usize {
    8
}

fn default_max_articles() -> usize {
    100
}

fn default_feeds() -> Vec<FeedConfig> {
    vec![
        FeedConfig::new("BBC", "https://feeds.bbci.co.uk/news/rss.xml"),
        FeedConfig::new("Ars Technica", "https://feeds.arstechnica.com/arstechnica/index"),
        FeedConfig::new("Hacker News", "https://hnrss.org/frontpage"),
    ]
}

impl AppConfig {
    /// Load configuration from the default location or return defaults
    pub fn load() -> crate::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from `path`, falling back to defaults when it does not exist
    pub fn load_from(path: &Path) -> crate::Result<Self> {
        let config = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::from_toml(&content)?
        } else {
            tracing::debug!("No config at {}, using defaults", path.display());
            Self::default()
        };

        config.validate()?;
        Ok(config)
    }

    pub fn from_toml(content: &str) -> crate::Result<Self> {
        toml::from_str(content).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Reject configurations the aggregator cannot serve
    pub fn validate(&self) -> crate::Result<()> {
        if self.feeds.is_empty() {
            return Err(crate::Error::Config("no feeds configured".into()));
        }
        if self.view.addressing == AddressingMode::Url && self.feeds.len() != 1 {
            return Err(crate::Error::Config(format!(
                "url addressing requires exactly one feed, {} configured",
                self.feeds.len()
            )));
        }
        if self.fetch.request_timeout_secs == 0 {
            return Err(crate::Error::Config("request_timeout_secs must be positive".into()));
        }
        if self.fetch.concurrency == 0 {
            return Err(crate::Error::Config("concurrency must be positive".into()));
        }
        if let Some(feed) = self.feeds.iter().find(|f| f.url.trim().is_empty()) {
            return Err(crate::Error::Config(format!("feed '{}' has an empty url", feed.name)));
        }
        Ok(())
    }

    /// Get the configuration file path
    /// Always uses ~/.config/newsdesk/config.toml on all platforms
    pub fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join("newsdesk")
            .join("config.toml")
    }
}
