pub mod aggregate;
pub mod config;
pub mod content;
pub mod error;
pub mod feed;
pub mod filter;
pub mod locate;
pub mod toggle;
pub mod view;

#[cfg(test)]
mod testing;

pub use aggregate::{Aggregator, Article};
pub use config::{AddressingMode, AppConfig};
pub use error::{Error, Result};
pub use filter::{EntryFilter, ListQuery};
pub use locate::{ArticleRef, CompositeArticleId, Locator};
pub use toggle::ToggleState;
pub use view::{ArticleDetail, ListView, Newsdesk, View};
