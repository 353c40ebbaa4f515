mod fetcher;
mod models;
mod parser;
mod registry;

pub use fetcher::{FeedFetcher, FetchFeed};
pub use models::{ContentVariant, FeedSource, RawEntry};
pub use parser::parse_feed;
pub use registry::Registry;
