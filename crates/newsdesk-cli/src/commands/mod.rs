pub mod list;
pub mod open;
pub mod show;
pub mod sources;

use anyhow::Result;
use serde::Serialize;

use newsdesk_core::{ArticleDetail, ListView};

pub(crate) fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub(crate) fn print_list(view: &ListView) {
    if view.articles.is_empty() {
        println!("No articles.");
    }

    for article in &view.articles {
        println!("{}", article.display_title);
        println!("    {}  {}", article.published_display, article.detail_address);
    }

    println!("\nSources:");
    for toggle in &view.feed_toggles {
        let mark = if toggle.enabled { "x" } else { " " };
        println!("  [{}] {}  -> {}", mark, toggle.name, toggle.toggle_address);
    }
}

pub(crate) fn print_detail(detail: &ArticleDetail) {
    println!("{}", detail.title);
    println!("By {}", detail.author);
    if !detail.original_url.is_empty() {
        println!("{}", detail.original_url);
    }
    println!();
    println!("{}", detail.body);
}
