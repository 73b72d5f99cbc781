//! Feed discovery on the portal page.
//!
//! The portal lists its news feeds under a `<h2>Новости</h2>` heading; everything
//! up to the next `<h2>` belongs to that block. Only links ending in `.rss` count.

use std::sync::LazyLock;

use indexmap::IndexSet;
use regex::Regex;

pub const NEWS_HEADING: &str = "Новости";

static NEWS_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<h2[^>]*>\s*Новости\s*</h2>(.*?)(?:<h2|\z)").expect("static regex")
});

static RSS_HREF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)href\s*=\s*["']([^"']+?\.rss)["']"#).expect("static regex")
});

/// Feed URLs of the news block, in page order, without repeats.
///
/// `None` when the page has no news block at all.
pub fn extract_feed_urls(html: &str) -> Option<Vec<String>> {
    let block = NEWS_BLOCK.captures(html)?.get(1)?.as_str();
    let urls: IndexSet<String> = RSS_HREF
        .captures_iter(block)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .collect();
    Some(urls.into_iter().collect())
}
