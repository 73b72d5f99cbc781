use async_trait::async_trait;
use reqwest::Url;
use snafu::ResultExt;
use tracing::{info, warn};

use crate::{
    models::{news::NewsRecord, zone::Zone},
    providers::{
        FeedSource, MalformedFeedSnafu, ProviderError,
        investing_rss::{discover::extract_feed_urls, parse::parse_rss},
    },
    requests::HttpFetcher,
};

pub const DEFAULT_PORTAL_URL: &str = "https://ru.investing.com/webmaster-tools/rss";

/// investing.com feeds.
///
/// `feed_zone` is the zone naive `pubDate` values are written in; records come
/// out in `store_zone`.
pub struct InvestingRssProvider {
    fetcher: HttpFetcher,
    feed_zone: Zone,
    store_zone: Zone,
}

impl InvestingRssProvider {
    pub fn new(fetcher: HttpFetcher, feed_zone: Zone, store_zone: Zone) -> Self {
        Self {
            fetcher,
            feed_zone,
            store_zone,
        }
    }
}

/// Resolve a possibly relative `href` against the portal page.
fn absolutize(portal_url: &str, href: &str) -> Option<String> {
    let base = Url::parse(portal_url).ok()?;
    base.join(href).ok().map(String::from)
}

#[async_trait]
impl FeedSource for InvestingRssProvider {
    async fn list_feed_urls(&self, portal_url: &str) -> Result<Vec<String>, ProviderError> {
        let Some(html) = self.fetcher.get_text(portal_url).await else {
            warn!(%portal_url, "portal unreachable, no feeds");
            return Ok(Vec::new());
        };
        let Some(hrefs) = extract_feed_urls(&html) else {
            warn!(%portal_url, "no news block on portal page");
            return Ok(Vec::new());
        };
        let urls: Vec<String> = hrefs
            .iter()
            .filter_map(|h| absolutize(portal_url, h))
            .collect();
        info!(count = urls.len(), "discovered feeds");
        Ok(urls)
    }

    async fn fetch_feed(&self, url: &str) -> Result<Vec<NewsRecord>, ProviderError> {
        let Some(body) = self.fetcher.get_text(url).await else {
            return Ok(Vec::new());
        };
        parse_rss(&body, self.feed_zone, self.store_zone).context(MalformedFeedSnafu { url })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_links_resolve_against_portal() {
        let portal = "https://ru.investing.com/webmaster-tools/rss";
        assert_eq!(
            absolutize(portal, "/rss/news_1.rss").as_deref(),
            Some("https://ru.investing.com/rss/news_1.rss")
        );
        assert_eq!(
            absolutize(portal, "https://example.org/a.rss").as_deref(),
            Some("https://example.org/a.rss")
        );
        assert!(absolutize("not a url", "/a.rss").is_none());
    }
}
