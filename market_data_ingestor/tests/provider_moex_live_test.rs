#![cfg(test)]
use chrono::NaiveDate;
use market_data_ingestor::{
    providers::{
        BarProvider, FeedSource,
        investing_rss::{DEFAULT_PORTAL_URL, InvestingRssProvider},
        moex::{DEFAULT_BASE_URL, MoexProvider},
    },
    models::zone::Zone,
    requests::{HttpFetcher, RetryPolicy},
};

#[tokio::test]
#[ignore]
async fn test_moex_provider_fetch_daily_bar() {
    // Hits iss.moex.com. 2025-01-03 was a regular FORTS session.
    let fetcher = HttpFetcher::new(RetryPolicy::default()).expect("Failed to build fetcher");
    let provider = MoexProvider::new(fetcher, DEFAULT_BASE_URL);

    let date = NaiveDate::from_ymd_opt(2025, 1, 3).unwrap();
    let bar = provider
        .fetch_daily_bar(date, "RTS")
        .await
        .expect("fetch_daily_bar returned an error")
        .expect("Expected a bar for a trading day");

    assert_eq!(bar.trade_date, date);
    assert!(bar.sec_id.starts_with("RI"), "unexpected contract {}", bar.sec_id);
    assert!(bar.last_trade_date > date);
    assert!(bar.low <= bar.open && bar.open <= bar.high);
}

#[tokio::test]
#[ignore]
async fn test_investing_portal_lists_feeds() {
    let fetcher = HttpFetcher::new(RetryPolicy::default()).expect("Failed to build fetcher");
    let provider = InvestingRssProvider::new(fetcher, Zone::Gmt, Zone::Gmt);

    let urls = provider.list_feed_urls(DEFAULT_PORTAL_URL).await.unwrap();
    assert!(!urls.is_empty(), "Expected at least one news feed");
    assert!(urls.iter().all(|u| u.ends_with(".rss")));
}
