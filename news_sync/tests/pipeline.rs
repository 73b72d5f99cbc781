mod common;

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;
use common::{bar, d, rec, setup_bars, setup_news};
use market_data_ingestor::models::{bar::Bar, news::NewsRecord};
use market_data_ingestor::providers::{
    BarProvider, FeedSource, ProviderError, UnexpectedResponseSnafu,
};
use news_sync::pipeline::{collect_news, sync_bars};

/// Trades on weekdays only; remembers every date asked for.
#[derive(Default)]
struct WeekdayBars {
    asked: Mutex<Vec<NaiveDate>>,
}

#[async_trait]
impl BarProvider for WeekdayBars {
    async fn fetch_daily_bar(
        &self,
        date: NaiveDate,
        _symbol: &str,
    ) -> Result<Option<Bar>, ProviderError> {
        use chrono::Datelike;
        self.asked.lock().unwrap().push(date);
        if date.weekday().number_from_monday() > 5 {
            return Ok(None);
        }
        Ok(Some(bar(date, 10.0, 11.0)))
    }
}

#[tokio::test]
async fn empty_store_backfills_from_start_date_to_yesterday() {
    let (_dir, mut store) = setup_bars();
    let provider = WeekdayBars::default();

    let report = sync_bars(&mut store, &provider, "RTS", d(2025, 1, 2), d(2025, 1, 7))
        .await
        .unwrap();

    assert_eq!(report.refetched_from, None);
    assert_eq!(report.inserted, 3); // 2nd, 3rd, 6th
    assert_eq!(report.missing, 2); // weekend
    let dates: Vec<_> = store.load_bars().unwrap().iter().map(|b| b.trade_date).collect();
    assert_eq!(dates, vec![d(2025, 1, 2), d(2025, 1, 3), d(2025, 1, 6)]);
    assert!(!provider.asked.lock().unwrap().contains(&d(2025, 1, 7)));
}

#[tokio::test]
async fn latest_bar_is_refetched() {
    let (_dir, mut store) = setup_bars();
    store.insert_bar(&bar(d(2025, 1, 2), 1.0, 1.0)).unwrap();
    store.insert_bar(&bar(d(2025, 1, 3), 1.0, 1.0)).unwrap();
    let provider = WeekdayBars::default();

    let report = sync_bars(&mut store, &provider, "RTS", d(2024, 1, 1), d(2025, 1, 4))
        .await
        .unwrap();

    assert_eq!(report.refetched_from, Some(d(2025, 1, 3)));
    assert_eq!(*provider.asked.lock().unwrap(), vec![d(2025, 1, 3)]);
    let latest = store.load_bars().unwrap().pop().unwrap();
    assert_eq!(latest.close, 11.0);
}

struct TwoFeeds;

#[async_trait]
impl FeedSource for TwoFeeds {
    async fn list_feed_urls(&self, _portal_url: &str) -> Result<Vec<String>, ProviderError> {
        Ok(vec!["markets".into(), "broken".into(), "commodities".into()])
    }

    async fn fetch_feed(&self, url: &str) -> Result<Vec<NewsRecord>, ProviderError> {
        match url {
            "markets" => Ok(vec![
                rec("2025-01-02 10:00:00", "Index up"),
                rec("2025-01-02 10:20:00", "Index up"),
            ]),
            "commodities" => Ok(vec![
                rec("2025-01-02 09:00:00", "Oil rises"),
                rec("2025-01-02 11:00:00", "Index up"),
            ]),
            _ => UnexpectedResponseSnafu {
                url,
                message: "not rss",
            }
            .fail(),
        }
    }
}

#[tokio::test]
async fn collection_survives_a_broken_feed_and_dedups() {
    let (_dir, mut store) = setup_news();
    let report = collect_news(&mut store, &TwoFeeds, "portal", None, d(2025, 1, 2))
        .await
        .unwrap();

    assert_eq!(report.feeds, 3);
    assert_eq!(report.fetched, 4);
    assert_eq!(report.inserted, 4);
    assert_eq!(report.purge.deleted, 2);

    let titles: HashSet<String> = store.all_rows().unwrap().into_iter().map(|r| r.title).collect();
    assert_eq!(titles, HashSet::from(["Index up".into(), "Oil rises".into()]));
}

#[tokio::test]
async fn prefilter_skips_known_items() {
    let (_dir, mut store) = setup_news();
    store.insert_records(&[rec("2025-01-02 08:00:00", "Oil rises")]).unwrap();

    let report = collect_news(&mut store, &TwoFeeds, "portal", Some(3), d(2025, 1, 2))
        .await
        .unwrap();

    // "Oil rises" is already stored; "Index up" collapses to one in the batch
    assert_eq!(report.prefiltered, 3);
    assert_eq!(report.inserted, 1);
    assert_eq!(report.purge.deleted, 0);
    assert_eq!(store.count().unwrap(), 2);
}
