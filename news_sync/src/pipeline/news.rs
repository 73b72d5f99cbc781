use chrono::{Days, NaiveDate};
use market_data_ingestor::{feeds::collect_feeds, providers::FeedSource};
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::{
    dedup::{self, PurgeReport, prefilter},
    store::NewsStore,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewsCollectReport {
    pub feeds: usize,
    pub fetched: usize,
    /// Records dropped by the pre-insert filter.
    pub prefiltered: usize,
    pub inserted: usize,
    pub purge: PurgeReport,
}

/// Discover feeds, fetch them all, store the records and purge duplicates.
///
/// With `lookback_days` set, keys already stored since `today - lookback_days`
/// are dropped before inserting.
#[instrument(skip(store, source))]
pub async fn collect_news<S>(
    store: &mut NewsStore,
    source: &S,
    portal_url: &str,
    lookback_days: Option<u32>,
    today: NaiveDate,
) -> anyhow::Result<NewsCollectReport>
where
    S: FeedSource + Sync + ?Sized,
{
    let urls = match source.list_feed_urls(portal_url).await {
        Ok(urls) => urls,
        Err(e) => {
            warn!(error = %e, "feed discovery failed");
            Vec::new()
        }
    };

    let records = collect_feeds(source, &urls).await;
    let fetched = records.len();

    let records = match lookback_days {
        Some(days) => {
            let since = today
                .checked_sub_days(Days::new(u64::from(days)))
                .unwrap_or(NaiveDate::MIN);
            let known = store.keys_since(since)?;
            prefilter(records, &known)
        }
        None => records,
    };
    let prefiltered = fetched - records.len();

    let inserted = store.insert_records(&records)?;
    let purge = dedup::purge(store)?;

    let report = NewsCollectReport {
        feeds: urls.len(),
        fetched,
        prefiltered,
        inserted,
        purge,
    };
    info!(?report, "news collection done");
    Ok(report)
}
