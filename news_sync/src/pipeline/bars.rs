use chrono::{Days, NaiveDate};
use market_data_ingestor::providers::BarProvider;
use serde::Serialize;
use tracing::{error, info, instrument, warn};

use crate::store::{BarStore, InsertOutcome};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BarSyncReport {
    /// Latest bar dropped for a refetch.
    pub refetched_from: Option<NaiveDate>,
    pub inserted: usize,
    pub duplicates: usize,
    /// Dates with no usable bar (non-trading days, upstream gaps).
    pub missing: usize,
}

/// Backfill daily bars up to, not including, `today`.
///
/// The latest stored bar is deleted first so late settlement corrections are
/// picked up. An empty store starts at `start_date`.
#[instrument(skip(store, provider))]
pub async fn sync_bars<P>(
    store: &mut BarStore,
    provider: &P,
    symbol: &str,
    start_date: NaiveDate,
    today: NaiveDate,
) -> anyhow::Result<BarSyncReport>
where
    P: BarProvider + Sync + ?Sized,
{
    let mut report = BarSyncReport {
        refetched_from: store.delete_latest()?,
        ..Default::default()
    };
    if let Some(d) = report.refetched_from {
        info!(trade_date = %d, "latest bar removed for refetch");
    }

    let mut date = match store.max_trade_date()? {
        Some(max) => max.checked_add_days(Days::new(1)).unwrap_or(max),
        None => start_date,
    };

    while date < today {
        if store.bar_exists(date)? {
            date = next_day(date);
            continue;
        }
        match provider.fetch_daily_bar(date, symbol).await {
            Ok(Some(bar)) => match store.insert_bar(&bar)? {
                InsertOutcome::Inserted => {
                    info!(%date, sec_id = %bar.sec_id, close = bar.close, "bar stored");
                    report.inserted += 1;
                }
                InsertOutcome::Duplicate => report.duplicates += 1,
            },
            Ok(None) => report.missing += 1,
            Err(e) => {
                error!(%date, error = %e, "bar fetch failed");
                report.missing += 1;
            }
        }
        date = next_day(date);
    }

    if let Err(e) = store.compact() {
        warn!(error = %e, "bar store compaction failed");
    }
    info!(?report, "bar sync done");
    Ok(report)
}

fn next_day(d: NaiveDate) -> NaiveDate {
    d.succ_opt().unwrap_or(NaiveDate::MAX)
}
