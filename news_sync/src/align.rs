//! Join daily bars to the news published between their cutoffs.
//!
//! Each trading day is delimited by a fixed cutoff time-of-day. The window of
//! bar `i` is `(cutoff(bar[i-1]), cutoff(bar[i]))`, both ends exclusive, and is
//! labelled with bar `i`'s own direction.
//!
//! Pairs are scanned from the most recent backwards. The first window with no
//! news ends the scan: older windows are taken to be exported by earlier runs
//! and are not queried again.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use market_data_ingestor::models::{
    bar::{Bar, Direction},
    news::NewsRecord,
    zone::Zone,
};
use tracing::{debug, info};

use crate::store::{NewsStore, StoreError};

/// Read access to stored news, by exclusive time bounds.
pub trait NewsSource {
    fn news_between(
        &mut self,
        lower: NaiveDateTime,
        upper: NaiveDateTime,
    ) -> Result<Vec<NewsRecord>, StoreError>;
}

impl NewsSource for NewsStore {
    fn news_between(
        &mut self,
        lower: NaiveDateTime,
        upper: NaiveDateTime,
    ) -> Result<Vec<NewsRecord>, StoreError> {
        NewsStore::news_between(self, lower, upper)
    }
}

/// Where one trading day's news ends.
///
/// `time` is wall-clock in `zone`; boundaries come out in `store_zone`, the
/// zone stored timestamps are written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cutoff {
    pub time: NaiveTime,
    pub zone: Zone,
    pub store_zone: Zone,
}

impl Cutoff {
    pub fn new(time: NaiveTime, zone: Zone, store_zone: Zone) -> Self {
        Self {
            time,
            zone,
            store_zone,
        }
    }

    /// Cutoff instant of `day`, in the store zone.
    pub fn boundary(&self, day: NaiveDate) -> NaiveDateTime {
        self.zone.convert(day.and_time(self.time), self.store_zone)
    }
}

/// News of one closed trading day.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignedWindow {
    /// Trade date of the bar closing the window. Names the exported artifact.
    pub trade_date: NaiveDate,
    pub lower: NaiveDateTime,
    pub upper: NaiveDateTime,
    pub label: Direction,
    /// Ordered by `(timestamp, title, section)`.
    pub records: Vec<NewsRecord>,
}

fn sort_records(records: &mut [NewsRecord]) {
    records.sort_by(|a, b| {
        a.timestamp
            .cmp(&b.timestamp)
            .then_with(|| a.title.cmp(&b.title))
            .then_with(|| a.section.cmp(&b.section))
    });
}

/// Windows for `bars` (ascending by trade date), newest first.
///
/// Stops at the first empty window. A read failure aborts the whole scan.
pub fn align_windows<S>(
    bars: &[Bar],
    cutoff: &Cutoff,
    source: &mut S,
) -> Result<Vec<AlignedWindow>, StoreError>
where
    S: NewsSource + ?Sized,
{
    let mut out = Vec::new();
    for pair in bars.windows(2).rev() {
        let (prev, cur) = (&pair[0], &pair[1]);
        let lower = cutoff.boundary(prev.trade_date);
        let upper = cutoff.boundary(cur.trade_date);

        let mut records = source.news_between(lower, upper)?;
        if records.is_empty() {
            info!(trade_date = %cur.trade_date, %lower, %upper, "empty window, scan stopped");
            break;
        }
        sort_records(&mut records);
        debug!(trade_date = %cur.trade_date, news = records.len(), "window aligned");
        out.push(AlignedWindow {
            trade_date: cur.trade_date,
            lower,
            upper,
            label: cur.direction(),
            records,
        });
    }
    Ok(out)
}

/// News after the latest bar's cutoff and before `as_of` (store zone).
///
/// `None` when there are no bars to anchor the window.
pub fn current_window<S>(
    bars: &[Bar],
    cutoff: &Cutoff,
    as_of: NaiveDateTime,
    source: &mut S,
) -> Result<Option<Vec<NewsRecord>>, StoreError>
where
    S: NewsSource + ?Sized,
{
    let Some(last) = bars.last() else {
        return Ok(None);
    };
    let lower = cutoff.boundary(last.trade_date);
    if as_of <= lower {
        return Ok(Some(Vec::new()));
    }
    let mut records = source.news_between(lower, as_of)?;
    sort_records(&mut records);
    Ok(Some(records))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn moscow_cutoff_lands_three_hours_earlier_in_gmt() {
        let cutoff = Cutoff::new(
            NaiveTime::from_hms_opt(18, 45, 0).unwrap(),
            Zone::Moscow,
            Zone::Gmt,
        );
        let day = NaiveDate::from_ymd_opt(2025, 1, 3).unwrap();
        assert_eq!(cutoff.boundary(day), day.and_hms_opt(15, 45, 0).unwrap());
    }

    #[test]
    fn same_zone_cutoff_is_unchanged() {
        let cutoff = Cutoff::new(
            NaiveTime::from_hms_opt(15, 45, 0).unwrap(),
            Zone::Gmt,
            Zone::Gmt,
        );
        let day = NaiveDate::from_ymd_opt(2025, 1, 3).unwrap();
        assert_eq!(cutoff.boundary(day), day.and_hms_opt(15, 45, 0).unwrap());
    }
}
