//! Collapse repeated captures of one headline into a single canonical record.
//!
//! The dedup key is `(calendar day of timestamp, exact title)`. Within a key the
//! record with the earliest timestamp survives; among equal timestamps the lowest
//! row id (first inserted) wins. A title repeated on two different days is two
//! separate items.
//!
//! [`purge`] is the canonical path and runs against the store after insertion.
//! [`prefilter`] is an optional pre-insert shortcut; both leave the same rows.
//! [`dedup_records`] is the in-memory form of the purge.

use std::collections::{HashMap, HashSet};

use chrono::{NaiveDate, NaiveDateTime};
use diesel::{
    QueryDsl, QueryableByName, RunQueryDsl, sql_query,
    sql_types::{BigInt, Text},
};
use market_data_ingestor::models::news::{NewsKey, NewsRecord};
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::{
    models::parse_date,
    schema::news::dsl as n,
    store::{NewsStore, StoreError},
};

const PURGE_SQL: &str = "\
DELETE FROM news
WHERE id NOT IN (
    SELECT id FROM (
        SELECT id,
               ROW_NUMBER() OVER (
                   PARTITION BY DATE(date), title
                   ORDER BY date ASC, id ASC
               ) AS rn
        FROM news
    )
    WHERE rn = 1
);";

const DUPLICATES_SQL: &str = "\
SELECT DATE(date) AS day, title, COUNT(*) AS copies
FROM news
GROUP BY DATE(date), title
HAVING COUNT(*) > 1
ORDER BY day ASC, title ASC;";

/// Outcome of a [`purge`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PurgeReport {
    pub rows_before: i64,
    pub deleted: usize,
    /// `false` when the follow-up `VACUUM` failed. The deletes stay committed.
    pub compacted: bool,
}

/// One `(day, title)` key stored more than once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DuplicateGroup {
    pub day: NaiveDate,
    pub title: String,
    pub copies: i64,
}

#[derive(QueryableByName)]
struct DuplicateRow {
    #[diesel(sql_type = Text)]
    day: String,
    #[diesel(sql_type = Text)]
    title: String,
    #[diesel(sql_type = BigInt)]
    copies: i64,
}

/// Delete every non-canonical row, then compact the store.
///
/// The delete runs in an immediate transaction. Compaction runs afterwards on
/// its own; its failure is logged and reported, never rolled into the delete.
pub fn purge(store: &mut NewsStore) -> Result<PurgeReport, StoreError> {
    purge_with(store, NewsStore::compact)
}

/// [`purge`] with a caller-supplied compaction step.
#[instrument(skip_all)]
pub fn purge_with<C>(store: &mut NewsStore, compact: C) -> Result<PurgeReport, StoreError>
where
    C: FnOnce(&mut NewsStore) -> Result<(), StoreError>,
{
    let (rows_before, deleted) = store.connection().immediate_transaction(|conn| {
        let before: i64 = n::news.count().get_result(conn)?;
        let deleted = sql_query(PURGE_SQL).execute(conn)?;
        Ok::<_, StoreError>((before, deleted))
    })?;

    let compacted = match compact(store) {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, "compaction failed, deletes kept");
            false
        }
    };

    info!(rows_before, deleted, compacted, "duplicate purge done");
    Ok(PurgeReport {
        rows_before,
        deleted,
        compacted,
    })
}

/// Every key stored more than once, with its row count. Read-only.
pub fn find_duplicates(store: &mut NewsStore) -> Result<Vec<DuplicateGroup>, StoreError> {
    let rows: Vec<DuplicateRow> = sql_query(DUPLICATES_SQL).load(store.connection())?;
    rows.into_iter()
        .map(|r| {
            Ok(DuplicateGroup {
                day: parse_date("news.date", &r.day)?,
                title: r.title,
                copies: r.copies,
            })
        })
        .collect()
}

fn by_time_then_title(a: &NewsRecord, b: &NewsRecord) -> std::cmp::Ordering {
    a.timestamp
        .cmp(&b.timestamp)
        .then_with(|| a.title.cmp(&b.title))
}

/// In-memory purge: earliest record per key, ordered by `(timestamp, title)`.
///
/// Ties on the timestamp keep the record that came first in the input, which
/// mirrors the lowest-id rule of [`purge`] when fed rows in insertion order.
pub fn dedup_records<I>(records: I) -> Vec<NewsRecord>
where
    I: IntoIterator<Item = NewsRecord>,
{
    let mut best: HashMap<NewsKey, NewsRecord> = HashMap::new();
    for rec in records {
        match best.get(&rec.key()) {
            Some(kept) if kept.timestamp <= rec.timestamp => {}
            _ => {
                best.insert(rec.key(), rec);
            }
        }
    }
    let mut out: Vec<NewsRecord> = best.into_values().collect();
    out.sort_by(by_time_then_title);
    out
}

/// Drop incoming records already covered by a stored capture, then collapse the batch.
///
/// `existing` maps each stored key to its earliest timestamp, normally from
/// [`NewsStore::keys_since`] over a short lookback. An incoming record is
/// dropped only when it is not earlier than the stored one, so a late poll
/// that saw an item sooner still gets in and the purge keeps it. Keys older
/// than the lookback are not seen here and are left to [`purge`].
pub fn prefilter(
    incoming: Vec<NewsRecord>,
    existing: &HashMap<NewsKey, NaiveDateTime>,
) -> Vec<NewsRecord> {
    let mut fresh: Vec<NewsRecord> = incoming
        .into_iter()
        .filter(|r| {
            existing
                .get(&r.key())
                .is_none_or(|stored| r.timestamp < *stored)
        })
        .collect();

    // sort-and-keep-first on (title, timestamp)
    fresh.sort_by(|a, b| {
        a.title
            .cmp(&b.title)
            .then_with(|| a.timestamp.cmp(&b.timestamp))
    });
    let mut seen: HashSet<NewsKey> = HashSet::new();
    fresh.retain(|r| seen.insert(r.key()));
    fresh.sort_by(by_time_then_title);
    fresh
}
