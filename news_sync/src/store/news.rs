use std::{collections::HashMap, path::Path};

use chrono::{NaiveDate, NaiveDateTime};
use diesel::{SqliteConnection, prelude::*};
use market_data_ingestor::models::news::{NewsKey, NewsRecord};
use tracing::debug;

use crate::{
    db::{connection, migrate},
    models::{NewNewsRow, NewsRow, format_timestamp, parse_timestamp},
    schema::news::dsl as n,
    store::StoreError,
};

/// Append-only headline store.
///
/// Timestamps are compared as text; [`format_timestamp`] keeps that order
/// chronological.
pub struct NewsStore {
    conn: SqliteConnection,
}

impl NewsStore {
    /// Migrate and open the store at `path`, creating the file if needed.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let url = path.to_string_lossy();
        migrate::run_news(&url)?;
        Ok(Self {
            conn: connection::connect_sqlite(&url)?,
        })
    }

    pub fn connection(&mut self) -> &mut SqliteConnection {
        &mut self.conn
    }

    /// Append `records` in one transaction. Duplicates are accepted here and
    /// collapsed later by the purge.
    pub fn insert_records(&mut self, records: &[NewsRecord]) -> Result<usize, StoreError> {
        if records.is_empty() {
            return Ok(0);
        }
        let rows: Vec<NewNewsRow<'_>> = records.iter().map(NewNewsRow::from).collect();
        let inserted = self.conn.transaction(|conn| {
            diesel::insert_into(n::news).values(&rows).execute(conn)
        })?;
        debug!(inserted, "news rows appended");
        Ok(inserted)
    }

    /// Records with `lower < timestamp < upper`, ordered by `(timestamp, title)`.
    pub fn news_between(
        &mut self,
        lower: NaiveDateTime,
        upper: NaiveDateTime,
    ) -> Result<Vec<NewsRecord>, StoreError> {
        n::news
            .filter(n::date.gt(format_timestamp(lower)))
            .filter(n::date.lt(format_timestamp(upper)))
            .order((n::date.asc(), n::title.asc(), n::id.asc()))
            .select(NewsRow::as_select())
            .load(&mut self.conn)?
            .into_iter()
            .map(NewsRecord::try_from)
            .collect()
    }

    /// Every stored row, ordered by id. Used by reports and tests.
    pub fn all_rows(&mut self) -> Result<Vec<NewsRow>, StoreError> {
        Ok(n::news
            .order(n::id.asc())
            .select(NewsRow::as_select())
            .load(&mut self.conn)?)
    }

    pub fn count(&mut self) -> Result<i64, StoreError> {
        Ok(n::news.count().get_result(&mut self.conn)?)
    }

    /// Earliest stored timestamp of every dedup key on or after `day`.
    pub fn keys_since(
        &mut self,
        day: NaiveDate,
    ) -> Result<HashMap<NewsKey, NaiveDateTime>, StoreError> {
        let floor = format_timestamp(day.and_time(chrono::NaiveTime::MIN));
        let rows: Vec<(String, String)> = n::news
            .filter(n::date.ge(floor))
            .select((n::date, n::title))
            .load(&mut self.conn)?;

        let mut keys: HashMap<NewsKey, NaiveDateTime> = HashMap::with_capacity(rows.len());
        for (date, title) in rows {
            let ts = parse_timestamp(&date)?;
            keys.entry(NewsKey {
                day: ts.date(),
                title,
            })
            .and_modify(|kept| *kept = (*kept).min(ts))
            .or_insert(ts);
        }
        Ok(keys)
    }

    pub fn compact(&mut self) -> Result<(), StoreError> {
        connection::compact(&mut self.conn)
    }
}
