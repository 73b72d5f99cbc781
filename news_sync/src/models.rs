//! Row types for the two stores and their conversion to domain models.
//!
//! Dates are stored as text: `YYYY-MM-DD` for bars and
//! [`TIMESTAMP_FORMAT`] for news, so ordering on the column is chronological.

use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use market_data_ingestor::models::{
    bar::Bar,
    news::{NewsRecord, TIMESTAMP_FORMAT},
};

use crate::{
    schema::{futures, news},
    store::StoreError,
};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn format_date(d: NaiveDate) -> String {
    d.format(DATE_FORMAT).to_string()
}

pub fn format_timestamp(ts: NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

pub(crate) fn parse_date(column: &'static str, raw: &str) -> Result<NaiveDate, StoreError> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| StoreError::Corrupt {
        column,
        value: raw.to_string(),
    })
}

pub(crate) fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, StoreError> {
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT).map_err(|_| StoreError::Corrupt {
        column: "news.date",
        value: raw.to_string(),
    })
}

#[derive(Debug, Queryable, Selectable, Insertable)]
#[diesel(table_name = futures)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct BarRow {
    pub trade_date: String,
    pub sec_id: String,
    pub open: f64,
    pub low: f64,
    pub high: f64,
    pub close: f64,
    pub last_trade_date: String,
}

impl From<&Bar> for BarRow {
    fn from(b: &Bar) -> Self {
        Self {
            trade_date: format_date(b.trade_date),
            sec_id: b.sec_id.clone(),
            open: b.open,
            low: b.low,
            high: b.high,
            close: b.close,
            last_trade_date: format_date(b.last_trade_date),
        }
    }
}

impl TryFrom<BarRow> for Bar {
    type Error = StoreError;

    fn try_from(r: BarRow) -> Result<Self, Self::Error> {
        Ok(Bar {
            trade_date: parse_date("futures.trade_date", &r.trade_date)?,
            sec_id: r.sec_id,
            open: r.open,
            low: r.low,
            high: r.high,
            close: r.close,
            last_trade_date: parse_date("futures.last_trade_date", &r.last_trade_date)?,
        })
    }
}

#[derive(Debug, Insertable)]
#[diesel(table_name = news)]
pub struct NewNewsRow<'a> {
    pub date: String,
    pub section: &'a str,
    pub title: &'a str,
}

impl<'a> From<&'a NewsRecord> for NewNewsRow<'a> {
    fn from(r: &'a NewsRecord) -> Self {
        Self {
            date: format_timestamp(r.timestamp),
            section: &r.section,
            title: &r.title,
        }
    }
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = news)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct NewsRow {
    pub id: i32,
    pub date: String,
    pub section: String,
    pub title: String,
}

impl TryFrom<NewsRow> for NewsRecord {
    type Error = StoreError;

    fn try_from(r: NewsRow) -> Result<Self, Self::Error> {
        Ok(NewsRecord {
            timestamp: parse_timestamp(&r.date)?,
            section: r.section,
            title: r.title,
            link: String::new(),
        })
    }
}
