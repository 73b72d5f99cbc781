//! ISS JSON tables: `{"columns": [...], "data": [[...], ...]}`.

use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

use crate::models::bar::Bar;

/// Last trading date assumed for contracts whose description is unavailable.
pub fn far_future() -> NaiveDate {
    NaiveDate::from_ymd_opt(2130, 1, 1).unwrap_or(NaiveDate::MAX)
}

#[derive(Debug, Clone, Deserialize)]
pub struct IssTable {
    pub columns: Vec<String>,
    pub data: Vec<Vec<Value>>,
}

impl IssTable {
    /// Rows keyed by column name, in column order.
    pub fn rows(&self) -> Vec<IndexMap<&str, &Value>> {
        self.data
            .iter()
            .map(|r| {
                self.columns
                    .iter()
                    .map(String::as_str)
                    .zip(r.iter())
                    .collect()
            })
            .collect()
    }

    pub fn has_columns(&self, wanted: &[&str]) -> Result<(), String> {
        let missing: Vec<&str> = wanted
            .iter()
            .copied()
            .filter(|w| !self.columns.iter().any(|c| c == w))
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(format!("missing columns: {}", missing.join(", ")))
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct HistoryResponse {
    pub history: Option<IssTable>,
}

#[derive(Debug, Deserialize)]
pub struct SecurityResponse {
    pub description: Option<IssTable>,
}

pub const HISTORY_COLUMNS: [&str; 6] = ["TRADEDATE", "SECID", "OPEN", "LOW", "HIGH", "CLOSE"];

/// One complete history row: all four prices present.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryRow {
    pub trade_date: NaiveDate,
    pub sec_id: String,
    pub open: f64,
    pub low: f64,
    pub high: f64,
    pub close: f64,
}

impl HistoryRow {
    pub fn into_bar(self, last_trade_date: NaiveDate) -> Bar {
        Bar {
            trade_date: self.trade_date,
            sec_id: self.sec_id,
            open: self.open,
            low: self.low,
            high: self.high,
            close: self.close,
            last_trade_date,
        }
    }
}

/// Complete rows of a history table. Rows missing a price or with an
/// unparseable date are dropped.
pub fn history_rows(table: &IssTable) -> Vec<HistoryRow> {
    table
        .rows()
        .into_iter()
        .filter_map(|row| {
            let trade_date = row
                .get("TRADEDATE")
                .and_then(|v| v.as_str())
                .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())?;
            let sec_id = row.get("SECID").and_then(|v| v.as_str())?.to_string();
            let price = |k: &str| row.get(k).and_then(|v| v.as_f64());
            Some(HistoryRow {
                trade_date,
                sec_id,
                open: price("OPEN")?,
                low: price("LOW")?,
                high: price("HIGH")?,
                close: price("CLOSE")?,
            })
        })
        .collect()
}

/// Last trading date from a security description (`name`/`value` rows).
///
/// `LSTTRADE` wins over `LSTDELDATE`; a missing or unparseable value falls back
/// to [`far_future`].
pub fn last_trade_date(description: &IssTable) -> NaiveDate {
    let rows = description.rows();
    let value_of = |name: &str| {
        rows.iter()
            .find(|r| r.get("name").and_then(|v| v.as_str()) == Some(name))
            .and_then(|r| r.get("value").and_then(|v| v.as_str()))
            .map(str::to_string)
    };
    value_of("LSTTRADE")
        .or_else(|| value_of("LSTDELDATE"))
        .and_then(|s| NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok())
        .unwrap_or_else(far_future)
}
