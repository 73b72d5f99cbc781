use std::path::Path;

use chrono::NaiveDate;
use diesel::{
    SqliteConnection,
    prelude::*,
    result::{DatabaseErrorKind, Error as DieselError},
};
use market_data_ingestor::models::bar::Bar;
use tracing::{debug, warn};

use crate::{
    db::{connection, migrate},
    models::{BarRow, format_date, parse_date},
    schema::futures::dsl as f,
    store::{InsertOutcome, StoreError},
};

/// Daily bars keyed by trade date.
pub struct BarStore {
    conn: SqliteConnection,
}

impl BarStore {
    /// Migrate and open the store at `path`, creating the file if needed.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let url = path.to_string_lossy();
        migrate::run_bars(&url)?;
        Ok(Self {
            conn: connection::connect_sqlite(&url)?,
        })
    }

    pub fn connection(&mut self) -> &mut SqliteConnection {
        &mut self.conn
    }

    pub fn insert_bar(&mut self, bar: &Bar) -> Result<InsertOutcome, StoreError> {
        let row = BarRow::from(bar);
        match diesel::insert_into(f::futures)
            .values(&row)
            .execute(&mut self.conn)
        {
            Ok(_) => {
                debug!(trade_date = %bar.trade_date, sec_id = %bar.sec_id, "bar inserted");
                Ok(InsertOutcome::Inserted)
            }
            Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
                warn!(trade_date = %bar.trade_date, "bar already stored, insert rejected");
                Ok(InsertOutcome::Duplicate)
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn bar_exists(&mut self, trade_date: NaiveDate) -> Result<bool, StoreError> {
        let n: i64 = f::futures
            .filter(f::trade_date.eq(format_date(trade_date)))
            .count()
            .get_result(&mut self.conn)?;
        Ok(n > 0)
    }

    pub fn max_trade_date(&mut self) -> Result<Option<NaiveDate>, StoreError> {
        let raw: Option<String> = f::futures
            .select(diesel::dsl::max(f::trade_date))
            .first(&mut self.conn)?;
        raw.map(|s| parse_date("futures.trade_date", &s)).transpose()
    }

    /// Delete the most recent bar so it can be fetched again after settlement
    /// corrections. Returns the trade date removed, if any.
    pub fn delete_latest(&mut self) -> Result<Option<NaiveDate>, StoreError> {
        let Some(latest) = self.max_trade_date()? else {
            return Ok(None);
        };
        diesel::delete(f::futures.filter(f::trade_date.eq(format_date(latest))))
            .execute(&mut self.conn)?;
        Ok(Some(latest))
    }

    /// All bars, ascending by trade date.
    pub fn load_bars(&mut self) -> Result<Vec<Bar>, StoreError> {
        f::futures
            .order(f::trade_date.asc())
            .select(BarRow::as_select())
            .load(&mut self.conn)?
            .into_iter()
            .map(Bar::try_from)
            .collect()
    }

    pub fn is_empty(&mut self) -> Result<bool, StoreError> {
        Ok(self.max_trade_date()?.is_none())
    }

    pub fn compact(&mut self) -> Result<(), StoreError> {
        connection::compact(&mut self.conn)
    }
}
