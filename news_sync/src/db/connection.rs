//! SQLite connection helpers.

use diesel::{Connection, SqliteConnection, connection::SimpleConnection};

use crate::store::StoreError;

/// Open a SQLite connection and apply connection-wide PRAGMAs.
pub fn connect_sqlite(database_url: &str) -> Result<SqliteConnection, StoreError> {
    let mut conn = SqliteConnection::establish(database_url)?;

    // single writer, but readers should not block on it
    conn.batch_execute("PRAGMA journal_mode=WAL;")?;
    conn.batch_execute("PRAGMA busy_timeout=5000;")?;
    Ok(conn)
}

/// Reclaim space left by deleted rows.
///
/// `VACUUM` cannot run inside a transaction, so this must be called after any
/// destructive transaction has committed.
pub fn compact(conn: &mut SqliteConnection) -> Result<(), StoreError> {
    conn.batch_execute("VACUUM;")?;
    Ok(())
}
