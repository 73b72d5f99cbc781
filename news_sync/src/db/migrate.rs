//! Embedded migrations, one set per store.

use diesel::{Connection, SqliteConnection, connection::SimpleConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::debug;

use crate::store::StoreError;

pub const BARS_MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations/bars");
pub const NEWS_MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations/news");

fn run(url: &str, migrations: EmbeddedMigrations) -> Result<(), StoreError> {
    let mut conn = SqliteConnection::establish(url)?;
    conn.batch_execute("PRAGMA journal_mode=WAL;")?;
    let applied = conn
        .run_pending_migrations(migrations)
        .map_err(|e| StoreError::Migration(e.to_string()))?;
    debug!(url, applied = applied.len(), "migrations applied");
    Ok(())
}

/// Bring the bar store at `url` up to date.
pub fn run_bars(url: &str) -> Result<(), StoreError> {
    run(url, BARS_MIGRATIONS)
}

/// Bring the news store at `url` up to date.
pub fn run_news(url: &str) -> Result<(), StoreError> {
    run(url, NEWS_MIGRATIONS)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn migrations_apply_on_temp_file() {
        let temp = tempfile::NamedTempFile::new().unwrap();
        let path = temp.path().to_string_lossy().to_string();

        run_news(&path).expect("news migration run");
        run_news(&path).expect("second run is a no-op");

        let mut conn = SqliteConnection::establish(&path).unwrap();
        conn.batch_execute("INSERT INTO news (date, title) VALUES ('2025-01-02 10:00:00', 'x')")
            .unwrap();
    }

    #[test]
    fn bar_migrations_create_futures() {
        let temp = tempfile::NamedTempFile::new().unwrap();
        let path = temp.path().to_string_lossy().to_string();

        run_bars(&path).expect("bars migration run");
        let mut conn = SqliteConnection::establish(&path).unwrap();
        conn.batch_execute(
            "INSERT INTO futures VALUES ('2025-01-03','RIH5',1.0,1.0,1.0,1.0,'2025-03-20')",
        )
        .unwrap();
    }
}
