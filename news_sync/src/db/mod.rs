//! Database utilities for connections and schema migrations.
//!
//! - [`connection::connect_sqlite`] applies WAL and a 5000ms busy_timeout.
//! - [`migrate::run_bars`] / [`migrate::run_news`] apply the embedded migration set
//!   of each store. The two stores live in separate files and never share a schema.
//!
//! Example:
//! ```no_run
//! use news_sync::db::{connection, migrate};
//!
//! let db_path = std::env::temp_dir().join("news_example.db");
//! migrate::run_news(db_path.to_str().unwrap()).expect("migrations");
//! let _conn = connection::connect_sqlite(db_path.to_str().unwrap()).expect("connect");
//! ```

pub mod connection;
pub mod migrate;
