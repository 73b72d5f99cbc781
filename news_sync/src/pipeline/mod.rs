//! One function per CLI command, each taking its stores and collaborators
//! explicitly so tests can drive them with fakes.

pub mod bars;
pub mod export;
pub mod news;

pub use bars::{BarSyncReport, sync_bars};
pub use export::{ExportReport, ExportSettings, run_export};
pub use news::{NewsCollectReport, collect_news};
