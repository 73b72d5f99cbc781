//! Storage, alignment and export of news headlines against daily futures bars.
//!
//! Data flow: [`store::NewsStore`] + [`store::BarStore`] -> [`dedup`] (purge on
//! the news store) -> [`align`] (bars joined to news windows) -> [`export`]
//! (one artifact per window). [`pipeline`] wires these to the network
//! collaborators of `market_data_ingestor`.

pub mod align;
pub mod config;
pub mod context;
pub mod db;
pub mod dedup;
pub mod export;
pub mod models;
pub mod pipeline;
pub mod schema;
pub mod store;
pub mod telemetry;
