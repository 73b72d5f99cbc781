//! Outbound HTTP with a bounded, fixed retry policy.
//!
//! Every URL gets at most [`RetryPolicy::attempts`] tries, each limited by
//! [`RetryPolicy::timeout`]. There is no backoff between tries. When all tries
//! fail the caller receives `None` ("no data for this unit") and moves on; a
//! single bad URL never aborts a run.

pub mod http;
pub mod retry;

pub use http::HttpFetcher;
pub use retry::{RetryPolicy, with_retries};
