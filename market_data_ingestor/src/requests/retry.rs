use std::{fmt::Display, future::Future, time::Duration};

use serde::{Deserialize, Serialize};
use tracing::{error, warn};

/// Fixed retry count and per-attempt timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub timeout: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            timeout: Duration::from_secs(5),
        }
    }
}

impl RetryPolicy {
    pub fn new(attempts: u32, timeout: Duration) -> Self {
        Self {
            attempts: attempts.max(1),
            timeout,
        }
    }
}

/// Run `op` until it succeeds or the policy is exhausted.
///
/// Each failure is logged with its attempt number. Exhaustion is logged once at
/// error level and turns into `None`.
pub async fn with_retries<T, E, F, Fut>(policy: &RetryPolicy, what: &str, mut op: F) -> Option<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let attempts = policy.attempts.max(1);
    for attempt in 1..=attempts {
        match op().await {
            Ok(v) => return Some(v),
            Err(e) => warn!(target: "market_data_ingestor::requests", %what, attempt, error = %e, "request failed"),
        }
    }
    error!(target: "market_data_ingestor::requests", %what, attempts, "giving up, no data");
    None
}
