//! Concurrent collection over many feeds.

use futures::future::join_all;
use tracing::{info, warn};

use crate::{models::news::NewsRecord, providers::FeedSource};

/// Fetch every feed in `urls` concurrently and merge the results.
///
/// A feed that fails contributes nothing; the failure is logged and the rest
/// proceed. Output is ordered by `(timestamp, title)`.
pub async fn collect_feeds<S>(source: &S, urls: &[String]) -> Vec<NewsRecord>
where
    S: FeedSource + Sync + ?Sized,
{
    let fetches = urls.iter().map(|url| async move {
        match source.fetch_feed(url).await {
            Ok(recs) => recs,
            Err(e) => {
                warn!(%url, error = %e, "feed skipped");
                Vec::new()
            }
        }
    });

    let mut all: Vec<NewsRecord> = join_all(fetches).await.into_iter().flatten().collect();
    all.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then_with(|| a.title.cmp(&b.title)));
    info!(feeds = urls.len(), records = all.len(), "feeds collected");
    all
}
