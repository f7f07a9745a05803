//! Daily refresh at midnight UTC

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Days, NaiveTime, Utc};
use tokio::time::sleep;
use tracing::{error, info};

use crate::version::cache::CacheStore;
use crate::version::catalog::{RefreshSummary, SourceCatalog};

/// Time left until the next 00:00 UTC strictly after `now`
pub fn duration_until_next_midnight(now: DateTime<Utc>) -> Duration {
    let next = (now.date_naive() + Days::new(1))
        .and_time(NaiveTime::MIN)
        .and_utc();
    (next - now).to_std().unwrap_or(Duration::ZERO)
}

/// Refreshes every source, then drops expired cache entries
pub async fn run_scheduled_refresh(
    cache: &dyn CacheStore,
    catalog: &SourceCatalog,
) -> Vec<RefreshSummary> {
    let summaries = catalog.refresh_all(cache).await;

    match cache.purge_expired() {
        Ok(removed) => info!("Purged {} expired cache entries", removed),
        Err(e) => error!("Failed to purge expired cache entries: {}", e),
    }

    summaries
}

/// Runs [`run_scheduled_refresh`] every day at midnight UTC, forever
pub async fn run_daily(cache: Arc<dyn CacheStore>, catalog: Arc<SourceCatalog>) {
    loop {
        let wait = duration_until_next_midnight(Utc::now());
        info!("Next scheduled refresh in {}s", wait.as_secs());
        sleep(wait).await;

        info!("Starting scheduled refresh");
        run_scheduled_refresh(cache.as_ref(), &catalog).await;
    }
}
