use std::sync::Arc;
use tokio::time::{interval, Duration};

use crate::{constants::PURGE_INTERVAL_SECS, AppState};

/// Removes posts soft-deleted longer than the retention window, once a day.
pub async fn start_purge_task(state: Arc<AppState>) {
    let mut interval = interval(Duration::from_secs(PURGE_INTERVAL_SECS));

    loop {
        interval.tick().await;

        match state.blog_handler.purge_soft_deleted_posts(state.post_retention_days).await {
            Ok(0) => tracing::debug!("No soft-deleted posts to purge"),
            Ok(count) => tracing::info!("Purged {} soft-deleted blog posts", count),
            Err(e) => tracing::error!("Purge failed: {}", e)
        }
    }
}
