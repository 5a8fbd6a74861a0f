use actix_web::web;
use chrono::Utc;
use tokio::time::{interval, Duration};

use crate::AppState;

/// Drops expired rate-limit hits and session revocations once an hour.
pub async fn start_prune_task(state: web::Data<AppState>) {
    let mut interval = interval(Duration::from_secs(60 * 60));

    loop {
        interval.tick().await;

        match state.contact_handler.rate_limiter.prune(Utc::now().timestamp()).await {
            Ok(count) => tracing::info!("Pruned {} expired rate limit hits", count),
            Err(e) => tracing::error!("Rate limit prune failed: {}", e)
        }

        let purged = state.admin_handler.sessions.purge_revoked();
        if purged > 0 {
            tracing::info!("Purged {} expired session revocations", purged);
        }
    }
}
