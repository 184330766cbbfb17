use std::time::Duration;

use tokio::time::interval;

use crate::limiter::ClientRateLimiter;

const EVICTION_INTERVAL: Duration = Duration::from_secs(60);

/// Periodically forgets clients whose rate-limit window has long expired.
pub async fn start_limiter_eviction_task(limiter: ClientRateLimiter, idle_ttl: Duration) {
    let mut interval = interval(EVICTION_INTERVAL);

    loop {
        interval.tick().await;

        let evicted = limiter.evict_idle(idle_ttl);
        if evicted > 0 {
            tracing::debug!(evicted, remaining = limiter.tracked_clients(), "Evicted idle rate-limit entries");
        }
    }
}
