use std::time::Duration;

use tokio::time;

use crate::services::price_poll;
use crate::AppState;

/// Optional in-process scheduler. Most deployments point an external cron at
/// `/cron/check-prices` instead; this exists for setups without one.
/// Overlapping runs are not excluded here.
pub fn spawn_price_poll(state: AppState) {
    let every = state.settings.poll_interval_secs;
    if every == 0 {
        return;
    }

    tokio::spawn(async move {
        let mut interval = time::interval(Duration::from_secs(every));

        loop {
            interval.tick().await;

            match price_poll::run_price_check(&state).await {
                Ok(summary) => tracing::info!(
                    "[price-poll] checked={} updated={} notifications={}",
                    summary.checked,
                    summary.updated,
                    summary.notifications
                ),
                Err(e) => tracing::error!("[price-poll] run failed: {e}"),
            }
        }
    });
}
