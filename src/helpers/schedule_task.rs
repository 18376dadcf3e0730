use std::sync::Arc;

use tokio::sync::Notify;
use tokio::time::{sleep, Duration};
use tracing::{debug, warn};

use crate::helpers::splatoon::SplatoonStore;

const PRUNE_INTERVAL: Duration = Duration::from_secs(120);

/// Periodically drops ended rotation entries from the schedule document.
///
/// Cancellation is cooperative: the task only yields between full prune
/// passes, so a shutdown never interrupts a half-written document.
pub async fn schedule_prune_task(splatoon: SplatoonStore, shutdown: Arc<Notify>) {
    loop {
        tokio::select! {
            _ = shutdown.notified() => {
                debug!("schedule prune task shutting down");
                return;
            }
            _ = sleep(PRUNE_INTERVAL) => {
                match splatoon.prune_schedule().await {
                    Ok(0) => {}
                    Ok(dropped) => debug!(dropped, "pruned ended rotations"),
                    // keep the old data and try again next tick
                    Err(err) => warn!(error = %err, "schedule prune failed"),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn prune_task_stops_on_shutdown() {
        let pool = sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        let splatoon = SplatoonStore::new(pool);
        splatoon.create_tables().await.unwrap();

        let shutdown = Arc::new(Notify::new());
        let handle = tokio::spawn(schedule_prune_task(splatoon, shutdown.clone()));

        shutdown.notify_one();
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("task should exit promptly after shutdown")
            .unwrap();
    }
}
