//! Scheduled cleanup of expired rate limit windows.

use std::time::Duration;

use gatehouse_application::RateLimitService;
use gatehouse_core::{AppError, AppResult};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

/// Background task that calls [`RateLimitService::cleanup`] on a fixed
/// interval until it is shut down.
///
/// The sweep only bounds memory held by windows that are never retried or
/// reset. Admission decisions do not depend on it.
pub struct RateLimitSweeper {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl RateLimitSweeper {
    /// Starts sweeping every `interval` on the current Tokio runtime.
    ///
    /// The first sweep happens one full interval after start. Dropping the
    /// returned value also stops the task.
    pub fn spawn(service: RateLimitService, interval: Duration) -> AppResult<Self> {
        if interval.is_zero() {
            return Err(AppError::Validation(
                "rate limit cleanup interval must be greater than zero".to_owned(),
            ));
        }

        let (shutdown, mut shutdown_requested) = watch::channel(false);
        let task = tokio::spawn(async move {
            let first_tick = tokio::time::Instant::now() + interval;
            let mut ticker = tokio::time::interval_at(first_tick, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            info!(
                interval_ms = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX),
                "rate limit sweeper started"
            );

            loop {
                tokio::select! {
                    _ = ticker.tick() => sweep_once(&service),
                    changed = shutdown_requested.changed() => {
                        if changed.is_err() || *shutdown_requested.borrow() {
                            break;
                        }
                    }
                }
            }

            info!("rate limit sweeper stopped");
        });

        Ok(Self { shutdown, task })
    }

    /// Signals the task to stop and waits for it to finish.
    pub async fn shutdown(self) -> AppResult<()> {
        // The receiver is gone only if the task already exited.
        let _ = self.shutdown.send(true);
        self.task.await.map_err(|error| {
            AppError::Internal(format!("rate limit sweeper task failed: {error}"))
        })
    }
}

fn sweep_once(service: &RateLimitService) {
    match service.cleanup() {
        Ok(0) => {}
        Ok(removed) => debug!(removed, "removed expired rate limit windows"),
        Err(error) => warn!(error = %error, "failed to remove expired rate limit windows"),
    }
}
