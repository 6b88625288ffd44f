//! Background task that evicts stale sessions on a timer.

use crate::manager::SessionManager;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, instrument, warn};

/// Handle to a running sweep loop.
#[derive(Debug)]
pub struct Sweeper {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<usize>,
}

impl Sweeper {
    /// Spawns a task that sweeps sessions older than `ttl` every `interval`.
    ///
    /// The first sweep runs one `interval` after spawning. Must be called
    /// from within a tokio runtime.
    #[instrument(skip(manager))]
    pub fn spawn(manager: SessionManager, ttl: Duration, interval: Duration) -> Self {
        let (shutdown, mut stop) = watch::channel(false);
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + interval, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut total = 0;
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let evicted = manager.sweep(ttl);
                        total += evicted;
                        debug!(evicted, total, "Sweep tick");
                    }
                    changed = stop.changed() => {
                        if changed.is_err() || *stop.borrow() {
                            break;
                        }
                    }
                }
            }
            info!(total, "Sweeper stopped");
            total
        });
        info!("Sweeper started");
        Self { shutdown, handle }
    }

    /// Signals the loop to stop and waits for it. Returns the total number
    /// of sessions evicted while it ran.
    #[instrument(skip(self))]
    pub async fn shutdown(self) -> usize {
        if self.shutdown.send(true).is_err() {
            debug!("Sweeper already gone");
        }
        match self.handle.await {
            Ok(total) => total,
            Err(e) => {
                warn!(error = %e, "Sweeper task failed");
                0
            }
        }
    }
}
