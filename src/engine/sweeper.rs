/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 18/10/26
******************************************************************************/

//! Periodic background maintenance.

use super::RegistrationEngine;
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

impl RegistrationEngine {
    /// Spawns a task that calls [`run_maintenance`](Self::run_maintenance)
    /// every `sweep_interval_secs`, starting immediately.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn spawn_sweeper(self: &Arc<Self>) -> SweeperHandle {
        let engine = Arc::clone(self);
        let period = engine.config.sweep_interval();
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();

        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            info!(period_secs = period.as_secs(), "sweeper started");

            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    _ = interval.tick() => {
                        let report = engine.run_maintenance();
                        if !report.is_empty() {
                            debug!(
                                expired = report.expired.len(),
                                promoted = report.promoted.len(),
                                "sweeper tick"
                            );
                        }
                    }
                }
            }

            info!("sweeper stopped");
        });

        SweeperHandle {
            shutdown: Some(shutdown_tx),
            handle,
        }
    }
}

/// Handle to a spawned sweeper task.
///
/// Dropping the handle also stops the task at its next wake-up.
#[derive(Debug)]
pub struct SweeperHandle {
    shutdown: Option<oneshot::Sender<()>>,
    handle: tokio::task::JoinHandle<()>,
}

impl SweeperHandle {
    /// Signals the sweeper to stop and waits for it to finish.
    pub async fn shutdown(mut self) -> Result<(), tokio::task::JoinError> {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        self.handle.await
    }

    /// Waits for the sweeper task to end without signalling it.
    ///
    /// The task only ends on shutdown or panic, so this mostly serves to
    /// surface a panic as a [`JoinError`](tokio::task::JoinError).
    pub async fn wait(self) -> Result<(), tokio::task::JoinError> {
        self.handle.await
    }

    /// Returns `true` once the task has ended.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}
