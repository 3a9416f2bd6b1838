//! Background sweep of expired cache entries
//!
//! Expired entries are never served, so sweeping is not needed for
//! correctness; it only keeps the backing store from growing without bound.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::domain::Domain;
use super::read_through::ReadThroughCache;

/// Configuration for the sweep task
#[derive(Debug, Clone)]
pub struct SweepConfig {
    /// Time between sweeps
    pub interval: Duration,
    /// Domains to sweep
    pub domains: Vec<Domain>,
    /// Whether the sweep task runs at all
    pub enabled: bool,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(3600), // 1 hour
            domains: Domain::ALL.to_vec(),
            enabled: true,
        }
    }
}

/// Messages reported by the sweep task
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SweepMessage {
    /// A sweep finished and removed this many entries
    Swept(usize),
    /// A sweep failed
    SweepError(String),
}

/// Handle for controlling the background sweep
pub struct Housekeeper {
    /// Channel for receiving sweep reports
    pub receiver: mpsc::Receiver<SweepMessage>,
    shutdown_tx: mpsc::Sender<()>,
    task: Option<JoinHandle<()>>,
}

impl Housekeeper {
    /// Spawns the sweep task on the current tokio runtime
    ///
    /// The first sweep happens one full interval after spawning.
    pub fn spawn(cache: ReadThroughCache, config: SweepConfig) -> Self {
        let (msg_tx, msg_rx) = mpsc::channel(32);
        let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);

        let task = config.enabled.then(|| {
            tokio::spawn(async move {
                let mut interval = tokio::time::interval(config.interval);
                // Skip the first tick (immediate)
                interval.tick().await;

                loop {
                    tokio::select! {
                        _ = interval.tick() => {
                            let message = match cache.sweep(&config.domains).await {
                                Ok(removed) => {
                                    debug!(removed, "cache sweep finished");
                                    SweepMessage::Swept(removed)
                                }
                                Err(e) => {
                                    warn!(error = %e, "cache sweep failed");
                                    SweepMessage::SweepError(e.to_string())
                                }
                            };
                            // Nobody listening is fine
                            let _ = msg_tx.try_send(message);
                        }
                        _ = shutdown_rx.recv() => {
                            break;
                        }
                    }
                }
            })
        });

        Self {
            receiver: msg_rx,
            shutdown_tx,
            task,
        }
    }

    /// Returns the next report without blocking
    pub fn try_recv(&mut self) -> Option<SweepMessage> {
        self.receiver.try_recv().ok()
    }

    /// Stops the sweep task and waits for it to exit
    pub async fn shutdown(mut self) {
        let _ = self.shutdown_tx.send(()).await;
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}
