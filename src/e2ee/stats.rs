use async_trait::async_trait;
use serde_derive::{Deserialize, Serialize};
use std::{sync::Arc, time::Duration};
use tokio::sync::{mpsc, watch};

/// Counts of encrypted vs total items in the local database.
///
/// Both counts start out absent and stay that way until the first
/// successful fetch.
#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncryptedItemsStats {
    pub encrypted: Option<u64>,
    pub total: Option<u64>,
}

/// Render the "Decrypted items" progress line shown on the
/// encryption configuration screen.
///
/// Counts that haven't been fetched yet show up as "-".
pub fn decrypted_stat_text(stats: &EncryptedItemsStats) -> String {
    let done = match (stats.encrypted, stats.total) {
        (Some(encrypted), Some(total)) => {
            total.saturating_sub(encrypted).to_string()
        },
        _ => String::from("-"),
    };
    let total = match stats.total {
        Some(total) => total.to_string(),
        None => String::from("-"),
    };

    format!("Decrypted items: {} / {}", done, total)
}

/// Read access to the local item database.
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Count encrypted and total items.
    async fn encrypted_items_stats(&self) -> anyhow::Result<EncryptedItemsStats>;
}

/// Default wait between two stats fetches.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);

/// Periodically re-fetches [`EncryptedItemsStats`] in the background.
///
/// Call [`StatsPoller::shutdown()`] (or drop the handle) to stop the
/// background task.
#[derive(Debug)]
pub struct StatsPoller {
    shutdown: mpsc::Sender<()>,
    stats: watch::Receiver<EncryptedItemsStats>,
}

impl StatsPoller {
    /// Spawn the polling task on the current runtime.
    pub fn start(store: Arc<dyn ItemStore>, interval: Duration) -> StatsPoller {
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);
        let (stats_tx, stats_rx) = watch::channel(EncryptedItemsStats::default());

        tokio::spawn(poll_loop(store, interval, stats_tx, shutdown_rx));

        StatsPoller {
            shutdown: shutdown_tx,
            stats: stats_rx,
        }
    }

    /// The most recently fetched stats.
    pub fn latest(&self) -> EncryptedItemsStats { *self.stats.borrow() }

    /// Wait for the next published value. `None` once the poller has
    /// stopped for good.
    pub async fn changed(&mut self) -> Option<EncryptedItemsStats> {
        self.stats.recv().await
    }

    /// Ask the background task to stop.
    pub fn shutdown(&mut self) {
        let _ = self.shutdown.try_send(());
    }
}

async fn poll_loop(
    store: Arc<dyn ItemStore>,
    interval: Duration,
    stats_tx: watch::Sender<EncryptedItemsStats>,
    mut shutdown: mpsc::Receiver<()>,
) {
    let mut ticks = tokio::time::interval(interval);

    loop {
        tokio::select! {
            _ = ticks.tick() => {},
            _ = shutdown.recv() => break,
        }

        let fetched = store.encrypted_items_stats().await;

        // a shutdown may have arrived while we were waiting on the
        // fetch; its result is stale, don't publish it
        match shutdown.try_recv() {
            Ok(()) | Err(mpsc::error::TryRecvError::Closed) => break,
            Err(mpsc::error::TryRecvError::Empty) => {},
        }

        match fetched {
            Ok(stats) => {
                if stats_tx.broadcast(stats).is_err() {
                    // every receiver is gone
                    break;
                }
            },
            Err(e) => {
                log::warn!("Unable to fetch encrypted-item stats: {}", e)
            },
        }
    }

    log::debug!("Stats poller stopped");
}
