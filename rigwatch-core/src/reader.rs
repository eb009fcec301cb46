//! Fixed-interval display readers over the telemetry table.
//!
//! Readers are the read side of the high-frequency store: each owns its own
//! schedule, pulls copies of the snapshots it cares about on every tick,
//! and hands them to its consumer. Polling, not push, is what bounds the
//! render rate regardless of how bursty ingestion gets; do not replace it
//! with per-sample notification.

use std::sync::Arc;
use std::time::Duration;

use rigwatch_types::RigSnapshot;
use tokio::sync::watch;

use crate::telemetry::TelemetryTable;

/// Which rigs a reader publishes on each tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RigFilter {
    /// Every known rig, in sorted id order.
    All,
    /// A single rig.
    One(String),
}

/// A reader's schedule and scope.
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    pub interval: Duration,
    pub filter: RigFilter,
}

impl ReaderConfig {
    /// An aggregate reader over every rig (the summary panels poll at
    /// 500 ms).
    pub fn all(interval: Duration) -> Self {
        Self {
            interval,
            filter: RigFilter::All,
        }
    }

    /// A single-rig reader (the inspection panel polls at 100 ms).
    pub fn one(interval: Duration, rig_id: impl Into<String>) -> Self {
        Self {
            interval,
            filter: RigFilter::One(rig_id.into()),
        }
    }
}

/// Spawns and stops polling readers.
///
/// Multiple readers may run concurrently at different intervals over the
/// same table without interference: reads copy and never mutate.
#[derive(Debug)]
pub struct DisplayReader;

impl DisplayReader {
    /// Start a reader on its own timer.
    ///
    /// The first tick fires immediately, then every `config.interval`.
    /// Each tick copies the filtered snapshots out of the table and passes
    /// them to `on_tick`. The reader runs until its [`ReaderHandle`] is
    /// stopped or dropped.
    pub fn start<F>(table: Arc<TelemetryTable>, config: ReaderConfig, mut on_tick: F) -> ReaderHandle
    where
        F: FnMut(Vec<(String, RigSnapshot)>) + Send + 'static,
    {
        let (stop_tx, mut stop_rx) = watch::channel(false);

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(config.interval);
            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let rows = match &config.filter {
                            RigFilter::All => table.read_all(),
                            RigFilter::One(rig_id) => table
                                .read(rig_id)
                                .map(|snapshot| vec![(rig_id.clone(), snapshot)])
                                .unwrap_or_default(),
                        };
                        on_tick(rows);
                    }
                    changed = stop_rx.changed() => {
                        // Stop on an explicit signal or when the handle is gone.
                        if changed.is_err() || *stop_rx.borrow() {
                            break;
                        }
                    }
                }
            }
        });

        ReaderHandle { stop_tx }
    }

    /// Start a reader that publishes each tick into a watch channel.
    ///
    /// Convenient for render loops that want to borrow the latest rows at
    /// their own pace rather than receive a callback.
    pub fn channel(
        table: Arc<TelemetryTable>,
        config: ReaderConfig,
    ) -> (ReaderHandle, watch::Receiver<Vec<(String, RigSnapshot)>>) {
        let (tx, rx) = watch::channel(Vec::new());
        let handle = Self::start(table, config, move |rows| {
            let _ = tx.send(rows);
        });
        (handle, rx)
    }
}

/// Handle for a running reader.
///
/// Stopping (or dropping) the handle releases the reader's timer
/// deterministically: the polling task exits and no further ticks fire.
#[derive(Debug)]
pub struct ReaderHandle {
    stop_tx: watch::Sender<bool>,
}

impl ReaderHandle {
    /// Stop the reader.
    pub fn stop(self) {
        let _ = self.stop_tx.send(true);
    }
}
