//! The single write path from the telemetry transport into the stores.
//!
//! Whatever delivers samples (a TCP feed, a replayed capture, a test) calls
//! into one of the `on_*` entry points here. The bridge does no buffering
//! or batching: each sample produces exactly one merge into the telemetry
//! table and at most one alert push, synchronously.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use rigwatch_types::{AlertDraft, Health, SampleEvent, Severity, Subsystem};
use tracing::{debug, warn};

use crate::error::IngestError;
use crate::store::UiStore;
use crate::telemetry::TelemetryTable;

/// Connection lifecycle events from the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionEvent {
    Connected,
    Disconnected { reason: Option<String> },
}

/// Alert-derivation thresholds for samples without an explicit alert.
#[derive(Debug, Clone, Copy)]
pub struct BridgeConfig {
    /// Scores above this raise a warning alert.
    pub warn_score: f64,
    /// Scores at or above this escalate the derived alert to critical.
    pub critical_score: f64,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            warn_score: 0.5,
            critical_score: 0.8,
        }
    }
}

/// Bridges external telemetry events into the two stores.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use rigwatch_core::{IngestionBridge, TelemetryTable, UiStore};
/// use rigwatch_types::{RigPatch, SampleEvent};
///
/// let table = Arc::new(TelemetryTable::with_defaults(["A", "B", "C"]));
/// let store = Arc::new(UiStore::new());
/// let bridge = IngestionBridge::new(table.clone(), store.clone());
///
/// let sample = SampleEvent::new("A", RigPatch::new().rpm(3000.0).anomaly_score(0.8));
/// bridge.on_sample(&sample).unwrap();
///
/// assert_eq!(table.read("A").unwrap().rpm, 3000.0);
/// assert_eq!(store.alert_count(), 1);
/// ```
pub struct IngestionBridge {
    table: Arc<TelemetryTable>,
    store: Arc<UiStore>,
    config: BridgeConfig,
}

impl IngestionBridge {
    pub fn new(table: Arc<TelemetryTable>, store: Arc<UiStore>) -> Self {
        Self::with_config(table, store, BridgeConfig::default())
    }

    pub fn with_config(
        table: Arc<TelemetryTable>,
        store: Arc<UiStore>,
        config: BridgeConfig,
    ) -> Self {
        Self {
            table,
            store,
            config,
        }
    }

    pub fn table(&self) -> &Arc<TelemetryTable> {
        &self.table
    }

    pub fn store(&self) -> &Arc<UiStore> {
        &self.store
    }

    /// Apply one sample: merge the reading into the telemetry table and,
    /// if the sample constitutes an anomaly, push one alert.
    ///
    /// A sample for an unknown rig is rejected whole: nothing is merged,
    /// no alert is pushed, and `last_update` does not advance.
    pub fn on_sample(&self, sample: &SampleEvent) -> Result<(), IngestError> {
        if let Err(err) = self.table.merge(&sample.rig_id, &sample.reading) {
            warn!(rig = %sample.rig_id, "dropping sample: {err}");
            return Err(err);
        }

        self.store.set_last_update(now_ms());

        if let Some(draft) = self.alert_for(sample) {
            let alert = self.store.add_alert(draft);
            debug!(
                rig = %alert.machine_id,
                score = alert.score,
                severity = alert.severity.label(),
                "raised alert"
            );
        }

        Ok(())
    }

    /// Decide whether a sample carries or implies an alert.
    ///
    /// An explicit alert on the sample wins and passes through untouched.
    /// Otherwise a score above the warn threshold derives one, escalating
    /// to critical at the critical threshold.
    fn alert_for(&self, sample: &SampleEvent) -> Option<AlertDraft> {
        if let Some(alert) = &sample.alert {
            return Some(
                AlertDraft::new(&sample.rig_id, alert.message.clone(), alert.severity)
                    .score(alert.score)
                    .method(alert.method.clone()),
            );
        }

        let score = sample.reading.anomaly_score?;
        if score <= self.config.warn_score {
            return None;
        }
        let severity = if score >= self.config.critical_score {
            Severity::Critical
        } else {
            Severity::Warning
        };
        Some(
            AlertDraft::new(
                &sample.rig_id,
                format!("anomaly score {:.0}%", score * 100.0),
                severity,
            )
            .score(score)
            .method("threshold"),
        )
    }

    /// Forward a connection lifecycle event to the UI store.
    pub fn on_connection_event(&self, event: ConnectionEvent) {
        match event {
            ConnectionEvent::Connected => self.store.set_connected(true),
            ConnectionEvent::Disconnected { reason } => {
                let reason = reason.unwrap_or_else(|| "connection closed".to_string());
                self.store.set_connection_error(reason);
            }
        }
    }

    /// Forward a subsystem health event to the UI store.
    pub fn on_system_status(&self, subsystem: Subsystem, health: Health) {
        self.store.set_system_status(subsystem, health);
    }
}

impl std::fmt::Debug for IngestionBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IngestionBridge")
            .field("rigs", &self.table.len())
            .field("config", &self.config)
            .finish()
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rigwatch_types::{RigPatch, SampleAlert};

    fn bridge() -> IngestionBridge {
        let table = Arc::new(TelemetryTable::with_defaults(["A", "B", "C"]));
        let store = Arc::new(UiStore::new());
        IngestionBridge::new(table, store)
    }

    #[test]
    fn anomalous_sample_merges_and_raises_one_alert() {
        let bridge = bridge();

        let sample = SampleEvent::new("A", RigPatch::new().rpm(3000.0).anomaly_score(0.8));
        bridge.on_sample(&sample).unwrap();

        let snapshot = bridge.table().read("A").unwrap();
        assert_eq!(snapshot.rpm, 3000.0);
        assert_eq!(snapshot.anomaly_score, 0.8);

        let state = bridge.store().get();
        assert_eq!(state.alerts.len(), 1);
        let alert = &state.alerts[0];
        assert_eq!(alert.machine_id, "A");
        assert_eq!(alert.score, 0.8);
        assert_eq!(alert.severity, Severity::Critical);
        assert!(state.last_update_ms.is_some());
    }

    #[test]
    fn quiet_sample_raises_no_alert() {
        let bridge = bridge();

        let sample = SampleEvent::new("B", RigPatch::new().temperature(75.0).anomaly_score(0.2));
        bridge.on_sample(&sample).unwrap();

        assert_eq!(bridge.store().alert_count(), 0);
        assert_eq!(bridge.table().read("B").unwrap().temperature, 75.0);
    }

    #[test]
    fn score_between_thresholds_derives_a_warning() {
        let bridge = bridge();

        bridge
            .on_sample(&SampleEvent::new("C", RigPatch::new().anomaly_score(0.6)))
            .unwrap();

        let state = bridge.store().get();
        assert_eq!(state.alerts[0].severity, Severity::Warning);
        assert_eq!(state.alerts[0].method, "threshold");
    }

    #[test]
    fn explicit_alert_passes_through_untouched() {
        let bridge = bridge();

        // Score alone would not trip the threshold; the upstream detector
        // decided anyway.
        let sample = SampleEvent::new("B", RigPatch::new().vibration(6.0).anomaly_score(0.4))
            .with_alert(SampleAlert {
                message: "vibration spike".into(),
                severity: Severity::Critical,
                score: 0.4,
                method: "isolation-forest".into(),
            });
        bridge.on_sample(&sample).unwrap();

        let state = bridge.store().get();
        assert_eq!(state.alerts.len(), 1);
        assert_eq!(state.alerts[0].message, "vibration spike");
        assert_eq!(state.alerts[0].severity, Severity::Critical);
        assert_eq!(state.alerts[0].method, "isolation-forest");
    }

    #[test]
    fn unknown_rig_is_rejected_whole() {
        let bridge = bridge();

        let sample = SampleEvent::new("Z", RigPatch::new().rpm(1.0).anomaly_score(0.99));
        let err = bridge.on_sample(&sample).unwrap_err();

        assert_eq!(err, IngestError::UnknownRig("Z".to_string()));
        let state = bridge.store().get();
        assert_eq!(state.alerts.len(), 0, "no alert for a rejected sample");
        assert_eq!(state.last_update_ms, None, "rejected samples are not accepted");
    }

    #[test]
    fn connection_events_map_onto_the_store() {
        let bridge = bridge();

        bridge.on_connection_event(ConnectionEvent::Connected);
        assert!(bridge.store().get().connected);

        bridge.on_connection_event(ConnectionEvent::Disconnected {
            reason: Some("broker went away".into()),
        });
        let state = bridge.store().get();
        assert!(!state.connected);
        assert_eq!(state.connection_error.as_deref(), Some("broker went away"));

        bridge.on_connection_event(ConnectionEvent::Disconnected { reason: None });
        assert_eq!(
            bridge.store().get().connection_error.as_deref(),
            Some("connection closed")
        );
    }

    #[test]
    fn system_status_events_map_onto_the_store() {
        let bridge = bridge();

        bridge.on_system_status(Subsystem::Scoring, Health::Degraded);

        assert_eq!(
            bridge.store().get().system_status.scoring,
            Health::Degraded
        );
    }

    #[test]
    fn disconnect_retains_last_good_telemetry() {
        let bridge = bridge();

        bridge
            .on_sample(&SampleEvent::new("A", RigPatch::new().rpm(3100.0)))
            .unwrap();
        bridge.on_connection_event(ConnectionEvent::Disconnected { reason: None });

        // Stale-but-last-known values survive the disconnect.
        assert_eq!(bridge.table().read("A").unwrap().rpm, 3100.0);
        assert!(bridge.store().get().last_update_ms.is_some());
    }
}
