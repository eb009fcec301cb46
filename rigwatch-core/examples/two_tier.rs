//! Example: the two-tier state split, end to end.
//!
//! This example wires the stores and bridge, pushes synthetic samples at
//! 20 Hz, and lets a 500 ms display reader report what it sees: the
//! high-frequency write path never drives the read side directly.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example two_tier
//! ```

use std::sync::Arc;
use std::time::Duration;

use rigwatch_core::{
    DisplayReader, IngestionBridge, ReaderConfig, StateField, TelemetryTable, UiStore,
};
use rigwatch_types::{RigPatch, SampleEvent};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let table = Arc::new(TelemetryTable::with_defaults(["A", "B", "C"]));
    let store = Arc::new(UiStore::new());
    let bridge = IngestionBridge::new(table.clone(), store.clone());

    // React to alerts only; merges never fire this.
    store.subscribe(StateField::Alerts, |state, _| {
        if let Some(alert) = state.alerts.front() {
            println!(
                "  ALERT [{}] rig {}: {}",
                alert.severity.label(),
                alert.machine_id,
                alert.message
            );
        }
    });

    // A summary reader polling at its own pace.
    let handle = DisplayReader::start(
        table.clone(),
        ReaderConfig::all(Duration::from_millis(500)),
        |rows| {
            let line: Vec<String> = rows
                .iter()
                .map(|(id, s)| format!("{id}: {:.0} rpm / score {:.2}", s.rpm, s.anomaly_score))
                .collect();
            println!("tick  {}", line.join(" | "));
        },
    );

    // Synthetic samples at 20 Hz; rig B drifts into anomaly.
    for step in 0..100u32 {
        let wobble = f64::from(step % 10);
        bridge
            .on_sample(&SampleEvent::new(
                "A",
                RigPatch::new().rpm(2500.0 + wobble * 10.0),
            ))
            .unwrap();
        let score = f64::from(step) / 120.0;
        bridge
            .on_sample(&SampleEvent::new(
                "B",
                RigPatch::new().rpm(2200.0 - wobble * 5.0).anomaly_score(score),
            ))
            .unwrap();

        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    handle.stop();
    println!("\n{} alerts in the queue", store.alert_count());
}
