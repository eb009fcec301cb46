//! # rigwatch-core
//!
//! Two-tier state synchronization core for the rigwatch telemetry HUD.
//!
//! Telemetry arrives at tens of hertz, but almost none of it needs to wake
//! the UI. This crate splits live state into two stores with very different
//! contracts and bridges between them:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────┐
//! │  transport (external)                                            │
//! │      │ samples / connection / status events                      │
//! │      ▼                                                           │
//! │  ┌──────────────────┐  merge   ┌────────────────────────────┐    │
//! │  │ IngestionBridge  │─────────▶│ TelemetryTable (transient) │    │
//! │  │                  │          └────────────┬───────────────┘    │
//! │  │                  │ alerts,               │ copy-out polling   │
//! │  │                  │ connection,           ▼                    │
//! │  │                  │ status    ┌────────────────────────────┐   │
//! │  │                  │──────────▶│ DisplayReader(s)           │   │
//! │  └──────────────────┘           │ 500 ms summary / 100 ms    │   │
//! │      │                          │ inspection detail          │   │
//! │      ▼                          └────────────────────────────┘   │
//! │  ┌──────────────────┐                                            │
//! │  │ UiStore          │ selector-scoped notifications ──▶ panels   │
//! │  │ (reactive)       │                                            │
//! │  └──────────────────┘                                            │
//! └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`TelemetryTable`]**: a mutable, keyed table of per-rig snapshots,
//!   written in place by the ingestion path only. Writes notify nobody;
//!   readers poll and copy. This keeps the sample rate completely decoupled
//!   from the render and UI rates.
//! - **[`UiStore`]**: the reactive store for everything that genuinely needs
//!   change-driven updates (connection status, the bounded alert queue,
//!   selection, subsystem health). Subscriptions are selector-scoped: a
//!   subscriber naming only `connected` is never woken by an alert push.
//! - **[`IngestionBridge`]**: the single write path. One merge per sample,
//!   at most one alert push, no buffering.
//! - **[`DisplayReader`]**: self-scheduled polling readers that copy
//!   snapshots out of the table at fixed intervals and stop deterministically.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use rigwatch_core::{
//!     DisplayReader, IngestionBridge, ReaderConfig, TelemetryTable, UiStore,
//! };
//! use rigwatch_types::{RigPatch, SampleEvent};
//!
//! # tokio_test::block_on(async {
//! let table = Arc::new(TelemetryTable::with_defaults(["A", "B", "C"]));
//! let store = Arc::new(UiStore::new());
//! let bridge = IngestionBridge::new(table.clone(), store.clone());
//!
//! // High-frequency path: merge without waking anything.
//! bridge
//!     .on_sample(&SampleEvent::new("A", RigPatch::new().rpm(3000.0)))
//!     .unwrap();
//!
//! // Low-frequency path: a reader polls copies out on its own schedule.
//! let (handle, _rows) =
//!     DisplayReader::channel(table.clone(), ReaderConfig::all(Duration::from_millis(500)));
//! # handle.stop();
//! # });
//! ```

pub mod bridge;
pub mod error;
pub mod reader;
pub mod store;
pub mod telemetry;

pub use bridge::{BridgeConfig, ConnectionEvent, IngestionBridge};
pub use error::IngestError;
pub use reader::{DisplayReader, ReaderConfig, ReaderHandle, RigFilter};
pub use store::{
    FieldSet, StateField, SubscriptionId, UiState, UiStore, DEFAULT_MAX_ALERTS,
};
pub use telemetry::TelemetryTable;
