//! # rigwatch-types
//!
//! Core types for rig telemetry overlays. This crate defines the universal
//! schema shared between whatever transport delivers rig samples and the
//! rigwatch state core and HUD that consume them.
//!
//! ## Design Goals
//!
//! - **Zero required dependencies**: the types work without any serialization
//!   framework
//! - **Optional serialization**: enable the `serde` feature for the NDJSON
//!   ingestion schema
//! - **Transport agnostic**: works with a TCP stream, a replayed capture
//!   file, or an in-process channel
//! - **Partial by design**: samples carry any subset of the measured fields;
//!   [`RigPatch`] models exactly that
//!
//! ## Example
//!
//! ```rust
//! use rigwatch_types::{RigPatch, RigSnapshot};
//!
//! let mut snapshot = RigSnapshot::default();
//! let patch = RigPatch::new().rpm(3200.0).anomaly_score(0.82);
//! snapshot.apply(&patch);
//!
//! assert_eq!(snapshot.rpm, 3200.0);
//! // Untouched fields keep their previous values.
//! assert!(snapshot.is_running);
//! ```

mod alert;
mod sample;
mod snapshot;
mod status;

pub use alert::*;
pub use sample::*;
pub use snapshot::*;
pub use status::*;
