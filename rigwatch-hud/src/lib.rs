//! # rigwatch-hud
//!
//! Terminal heads-up display for live rig telemetry.
//!
//! The HUD is a read-only consumer of the rigwatch state core: it
//! subscribes to the reactive [`UiStore`](rigwatch_core::UiStore) for
//! connection status, alerts, selection and subsystem health, and owns
//! polling [`DisplayReader`](rigwatch_core::DisplayReader)s for the numeric
//! panels (a 500 ms aggregate reader for the rig summary table and a
//! 100 ms reader for the inspection overlay of the selected rig).
//!
//! The crate is organized like the TUI it renders:
//!
//! - **[`app`]**: composition root; owns the store subscription and readers
//! - **[`events`]**: keyboard handling, mapped onto store mutations
//! - **[`feed`]**: NDJSON feeds (TCP stream, file replay) that drive the
//!   ingestion bridge
//! - **[`settings`]**: layered configuration (defaults, `rigwatch.toml`,
//!   `RIGWATCH_*` environment, CLI flags)
//! - **[`readout`]**: presentation-layer threshold flags, derived on read
//! - **[`ui`]**: ratatui panels: status header, alerts, rig summary,
//!   crosshair, inspection detail, debug and help overlays

pub mod app;
pub mod events;
pub mod feed;
pub mod readout;
pub mod settings;
pub mod ui;

pub use app::App;
pub use readout::{DisplayThresholds, Readout};
pub use settings::Settings;
