//! Layered settings for the HUD binary.
//!
//! Resolution order, weakest first: built-in defaults, an optional
//! `rigwatch.toml`, `RIGWATCH_*` environment variables, then CLI flags
//! (applied by `main`).

use std::path::Path;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use rigwatch_types::RigSnapshot;
use serde::Deserialize;

use crate::readout::DisplayThresholds;

/// Everything the binary needs to wire the stores, bridge and readers.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// The known rig identifiers.
    pub rigs: Vec<String>,
    /// Bound on the alert queue.
    pub max_alerts: usize,
    /// Score above which a sample without an explicit alert raises one.
    pub warn_score: f64,
    /// Score at which a derived alert escalates to critical.
    pub critical_score: f64,
    /// Polling interval of the aggregate summary reader, in milliseconds.
    pub summary_interval_ms: u64,
    /// Polling interval of the single-rig inspection reader, in milliseconds.
    pub detail_interval_ms: u64,
    /// Display threshold overrides.
    pub thresholds: DisplayThresholds,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            rigs: vec!["A".into(), "B".into(), "C".into()],
            max_alerts: 10,
            warn_score: 0.5,
            critical_score: 0.8,
            summary_interval_ms: 500,
            detail_interval_ms: 100,
            thresholds: DisplayThresholds::default(),
        }
    }
}

impl Settings {
    /// Load settings from an optional file plus the environment.
    ///
    /// With no explicit path, a `rigwatch.toml` in the working directory is
    /// used when present; a missing file just yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();
        builder = match path {
            Some(path) => builder.add_source(File::from(path)),
            None => builder.add_source(File::with_name("rigwatch").required(false)),
        };
        let config = builder
            .add_source(Environment::with_prefix("RIGWATCH"))
            .build()
            .context("failed to load settings")?;

        config
            .try_deserialize()
            .context("failed to parse settings")
    }

    /// The baseline snapshot each configured rig starts from.
    pub fn default_rigs(&self) -> Vec<(String, RigSnapshot)> {
        self.rigs
            .iter()
            .map(|id| (id.clone(), baseline_snapshot(id)))
            .collect()
    }
}

/// Baseline readings per rig, used until the first sample arrives.
///
/// The standard fleet (A, B, C) gets its usual idle profile; anything else
/// falls back to [`RigSnapshot::default`].
fn baseline_snapshot(rig_id: &str) -> RigSnapshot {
    match rig_id {
        "A" => RigSnapshot {
            rpm: 2500.0,
            temperature: 72.0,
            vibration: 1.5,
            pressure: 100.0,
            bearing_temp: 120.0,
            ..RigSnapshot::default()
        },
        "B" => RigSnapshot {
            rpm: 2200.0,
            temperature: 75.0,
            vibration: 2.0,
            pressure: 95.0,
            bearing_temp: 125.0,
            ..RigSnapshot::default()
        },
        "C" => RigSnapshot {
            rpm: 2800.0,
            temperature: 70.0,
            vibration: 1.2,
            pressure: 105.0,
            bearing_temp: 118.0,
            ..RigSnapshot::default()
        },
        _ => RigSnapshot::default(),
    }
}
