//! Presentation-layer threshold flags.
//!
//! These are derived values, recomputed on every read; nothing here is
//! stored state. The panels call into this module each frame to decide
//! coloring.

use rigwatch_types::RigSnapshot;
use serde::Deserialize;

/// Display thresholds for flagging readings.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct DisplayThresholds {
    /// Temperature above this is flagged hot (°F).
    pub temp_hot: f64,
    /// Vibration above this is flagged elevated (mm/s).
    pub vibration_elevated: f64,
    /// Bearing temperature above this is flagged hot (°F).
    pub bearing_hot: f64,
    /// Anomaly score above this is flagged anomalous.
    pub anomaly: f64,
}

impl Default for DisplayThresholds {
    fn default() -> Self {
        Self {
            temp_hot: 85.0,
            vibration_elevated: 4.5,
            bearing_hot: 160.0,
            anomaly: 0.5,
        }
    }
}

impl DisplayThresholds {
    pub fn temp_is_hot(&self, temperature: f64) -> bool {
        temperature > self.temp_hot
    }

    pub fn vibration_is_elevated(&self, vibration: f64) -> bool {
        vibration > self.vibration_elevated
    }

    pub fn bearing_is_hot(&self, bearing_temp: f64) -> bool {
        bearing_temp > self.bearing_hot
    }

    pub fn is_anomalous(&self, anomaly_score: f64) -> bool {
        anomaly_score > self.anomaly
    }

    /// Flag every reading of a snapshot at once.
    pub fn readout(&self, snapshot: &RigSnapshot) -> Readout {
        Readout {
            temp_hot: self.temp_is_hot(snapshot.temperature),
            vibration_elevated: self.vibration_is_elevated(snapshot.vibration),
            bearing_hot: self.bearing_is_hot(snapshot.bearing_temp),
            anomalous: self.is_anomalous(snapshot.anomaly_score),
        }
    }
}

/// The flags for one snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Readout {
    pub temp_hot: bool,
    pub vibration_elevated: bool,
    pub bearing_hot: bool,
    pub anomalous: bool,
}

impl Readout {
    /// True if any reading is flagged.
    pub fn any(&self) -> bool {
        self.temp_hot || self.vibration_elevated || self.bearing_hot || self.anomalous
    }
}
