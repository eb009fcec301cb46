//! Per-rig measurement snapshots and partial updates.

/// The complete set of measured and derived values for one rig.
///
/// Field ranges follow the upstream sensor schema:
///
/// - `rpm`: 0–5000
/// - `temperature`: 60–100 °F nominal
/// - `vibration`: 0–10 mm/s
/// - `pressure`: 0–200 PSI
/// - `bearing_temp`: 0–200 °F
/// - `anomaly_score`: 0.0–1.0, computed by the upstream scoring pipeline
///
/// A snapshot always carries every field. Incoming samples are partial
/// ([`RigPatch`]) and are merged field-by-field via [`RigSnapshot::apply`],
/// so no field ever reverts to an absent state.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RigSnapshot {
    pub rpm: f64,
    pub temperature: f64,
    pub vibration: f64,
    pub pressure: f64,
    pub bearing_temp: f64,
    #[cfg_attr(feature = "serde", serde(rename = "anomalyScore"))]
    pub anomaly_score: f64,
    #[cfg_attr(feature = "serde", serde(rename = "isRunning"))]
    pub is_running: bool,
}

impl Default for RigSnapshot {
    /// A plausible idle baseline, used for rigs that have not yet reported.
    fn default() -> Self {
        Self {
            rpm: 2500.0,
            temperature: 72.0,
            vibration: 1.5,
            pressure: 100.0,
            bearing_temp: 120.0,
            anomaly_score: 0.0,
            is_running: true,
        }
    }
}

impl RigSnapshot {
    /// Merge a partial update into this snapshot.
    ///
    /// Only fields present on the patch are overwritten; everything else
    /// keeps its current value.
    pub fn apply(&mut self, patch: &RigPatch) {
        if let Some(rpm) = patch.rpm {
            self.rpm = rpm;
        }
        if let Some(temperature) = patch.temperature {
            self.temperature = temperature;
        }
        if let Some(vibration) = patch.vibration {
            self.vibration = vibration;
        }
        if let Some(pressure) = patch.pressure {
            self.pressure = pressure;
        }
        if let Some(bearing_temp) = patch.bearing_temp {
            self.bearing_temp = bearing_temp;
        }
        if let Some(anomaly_score) = patch.anomaly_score {
            self.anomaly_score = anomaly_score;
        }
        if let Some(is_running) = patch.is_running {
            self.is_running = is_running;
        }
    }
}

/// A partial rig update: any subset of the [`RigSnapshot`] fields.
///
/// This is the shape of one ingested sample. Construct programmatically with
/// the fluent setters, or deserialize from the NDJSON ingestion schema
/// (requires the `serde` feature).
///
/// # Example
///
/// ```rust
/// use rigwatch_types::RigPatch;
///
/// let patch = RigPatch::new().temperature(91.5).vibration(5.2);
/// assert!(!patch.is_empty());
/// assert_eq!(patch.rpm, None);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RigPatch {
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub rpm: Option<f64>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub temperature: Option<f64>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub vibration: Option<f64>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub pressure: Option<f64>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub bearing_temp: Option<f64>,
    #[cfg_attr(
        feature = "serde",
        serde(rename = "anomalyScore", skip_serializing_if = "Option::is_none")
    )]
    pub anomaly_score: Option<f64>,
    #[cfg_attr(
        feature = "serde",
        serde(rename = "isRunning", skip_serializing_if = "Option::is_none")
    )]
    pub is_running: Option<bool>,
}

impl RigPatch {
    /// Create an empty patch.
    pub fn new() -> Self {
        Self::default()
    }

    /// True if the patch carries no fields at all.
    pub fn is_empty(&self) -> bool {
        self.rpm.is_none()
            && self.temperature.is_none()
            && self.vibration.is_none()
            && self.pressure.is_none()
            && self.bearing_temp.is_none()
            && self.anomaly_score.is_none()
            && self.is_running.is_none()
    }

    pub fn rpm(mut self, rpm: f64) -> Self {
        self.rpm = Some(rpm);
        self
    }

    pub fn temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn vibration(mut self, vibration: f64) -> Self {
        self.vibration = Some(vibration);
        self
    }

    pub fn pressure(mut self, pressure: f64) -> Self {
        self.pressure = Some(pressure);
        self
    }

    pub fn bearing_temp(mut self, bearing_temp: f64) -> Self {
        self.bearing_temp = Some(bearing_temp);
        self
    }

    pub fn anomaly_score(mut self, anomaly_score: f64) -> Self {
        self.anomaly_score = Some(anomaly_score);
        self
    }

    pub fn is_running(mut self, is_running: bool) -> Self {
        self.is_running = Some(is_running);
        self
    }
}
