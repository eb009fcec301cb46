//! The NDJSON ingestion schema: one event per line.

use crate::{Health, RigPatch, Severity, Subsystem};

/// One telemetry sample for a single rig.
///
/// Measurement fields are all optional; whatever the sample carries is
/// merged into the rig's snapshot. The upstream detector may attach an
/// explicit [`SampleAlert`] when it has already decided the sample is
/// anomalous.
///
/// Wire form (with the `serde` feature):
///
/// ```json
/// {"rigId":"A","rpm":3000,"anomalyScore":0.8}
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SampleEvent {
    #[cfg_attr(feature = "serde", serde(rename = "rigId"))]
    pub rig_id: String,
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub reading: RigPatch,
    /// Explicit alert attached by the upstream detector, if any.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub alert: Option<SampleAlert>,
}

impl SampleEvent {
    pub fn new(rig_id: impl Into<String>, reading: RigPatch) -> Self {
        Self {
            rig_id: rig_id.into(),
            reading,
            alert: None,
        }
    }

    pub fn with_alert(mut self, alert: SampleAlert) -> Self {
        self.alert = Some(alert);
        self
    }
}

/// An alert decision that rides along with a sample.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SampleAlert {
    pub message: String,
    pub severity: Severity,
    pub score: f64,
    /// Name of the detection technique, free-form.
    pub method: String,
}

/// One line of the ingestion feed.
///
/// Tagged by a `type` field:
///
/// ```json
/// {"type":"sample","rigId":"A","temperature":91.2}
/// {"type":"status","subsystem":"database","health":"degraded"}
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum FeedEvent {
    Sample(SampleEvent),
    Status { subsystem: Subsystem, health: Health },
}

#[cfg(all(test, feature = "serde"))]
mod tests {
    use super::*;

    #[test]
    fn sample_line_parses_partial_fields() {
        let event: FeedEvent =
            serde_json::from_str(r#"{"type":"sample","rigId":"A","rpm":3000,"anomalyScore":0.8}"#)
                .unwrap();

        let FeedEvent::Sample(sample) = event else {
            panic!("expected a sample event");
        };
        assert_eq!(sample.rig_id, "A");
        assert_eq!(sample.reading.rpm, Some(3000.0));
        assert_eq!(sample.reading.anomaly_score, Some(0.8));
        assert_eq!(sample.reading.temperature, None);
        assert!(sample.alert.is_none());
    }

    #[test]
    fn sample_line_parses_explicit_alert() {
        let line = r#"{"type":"sample","rigId":"B","vibration":6.1,
            "alert":{"message":"vibration spike","severity":"critical","score":0.91,"method":"zscore"}}"#;
        let event: FeedEvent = serde_json::from_str(line).unwrap();

        let FeedEvent::Sample(sample) = event else {
            panic!("expected a sample event");
        };
        let alert = sample.alert.expect("alert present");
        assert_eq!(alert.severity, Severity::Critical);
        assert_eq!(alert.method, "zscore");
    }

    #[test]
    fn status_line_parses() {
        let event: FeedEvent =
            serde_json::from_str(r#"{"type":"status","subsystem":"broker","health":"ok"}"#)
                .unwrap();

        assert_eq!(
            event,
            FeedEvent::Status {
                subsystem: Subsystem::Broker,
                health: Health::Ok,
            }
        );
    }

    #[test]
    fn sample_round_trips() {
        let original = FeedEvent::Sample(
            SampleEvent::new("C", RigPatch::new().pressure(110.0)).with_alert(SampleAlert {
                message: "pressure excursion".into(),
                severity: Severity::Warning,
                score: 0.55,
                method: "threshold".into(),
            }),
        );

        let json = serde_json::to_string(&original).unwrap();
        let parsed: FeedEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, original);
    }
}
