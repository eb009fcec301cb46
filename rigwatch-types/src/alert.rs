//! Anomaly alerts raised against individual rigs.

/// How serious an alert is.
///
/// Ordered so that `Critical > Warning`, which lets callers take the worst
/// of a set with `max()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Severity {
    Warning,
    Critical,
}

impl Severity {
    /// Returns a short label for display.
    pub fn label(&self) -> &'static str {
        match self {
            Severity::Warning => "WARN",
            Severity::Critical => "CRIT",
        }
    }
}

/// One anomaly alert, immutable once created.
///
/// Alerts are only ever removed from the queue (dismissed or evicted),
/// never mutated in place.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Alert {
    /// Unique, monotonically assigned identifier.
    pub id: u64,
    /// The rig this alert is about.
    pub machine_id: String,
    /// Human-readable description.
    pub message: String,
    pub severity: Severity,
    /// Anomaly score that triggered the alert, 0.0–1.0.
    pub score: f64,
    /// Name of the detection technique (free-form, e.g. "zscore").
    pub method: String,
    /// Creation instant, milliseconds since the Unix epoch.
    pub timestamp_ms: u64,
}

/// An alert before the store assigns its identity.
///
/// `id` and `timestamp_ms` are optional: when absent, the store fills them
/// in at insertion time.
///
/// # Example
///
/// ```rust
/// use rigwatch_types::{AlertDraft, Severity};
///
/// let draft = AlertDraft::new("A", "bearing temperature climbing", Severity::Warning)
///     .score(0.64)
///     .method("zscore");
/// assert_eq!(draft.id, None);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct AlertDraft {
    pub id: Option<u64>,
    pub machine_id: String,
    pub message: String,
    pub severity: Severity,
    pub score: f64,
    pub method: String,
    pub timestamp_ms: Option<u64>,
}

impl AlertDraft {
    /// Create a draft with the required fields; score defaults to 0 and
    /// method to an empty string.
    pub fn new(
        machine_id: impl Into<String>,
        message: impl Into<String>,
        severity: Severity,
    ) -> Self {
        Self {
            id: None,
            machine_id: machine_id.into(),
            message: message.into(),
            severity,
            score: 0.0,
            method: String::new(),
            timestamp_ms: None,
        }
    }

    pub fn id(mut self, id: u64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn score(mut self, score: f64) -> Self {
        self.score = score;
        self
    }

    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    pub fn timestamp_ms(mut self, timestamp_ms: u64) -> Self {
        self.timestamp_ms = Some(timestamp_ms);
        self
    }

    /// Finalize into an [`Alert`], using the given fallbacks for any
    /// identity fields the draft does not carry.
    pub fn finalize(self, fallback_id: u64, fallback_timestamp_ms: u64) -> Alert {
        Alert {
            id: self.id.unwrap_or(fallback_id),
            machine_id: self.machine_id,
            message: self.message,
            severity: self.severity,
            score: self.score,
            method: self.method,
            timestamp_ms: self.timestamp_ms.unwrap_or(fallback_timestamp_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_orders_critical_above_warning() {
        assert!(Severity::Critical > Severity::Warning);
        assert_eq!(
            [Severity::Warning, Severity::Critical].into_iter().max(),
            Some(Severity::Critical)
        );
    }

    #[test]
    fn finalize_uses_fallbacks_when_identity_absent() {
        let alert = AlertDraft::new("B", "vibration spike", Severity::Critical)
            .score(0.9)
            .method("isolation-forest")
            .finalize(42, 1_700_000_000_000);

        assert_eq!(alert.id, 42);
        assert_eq!(alert.timestamp_ms, 1_700_000_000_000);
        assert_eq!(alert.machine_id, "B");
        assert_eq!(alert.score, 0.9);
    }

    #[test]
    fn finalize_keeps_explicit_identity() {
        let alert = AlertDraft::new("C", "test", Severity::Warning)
            .id(7)
            .timestamp_ms(1_000)
            .finalize(42, 2_000);

        assert_eq!(alert.id, 7);
        assert_eq!(alert.timestamp_ms, 1_000);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn severity_uses_lowercase_wire_names() {
        assert_eq!(
            serde_json::from_str::<Severity>(r#""critical""#).unwrap(),
            Severity::Critical
        );
        assert_eq!(serde_json::to_string(&Severity::Warning).unwrap(), r#""warning""#);
    }
}
