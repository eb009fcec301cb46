//! Health of the backend subsystems feeding the overlay.

/// The fixed set of backend subsystems whose health is tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Subsystem {
    /// The telemetry stream broker.
    Broker,
    /// The readings database.
    Database,
    /// The anomaly scoring service.
    Scoring,
}

impl Subsystem {
    /// All subsystems, in display order.
    pub const ALL: [Subsystem; 3] = [Subsystem::Broker, Subsystem::Database, Subsystem::Scoring];

    /// Returns a short label for display.
    pub fn label(&self) -> &'static str {
        match self {
            Subsystem::Broker => "BRK",
            Subsystem::Database => "DB",
            Subsystem::Scoring => "ML",
        }
    }
}

/// Health label for one subsystem.
///
/// Ordered worst-last so `max()` picks the most degraded of a set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Health {
    #[default]
    Unknown,
    Ok,
    Degraded,
    Down,
}

impl Health {
    /// Returns a short symbol for display.
    pub fn symbol(&self) -> &'static str {
        match self {
            Health::Unknown => "?",
            Health::Ok => "ok",
            Health::Degraded => "degraded",
            Health::Down => "down",
        }
    }
}

/// Health of every tracked subsystem, each independently settable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SystemStatus {
    pub broker: Health,
    pub database: Health,
    pub scoring: Health,
}

impl SystemStatus {
    pub fn get(&self, subsystem: Subsystem) -> Health {
        match subsystem {
            Subsystem::Broker => self.broker,
            Subsystem::Database => self.database,
            Subsystem::Scoring => self.scoring,
        }
    }

    pub fn set(&mut self, subsystem: Subsystem, health: Health) {
        match subsystem {
            Subsystem::Broker => self.broker = health,
            Subsystem::Database => self.database = health,
            Subsystem::Scoring => self.scoring = health,
        }
    }

    /// The most degraded health label across all subsystems.
    pub fn worst(&self) -> Health {
        Subsystem::ALL
            .iter()
            .map(|s| self.get(*s))
            .max()
            .unwrap_or(Health::Unknown)
    }
}
