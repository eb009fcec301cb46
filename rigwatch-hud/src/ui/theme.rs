//! Theme configuration for the HUD.
//!
//! Supports light and dark themes with automatic terminal detection.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::block::BorderType;
use rigwatch_types::{Health, Severity};

/// Color and style theme for the HUD.
///
/// Use [`Theme::auto_detect()`] for automatic selection based on the
/// terminal background, or [`Theme::dark()`]/[`Theme::light()`] explicitly.
#[derive(Debug, Clone)]
pub struct Theme {
    /// Accent color for highlights and active elements.
    pub highlight: Color,
    /// Color for warning-level readings and alerts.
    pub warning: Color,
    /// Color for critical-level readings and alerts.
    pub critical: Color,
    /// Color for nominal readings.
    pub nominal: Color,
    /// Color for dim chrome (hints, borders, unknowns).
    pub dim: Color,
    /// Style for table header rows.
    pub header: Style,
    /// Style for the selected rig row.
    pub selected: Style,
    /// Border style (rounded, plain, etc.).
    pub border_type: BorderType,
}

impl Theme {
    /// Create a dark theme suitable for dark terminal backgrounds.
    pub fn dark() -> Self {
        Self {
            highlight: Color::Cyan,
            warning: Color::Yellow,
            critical: Color::Red,
            nominal: Color::Green,
            dim: Color::Gray,
            header: Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            selected: Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD),
            border_type: BorderType::Rounded,
        }
    }

    /// Create a light theme suitable for light terminal backgrounds.
    pub fn light() -> Self {
        Self {
            highlight: Color::Blue,
            warning: Color::Yellow,
            critical: Color::Red,
            nominal: Color::Green,
            dim: Color::DarkGray,
            header: Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
            selected: Style::default().bg(Color::LightBlue).add_modifier(Modifier::BOLD),
            border_type: BorderType::Rounded,
        }
    }

    /// Auto-detect based on terminal background
    pub fn auto_detect() -> Self {
        match terminal_light::luma() {
            Ok(luma) if luma > 0.5 => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Style for an alert severity.
    pub fn severity_style(&self, severity: Severity) -> Style {
        match severity {
            Severity::Warning => Style::default().fg(self.warning),
            Severity::Critical => {
                Style::default().fg(self.critical).add_modifier(Modifier::BOLD)
            }
        }
    }

    /// Style for a subsystem health label.
    pub fn health_style(&self, health: Health) -> Style {
        match health {
            Health::Unknown => Style::default().fg(self.dim),
            Health::Ok => Style::default().fg(self.nominal),
            Health::Degraded => Style::default().fg(self.warning),
            Health::Down => Style::default().fg(self.critical).add_modifier(Modifier::BOLD),
        }
    }

    /// Style for a reading: flagged values stand out, nominal ones stay calm.
    pub fn reading_style(&self, flagged: bool) -> Style {
        if flagged {
            Style::default().fg(self.critical)
        } else {
            Style::default().fg(self.nominal)
        }
    }
}
