//! The status header: connection badge, stream info, subsystem health.

use std::time::{SystemTime, UNIX_EPOCH};

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use rigwatch_types::Subsystem;

use crate::app::App;

/// Render the one-line status header.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let mut spans: Vec<Span> = Vec::new();

    // Connection badge
    if app.ui.connected {
        spans.push(Span::styled(" ● ", Style::default().fg(theme.nominal)));
        spans.push(Span::styled(
            "LIVE",
            Style::default().fg(theme.nominal).add_modifier(Modifier::BOLD),
        ));
    } else {
        spans.push(Span::styled(" ● ", Style::default().fg(theme.critical)));
        let label = app
            .ui
            .connection_error
            .as_deref()
            .unwrap_or("DISCONNECTED");
        spans.push(Span::styled(
            label.to_string(),
            Style::default().fg(theme.critical).add_modifier(Modifier::BOLD),
        ));
    }

    spans.push(Span::styled(" │ RIGWATCH", Style::default().add_modifier(Modifier::BOLD)));

    // Stream freshness
    if let Some(age) = last_update_age_secs(app) {
        let label = if age < 2 {
            "streaming".to_string()
        } else {
            format!("stale {age}s")
        };
        let style = if age < 2 {
            Style::default().fg(theme.highlight)
        } else {
            Style::default().fg(theme.warning)
        };
        spans.push(Span::raw(" │ "));
        spans.push(Span::styled(label, style));
    }

    // Pause badge
    if app.ui.paused {
        spans.push(Span::raw(" │ "));
        spans.push(Span::styled(
            "PAUSED",
            Style::default().fg(theme.warning).add_modifier(Modifier::BOLD),
        ));
    }

    // Subsystem health
    spans.push(Span::raw(" │ "));
    for (i, subsystem) in Subsystem::ALL.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" "));
        }
        let health = app.ui.system_status.get(*subsystem);
        spans.push(Span::styled(
            format!("{}:{}", subsystem.label(), health.symbol()),
            theme.health_style(health),
        ));
    }

    // Alert count
    let alert_count = app.ui.alerts.len();
    if alert_count > 0 {
        spans.push(Span::raw(" │ "));
        spans.push(Span::styled(
            format!("⚠ {alert_count}"),
            Style::default().fg(theme.critical).add_modifier(Modifier::BOLD),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Seconds since the last accepted sample, if any.
fn last_update_age_secs(app: &App) -> Option<u64> {
    let last = app.ui.last_update_ms?;
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .ok()?
        .as_millis() as u64;
    Some(now.saturating_sub(last) / 1000)
}
