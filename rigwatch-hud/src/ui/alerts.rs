//! The alerts panel, newest first.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use rigwatch_types::Severity;

use crate::app::App;

/// Render the alerts panel.
pub fn render_alerts(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let has_critical = app.ui.alerts.iter().any(|a| a.severity == Severity::Critical);

    let border_style = if has_critical {
        Style::default().fg(theme.critical)
    } else {
        Style::default().fg(theme.dim)
    };
    let block = Block::default()
        .title(format!(" ALERTS ({}) ", app.ui.alerts.len()))
        .borders(Borders::ALL)
        .border_type(theme.border_type)
        .border_style(border_style);

    if app.ui.alerts.is_empty() {
        let placeholder = Paragraph::new(Line::from(Span::styled(
            " no active alerts",
            Style::default().fg(theme.dim).add_modifier(Modifier::DIM),
        )))
        .block(block);
        frame.render_widget(placeholder, area);
        return;
    }

    // Two lines per alert; whatever fits in the panel, newest first.
    let capacity = (area.height.saturating_sub(2) / 2) as usize;
    let mut lines: Vec<Line> = Vec::new();
    for alert in app.ui.alerts.iter().take(capacity) {
        let style = theme.severity_style(alert.severity);
        lines.push(Line::from(vec![
            Span::styled(format!(" {} ", alert.severity.label()), style),
            Span::styled(
                format!("[RIG {}] ", alert.machine_id),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(alert.message.clone()),
        ]));
        let method = if alert.method.is_empty() {
            String::new()
        } else {
            format!(" | {}", alert.method.to_uppercase())
        };
        lines.push(Line::from(Span::styled(
            format!("      score {:.0}%{}", alert.score * 100.0, method),
            Style::default().fg(theme.dim),
        )));
    }

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
