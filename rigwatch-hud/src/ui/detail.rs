//! The inspection overlay for the selected rig, fed by the 100 ms reader.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::App;

const OVERLAY_WIDTH: u16 = 40;
const OVERLAY_HEIGHT: u16 = 12;

/// Render the rig inspection panel as a modal overlay.
pub fn render_overlay(frame: &mut Frame, app: &App, area: Rect) {
    if area.width < OVERLAY_WIDTH + 4 || area.height < OVERLAY_HEIGHT {
        return;
    }

    let Some((rig_id, snapshot)) = &app.inspected else {
        // Selection made but the first detail tick has not landed yet.
        return;
    };
    let theme = &app.theme;
    let readout = app.thresholds.readout(snapshot);

    // Pin to the right edge, vertically centered, like a scope side panel.
    let x = area.x + area.width - OVERLAY_WIDTH - 2;
    let y = area.y + (area.height - OVERLAY_HEIGHT) / 2;
    let overlay = Rect::new(x, y, OVERLAY_WIDTH, OVERLAY_HEIGHT);

    frame.render_widget(Clear, overlay);

    let block = Block::default()
        .title(format!(" RIG {rig_id} INSPECTION "))
        .borders(Borders::ALL)
        .border_type(theme.border_type)
        .border_style(Style::default().fg(theme.highlight));

    let running = if snapshot.is_running {
        Span::styled("running", Style::default().fg(theme.nominal))
    } else {
        Span::styled("stopped", Style::default().fg(theme.warning))
    };

    let lines = vec![
        Line::from(vec![Span::raw(" State           "), running]),
        data_row(app, "RPM", format!("{:.0}", snapshot.rpm), false),
        data_row(
            app,
            "Temperature",
            format!("{:.1} °F", snapshot.temperature),
            readout.temp_hot,
        ),
        data_row(
            app,
            "Vibration",
            format!("{:.2} mm/s", snapshot.vibration),
            readout.vibration_elevated,
        ),
        data_row(app, "Pressure", format!("{:.0} PSI", snapshot.pressure), false),
        data_row(
            app,
            "Bearing Temp",
            format!("{:.0} °F", snapshot.bearing_temp),
            readout.bearing_hot,
        ),
        Line::from(Span::styled(
            " ─────────────────────────────────",
            Style::default().fg(theme.dim),
        )),
        data_row(
            app,
            "Anomaly Score",
            format!("{:.0} %", snapshot.anomaly_score * 100.0),
            readout.anomalous,
        ),
        Line::from(""),
        Line::from(Span::styled(
            " Esc to close",
            Style::default().fg(theme.dim).add_modifier(Modifier::DIM),
        )),
    ];

    frame.render_widget(Paragraph::new(lines).block(block), overlay);
}

fn data_row(app: &App, label: &str, value: String, flagged: bool) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!(" {label:<15} "),
            Style::default().fg(app.theme.dim),
        ),
        Span::styled(value, app.theme.reading_style(flagged)),
    ])
}
