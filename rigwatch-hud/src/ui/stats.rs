//! The aggregate rig summary table, fed by the 500 ms reader.

use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::Span,
    widgets::{Block, Borders, Cell, Row, Table},
    Frame,
};

use crate::app::App;

/// Render the per-rig summary table.
pub fn render_summary(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;

    let header = Row::new(vec![
        Cell::from("RIG"),
        Cell::from("RPM"),
        Cell::from("TEMP °F"),
        Cell::from("VIB mm/s"),
        Cell::from("PSI"),
        Cell::from("BRG °F"),
        Cell::from("SCORE"),
        Cell::from(""),
    ])
    .height(1)
    .style(theme.header);

    let rows: Vec<Row> = app
        .stats
        .iter()
        .map(|(rig_id, snapshot)| {
            let readout = app.thresholds.readout(snapshot);

            let id_style = if readout.anomalous {
                Style::default().fg(theme.critical).add_modifier(Modifier::BOLD)
            } else {
                Style::default().add_modifier(Modifier::BOLD)
            };
            let flag = if readout.anomalous {
                Cell::from(Span::styled(
                    "⚠ ANOMALY",
                    Style::default().fg(theme.critical).add_modifier(Modifier::BOLD),
                ))
            } else if !snapshot.is_running {
                Cell::from(Span::styled("stopped", Style::default().fg(theme.dim)))
            } else {
                Cell::from("")
            };

            let row = Row::new(vec![
                Cell::from(Span::styled(rig_id.clone(), id_style)),
                Cell::from(Span::styled(
                    format!("{:.0}", snapshot.rpm),
                    Style::default().fg(theme.highlight),
                )),
                Cell::from(Span::styled(
                    format!("{:.1}", snapshot.temperature),
                    theme.reading_style(readout.temp_hot),
                )),
                Cell::from(Span::styled(
                    format!("{:.2}", snapshot.vibration),
                    if readout.vibration_elevated {
                        Style::default().fg(theme.warning)
                    } else {
                        Style::default().fg(theme.nominal)
                    },
                )),
                Cell::from(format!("{:.0}", snapshot.pressure)),
                Cell::from(Span::styled(
                    format!("{:.0}", snapshot.bearing_temp),
                    theme.reading_style(readout.bearing_hot),
                )),
                Cell::from(Span::styled(
                    format!("{:.0}%", snapshot.anomaly_score * 100.0),
                    theme.reading_style(readout.anomalous),
                )),
                flag,
            ]);

            if app.ui.selected_rig.as_deref() == Some(rig_id.as_str()) {
                row.style(theme.selected)
            } else {
                row
            }
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(4),
            Constraint::Length(6),
            Constraint::Length(8),
            Constraint::Length(9),
            Constraint::Length(5),
            Constraint::Length(7),
            Constraint::Length(6),
            Constraint::Min(9),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .title(" RIG STATUS ")
            .borders(Borders::ALL)
            .border_type(theme.border_type)
            .border_style(Style::default().fg(theme.dim)),
    );

    frame.render_widget(table, area);
}
