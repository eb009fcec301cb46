//! Terminal rendering for the HUD panels.

mod alerts;
mod detail;
mod stats;
mod status;
mod theme;

pub use theme::Theme;

use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::App;

/// Minimum terminal size for a usable display.
pub const MIN_WIDTH: u16 = 70;
pub const MIN_HEIGHT: u16 = 14;

/// Render the whole overlay.
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        render_too_small(frame, area);
        return;
    }

    let chunks = Layout::vertical([
        Constraint::Length(1), // Status header
        Constraint::Min(8),    // Content
        Constraint::Length(1), // Controls hint
    ])
    .split(area);

    status::render_header(frame, app, chunks[0]);

    let content = Layout::horizontal([
        Constraint::Percentage(58), // Rig summary
        Constraint::Percentage(42), // Alerts
    ])
    .split(chunks[1]);

    stats::render_summary(frame, app, content[0]);
    alerts::render_alerts(frame, app, content[1]);

    render_controls_hint(frame, app, chunks[2]);

    if app.ui.selected_rig.is_some() {
        detail::render_overlay(frame, app, area);
    } else {
        render_crosshair(frame, app, content[0]);
    }

    if app.ui.show_debug {
        render_debug_overlay(frame, app, area);
    }

    if app.show_help {
        render_help(frame, app, area);
    }
}

fn render_too_small(frame: &mut Frame, area: Rect) {
    let msg = format!(
        "Terminal too small: {}x{}\nMinimum: {}x{}\n\nResize to continue",
        area.width, area.height, MIN_WIDTH, MIN_HEIGHT
    );
    let paragraph = Paragraph::new(msg)
        .alignment(Alignment::Center)
        .style(Style::default().fg(ratatui::style::Color::Yellow));
    let centered = Rect::new(0, area.height.saturating_sub(4) / 2, area.width, 5);
    frame.render_widget(paragraph, centered);
}

/// Render the controls hint line, or a temporary status message.
fn render_controls_hint(frame: &mut Frame, app: &App, area: Rect) {
    if let Some(message) = app.get_status_message() {
        let paragraph = Paragraph::new(format!(" {message} "))
            .style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    let dim = Style::default().fg(app.theme.dim);
    let key = Style::default().fg(app.theme.highlight);
    let line = Line::from(vec![
        Span::styled(" 1-9", key),
        Span::styled(" inspect │ ", dim),
        Span::styled("Tab", key),
        Span::styled(" cycle │ ", dim),
        Span::styled("Esc", key),
        Span::styled(" close │ ", dim),
        Span::styled("x", key),
        Span::styled(" dismiss │ ", dim),
        Span::styled("C", key),
        Span::styled(" clear alerts │ ", dim),
        Span::styled("p", key),
        Span::styled(" pause │ ", dim),
        Span::styled("d", key),
        Span::styled(" debug │ ", dim),
        Span::styled("?", key),
        Span::styled(" help │ ", dim),
        Span::styled("q", key),
        Span::styled(" quit", dim),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

/// Render a small reticle at the center of the content area.
fn render_crosshair(frame: &mut Frame, app: &App, area: Rect) {
    if area.width < 9 || area.height < 3 {
        return;
    }
    let center = Rect::new(
        area.x + area.width / 2 - 4,
        area.y + area.height / 2,
        9,
        1,
    );
    let line = Line::from(Span::styled(
        "─┤ · ├─",
        Style::default().fg(app.theme.highlight).add_modifier(Modifier::DIM),
    ));
    frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), center);
}

/// Render the raw reactive state as an overlay, for debugging.
fn render_debug_overlay(frame: &mut Frame, app: &App, area: Rect) {
    let width = (area.width * 2 / 3).clamp(40, 90);
    let height = (area.height * 2 / 3).clamp(10, 30);
    let overlay = centered(area, width, height);

    frame.render_widget(Clear, overlay);
    let block = Block::default()
        .title(" Debug: UiState ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.warning));
    let text = format!("{:#?}", app.ui);
    frame.render_widget(Paragraph::new(text).block(block), overlay);
}

/// Render the help overlay.
fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let overlay = centered(area, 46, 14);
    frame.render_widget(Clear, overlay);

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let lines = vec![
        Line::from(""),
        Line::from("  1-9        inspect rig by position"),
        Line::from("  Tab        cycle inspected rig"),
        Line::from("  Esc        close inspection"),
        Line::from("  x          dismiss newest alert"),
        Line::from("  C          clear all alerts"),
        Line::from("  p          pause panel refresh"),
        Line::from("  d          toggle debug overlay"),
        Line::from("  q          quit"),
        Line::from(""),
        Line::from(Span::styled(
            "  press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )),
    ];
    frame.render_widget(Paragraph::new(lines).block(block), overlay);
}

/// A rect of the given size centered in `area`.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
