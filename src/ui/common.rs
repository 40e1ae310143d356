//! Common UI components shared across views.
//!
//! This module contains the header bar, tab bar, status bar, and help overlay.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs},
    Frame,
};

use crate::app::{Dashboard, View};
use crate::data::duration::format_age;
use crate::poll::PollState;

/// Render the header bar with a summary of the current window.
///
/// Displays: worst-severity symbol, record count, anomaly count,
/// worst classification, source.
pub fn render_header(frame: &mut Frame, app: &Dashboard, area: Rect) {
    if app.last_update.is_none() {
        let line = Line::from(vec![
            Span::styled(" WEARWATCH ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(format!("│ {}", app.source_description())),
        ]);
        frame.render_widget(Paragraph::new(line), area);
        return;
    }

    let (status_style, symbol, worst_label) = match app.worst {
        Some((severity, ref label)) => (
            app.theme.severity_style(severity),
            severity.symbol(),
            label.as_str(),
        ),
        None => (Style::default().add_modifier(Modifier::DIM), "-", "-"),
    };

    let anomalies = app.series.anomaly_count();
    let anomaly_span = if anomalies > 0 {
        Span::styled(
            anomalies.to_string(),
            Style::default().fg(app.theme.zone_critical).add_modifier(Modifier::BOLD),
        )
    } else {
        Span::styled("0", Style::default().add_modifier(Modifier::DIM))
    };

    let line = Line::from(vec![
        Span::styled(format!(" {} ", symbol), status_style),
        Span::styled("WEARWATCH ", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw("│ "),
        Span::styled(
            app.series.len().to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(" records │ "),
        anomaly_span,
        Span::raw(" anomalies │ worst: "),
        Span::styled(worst_label.to_string(), status_style),
        Span::raw(format!(" │ {}", app.source_description())),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

/// Render the tab bar showing available views.
///
/// Highlights the currently active view.
pub fn render_tabs(frame: &mut Frame, app: &Dashboard, area: Rect) {
    let titles: Vec<Line> = View::TABS
        .iter()
        .enumerate()
        .map(|(i, view)| Line::from(format!(" {}:{} ", i + 1, view.label())))
        .collect();

    let tabs = Tabs::new(titles)
        .select(app.current_view.index())
        .style(app.theme.tab_inactive)
        .highlight_style(app.theme.tab_active)
        .padding("", "")
        .divider("|");

    frame.render_widget(tabs, area);
}

/// Render the status bar at the bottom.
///
/// Shows: time since last update, fetch state, last error, controls.
/// Temporary status messages take precedence.
pub fn render_status_bar(frame: &mut Frame, app: &Dashboard, area: Rect) {
    if let Some(msg) = app.get_status_message() {
        let paragraph =
            Paragraph::new(format!(" {} ", msg)).style(Style::default().fg(app.theme.accent));
        frame.render_widget(paragraph, area);
        return;
    }

    let fetching = match app.poll_state() {
        PollState::Ticking => " | fetching...",
        PollState::Idle => "",
    };
    let controls = "Tab:switch r:refresh e:export ?:help q:quit";

    let status = match (&app.last_update, &app.load_error) {
        (Some(updated), Some(err)) => format!(
            " Updated {} ago | Last fetch failed: {}{} | {}",
            format_age(updated.elapsed()),
            err,
            fetching,
            controls
        ),
        (Some(updated), None) => format!(
            " Updated {} ago{} | {}",
            format_age(updated.elapsed()),
            fetching,
            controls
        ),
        (None, Some(err)) => format!(" Error: {}{} | r:retry q:quit", err, fetching),
        (None, None) => format!(" Waiting for first tick...{} | q:quit", fetching),
    };

    let style = if app.load_error.is_some() {
        Style::default().fg(app.theme.zone_alert)
    } else {
        Style::default().add_modifier(Modifier::DIM)
    };

    frame.render_widget(Paragraph::new(status).style(style), area);
}

/// Render the help overlay with keyboard shortcuts.
///
/// Displayed as a centered modal on top of the current view.
pub fn render_help(frame: &mut Frame, app: &Dashboard, area: Rect) {
    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.title)]),
        Line::from(""),
        Line::from(vec![Span::styled(
            " Views",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  1-4         Jump to view"),
        Line::from("  ←/→ h/l     Switch views"),
        Line::from("  Tab         Next view"),
        Line::from(""),
        Line::from(vec![Span::styled(
            " General",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from("  r         Refresh now"),
        Line::from("  e         Export to JSON"),
        Line::from("  q         Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.frame_type)
        .border_style(Style::default().fg(app.theme.accent));

    let paragraph = Paragraph::new(help_text).block(block);

    // Center the help overlay - responsive to terminal size
    let help_width = 40u16.min(area.width.saturating_sub(4));
    let help_height = 16u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(help_width)) / 2;
    let y = area.y + (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    frame.render_widget(ratatui::widgets::Clear, help_area);
    frame.render_widget(paragraph, help_area);
}
