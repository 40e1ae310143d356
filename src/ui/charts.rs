//! Line charts for the three derived series.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::Style,
    symbols,
    text::Line,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};

use crate::app::{Dashboard, View};
use crate::chart::{ChartKind, ChartPresenter};

/// Render the charts for the current view.
pub fn render(frame: &mut Frame, app: &Dashboard, area: Rect) {
    match app.current_view {
        View::All => {
            let panes = Layout::vertical([
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
            ])
            .split(area);

            for (kind, pane) in ChartKind::ALL.into_iter().zip(panes.iter()) {
                render_chart(frame, app, app.presenter(kind), *pane);
            }
        }
        View::Single(kind) => render_chart(frame, app, app.presenter(kind), area),
    }
}

/// Render one presenter's series as a line chart.
fn render_chart(frame: &mut Frame, app: &Dashboard, chart: &ChartPresenter, area: Rect) {
    let config = chart.config();
    let points = chart.points();

    let latest = chart
        .last_value()
        .map(|v| format!(" last {:.2}", v))
        .unwrap_or_default();
    let title = format!(" {}{} ", config.series_label, latest);

    let dataset = Dataset::default()
        .name(config.series_label)
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(config.color))
        .data(&points);

    let x_labels: Vec<Line> = chart.x_labels().into_iter().map(Line::from).collect();
    let y_labels: Vec<Line> = chart.y_labels().into_iter().map(Line::from).collect();

    let widget = Chart::new(vec![dataset])
        .block(
            Block::default()
                .title(Line::styled(title, app.theme.title))
                .borders(Borders::ALL)
                .border_type(app.theme.frame_type)
                .border_style(Style::default().fg(app.theme.frame)),
        )
        .x_axis(
            Axis::default()
                .title(config.x_title)
                .style(app.theme.axis)
                .bounds(chart.x_bounds())
                .labels(x_labels),
        )
        .y_axis(
            Axis::default()
                .title(config.y_title)
                .style(app.theme.axis)
                .bounds(chart.y_bounds())
                .labels(y_labels),
        );

    frame.render_widget(widget, area);
}
