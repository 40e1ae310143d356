//! Dashboard state and tick handling.

use std::time::Instant;

use tracing::{debug, info, warn};

use crate::chart::{ChartKind, ChartPresenter};
use crate::data::{DerivedSeries, Severity};
use crate::export::ExportDocument;
use crate::poll::{PollLoop, PollState, TickOutcome};
use crate::source::HistoryRecord;
use crate::ui::Theme;

/// The current view/tab in the TUI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    /// All three charts stacked.
    All,
    /// A single chart at full size.
    Single(ChartKind),
}

impl View {
    pub const TABS: [View; 4] = [
        View::All,
        View::Single(ChartKind::Mse),
        View::Single(ChartKind::Rul),
        View::Single(ChartKind::Anomaly),
    ];

    /// Position of this view in the tab bar.
    pub fn index(self) -> usize {
        match self {
            View::All => 0,
            View::Single(ChartKind::Mse) => 1,
            View::Single(ChartKind::Rul) => 2,
            View::Single(ChartKind::Anomaly) => 3,
        }
    }

    /// Cycle to the next view.
    pub fn next(self) -> Self {
        Self::TABS[(self.index() + 1) % Self::TABS.len()]
    }

    /// Cycle to the previous view.
    pub fn prev(self) -> Self {
        Self::TABS[(self.index() + Self::TABS.len() - 1) % Self::TABS.len()]
    }

    /// Returns the display label for this view.
    pub fn label(&self) -> &'static str {
        match self {
            View::All => "All",
            View::Single(ChartKind::Mse) => "MSE",
            View::Single(ChartKind::Rul) => "RUL",
            View::Single(ChartKind::Anomaly) => "Anomaly",
        }
    }
}

/// What happened to a tick outcome handed to [`Dashboard::apply_outcome`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickDisposition {
    /// Charts replaced with this many records.
    Applied(usize),
    /// The fetch failed; charts left as they were.
    Failed(String),
    /// A newer tick was already applied.
    Stale,
}

/// Dashboard state: the three chart presenters, the poll loop feeding
/// them, and UI chrome.
pub struct Dashboard {
    pub running: bool,
    pub current_view: View,
    pub show_help: bool,

    source_description: String,
    poll: Option<PollLoop>,
    last_generation: u64,

    pub mse_chart: ChartPresenter,
    pub rul_chart: ChartPresenter,
    pub anomaly_chart: ChartPresenter,

    /// Series behind the charts, kept for the header and export.
    pub series: DerivedSeries,
    /// Worst classification in the current window.
    pub worst: Option<(Severity, String)>,
    pub last_update: Option<Instant>,
    pub load_error: Option<String>,

    // UI
    pub theme: Theme,

    // Status message (temporary feedback)
    pub status_message: Option<(String, Instant)>,
}

impl Dashboard {
    /// Create a dashboard with empty charts and no poll loop attached.
    pub fn new(source_description: impl Into<String>) -> Self {
        Self {
            running: true,
            current_view: View::All,
            show_help: false,
            source_description: source_description.into(),
            poll: None,
            last_generation: 0,
            mse_chart: ChartPresenter::new(ChartKind::Mse),
            rul_chart: ChartPresenter::new(ChartKind::Rul),
            anomaly_chart: ChartPresenter::new(ChartKind::Anomaly),
            series: DerivedSeries::default(),
            worst: None,
            last_update: None,
            load_error: None,
            theme: Theme::dark(),
            status_message: None,
        }
    }

    /// Attach the poll loop that feeds this dashboard.
    pub fn with_poll_loop(mut self, poll: PollLoop) -> Self {
        self.poll = Some(poll);
        self
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Returns a description of the history source.
    pub fn source_description(&self) -> &str {
        &self.source_description
    }

    /// Presenter for the given chart.
    pub fn presenter(&self, kind: ChartKind) -> &ChartPresenter {
        match kind {
            ChartKind::Mse => &self.mse_chart,
            ChartKind::Rul => &self.rul_chart,
            ChartKind::Anomaly => &self.anomaly_chart,
        }
    }

    /// Derive both signals from a window and replace all three charts.
    pub fn apply_records(&mut self, records: &[HistoryRecord]) {
        let series = DerivedSeries::from_records(records);

        self.mse_chart
            .update(series.labels.clone(), series.mse.clone());
        self.rul_chart
            .update(series.labels.clone(), series.rul_values());
        self.anomaly_chart
            .update(series.labels.clone(), series.anomaly_values());

        for kind in ChartKind::ALL {
            let chart = self.presenter(kind);
            debug!(chart = chart.config().mount_id, points = chart.values().len(), "chart updated");
        }

        self.worst = records
            .iter()
            .map(|r| (Severity::from_classification(&r.classification), r))
            .max_by_key(|(severity, _)| *severity)
            .map(|(severity, r)| (severity, r.classification.clone()));
        self.series = series;
    }

    /// Apply one tick's outcome.
    ///
    /// Failed ticks are logged and leave the charts untouched. Outcomes
    /// older than the last applied tick are dropped.
    pub fn apply_outcome(&mut self, outcome: TickOutcome) -> TickDisposition {
        if outcome.generation <= self.last_generation {
            debug!(
                generation = outcome.generation,
                applied = self.last_generation,
                "discarding stale tick"
            );
            return TickDisposition::Stale;
        }

        match outcome.result {
            Ok(records) => {
                self.last_generation = outcome.generation;
                self.apply_records(&records);
                self.last_update = Some(Instant::now());
                self.load_error = None;
                info!(
                    generation = outcome.generation,
                    records = records.len(),
                    elapsed_ms = outcome.elapsed.as_millis() as u64,
                    "applied history window"
                );
                TickDisposition::Applied(records.len())
            }
            Err(err) => {
                warn!(generation = outcome.generation, error = %err, "history fetch failed, skipping tick");
                let message = err.to_string();
                self.load_error = Some(message.clone());
                TickDisposition::Failed(message)
            }
        }
    }

    /// Drain finished ticks from the poll loop.
    ///
    /// Returns true if the charts changed.
    pub fn reload_data(&mut self) -> bool {
        let mut outcomes = Vec::new();
        if let Some(poll) = self.poll.as_mut() {
            while let Some(outcome) = poll.poll() {
                outcomes.push(outcome);
            }
        }

        let mut changed = false;
        for outcome in outcomes {
            if let TickDisposition::Applied(_) = self.apply_outcome(outcome) {
                changed = true;
            }
        }
        changed
    }

    /// Ask the poll loop for an immediate tick.
    pub fn refresh_now(&mut self) {
        if let Some(poll) = self.poll.as_ref() {
            poll.refresh();
            self.set_status_message("Refreshing...".to_string());
        }
    }

    /// Whether a fetch is in flight.
    pub fn poll_state(&self) -> PollState {
        self.poll.as_ref().map_or(PollState::Idle, PollLoop::state)
    }

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    /// Get the current status message if it hasn't expired (3 seconds).
    pub fn get_status_message(&self) -> Option<&str> {
        if let Some((msg, time)) = &self.status_message {
            if time.elapsed() < std::time::Duration::from_secs(3) {
                return Some(msg);
            }
        }
        None
    }

    /// Switch to the next view.
    pub fn next_view(&mut self) {
        self.current_view = self.current_view.next();
    }

    /// Switch to the previous view.
    pub fn prev_view(&mut self) {
        self.current_view = self.current_view.prev();
    }

    /// Switch to a specific view.
    pub fn set_view(&mut self, view: View) {
        self.current_view = view;
    }

    /// Toggle the help overlay.
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Signal the application to quit.
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Export the current window to a file.
    pub fn export_state(&self, path: &std::path::Path) -> anyhow::Result<()> {
        if self.last_update.is_none() {
            anyhow::bail!("No data to export");
        }
        ExportDocument::new(self.source_description.as_str(), &self.series).write_to(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::source::FetchError;

    fn outcome(generation: u64, records: Vec<HistoryRecord>) -> TickOutcome {
        TickOutcome {
            generation,
            result: Ok(records),
            elapsed: Duration::from_millis(3),
        }
    }

    fn two_records() -> Vec<HistoryRecord> {
        vec![
            HistoryRecord::new("t1", 0.5, "A"),
            HistoryRecord::new("t2", 1.5, "D (Not Allowed)"),
        ]
    }

    #[test]
    fn test_view_cycle() {
        let mut app = Dashboard::new("test");
        assert_eq!(app.current_view, View::All);
        app.next_view();
        assert_eq!(app.current_view, View::Single(ChartKind::Mse));
        app.prev_view();
        app.prev_view();
        assert_eq!(app.current_view, View::Single(ChartKind::Anomaly));
        assert_eq!(app.current_view.label(), "Anomaly");
    }

    #[test]
    fn test_end_to_end_tick() {
        let mut app = Dashboard::new("test");

        let disposition = app.apply_outcome(outcome(1, two_records()));

        assert_eq!(disposition, TickDisposition::Applied(2));
        assert_eq!(app.mse_chart.labels(), &["t1".to_string(), "t2".to_string()]);
        assert_eq!(app.mse_chart.values(), &[0.5, 1.5]);
        assert_eq!(app.rul_chart.labels(), app.mse_chart.labels());
        assert_eq!(app.rul_chart.values(), &[80.0, 20.0]);
        assert_eq!(app.anomaly_chart.labels(), app.mse_chart.labels());
        assert_eq!(app.anomaly_chart.values(), &[0.0, 1.0]);
        assert_eq!(
            app.worst,
            Some((Severity::Critical, "D (Not Allowed)".to_string()))
        );
        assert!(app.last_update.is_some());
    }

    #[test]
    fn test_empty_tick_clears_charts() {
        let mut app = Dashboard::new("test");
        app.apply_outcome(outcome(1, two_records()));

        let disposition = app.apply_outcome(outcome(2, Vec::new()));

        assert_eq!(disposition, TickDisposition::Applied(0));
        for kind in ChartKind::ALL {
            assert!(app.presenter(kind).is_empty());
        }
        assert!(app.worst.is_none());
    }

    #[test]
    fn test_every_chart_gets_full_window() {
        let records: Vec<HistoryRecord> = (0..50)
            .map(|i| HistoryRecord::new(format!("t{}", i), i as f64 * 0.05, "B (Acceptable)"))
            .collect();
        let mut app = Dashboard::new("test");

        app.apply_records(&records);

        for kind in ChartKind::ALL {
            let chart = app.presenter(kind);
            assert_eq!(chart.labels().len(), 50);
            assert_eq!(chart.values().len(), 50);
            assert_eq!(chart.labels()[7], "t7");
        }
    }

    #[test]
    fn test_failed_tick_keeps_previous_data() {
        let mut app = Dashboard::new("test");
        app.apply_outcome(outcome(1, two_records()));

        let disposition = app.apply_outcome(TickOutcome {
            generation: 2,
            result: Err(FetchError::Status(500)),
            elapsed: Duration::from_millis(3),
        });

        assert!(matches!(disposition, TickDisposition::Failed(_)));
        assert_eq!(app.mse_chart.values(), &[0.5, 1.5]);
        assert_eq!(
            app.load_error.as_deref(),
            Some("History endpoint returned status 500")
        );

        app.apply_outcome(outcome(3, two_records()));
        assert!(app.load_error.is_none());
    }

    #[test]
    fn test_stale_tick_is_discarded() {
        let mut app = Dashboard::new("test");
        app.apply_outcome(outcome(3, two_records()));

        let disposition =
            app.apply_outcome(outcome(2, vec![HistoryRecord::new("old", 9.0, "D (Not Allowed)")]));

        assert_eq!(disposition, TickDisposition::Stale);
        assert_eq!(app.mse_chart.labels()[0], "t1");
    }

    #[test]
    fn test_failed_newer_tick_does_not_block_older_success() {
        let mut app = Dashboard::new("test");
        app.apply_outcome(TickOutcome {
            generation: 2,
            result: Err(FetchError::Timeout),
            elapsed: Duration::from_millis(3),
        });

        let disposition = app.apply_outcome(outcome(1, two_records()));
        assert_eq!(disposition, TickDisposition::Applied(2));
    }

    #[test]
    fn test_export_requires_data() {
        let app = Dashboard::new("test");
        let dir = tempfile::tempdir().unwrap();
        assert!(app.export_state(&dir.path().join("out.json")).is_err());
    }

    #[test]
    fn test_export_state() {
        let mut app = Dashboard::new("file: history.json");
        app.apply_outcome(outcome(1, two_records()));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        app.export_state(&path).unwrap();

        let doc: ExportDocument =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(doc.source, "file: history.json");
        assert_eq!(doc.labels, vec!["t1", "t2"]);
        assert_eq!(doc.anomaly, vec![0, 1]);
    }

    #[test]
    fn test_status_message() {
        let mut app = Dashboard::new("test");
        assert!(app.get_status_message().is_none());
        app.set_status_message("Exported".to_string());
        assert_eq!(app.get_status_message(), Some("Exported"));
    }
}
