//! Chart presenters.
//!
//! A [`ChartPresenter`] owns one chart's fixed configuration and its current
//! series. The series is replaced wholesale on every update; rendering is
//! done by [`crate::ui::charts`] on the next frame.

use ratatui::style::Color;

/// The three charts shown by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Mse,
    Rul,
    Anomaly,
}

impl ChartKind {
    pub const ALL: [ChartKind; 3] = [ChartKind::Mse, ChartKind::Rul, ChartKind::Anomaly];

    /// Fixed configuration for this chart.
    pub fn config(self) -> ChartConfig {
        match self {
            ChartKind::Mse => ChartConfig {
                mount_id: "mseChart",
                series_label: "MSE",
                color: Color::Rgb(75, 192, 192),
                x_title: "Time",
                y_title: "MSE",
                y_bounds: None,
            },
            ChartKind::Rul => ChartConfig {
                mount_id: "rulChart",
                series_label: "RUL Prediction",
                color: Color::Rgb(54, 162, 235),
                x_title: "Time",
                y_title: "RUL (Days)",
                y_bounds: Some([0.0, 100.0]),
            },
            ChartKind::Anomaly => ChartConfig {
                mount_id: "anomalyChart",
                series_label: "Anomaly Score",
                color: Color::Rgb(255, 99, 132),
                x_title: "Time",
                y_title: "Anomaly Score",
                y_bounds: Some([0.0, 1.0]),
            },
        }
    }
}

/// Static configuration of a chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartConfig {
    /// Identifier of the pane the chart is mounted in.
    pub mount_id: &'static str,
    /// Legend label of the single series.
    pub series_label: &'static str,
    /// Line color.
    pub color: Color,
    pub x_title: &'static str,
    pub y_title: &'static str,
    /// Fixed y-axis bounds. `None` scales to the data.
    pub y_bounds: Option<[f64; 2]>,
}

/// One chart's configuration and current series.
#[derive(Debug, Clone)]
pub struct ChartPresenter {
    kind: ChartKind,
    config: ChartConfig,
    labels: Vec<String>,
    values: Vec<f64>,
}

impl ChartPresenter {
    /// Create a presenter with empty series.
    pub fn new(kind: ChartKind) -> Self {
        Self {
            kind,
            config: kind.config(),
            labels: Vec::new(),
            values: Vec::new(),
        }
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty() && self.values.is_empty()
    }

    /// Replace both series.
    ///
    /// Lengths are not checked against each other; plotting stops at the
    /// shorter of the two.
    pub fn update(&mut self, labels: Vec<String>, values: Vec<f64>) {
        self.labels = labels;
        self.values = values;
    }

    /// Plot points as `(index, value)`. Non-finite values are skipped.
    pub fn points(&self) -> Vec<(f64, f64)> {
        self.labels
            .iter()
            .zip(&self.values)
            .enumerate()
            .filter(|(_, (_, v))| v.is_finite())
            .map(|(i, (_, &v))| (i as f64, v))
            .collect()
    }

    /// X-axis bounds covering every plotted index.
    pub fn x_bounds(&self) -> [f64; 2] {
        let n = self.labels.len().min(self.values.len());
        [0.0, (n.saturating_sub(1)).max(1) as f64]
    }

    /// Y-axis bounds: fixed if configured, otherwise scaled to the data.
    pub fn y_bounds(&self) -> [f64; 2] {
        if let Some(bounds) = self.config.y_bounds {
            return bounds;
        }

        let finite = self.values.iter().copied().filter(|v| v.is_finite());
        let (min, max) = finite.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
        if min > max {
            return [0.0, 1.0];
        }

        let lo = min.min(0.0);
        let hi = max * 1.1;
        if hi <= lo {
            [lo, lo + 1.0]
        } else {
            [lo, hi]
        }
    }

    /// Time labels for the x axis: first, middle and last.
    ///
    /// A single point still gets two labels; the axis needs at least two.
    pub fn x_labels(&self) -> Vec<String> {
        let n = self.labels.len().min(self.values.len());
        match n {
            0 => Vec::new(),
            1 => vec![self.labels[0].clone(), String::new()],
            2 => vec![self.labels[0].clone(), self.labels[1].clone()],
            _ => vec![
                self.labels[0].clone(),
                self.labels[n / 2].clone(),
                self.labels[n - 1].clone(),
            ],
        }
    }

    /// Value labels for the y axis: low, middle and high bound.
    pub fn y_labels(&self) -> Vec<String> {
        let [lo, hi] = self.y_bounds();
        let mid = (lo + hi) / 2.0;
        match self.kind {
            ChartKind::Anomaly => vec!["0".to_string(), "1".to_string()],
            ChartKind::Rul => vec![format!("{:.0}", lo), format!("{:.0}", mid), format!("{:.0}", hi)],
            ChartKind::Mse => vec![format!("{:.2}", lo), format!("{:.2}", mid), format!("{:.2}", hi)],
        }
    }

    /// Most recent value in fetch order, if any.
    pub fn last_value(&self) -> Option<f64> {
        self.values.last().copied()
    }
}
