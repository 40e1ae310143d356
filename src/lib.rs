// Library crate: public API items may not be used by the binary
#![allow(unused)]

//! # wearwatch
//!
//! A terminal dashboard for predictive-maintenance history.
//!
//! wearwatch polls the prediction service's `/history` endpoint every five
//! seconds for the 50 most recent readings, derives a remaining-useful-life
//! bucket and an anomaly flag from each, and plots three synchronized time
//! series: MSE, RUL and anomaly score.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  PollLoop (timer) ──▶ HistorySource ──▶ TickOutcome (mpsc)   │
//! │                                              │               │
//! │                                              ▼               │
//! │  Dashboard ──▶ DerivedSeries ──▶ ChartPresenter ×3 ──▶ ui    │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`source`]**: History sources ([`HistorySource`] trait) for the HTTP
//!   endpoint and for replay files
//! - **[`data`]**: RUL/anomaly derivation and classification severity
//! - **[`chart`]**: Per-chart configuration and series ([`ChartPresenter`])
//! - **[`poll`]**: The fixed-interval timer that drives fetches
//! - **[`app`]**: The [`Dashboard`] orchestrator that owns the charts
//! - **[`ui`]**: Terminal rendering using ratatui
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Poll the prediction service
//! wearwatch --endpoint http://localhost:5000
//!
//! # Replay a saved /history response
//! wearwatch --file history.json
//! ```
//!
//! ### As a library
//!
//! ```
//! use wearwatch::{Dashboard, HistoryRecord};
//!
//! let mut dashboard = Dashboard::new("example");
//! dashboard.apply_records(&[
//!     HistoryRecord::new("t1", 0.5, "A (Good)"),
//!     HistoryRecord::new("t2", 1.5, "D (Not Allowed)"),
//! ]);
//!
//! assert_eq!(dashboard.rul_chart.values(), &[80.0, 20.0]);
//! assert_eq!(dashboard.anomaly_chart.values(), &[0.0, 1.0]);
//! ```
//!
//! ### Polling a source
//!
//! ```no_run
//! use std::sync::Arc;
//! use wearwatch::{Dashboard, HttpHistorySource, PollLoop};
//!
//! # tokio_test::block_on(async {
//! let source = HttpHistorySource::builder()
//!     .endpoint("http://localhost:5000")
//!     .build()
//!     .unwrap();
//! let poll = PollLoop::start(Arc::new(source));
//! let mut dashboard = Dashboard::new("http: localhost").with_poll_loop(poll);
//! dashboard.reload_data();
//! # });
//! ```

pub mod app;
pub mod chart;
pub mod data;
pub mod events;
pub mod export;
pub mod poll;
pub mod settings;
pub mod source;
pub mod ui;

// Re-export main types for convenience
pub use app::{Dashboard, TickDisposition, View};
pub use chart::{ChartConfig, ChartKind, ChartPresenter};
pub use data::{derive_anomaly, derive_rul, DerivedPoint, DerivedSeries, Severity};
pub use export::ExportDocument;
pub use poll::{PollLoop, PollState, TickOutcome, HISTORY_LIMIT, POLL_INTERVAL};
pub use settings::Settings;
pub use source::{
    FetchError, FileHistorySource, HistoryRecord, HistorySource, HttpHistorySource,
};
