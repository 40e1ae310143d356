//! Data models and signal derivation for history windows.
//!
//! ## Submodules
//!
//! - [`duration`]: Parsing and formatting of duration strings (e.g., "5s", "250ms")
//! - [`severity`]: Severity of ISO 10816 classification labels
//! - [`signal`]: RUL and anomaly derivation ([`DerivedSeries`])
//!
//! ## Data Flow
//!
//! ```text
//! Vec<HistoryRecord> (one tick)
//!        │
//!        ▼
//! DerivedSeries::from_records()
//!        │
//!        ├──▶ labels + mse      ──▶ MSE chart
//!        ├──▶ derive_rul()      ──▶ RUL chart
//!        └──▶ derive_anomaly()  ──▶ anomaly chart
//! ```

pub mod duration;
pub mod severity;
pub mod signal;

pub use severity::Severity;
pub use signal::{derive_anomaly, derive_rul, DerivedPoint, DerivedSeries};
