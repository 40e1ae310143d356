//! History sources for the dashboard.
//!
//! This module provides a trait-based abstraction for fetching a bounded
//! window of history records, either from the live HTTP endpoint or from a
//! replay file.

mod error;
mod file;
mod http;
mod record;

pub use error::FetchError;
pub use file::FileHistorySource;
pub use http::{HttpHistorySource, HttpHistorySourceBuilder, DEFAULT_ENDPOINT};
pub use record::{parse_history, HistoryRecord};

use std::fmt::Debug;

use async_trait::async_trait;

/// Trait for fetching history windows from various backends.
///
/// Implementations are stateless between calls, so a single source can
/// serve overlapping ticks from several tasks at once.
///
/// # Example
///
/// ```no_run
/// use wearwatch::{FileHistorySource, HistorySource};
///
/// # tokio_test::block_on(async {
/// let source = FileHistorySource::new("history.json");
/// let records = source.fetch_history(50).await.unwrap();
/// println!("Got {} records", records.len());
/// # });
/// ```
#[async_trait]
pub trait HistorySource: Send + Sync + Debug {
    /// Fetch at most `limit` of the most recent records.
    ///
    /// The returned order is the backend's order. An empty window is valid.
    async fn fetch_history(&self, limit: usize) -> Result<Vec<HistoryRecord>, FetchError>;

    /// Returns a human-readable description of the source.
    ///
    /// Used for display in the TUI header and in exports.
    fn description(&self) -> &str;
}
