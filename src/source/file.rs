//! File-based history source.
//!
//! Replays a saved `/history` response from disk.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::{parse_history, FetchError, HistoryRecord, HistorySource};

/// A history source that reads records from a JSON file.
///
/// The file holds the same array the HTTP endpoint returns. The file is
/// re-read on every fetch, so edits show up on the next tick. When the file
/// holds more than `limit` records, the last `limit` are returned.
#[derive(Debug)]
pub struct FileHistorySource {
    path: PathBuf,
    description: String,
}

impl FileHistorySource {
    /// Create a new file source for the given path.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let description = format!("file: {}", path.display());
        Self { path, description }
    }

    /// Returns the path being replayed.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl HistorySource for FileHistorySource {
    async fn fetch_history(&self, limit: usize) -> Result<Vec<HistoryRecord>, FetchError> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| FetchError::Io {
                path: self.path.clone(),
                source,
            })?;

        let mut records = parse_history(&content)?;
        if records.len() > limit {
            records = records.split_off(records.len() - limit);
        }
        Ok(records)
    }

    fn description(&self) -> &str {
        &self.description
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_history(count: usize) -> NamedTempFile {
        let records: Vec<HistoryRecord> = (0..count)
            .map(|i| HistoryRecord::new(format!("t{}", i), i as f64 * 0.1, "A (Good)"))
            .collect();
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", serde_json::to_string(&records).unwrap()).unwrap();
        file
    }

    #[test]
    fn test_file_source_new() {
        let source = FileHistorySource::new("/tmp/history.json");
        assert_eq!(source.path(), Path::new("/tmp/history.json"));
        assert_eq!(source.description(), "file: /tmp/history.json");
    }

    #[tokio::test]
    async fn test_file_source_reads_records() {
        let file = write_history(3);
        let source = FileHistorySource::new(file.path());

        let records = source.fetch_history(50).await.unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].timestamp, "t0");
        assert_eq!(records[2].timestamp, "t2");
    }

    #[tokio::test]
    async fn test_file_source_keeps_most_recent_window() {
        let file = write_history(60);
        let source = FileHistorySource::new(file.path());

        let records = source.fetch_history(50).await.unwrap();
        assert_eq!(records.len(), 50);
        assert_eq!(records[0].timestamp, "t10");
        assert_eq!(records[49].timestamp, "t59");
    }

    #[tokio::test]
    async fn test_file_source_missing_file() {
        let source = FileHistorySource::new("/nonexistent/path/history.json");

        let err = source.fetch_history(50).await.unwrap_err();
        assert!(matches!(err, FetchError::Io { .. }));
        assert!(err.to_string().contains("Failed to read"));
    }

    #[tokio::test]
    async fn test_file_source_invalid_json() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "not valid json").unwrap();

        let source = FileHistorySource::new(file.path());

        let err = source.fetch_history(50).await.unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));
        assert!(err.to_string().contains("Failed to parse"));
    }
}
