//! JSON export of the current window.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::data::DerivedSeries;

/// Serialized form of one tick's charts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportDocument {
    /// Description of the history source.
    pub source: String,
    pub count: usize,
    pub labels: Vec<String>,
    pub mse: Vec<f64>,
    pub rul: Vec<u32>,
    pub anomaly: Vec<u8>,
    /// Server-side RUL estimates, omitted when the service sent none.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub server_rul: Vec<Option<f64>>,
}

impl ExportDocument {
    pub fn new(source: impl Into<String>, series: &DerivedSeries) -> Self {
        let server_rul = if series.server_rul.iter().any(Option::is_some) {
            series.server_rul.clone()
        } else {
            Vec::new()
        };

        Self {
            source: source.into(),
            count: series.len(),
            labels: series.labels.clone(),
            mse: series.mse.clone(),
            rul: series.rul.clone(),
            anomaly: series.anomaly.clone(),
            server_rul,
        }
    }

    /// Write the document as pretty-printed JSON.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write export to {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::HistoryRecord;

    #[test]
    fn test_export_document() {
        let series = DerivedSeries::from_records(&[
            HistoryRecord::new("t1", 0.5, "A"),
            HistoryRecord::new("t2", 1.5, "D (Not Allowed)"),
        ]);

        let doc = ExportDocument::new("file: history.json", &series);

        assert_eq!(doc.count, 2);
        assert_eq!(doc.rul, vec![80, 20]);
        assert_eq!(doc.anomaly, vec![0, 1]);
        assert!(doc.server_rul.is_empty());
    }

    #[test]
    fn test_export_writes_json() {
        let mut record = HistoryRecord::new("t1", 2.5, "D (Not Allowed)");
        record.rul_estimate = Some(20.0);
        let series = DerivedSeries::from_records(&[record]);
        let doc = ExportDocument::new("http: http://localhost:5000", &series);

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("export.json");
        doc.write_to(&path).unwrap();

        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["count"], 1);
        assert_eq!(json["rul"][0], 5);
        assert_eq!(json["server_rul"][0], 20.0);

        let round: ExportDocument = serde_json::from_value(json).unwrap();
        assert_eq!(round, doc);
    }

    #[test]
    fn test_export_to_missing_dir_fails() {
        let doc = ExportDocument::new("test", &DerivedSeries::default());
        let err = doc.write_to(Path::new("/nonexistent/dir/export.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to write export"));
    }
}
