//! Signal derivation from raw history records.
//!
//! Two fixed rules turn each record into secondary signals:
//!
//! - [`derive_rul`] buckets the MSE into a remaining-useful-life estimate
//! - [`derive_anomaly`] flags records classified as `"D (Not Allowed)"`
//!
//! The thresholds are the ISO 10816 class I zone boundaries the prediction
//! service classifies with. The RUL values themselves are placeholders.

use serde::Serialize;

use crate::source::HistoryRecord;

/// Upper MSE bound of zone A (good).
pub const ZONE_A_MAX_MSE: f64 = 0.71;
/// Upper MSE bound of zone B (acceptable).
pub const ZONE_B_MAX_MSE: f64 = 1.12;
/// Upper MSE bound of zone C (alert). Anything above is zone D.
pub const ZONE_C_MAX_MSE: f64 = 1.8;

/// The classification label that raises the anomaly flag.
pub const ANOMALY_CLASSIFICATION: &str = "D (Not Allowed)";

/// Map an MSE value to a RUL estimate in days.
///
/// Each bucket includes its upper bound, so `0.71` maps to 80 and not 50.
/// Values that fail every comparison (NaN) land in the last bucket.
pub fn derive_rul(mse: f64) -> u32 {
    if mse <= ZONE_A_MAX_MSE {
        80
    } else if mse <= ZONE_B_MAX_MSE {
        50
    } else if mse <= ZONE_C_MAX_MSE {
        20
    } else {
        5
    }
}

/// Returns 1 when the classification is exactly `"D (Not Allowed)"`, else 0.
pub fn derive_anomaly(classification: &str) -> u8 {
    u8::from(classification == ANOMALY_CLASSIFICATION)
}

/// Derived signals for a single record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DerivedPoint {
    pub timestamp: String,
    pub rul: u32,
    pub anomaly: u8,
}

impl From<&HistoryRecord> for DerivedPoint {
    fn from(record: &HistoryRecord) -> Self {
        Self {
            timestamp: record.timestamp.clone(),
            rul: derive_rul(record.mse),
            anomaly: derive_anomaly(&record.classification),
        }
    }
}

/// Index-aligned series for one tick.
///
/// Every vector has one entry per fetched record, in fetch order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DerivedSeries {
    pub labels: Vec<String>,
    pub mse: Vec<f64>,
    pub rul: Vec<u32>,
    pub anomaly: Vec<u8>,
    /// Server-side RUL estimates, where the service sent them.
    pub server_rul: Vec<Option<f64>>,
}

impl DerivedSeries {
    /// Derive all series from a fetched window.
    pub fn from_records(records: &[HistoryRecord]) -> Self {
        let mut series = Self {
            labels: Vec::with_capacity(records.len()),
            mse: Vec::with_capacity(records.len()),
            rul: Vec::with_capacity(records.len()),
            anomaly: Vec::with_capacity(records.len()),
            server_rul: Vec::with_capacity(records.len()),
        };

        for record in records {
            let point = DerivedPoint::from(record);
            series.labels.push(point.timestamp);
            series.mse.push(record.mse);
            series.rul.push(point.rul);
            series.anomaly.push(point.anomaly);
            series.server_rul.push(record.rul_estimate);
        }

        series
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// RUL series as chart values.
    pub fn rul_values(&self) -> Vec<f64> {
        self.rul.iter().map(|&r| f64::from(r)).collect()
    }

    /// Anomaly series as chart values.
    pub fn anomaly_values(&self) -> Vec<f64> {
        self.anomaly.iter().map(|&a| f64::from(a)).collect()
    }

    /// Number of flagged records in the window.
    pub fn anomaly_count(&self) -> usize {
        self.anomaly.iter().filter(|&&a| a == 1).count()
    }

    /// Per-record derived points, in fetch order.
    pub fn points(&self) -> Vec<DerivedPoint> {
        self.labels
            .iter()
            .zip(&self.rul)
            .zip(&self.anomaly)
            .map(|((timestamp, &rul), &anomaly)| DerivedPoint {
                timestamp: timestamp.clone(),
                rul,
                anomaly,
            })
            .collect()
    }
}
