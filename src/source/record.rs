//! History record wire format.
//!
//! The history service returns a JSON array of readings. Each reading is
//! usually an object:
//!
//! ```json
//! { "timestamp": "2024-10-15 10:00:00", "mse": 0.42, "classification": "A (Good)" }
//! ```
//!
//! Services that serialise database rows directly send arrays instead,
//! optionally with the server's own RUL estimate as a fourth column:
//!
//! ```json
//! ["2024-10-15 10:00:00", 0.42, "A (Good)", 100]
//! ```
//!
//! Both forms decode into [`HistoryRecord`].

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::FetchError;

/// Field names, in row column order.
const COLUMNS: [&str; 4] = ["timestamp", "mse", "classification", "rul_estimate"];

/// One reading from the history endpoint.
///
/// Records have no identity beyond their position in the fetched window and
/// live for a single poll tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Value")]
pub struct HistoryRecord {
    /// Timestamp label as sent by the server. Never parsed.
    pub timestamp: String,
    /// Reconstruction mean squared error.
    pub mse: f64,
    /// ISO 10816 classification label, e.g. `"C (Alert)"`.
    pub classification: String,
    /// The server's own RUL estimate, when it sends one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rul_estimate: Option<f64>,
}

impl HistoryRecord {
    /// Create a record without a server-side RUL estimate.
    pub fn new(timestamp: impl Into<String>, mse: f64, classification: impl Into<String>) -> Self {
        Self {
            timestamp: timestamp.into(),
            mse,
            classification: classification.into(),
            rul_estimate: None,
        }
    }
}

/// Decodes either wire form. Errors name the offending field.
impl TryFrom<Value> for HistoryRecord {
    type Error = String;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let columns: Vec<Option<Value>> = match value {
            Value::Array(row) if row.len() == 3 || row.len() == 4 => {
                row.into_iter().map(Some).collect()
            }
            Value::Array(row) => {
                return Err(format!("expected 3 or 4 columns, found {}", row.len()));
            }
            Value::Object(mut fields) => COLUMNS.iter().map(|name| fields.remove(*name)).collect(),
            other => return Err(format!("expected an object or a row, found {}", kind(&other))),
        };
        let mut columns = columns.into_iter();
        let mut next = || columns.next().flatten();

        let timestamp = required(COLUMNS[0], next())?;
        let mse = required(COLUMNS[1], next())?;
        let classification = required(COLUMNS[2], next())?;
        let rul_estimate = match next() {
            None | Some(Value::Null) => None,
            Some(value) => Some(field(COLUMNS[3], value)?),
        };

        Ok(Self {
            timestamp,
            mse,
            classification,
            rul_estimate,
        })
    }
}

fn required<T: DeserializeOwned>(name: &str, value: Option<Value>) -> Result<T, String> {
    match value {
        Some(value) => field(name, value),
        None => Err(format!("missing field `{}`", name)),
    }
}

fn field<T: DeserializeOwned>(name: &str, value: Value) -> Result<T, String> {
    serde_json::from_value(value).map_err(|e| format!("field `{}`: {}", name, e))
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Parse a history response body.
///
/// The body must be a JSON array; an empty array is a valid, empty window.
/// A bad record fails the whole window, with its index in the message.
pub fn parse_history(body: &str) -> Result<Vec<HistoryRecord>, FetchError> {
    let values: Vec<Value> = serde_json::from_str(body)?;
    values
        .into_iter()
        .enumerate()
        .map(|(index, value)| {
            HistoryRecord::try_from(value)
                .map_err(|e| FetchError::Decode(format!("record {}: {}", index, e)))
        })
        .collect()
}
