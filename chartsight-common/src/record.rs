use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::{SystemTime, UNIX_EPOCH};

/// One row of a chart data source.
///
/// Snapshot endpoints return arbitrary JSON objects; the controller only
/// interprets a handful of well-known fields (`count` for emptiness checks,
/// the configured category field for legend resolution) and passes the rest
/// through to the view untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceRecord {
    fields: serde_json::Map<String, Value>,
}

impl SourceRecord {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field to this record.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Get a field by name.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// The record's `count` field, if present and numeric.
    pub fn count(&self) -> Option<f64> {
        self.fields.get("count").and_then(Value::as_f64)
    }

    /// The record's category under the given field name, as text.
    ///
    /// Numeric categories are stringified, matching how the runtime
    /// stringifies domain entries of a categorical scale.
    pub fn category(&self, field: &str) -> Option<String> {
        match self.fields.get(field)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

/// Classify a data source as empty.
///
/// A source is empty when it has no records at all, or when every record
/// carries an explicit `count` of zero. A record without a `count` field
/// makes the source non-empty: absence of the field is not treated as zero.
pub fn source_is_empty(records: &[SourceRecord]) -> bool {
    if records.is_empty() {
        return true;
    }
    records.iter().all(|r| r.count() == Some(0.0))
}

/// Get the current timestamp in milliseconds since Unix epoch.
///
/// Returns 0 if system time is before Unix epoch (should never happen in practice).
pub fn current_timestamp_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
