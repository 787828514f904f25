//! Mock view and snapshot builders for testing.
//!
//! Provides a fully scriptable [`View`] implementation so the controller
//! can be exercised without a real visualization runtime or a browser.

use std::collections::HashMap;

use serde_json::Value;

use chartsight_common::SourceRecord;

use crate::runtime::{Changeset, ColorScale, View};

/// Scriptable in-memory view.
#[derive(Debug, Clone, Default)]
pub struct MockView {
    signals: HashMap<String, Value>,
    scale: Option<ColorScale>,
    sources: HashMap<String, Vec<SourceRecord>>,
    runs: u64,
}

impl MockView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Define a signal with an initial value.
    pub fn with_signal(mut self, name: impl Into<String>, value: Value) -> Self {
        self.signals.insert(name.into(), value);
        self
    }

    /// Define the color scale.
    pub fn with_color_scale(mut self, domain: &[&str], range: &[&str]) -> Self {
        self.scale = Some(ColorScale::new(
            domain.iter().map(|s| s.to_string()).collect(),
            range.iter().map(|s| s.to_string()).collect(),
        ));
        self
    }

    /// Define a data source with initial records.
    pub fn with_source(mut self, name: impl Into<String>, records: Vec<SourceRecord>) -> Self {
        self.sources.insert(name.into(), records);
        self
    }

    /// Number of times `run()` was called.
    pub fn runs(&self) -> u64 {
        self.runs
    }
}

impl View for MockView {
    fn signal(&self, name: &str) -> Option<Value> {
        self.signals.get(name).cloned()
    }

    fn set_signal(&mut self, name: &str, value: Value) {
        self.signals.insert(name.to_string(), value);
    }

    fn run(&mut self) {
        self.runs += 1;
    }

    fn color_scale(&self) -> Option<ColorScale> {
        self.scale.clone()
    }

    fn source(&self, name: &str) -> Option<Vec<SourceRecord>> {
        self.sources.get(name).cloned()
    }

    fn apply(&mut self, source: &str, changeset: Changeset) {
        let records = self.sources.entry(source.to_string()).or_default();
        if changeset.removes_all() {
            records.clear();
        }
        records.extend(changeset.into_inserted());
    }
}

/// Build snapshot records carrying a timestamp, a count, and a category tag.
pub fn tagged_snapshot(now_ms: i64, tags: &[(&str, i64)]) -> Vec<SourceRecord> {
    tags.iter()
        .map(|(tag, count)| {
            SourceRecord::new()
                .with_field("date", now_ms)
                .with_field("count", *count)
                .with_field("tags", *tag)
        })
        .collect()
}
