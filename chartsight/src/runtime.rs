//! Capability interface to the external visualization runtime.
//!
//! The runtime owns rendering, scales, and signal propagation; the
//! controller only talks to it through [`View`]. Implementations wrap
//! whatever handle the runtime hands back after embedding completes.

use chartsight_common::SourceRecord;
use serde_json::Value;

/// A categorical color scale: ordered domain and the colors assigned to it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ColorScale {
    /// Ordered category domain. Entries may be empty strings for
    /// unlabeled domain values.
    pub domain: Vec<String>,
    /// Ordered color range, cycled over the domain.
    pub range: Vec<String>,
}

impl ColorScale {
    pub fn new(domain: Vec<String>, range: Vec<String>) -> Self {
        Self { domain, range }
    }
}

/// A data-source mutation applied atomically: removals first, then inserts.
///
/// The live updater only ever replaces a source wholesale, so the removal
/// side is a remove-everything flag rather than a predicate.
#[derive(Debug, Clone, Default)]
pub struct Changeset {
    remove_all: bool,
    insert: Vec<SourceRecord>,
}

impl Changeset {
    /// A changeset that removes every existing record.
    pub fn remove_all() -> Self {
        Self {
            remove_all: true,
            insert: Vec::new(),
        }
    }

    /// Add records to insert after removals are applied.
    pub fn insert(mut self, records: Vec<SourceRecord>) -> Self {
        self.insert = records;
        self
    }

    pub fn removes_all(&self) -> bool {
        self.remove_all
    }

    pub fn inserted(&self) -> &[SourceRecord] {
        &self.insert
    }

    pub fn into_inserted(self) -> Vec<SourceRecord> {
        self.insert
    }
}

/// A live, reactive handle to one rendered chart.
///
/// Setting a signal does not redraw by itself; [`View::run`] applies pending
/// signal changes and re-renders, mirroring how reactive chart runtimes
/// batch updates.
pub trait View {
    /// Whether the view defines a signal with this name.
    fn has_signal(&self, name: &str) -> bool {
        self.signal(name).is_some()
    }

    /// Current value of a signal, if it exists.
    fn signal(&self, name: &str) -> Option<Value>;

    /// Stage a new value for a signal.
    fn set_signal(&mut self, name: &str, value: Value);

    /// Apply pending signal changes and re-render.
    fn run(&mut self);

    /// Whether the view carries a categorical color scale.
    fn has_color_scale(&self) -> bool {
        self.color_scale().is_some()
    }

    /// The view's color scale, if it has one.
    fn color_scale(&self) -> Option<ColorScale>;

    /// Snapshot of a named data source.
    fn source(&self, name: &str) -> Option<Vec<SourceRecord>>;

    /// Apply a changeset to a named data source.
    fn apply(&mut self, source: &str, changeset: Changeset);
}
