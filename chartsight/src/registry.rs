//! Per-application chart registry.
//!
//! The orchestrator owns one registry; entries are created on mount and
//! removed on unmount. Nothing here is ambient module state, so independent
//! controllers (and tests) never contend.

use std::collections::HashMap;

use serde_json::Value;

use chartsight_common::ChartSpec;

use crate::event::ChartId;
use crate::legend::LegendBindings;
use crate::live::LiveSession;
use crate::runtime::View;
use crate::selection::SelectionController;

/// Everything the controller tracks for one mounted chart.
pub struct ChartEntry {
    /// The chart's declaration.
    pub spec: ChartSpec,
    /// Live handle into the visualization runtime.
    pub view: Box<dyn View>,
    /// Height signal value saved while the chart is fullscreen.
    ///
    /// Populated if and only if the chart is currently fullscreen.
    pub saved_height: Option<Value>,
    /// Selection state; present only when the spec names a legend signal.
    pub selection: Option<SelectionController>,
    /// Click-resolution table of the last rendered legend, if interactive.
    pub bindings: Option<LegendBindings>,
    /// Polling session; present only for charts with a data endpoint.
    pub live: Option<LiveSession>,
}

impl ChartEntry {
    pub fn new(spec: ChartSpec, view: Box<dyn View>) -> Self {
        let selection = spec.legend_signal.clone().map(SelectionController::new);
        Self {
            spec,
            view,
            saved_height: None,
            selection,
            bindings: None,
            live: None,
        }
    }
}

/// Map from chart id to its entry.
#[derive(Default)]
pub struct ViewRegistry {
    charts: HashMap<ChartId, ChartEntry>,
}

impl ViewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: ChartId, entry: ChartEntry) {
        self.charts.insert(id, entry);
    }

    pub fn get(&self, id: &ChartId) -> Option<&ChartEntry> {
        self.charts.get(id)
    }

    pub fn get_mut(&mut self, id: &ChartId) -> Option<&mut ChartEntry> {
        self.charts.get_mut(id)
    }

    /// Remove a chart's entry. Dropping the entry tears down its live
    /// session, if any.
    pub fn remove(&mut self, id: &ChartId) -> Option<ChartEntry> {
        self.charts.remove(id)
    }

    pub fn contains(&self, id: &ChartId) -> bool {
        self.charts.contains_key(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &ChartId> {
        self.charts.keys()
    }

    pub fn len(&self) -> usize {
        self.charts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.charts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockView;

    fn spec_with_legend() -> ChartSpec {
        ChartSpec {
            legend_signal: Some("tags_legend".to_string()),
            ..ChartSpec::default()
        }
    }

    #[test]
    fn test_entry_selection_follows_spec() {
        let with = ChartEntry::new(spec_with_legend(), Box::new(MockView::new()));
        assert!(with.selection.is_some());

        let without = ChartEntry::new(ChartSpec::default(), Box::new(MockView::new()));
        assert!(without.selection.is_none());
    }

    #[test]
    fn test_registry_lifecycle() {
        let mut registry = ViewRegistry::new();
        let id = ChartId::new("c1");

        assert!(registry.is_empty());

        registry.insert(
            id.clone(),
            ChartEntry::new(ChartSpec::default(), Box::new(MockView::new())),
        );
        assert!(registry.contains(&id));
        assert_eq!(registry.len(), 1);

        let removed = registry.remove(&id);
        assert!(removed.is_some());
        assert!(registry.is_empty());
        assert!(registry.get(&id).is_none());
    }
}
