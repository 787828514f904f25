//! Legend selection state machine.
//!
//! One controller per chart with an interactive legend. Every transition
//! pushes the new selection into the view's filter signal and runs the
//! view; no other component writes that signal.

use serde_json::Value;

use crate::page::Page;
use crate::runtime::View;

/// The active selection.
///
/// Multi-selection keeps accretion order; an empty multi-set is never
/// represented, it collapses back to `Idle`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    /// Nothing selected, filter signal cleared.
    #[default]
    Idle,
    /// Exactly one category selected.
    Single(String),
    /// Two or more accreted categories (never empty).
    Multi(Vec<String>),
}

impl Selection {
    /// Whether the given category is part of the selection.
    pub fn contains(&self, category: &str) -> bool {
        match self {
            Selection::Idle => false,
            Selection::Single(c) => c == category,
            Selection::Multi(set) => set.iter().any(|c| c == category),
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Selection::Idle)
    }
}

/// Owns selection state for one chart and mediates all selection changes.
#[derive(Debug, Clone)]
pub struct SelectionController {
    /// Name of the view's legend filter signal.
    signal: String,
    selection: Selection,
}

impl SelectionController {
    pub fn new(signal: impl Into<String>) -> Self {
        Self {
            signal: signal.into(),
            selection: Selection::Idle,
        }
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn signal_name(&self) -> &str {
        &self.signal
    }

    /// Handle a click on a legend category, from a legend item or a mark.
    pub fn handle_click(
        &mut self,
        page: &mut Page,
        view: &mut dyn View,
        legend_id: &str,
        category: &str,
        shift: bool,
    ) {
        if shift {
            self.toggle_multi(page, view, legend_id, category);
        } else {
            self.click_single(page, view, legend_id, category);
        }
    }

    /// Clear the selection (background click, or explicit reset).
    pub fn reset(&mut self, page: &mut Page, view: &mut dyn View, legend_id: &str) {
        self.selection = Selection::Idle;
        self.commit(page, view, legend_id);
    }

    /// Re-apply the current selection after a full legend replace.
    ///
    /// Categories that no longer exist in the rendered legend are pruned;
    /// a selection pruned to nothing collapses to `Idle` and clears the
    /// filter signal. An idle selection leaves the fresh legend untouched.
    pub fn reapply(&mut self, page: &mut Page, view: &mut dyn View, legend_id: &str) {
        if self.selection.is_idle() {
            return;
        }

        let pruned = match std::mem::take(&mut self.selection) {
            Selection::Idle => Selection::Idle,
            Selection::Single(category) => {
                if page.legend(legend_id).iter().any(|e| e.label == category) {
                    Selection::Single(category)
                } else {
                    Selection::Idle
                }
            }
            Selection::Multi(set) => {
                let kept: Vec<String> = set
                    .into_iter()
                    .filter(|category| {
                        page.legend(legend_id).iter().any(|e| &e.label == category)
                    })
                    .collect();
                normalize_multi(kept)
            }
        };

        self.selection = pruned;
        self.commit(page, view, legend_id);
    }

    fn click_single(&mut self, page: &mut Page, view: &mut dyn View, legend_id: &str, category: &str) {
        if self.selection.contains(category) {
            self.reset(page, view, legend_id);
            return;
        }
        self.selection = Selection::Single(category.to_string());
        self.commit(page, view, legend_id);
    }

    fn toggle_multi(&mut self, page: &mut Page, view: &mut dyn View, legend_id: &str, category: &str) {
        let mut set = match std::mem::take(&mut self.selection) {
            Selection::Idle => Vec::new(),
            Selection::Single(c) => vec![c],
            Selection::Multi(set) => set,
        };

        if let Some(position) = set.iter().position(|c| c == category) {
            set.remove(position);
        } else {
            set.push(category.to_string());
        }

        self.selection = normalize_multi(set);
        self.commit(page, view, legend_id);
    }

    /// Push the selection into the view and sync legend item emphasis.
    fn commit(&self, page: &mut Page, view: &mut dyn View, legend_id: &str) {
        let active = !self.selection.is_idle();
        if let Some(entries) = page.legend_mut(legend_id) {
            for entry in entries.iter_mut() {
                let selected = active && self.selection.contains(&entry.label);
                entry.selected = selected;
                entry.dimmed = active && !selected;
            }
        }

        let value = match &self.selection {
            Selection::Idle => Value::Null,
            Selection::Single(category) => Value::String(category.clone()),
            Selection::Multi(set) => {
                Value::Array(set.iter().map(|c| Value::String(c.clone())).collect())
            }
        };

        tracing::debug!(signal = %self.signal, value = %value, "Selection changed");
        view.set_signal(&self.signal, value);
        view.run();
    }
}

fn normalize_multi(set: Vec<String>) -> Selection {
    if set.is_empty() {
        Selection::Idle
    } else {
        Selection::Multi(set)
    }
}
