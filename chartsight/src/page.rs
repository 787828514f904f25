//! In-memory mirror of the host page.
//!
//! The embedding host owns the real markup; the controller tracks the parts
//! it mutates (visibility classes, legend entries, data attributes) in this
//! mirror and the host syncs it back to the document. Every operation on an
//! id that is not registered is a no-op: markup may legitimately omit
//! optional regions, and a snapshot landing after teardown must fail
//! silently rather than throw.

use std::collections::{BTreeSet, HashMap};

use crate::event::ChartId;

/// Class hiding an element.
pub const HIDDEN_CLASS: &str = "hidden";

/// Class marking the chart element as an active runtime embed.
pub const EMBED_CLASS: &str = "vega-embed";

/// Class de-emphasizing a legend item while another is selected.
pub const DIMMED_CLASS: &str = "opacity-50";

/// Classes applied to a chart container while it is fullscreen.
pub const FULLSCREEN_CLASSES: &[&str] = &[
    "fixed",
    "top-0",
    "left-0",
    "bottom-0",
    "right-0",
    "overflow-y-auto",
    "overflow-x-hidden",
    "z-10",
    "overscroll-contain",
    "dark:bg-neutral-900",
];

/// Classes applied to a chart container while it is inline.
pub const INLINE_CLASSES: &[&str] = &["relative", "dark:bg-black/40"];

/// Height reserved for fixed chrome when a chart goes fullscreen, in pixels.
pub const FULLSCREEN_CHROME_PX: f64 = 130.0;

/// One rendered legend item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegendEntry {
    /// Encoded category token carried in the item's `data-value` attribute.
    pub value: String,
    /// Decoded category text shown as the label.
    pub label: String,
    /// Swatch color.
    pub color: String,
    /// Whether the item is part of the active selection.
    pub selected: bool,
    /// Whether the item is visually de-emphasized.
    pub dimmed: bool,
}

impl LegendEntry {
    pub fn new(value: impl Into<String>, label: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            color: color.into(),
            selected: false,
            dimmed: false,
        }
    }
}

/// Mutable state of one tracked element.
#[derive(Debug, Clone, Default)]
pub struct ElementState {
    classes: BTreeSet<String>,
    attrs: HashMap<String, String>,
    legend: Vec<LegendEntry>,
}

impl ElementState {
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    pub fn add_class(&mut self, class: &str) {
        self.classes.insert(class.to_string());
    }

    pub fn remove_class(&mut self, class: &str) {
        self.classes.remove(class);
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attrs.insert(name.into(), value.into());
    }

    pub fn legend(&self) -> &[LegendEntry] {
        &self.legend
    }
}

/// The tracked host page: elements keyed by id plus viewport metadata.
#[derive(Debug)]
pub struct Page {
    elements: HashMap<String, ElementState>,
    viewport_height: f64,
    resize_notifications: u64,
}

impl Default for Page {
    fn default() -> Self {
        Self {
            elements: HashMap::new(),
            viewport_height: 768.0,
            resize_notifications: 0,
        }
    }
}

impl Page {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an element id, creating empty state for it.
    pub fn register(&mut self, id: impl Into<String>) -> &mut ElementState {
        self.elements.entry(id.into()).or_default()
    }

    /// Register the standard element set for one chart.
    ///
    /// Initial visibility matches freshly served markup: loading shown,
    /// empty state and close button hidden, container inline.
    pub fn install_chart(&mut self, id: &ChartId) {
        self.register(id.as_str());
        self.register(id.legend_id());
        self.register(id.title_id());

        let empty = self.register(id.empty_id());
        empty.add_class(HIDDEN_CLASS);

        self.register(id.loading_id());

        let close = self.register(id.close_id());
        close.add_class(HIDDEN_CLASS);

        let container = self.register(id.container_id());
        for class in INLINE_CLASSES {
            container.add_class(class);
        }
    }

    pub fn element(&self, id: &str) -> Option<&ElementState> {
        self.elements.get(id)
    }

    pub fn element_mut(&mut self, id: &str) -> Option<&mut ElementState> {
        self.elements.get_mut(id)
    }

    pub fn has_class(&self, id: &str, class: &str) -> bool {
        self.elements
            .get(id)
            .is_some_and(|e| e.has_class(class))
    }

    pub fn add_class(&mut self, id: &str, class: &str) {
        if let Some(element) = self.elements.get_mut(id) {
            element.add_class(class);
        }
    }

    pub fn remove_class(&mut self, id: &str, class: &str) {
        if let Some(element) = self.elements.get_mut(id) {
            element.remove_class(class);
        }
    }

    /// Replace the legend entries mounted under the given legend element.
    pub fn set_legend(&mut self, legend_id: &str, entries: Vec<LegendEntry>) {
        if let Some(element) = self.elements.get_mut(legend_id) {
            element.legend = entries;
        }
    }

    /// Legend entries currently mounted under the given legend element.
    pub fn legend(&self, legend_id: &str) -> &[LegendEntry] {
        self.elements
            .get(legend_id)
            .map(|e| e.legend.as_slice())
            .unwrap_or(&[])
    }

    pub fn legend_mut(&mut self, legend_id: &str) -> Option<&mut Vec<LegendEntry>> {
        self.elements.get_mut(legend_id).map(|e| &mut e.legend)
    }

    /// Viewport height reported by the host, in pixels.
    pub fn viewport_height(&self) -> f64 {
        self.viewport_height
    }

    pub fn set_viewport_height(&mut self, height: f64) {
        self.viewport_height = height;
    }

    /// Ask the host to dispatch a global resize notification so the
    /// runtime recalculates layout.
    pub fn request_resize(&mut self) {
        self.resize_notifications += 1;
    }

    /// Number of resize notifications requested so far.
    pub fn resize_notifications(&self) -> u64 {
        self.resize_notifications
    }
}
