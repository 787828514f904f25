//! Legend rendering and click resolution.
//!
//! The legend mirrors the view's color scale: one entry per non-empty
//! category, colors cycled over the scale range in sorted-category order.
//! Rendering fully replaces legend content; the click-resolution table is
//! rebuilt from scratch on every replace so stale entries can never be
//! resolved against a newer legend.

use chartsight_common::{decode_category, encode_category};
use serde_json::Value;

use crate::event::ChartId;
use crate::page::{HIDDEN_CLASS, LegendEntry, Page};
use crate::runtime::View;

/// Sort key for legend categories.
///
/// Categories that parse as integers order numerically and ahead of
/// everything else; the rest compare as opaque strings. This keeps legend
/// order stable and reproducible regardless of the runtime's internal
/// domain order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum CategoryKey {
    Number(i64),
    Text(String),
}

fn category_key(category: &str) -> CategoryKey {
    category
        .parse::<i64>()
        .map(CategoryKey::Number)
        .unwrap_or_else(|_| CategoryKey::Text(category.to_string()))
}

/// Sort a category domain numerically where possible, lexically otherwise.
pub fn sort_categories(domain: &[String]) -> Vec<String> {
    let mut sorted = domain.to_vec();
    sorted.sort_by(|a, b| category_key(a).cmp(&category_key(b)));
    sorted
}

/// Assign palette colors to the sorted domain, dropping unlabeled entries.
///
/// The color index is the entry's position in the sorted domain *before*
/// unlabeled entries are dropped, so legend swatches stay consistent with
/// the colors the runtime picked for its marks.
pub fn assign_colors(domain: &[String], palette: &[String]) -> Vec<(String, String)> {
    if palette.is_empty() {
        return Vec::new();
    }

    sort_categories(domain)
        .into_iter()
        .enumerate()
        .filter_map(|(index, category)| {
            if category.is_empty() {
                return None;
            }
            let color = palette[index % palette.len()].clone();
            Some((category, color))
        })
        .collect()
}

/// Render the legend for a chart, if it applies.
///
/// Returns whether a render occurred. No legend element or no color scale
/// means no legend applies. A mounted legend whose entry count already
/// matches the scale's domain length is left untouched.
pub fn render_legend(page: &mut Page, id: &ChartId, view: &dyn View) -> bool {
    let legend_id = id.legend_id();
    if page.element(&legend_id).is_none() {
        return false;
    }
    let Some(scale) = view.color_scale() else {
        return false;
    };

    page.remove_class(&legend_id, HIDDEN_CLASS);

    let mounted = page.legend(&legend_id).len();
    if mounted != 0 && mounted == scale.domain.len() {
        return false;
    }

    let entries: Vec<LegendEntry> = assign_colors(&scale.domain, &scale.range)
        .into_iter()
        .map(|(category, color)| LegendEntry::new(encode_category(&category), category, color))
        .collect();

    tracing::debug!(chart = %id, entries = entries.len(), "Rendered legend");
    page.set_legend(&legend_id, entries);
    true
}

/// Click-resolution table for one rendered legend.
///
/// Built only when the view exposes both the color scale and the legend
/// filter signal; a spec or runtime that lacks either leaves the legend
/// rendered but non-interactive.
#[derive(Debug, Clone, Default)]
pub struct LegendBindings {
    items: Vec<BoundItem>,
}

#[derive(Debug, Clone)]
struct BoundItem {
    /// Encoded token as carried by the legend entry.
    value: String,
    /// Decoded category pushed into the filter signal.
    category: String,
}

impl LegendBindings {
    /// Resolve a clicked legend item's encoded token to its category.
    pub fn category_for_value(&self, value: &str) -> Option<&str> {
        self.items
            .iter()
            .find(|item| item.value == value)
            .map(|item| item.category.as_str())
    }

    /// Resolve a clicked mark's datum to a legend category.
    ///
    /// The datum's category field is re-encoded and matched against the
    /// rendered entries; a datum whose category has no legend item does not
    /// resolve.
    pub fn category_for_datum(&self, datum: &Value, category_field: &str) -> Option<&str> {
        let raw = match datum.get(category_field)? {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            _ => return None,
        };
        let value = encode_category(&raw);
        self.category_for_value(&value)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Build the click-resolution table for a freshly rendered legend.
pub fn bind_legend(
    page: &Page,
    id: &ChartId,
    view: &dyn View,
    legend_signal: Option<&str>,
) -> Option<LegendBindings> {
    let signal = legend_signal?;
    if !view.has_color_scale() {
        return None;
    }
    if !view.has_signal(signal) {
        tracing::debug!(chart = %id, signal, "View lacks legend signal; legend left non-interactive");
        return None;
    }

    let legend_id = id.legend_id();
    if page.element(&legend_id).is_none() {
        return None;
    }

    let items = page
        .legend(&legend_id)
        .iter()
        .filter_map(|entry| {
            let category = decode_category(&entry.value).ok()?;
            Some(BoundItem {
                value: entry.value.clone(),
                category,
            })
        })
        .collect();

    Some(LegendBindings { items })
}
