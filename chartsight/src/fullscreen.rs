//! Fullscreen toggling for chart containers.
//!
//! Whether a chart is fullscreen is derived from its container's classes,
//! never from separate stored state; the saved height lives in the chart's
//! registry entry only while fullscreen is active, and the two are always
//! mutated together.

use serde_json::json;

use crate::event::ChartId;
use crate::page::{FULLSCREEN_CHROME_PX, FULLSCREEN_CLASSES, HIDDEN_CLASS, INLINE_CLASSES, Page};
use crate::registry::ChartEntry;

/// Name of the view's height signal.
pub const HEIGHT_SIGNAL: &str = "height";

/// Class whose presence marks a container as fullscreen.
const FULLSCREEN_MARKER: &str = "fixed";

/// Flip a chart between inline and fullscreen layout.
pub fn toggle(page: &mut Page, entry: &mut ChartEntry, id: &ChartId) {
    let container_id = id.container_id();
    if page.element(&container_id).is_none() {
        tracing::debug!(chart = %id, "No container element; fullscreen toggle ignored");
        return;
    }

    if page.has_class(&container_id, FULLSCREEN_MARKER) {
        leave(page, entry, id, &container_id);
    } else {
        enter(page, entry, id, &container_id);
    }

    // The runtime recalculates layout off the host's resize event.
    page.request_resize();
}

fn enter(page: &mut Page, entry: &mut ChartEntry, id: &ChartId, container_id: &str) {
    for class in INLINE_CLASSES {
        page.remove_class(container_id, class);
    }
    for class in FULLSCREEN_CLASSES {
        page.add_class(container_id, class);
    }
    page.remove_class(&id.close_id(), HIDDEN_CLASS);

    entry.saved_height = entry.view.signal(HEIGHT_SIGNAL);
    let height = page.viewport_height() - FULLSCREEN_CHROME_PX;
    entry.view.set_signal(HEIGHT_SIGNAL, json!(height));

    tracing::debug!(chart = %id, height, "Entered fullscreen");
}

fn leave(page: &mut Page, entry: &mut ChartEntry, id: &ChartId, container_id: &str) {
    for class in FULLSCREEN_CLASSES {
        page.remove_class(container_id, class);
    }
    for class in INLINE_CLASSES {
        page.add_class(container_id, class);
    }
    page.add_class(&id.close_id(), HIDDEN_CLASS);

    if let Some(height) = entry.saved_height.take() {
        entry.view.set_signal(HEIGHT_SIGNAL, height);
    }

    tracing::debug!(chart = %id, "Left fullscreen");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockView;
    use chartsight_common::ChartSpec;
    use serde_json::json;

    fn setup(height: f64) -> (Page, ChartEntry, ChartId) {
        let mut page = Page::new();
        let id = ChartId::new("c1");
        page.install_chart(&id);
        page.set_viewport_height(900.0);

        let view = MockView::new().with_signal(HEIGHT_SIGNAL, json!(height));
        let entry = ChartEntry::new(ChartSpec::default(), Box::new(view));
        (page, entry, id)
    }

    #[test]
    fn test_roundtrip_restores_height() {
        let (mut page, mut entry, id) = setup(342.0);

        toggle(&mut page, &mut entry, &id);
        assert_eq!(entry.view.signal(HEIGHT_SIGNAL), Some(json!(770.0)));
        assert_eq!(entry.saved_height, Some(json!(342.0)));

        toggle(&mut page, &mut entry, &id);
        assert_eq!(entry.view.signal(HEIGHT_SIGNAL), Some(json!(342.0)));
        assert_eq!(entry.saved_height, None);
    }

    #[test]
    fn test_container_classes_flip() {
        let (mut page, mut entry, id) = setup(300.0);
        let container_id = id.container_id();

        toggle(&mut page, &mut entry, &id);
        assert!(page.has_class(&container_id, "fixed"));
        assert!(!page.has_class(&container_id, "relative"));
        assert!(!page.has_class(&id.close_id(), HIDDEN_CLASS));

        toggle(&mut page, &mut entry, &id);
        assert!(!page.has_class(&container_id, "fixed"));
        assert!(page.has_class(&container_id, "relative"));
        assert!(page.has_class(&id.close_id(), HIDDEN_CLASS));
    }

    #[test]
    fn test_each_toggle_requests_resize() {
        let (mut page, mut entry, id) = setup(300.0);

        toggle(&mut page, &mut entry, &id);
        toggle(&mut page, &mut entry, &id);

        assert_eq!(page.resize_notifications(), 2);
    }

    #[test]
    fn test_missing_container_is_ignored() {
        let mut page = Page::new();
        let id = ChartId::new("ghost");
        let view = MockView::new().with_signal(HEIGHT_SIGNAL, json!(200.0));
        let mut entry = ChartEntry::new(ChartSpec::default(), Box::new(view));

        toggle(&mut page, &mut entry, &id);

        assert_eq!(entry.saved_height, None);
        assert_eq!(entry.view.signal(HEIGHT_SIGNAL), Some(json!(200.0)));
        assert_eq!(page.resize_notifications(), 0);
    }
}
