//! End-to-end tests for the chart controller pipeline.

use std::time::Duration;

use serde_json::json;

use chartsight::mock::{MockView, tagged_snapshot};
use chartsight::page::{EMBED_CLASS, HIDDEN_CLASS};
use chartsight::{ChartController, ChartEvent, ChartId, Selection, SnapshotFetcher, View};
use chartsight_common::{
    ChartSpec, ChartsightConfig, Result, SourceRecord, current_timestamp_millis, encode_category,
};

const LEGEND_SIGNAL: &str = "tags_legend";
const DOMAIN_SIGNAL: &str = "date_domain";

fn interactive_spec() -> ChartSpec {
    ChartSpec {
        category_field: "tags".to_string(),
        legend_signal: Some(LEGEND_SIGNAL.to_string()),
        domain_signal: Some(DOMAIN_SIGNAL.to_string()),
        ..ChartSpec::default()
    }
}

fn populated_view() -> MockView {
    MockView::new()
        .with_signal(LEGEND_SIGNAL, json!(null))
        .with_signal(DOMAIN_SIGNAL, json!([1_000, 5_000]))
        .with_color_scale(&["api", "web", ""], &["red", "green", "blue"])
        .with_source("source", tagged_snapshot(1_000, &[("api", 3), ("web", 5)]))
}

fn mounted(view: MockView, spec: ChartSpec) -> (ChartController, ChartId) {
    let mut controller = ChartController::new(ChartsightConfig::default());
    let id = ChartId::new("chart");
    controller.page_mut().install_chart(&id);
    controller.mount(id.clone(), spec, Box::new(view));
    (controller, id)
}

#[test]
fn test_empty_source_shows_empty_state() {
    let view = MockView::new()
        .with_signal(LEGEND_SIGNAL, json!(null))
        .with_color_scale(&["api"], &["red"])
        .with_source("source", Vec::new());
    let (controller, id) = mounted(view, interactive_spec());
    let page = controller.page();

    assert!(!page.has_class(&id.empty_id(), HIDDEN_CLASS));
    assert!(!page.has_class(&id.title_id(), HIDDEN_CLASS));
    assert!(page.has_class(id.as_str(), HIDDEN_CLASS));
    assert!(!page.has_class(id.as_str(), EMBED_CLASS));
    assert!(page.has_class(&id.legend_id(), HIDDEN_CLASS));
}

#[test]
fn test_populated_mount_renders_legend() {
    let (controller, id) = mounted(populated_view(), interactive_spec());
    let page = controller.page();

    assert!(page.has_class(&id.empty_id(), HIDDEN_CLASS));
    assert!(!page.has_class(id.as_str(), HIDDEN_CLASS));
    assert!(page.has_class(id.as_str(), EMBED_CLASS));
    assert!(page.has_class(&id.loading_id(), HIDDEN_CLASS));

    // One entry per distinct non-empty category in the scale domain
    let legend = page.legend(&id.legend_id());
    assert_eq!(legend.len(), 2);
    let labels: Vec<&str> = legend.iter().map(|e| e.label.as_str()).collect();
    assert_eq!(labels, ["api", "web"]);
}

#[test]
fn test_legend_click_pushes_decoded_category() {
    let (mut controller, id) = mounted(populated_view(), interactive_spec());

    controller.dispatch(ChartEvent::LegendItemClicked {
        chart: id.clone(),
        value: encode_category("api"),
        shift: false,
    });

    let entry = controller.registry().get(&id).unwrap();
    assert_eq!(
        *entry.selection.as_ref().unwrap().selection(),
        Selection::Single("api".to_string())
    );
    assert_eq!(entry.view.signal(LEGEND_SIGNAL), Some(json!("api")));

    // Background click returns to idle and clears the filter
    controller.dispatch(ChartEvent::ChartBackgroundClicked { chart: id.clone() });
    let entry = controller.registry().get(&id).unwrap();
    assert!(entry.selection.as_ref().unwrap().selection().is_idle());
    assert_eq!(entry.view.signal(LEGEND_SIGNAL), Some(json!(null)));
}

#[test]
fn test_mark_click_resolves_through_legend() {
    let (mut controller, id) = mounted(populated_view(), interactive_spec());

    controller.dispatch(ChartEvent::MarkClicked {
        chart: id.clone(),
        datum: Some(json!({"tags": "web", "count": 5})),
        shift: false,
    });

    let entry = controller.registry().get(&id).unwrap();
    assert_eq!(entry.view.signal(LEGEND_SIGNAL), Some(json!("web")));

    // A datum without a legend counterpart resolves nowhere and is ignored
    controller.dispatch(ChartEvent::MarkClicked {
        chart: id.clone(),
        datum: Some(json!({"tags": "worker"})),
        shift: true,
    });
    let entry = controller.registry().get(&id).unwrap();
    assert_eq!(entry.view.signal(LEGEND_SIGNAL), Some(json!("web")));
}

#[test]
fn test_multi_select_through_dispatch() {
    let (mut controller, id) = mounted(populated_view(), interactive_spec());

    controller.dispatch(ChartEvent::LegendItemClicked {
        chart: id.clone(),
        value: encode_category("api"),
        shift: false,
    });
    controller.dispatch(ChartEvent::LegendItemClicked {
        chart: id.clone(),
        value: encode_category("web"),
        shift: true,
    });

    let entry = controller.registry().get(&id).unwrap();
    assert_eq!(entry.view.signal(LEGEND_SIGNAL), Some(json!(["api", "web"])));

    let legend = controller.page().legend(&id.legend_id());
    assert!(legend.iter().all(|e| e.selected && !e.dimmed));
}

#[test]
fn test_legend_without_signal_is_render_only() {
    let spec = ChartSpec {
        category_field: "tags".to_string(),
        legend_signal: None,
        ..ChartSpec::default()
    };
    let (mut controller, id) = mounted(populated_view(), spec);

    // Legend rendered...
    assert_eq!(controller.page().legend(&id.legend_id()).len(), 2);

    // ...but clicks do nothing: no bindings, no selection, no signal write
    controller.dispatch(ChartEvent::LegendItemClicked {
        chart: id.clone(),
        value: encode_category("api"),
        shift: false,
    });

    let entry = controller.registry().get(&id).unwrap();
    assert!(entry.bindings.is_none());
    assert!(entry.selection.is_none());
    assert_eq!(entry.view.signal(LEGEND_SIGNAL), Some(json!(null)));
}

#[test]
fn test_snapshot_slides_domain_and_replaces_source() {
    let (mut controller, id) = mounted(populated_view(), interactive_spec());
    let before = current_timestamp_millis();

    let fresh = tagged_snapshot(before, &[("api", 9)]);
    controller.dispatch(ChartEvent::SnapshotReady {
        chart: id.clone(),
        records: fresh.clone(),
    });
    let after = current_timestamp_millis();

    let entry = controller.registry().get(&id).unwrap();
    assert_eq!(entry.view.source("source"), Some(fresh));

    // The window keeps its 4000 ms span and its right edge lands one
    // buffer past "now".
    let domain = entry.view.signal(DOMAIN_SIGNAL).unwrap();
    let bounds = domain.as_array().unwrap();
    let from = bounds[0].as_i64().unwrap();
    let to = bounds[1].as_i64().unwrap();
    assert_eq!(to - from, 4_000);
    assert!(to >= before + 60_000 && to <= after + 60_000);

    // Applying a snapshot also asks the host for a relayout
    assert!(controller.page().resize_notifications() >= 1);
}

#[test]
fn test_snapshot_transition_to_empty_hides_chart() {
    let (mut controller, id) = mounted(populated_view(), interactive_spec());

    controller.dispatch(ChartEvent::SnapshotReady {
        chart: id.clone(),
        records: tagged_snapshot(2_000, &[("api", 0), ("web", 0)]),
    });

    let page = controller.page();
    assert!(!page.has_class(&id.empty_id(), HIDDEN_CLASS));
    assert!(page.has_class(id.as_str(), HIDDEN_CLASS));
    assert!(page.has_class(&id.legend_id(), HIDDEN_CLASS));
}

#[test]
fn test_fullscreen_roundtrip_through_dispatch() {
    let view = populated_view().with_signal("height", json!(342.0));
    let (mut controller, id) = mounted(view, interactive_spec());
    controller.page_mut().set_viewport_height(1_000.0);

    controller.dispatch(ChartEvent::ToggleFullscreen { chart: id.clone() });
    {
        let entry = controller.registry().get(&id).unwrap();
        assert_eq!(entry.view.signal("height"), Some(json!(870.0)));
        assert_eq!(entry.saved_height, Some(json!(342.0)));
        assert!(controller.page().has_class(&id.container_id(), "fixed"));
    }

    controller.dispatch(ChartEvent::ToggleFullscreen { chart: id.clone() });
    let entry = controller.registry().get(&id).unwrap();
    assert_eq!(entry.view.signal("height"), Some(json!(342.0)));
    assert_eq!(entry.saved_height, None);
    assert!(!controller.page().has_class(&id.container_id(), "fixed"));
}

/// Serves the same snapshot on every poll.
#[derive(Clone)]
struct StaticFetcher {
    records: Vec<SourceRecord>,
}

impl SnapshotFetcher for StaticFetcher {
    async fn fetch(&self, _url: &str) -> Result<Vec<SourceRecord>> {
        Ok(self.records.clone())
    }
}

#[tokio::test(start_paused = true)]
async fn test_live_update_pipeline() {
    let mut config = ChartsightConfig::default();
    config.refresh_interval_ms = 100;

    let mut controller = ChartController::new(config);
    let id = ChartId::new("chart");
    controller.page_mut().install_chart(&id);

    let spec = ChartSpec {
        data_url: Some("http://example.test/tags.json".to_string()),
        category_field: "tags".to_string(),
        legend_signal: Some(LEGEND_SIGNAL.to_string()),
        domain_signal: Some(DOMAIN_SIGNAL.to_string()),
        ..ChartSpec::default()
    };
    controller.mount(id.clone(), spec, Box::new(populated_view()));

    let records = tagged_snapshot(9_000, &[("api", 4), ("web", 1)]);
    controller.start_live_updates(
        &id,
        StaticFetcher {
            records: records.clone(),
        },
    );

    assert!(controller.process_next().await);

    let entry = controller.registry().get(&id).unwrap();
    assert_eq!(entry.view.source("source"), Some(records));
    assert!(entry.live.is_some());
}

#[tokio::test]
async fn test_snapshot_after_unmount_is_dropped() {
    let (mut controller, id) = mounted(populated_view(), interactive_spec());
    let sender = controller.sender();

    controller.unmount(&id);
    assert!(controller.registry().is_empty());

    // A fetch that completed just before unmount delivers late; the event
    // must vanish without a panic.
    sender
        .send(ChartEvent::SnapshotReady {
            chart: id.clone(),
            records: tagged_snapshot(1_000, &[("api", 2)]),
        })
        .unwrap();
    assert!(controller.process_next().await);
    assert!(controller.registry().is_empty());
}
