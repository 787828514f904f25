//! Headless demo simulation.
//!
//! Mounts a mock chart and drives it the way an embedding host would:
//! snapshots arrive from a simulated endpoint on the live-update interval,
//! and scripted interactions land between ticks.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde_json::{Value, json};

use chartsight_common::{
    ChartSpec, ChartsightConfig, Result, SourceRecord, current_timestamp_millis,
};

use crate::controller::ChartController;
use crate::event::{ChartEvent, ChartId};
use crate::live::SnapshotFetcher;
use crate::mock::{MockView, tagged_snapshot};

const DEMO_TAGS: &[&str] = &["api", "web", "worker"];
const DEMO_PALETTE: &[&str] = &["#4c78a8", "#f58518", "#e45756"];

/// Simulated snapshot endpoint with jittered counts.
#[derive(Debug, Clone, Default)]
pub struct DemoFetcher;

impl SnapshotFetcher for DemoFetcher {
    async fn fetch(&self, _url: &str) -> Result<Vec<SourceRecord>> {
        let mut rng = SmallRng::from_os_rng();
        let now = current_timestamp_millis();
        let tags: Vec<(&str, i64)> = DEMO_TAGS
            .iter()
            .map(|tag| (*tag, rng.random_range(0i64..40)))
            .collect();
        Ok(tagged_snapshot(now, &tags))
    }
}

/// Run the demo: mount a chart, process `ticks` snapshots while exercising
/// the legend and fullscreen paths, then unmount.
pub async fn run(config: ChartsightConfig, ticks: u64) -> anyhow::Result<()> {
    let mut controller = ChartController::new(config);
    let id = ChartId::new("demo");
    controller.page_mut().install_chart(&id);

    let spec = ChartSpec {
        data_url: Some("demo://tags".to_string()),
        category_field: "tags".to_string(),
        legend_signal: Some("tags_legend".to_string()),
        domain_signal: Some("date_domain".to_string()),
        title: Some("Requests by tag".to_string()),
        ..ChartSpec::default()
    };

    let now = current_timestamp_millis();
    let view = MockView::new()
        .with_signal("height", json!(300.0))
        .with_signal("tags_legend", Value::Null)
        .with_signal("date_domain", json!([now - 240_000, now]))
        .with_color_scale(DEMO_TAGS, DEMO_PALETTE)
        .with_source(
            "source",
            tagged_snapshot(now, &[("api", 3), ("web", 5), ("worker", 2)]),
        );

    controller.mount(id.clone(), spec, Box::new(view));
    controller.start_live_updates(&id, DemoFetcher);

    for tick in 0..ticks {
        if !controller.process_next().await {
            break;
        }

        match tick {
            0 => {
                // Select the first legend category
                if let Some(entry) = controller.page().legend(&id.legend_id()).first() {
                    let value = entry.value.clone();
                    controller.dispatch(ChartEvent::LegendItemClicked {
                        chart: id.clone(),
                        value,
                        shift: false,
                    });
                }
            }
            1 => {
                // Accrete a second category into a multi-selection
                if let Some(entry) = controller.page().legend(&id.legend_id()).get(1) {
                    let value = entry.value.clone();
                    controller.dispatch(ChartEvent::LegendItemClicked {
                        chart: id.clone(),
                        value,
                        shift: true,
                    });
                }
            }
            2 => controller.dispatch(ChartEvent::ToggleFullscreen { chart: id.clone() }),
            3 => {
                controller.dispatch(ChartEvent::ToggleFullscreen { chart: id.clone() });
                controller.dispatch(ChartEvent::ChartBackgroundClicked { chart: id.clone() });
            }
            _ => {}
        }

        if let Some(selection) = controller
            .registry()
            .get(&id)
            .and_then(|entry| entry.selection.as_ref())
        {
            tracing::info!(
                tick,
                selection = ?selection.selection(),
                resizes = controller.page().resize_notifications(),
                "Processed snapshot"
            );
        }
    }

    controller.unmount(&id);
    tracing::info!("Demo complete");
    Ok(())
}
