//! Per-application chart orchestration.
//!
//! One [`ChartController`] wires the whole pipeline for every mounted
//! chart: empty-source classification, legend render and bind, selection,
//! fullscreen, and live updates. The embedding host forwards user
//! interactions as [`ChartEvent`]s; snapshot events from live sessions
//! arrive on the controller's own channel.
//!
//! Dispatch is strictly sequential: a legend render and its rebind complete
//! before the next event is observed, so a click can never reach a stale
//! binding table.

use std::time::Duration;

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use chartsight_common::{
    ChartSpec, ChartsightConfig, SourceRecord, current_timestamp_millis, source_is_empty,
};

use crate::event::{ChartEvent, ChartId};
use crate::fullscreen;
use crate::legend;
use crate::live::{LiveSession, SnapshotFetcher, domain_bounds, slide_domain};
use crate::page::{EMBED_CLASS, HIDDEN_CLASS, Page};
use crate::registry::{ChartEntry, ViewRegistry};
use crate::runtime::{Changeset, View};

/// Orchestrates all mounted charts of one application.
pub struct ChartController {
    config: ChartsightConfig,
    page: Page,
    registry: ViewRegistry,
    events_tx: UnboundedSender<ChartEvent>,
    events_rx: UnboundedReceiver<ChartEvent>,
}

impl ChartController {
    pub fn new(config: ChartsightConfig) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            config,
            page: Page::new(),
            registry: ViewRegistry::new(),
            events_tx,
            events_rx,
        }
    }

    pub fn config(&self) -> &ChartsightConfig {
        &self.config
    }

    pub fn page(&self) -> &Page {
        &self.page
    }

    pub fn page_mut(&mut self) -> &mut Page {
        &mut self.page
    }

    pub fn registry(&self) -> &ViewRegistry {
        &self.registry
    }

    /// A sender the embedding host can use to queue events from other tasks.
    pub fn sender(&self) -> UnboundedSender<ChartEvent> {
        self.events_tx.clone()
    }

    /// Mount a chart.
    ///
    /// Call once the runtime's asynchronous embed has completed and handed
    /// back the view; mounting hides the loading indicator and runs the
    /// empty/legend pipeline against the view's initial data.
    pub fn mount(&mut self, id: ChartId, spec: ChartSpec, view: Box<dyn View>) {
        tracing::info!(chart = %id, live = spec.data_url.is_some(), "Mounting chart");

        self.registry.insert(id.clone(), ChartEntry::new(spec, view));
        self.page.add_class(&id.loading_id(), HIDDEN_CLASS);
        self.refresh_side_elements(&id);
    }

    /// Start polling the chart's data endpoint, if its spec names one.
    pub fn start_live_updates<F>(&mut self, id: &ChartId, fetcher: F)
    where
        F: SnapshotFetcher,
    {
        let interval = Duration::from_millis(self.config.refresh_interval_ms);
        let events = self.events_tx.clone();

        let Some(entry) = self.registry.get_mut(id) else {
            tracing::warn!(chart = %id, "Cannot start live updates for unmounted chart");
            return;
        };
        let Some(url) = entry.spec.data_url.clone() else {
            tracing::debug!(chart = %id, "Chart has no data endpoint; live updates not started");
            return;
        };

        entry.live = Some(LiveSession::spawn(
            id.clone(),
            url,
            interval,
            fetcher,
            events,
        ));
        tracing::info!(chart = %id, interval_ms = self.config.refresh_interval_ms, "Started live updates");
    }

    /// Unmount a chart, tearing down its live session.
    pub fn unmount(&mut self, id: &ChartId) {
        match self.registry.remove(id) {
            Some(_entry) => tracing::info!(chart = %id, "Unmounted chart"),
            None => tracing::debug!(chart = %id, "Unmount for unknown chart ignored"),
        }
    }

    /// Handle one event.
    pub fn dispatch(&mut self, event: ChartEvent) {
        match event {
            ChartEvent::LegendItemClicked {
                chart,
                value,
                shift,
            } => self.handle_legend_click(&chart, &value, shift),
            ChartEvent::MarkClicked {
                chart,
                datum,
                shift,
            } => self.handle_mark_click(&chart, datum, shift),
            ChartEvent::ChartBackgroundClicked { chart }
            | ChartEvent::LegendBackgroundClicked { chart } => self.handle_reset(&chart),
            ChartEvent::ToggleFullscreen { chart } => self.handle_toggle_fullscreen(&chart),
            ChartEvent::SnapshotReady { chart, records } => self.apply_snapshot(&chart, records),
        }
    }

    /// Wait for the next queued event and handle it.
    ///
    /// Returns whether an event was processed.
    pub async fn process_next(&mut self) -> bool {
        match self.events_rx.recv().await {
            Some(event) => {
                self.dispatch(event);
                true
            }
            None => false,
        }
    }

    fn handle_legend_click(&mut self, chart: &ChartId, value: &str, shift: bool) {
        let Some(entry) = self.registry.get_mut(chart) else {
            tracing::debug!(chart = %chart, "Dropping legend click for unmounted chart");
            return;
        };
        let Some(bindings) = entry.bindings.as_ref() else {
            tracing::debug!(chart = %chart, "Legend is not interactive; click ignored");
            return;
        };
        let Some(category) = bindings.category_for_value(value).map(str::to_string) else {
            tracing::debug!(chart = %chart, value, "Click on unknown legend value ignored");
            return;
        };
        let Some(selection) = entry.selection.as_mut() else {
            return;
        };

        selection.handle_click(
            &mut self.page,
            entry.view.as_mut(),
            &chart.legend_id(),
            &category,
            shift,
        );
    }

    fn handle_mark_click(&mut self, chart: &ChartId, datum: Option<serde_json::Value>, shift: bool) {
        let Some(datum) = datum else {
            return;
        };
        let Some(entry) = self.registry.get_mut(chart) else {
            tracing::debug!(chart = %chart, "Dropping mark click for unmounted chart");
            return;
        };
        let Some(bindings) = entry.bindings.as_ref() else {
            return;
        };
        let Some(category) = bindings
            .category_for_datum(&datum, &entry.spec.category_field)
            .map(str::to_string)
        else {
            return;
        };
        let Some(selection) = entry.selection.as_mut() else {
            return;
        };

        selection.handle_click(
            &mut self.page,
            entry.view.as_mut(),
            &chart.legend_id(),
            &category,
            shift,
        );
    }

    fn handle_reset(&mut self, chart: &ChartId) {
        let Some(entry) = self.registry.get_mut(chart) else {
            tracing::debug!(chart = %chart, "Dropping background click for unmounted chart");
            return;
        };
        // Background clicks only clear selection on interactive legends.
        if entry.bindings.is_none() {
            return;
        }
        let Some(selection) = entry.selection.as_mut() else {
            return;
        };

        selection.reset(&mut self.page, entry.view.as_mut(), &chart.legend_id());
    }

    fn handle_toggle_fullscreen(&mut self, chart: &ChartId) {
        let Some(entry) = self.registry.get_mut(chart) else {
            tracing::debug!(chart = %chart, "Dropping fullscreen toggle for unmounted chart");
            return;
        };

        fullscreen::toggle(&mut self.page, entry, chart);
    }

    /// Apply a polled snapshot: slide the time domain, replace the data
    /// source wholesale, re-run the view, and refresh the side elements.
    fn apply_snapshot(&mut self, chart: &ChartId, records: Vec<SourceRecord>) {
        let Some(entry) = self.registry.get_mut(chart) else {
            tracing::debug!(chart = %chart, "Dropping snapshot for unmounted chart");
            return;
        };

        // Read the current window before the changeset lands.
        let now = current_timestamp_millis();
        let slid = entry.spec.domain_signal.clone().and_then(|signal| {
            let value = entry.view.signal(&signal)?;
            let bounds = domain_bounds(&value)?;
            Some((signal, slide_domain(bounds, now, self.config.domain_buffer_ms)))
        });

        let source = entry.spec.source.clone();
        entry
            .view
            .apply(&source, Changeset::remove_all().insert(records));

        if let Some((signal, (from, to))) = slid {
            entry.view.set_signal(&signal, serde_json::json!([from, to]));
        }

        entry.view.run();
        self.page.request_resize();
        self.refresh_side_elements(chart);
    }

    /// Reconcile the chart's side elements with its data source: show the
    /// empty state for empty sources, otherwise show the chart and (re)run
    /// the legend render/bind pipeline.
    fn refresh_side_elements(&mut self, chart: &ChartId) {
        let Some(entry) = self.registry.get_mut(chart) else {
            return;
        };

        let records = entry.view.source(&entry.spec.source).unwrap_or_default();
        let legend_id = chart.legend_id();

        if source_is_empty(&records) {
            self.page.remove_class(&chart.title_id(), HIDDEN_CLASS);
            self.page.remove_class(&chart.empty_id(), HIDDEN_CLASS);
            self.page.add_class(chart.as_str(), HIDDEN_CLASS);
            self.page.remove_class(chart.as_str(), EMBED_CLASS);
            self.page.add_class(&legend_id, HIDDEN_CLASS);
            return;
        }

        self.page.add_class(&chart.title_id(), HIDDEN_CLASS);
        self.page.add_class(&chart.empty_id(), HIDDEN_CLASS);
        self.page.remove_class(chart.as_str(), HIDDEN_CLASS);
        self.page.add_class(chart.as_str(), EMBED_CLASS);

        let rendered = legend::render_legend(&mut self.page, chart, entry.view.as_ref());
        if rendered {
            // Fresh bindings for fresh legend content; the old table is
            // discarded, never appended to.
            entry.bindings = legend::bind_legend(
                &self.page,
                chart,
                entry.view.as_ref(),
                entry.spec.legend_signal.as_deref(),
            );
            if let Some(selection) = entry.selection.as_mut() {
                selection.reapply(&mut self.page, entry.view.as_mut(), &legend_id);
            }
        }
    }
}
