use chartsight_common::SourceRecord;

/// Opaque identifier for one mounted chart instance.
///
/// Related host-page elements derive their ids from it with fixed suffixes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChartId(String);

impl ChartId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Id of the legend region.
    pub fn legend_id(&self) -> String {
        format!("{}-legend", self.0)
    }

    /// Id of the empty-state placeholder.
    pub fn empty_id(&self) -> String {
        format!("{}-empty", self.0)
    }

    /// Id of the loading indicator.
    pub fn loading_id(&self) -> String {
        format!("{}-loading", self.0)
    }

    /// Id of the title element shown alongside the empty state.
    pub fn title_id(&self) -> String {
        format!("{}-title", self.0)
    }

    /// Id of the card wrapping the chart, the element fullscreen restyles.
    pub fn container_id(&self) -> String {
        format!("{}-container", self.0)
    }

    /// Id of the close-fullscreen button.
    pub fn close_id(&self) -> String {
        format!("{}-close", self.0)
    }
}

impl std::fmt::Display for ChartId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ChartId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ChartId {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}

/// Inputs to the chart controller.
///
/// User interactions are forwarded by the embedding host; snapshot events
/// arrive from the live-update session of a polling chart.
#[derive(Debug, Clone)]
pub enum ChartEvent {
    /// A legend item was clicked. `value` is the item's encoded category token.
    LegendItemClicked {
        chart: ChartId,
        value: String,
        shift: bool,
    },

    /// A mark inside the chart was clicked, with the datum the runtime
    /// attached to it (if any).
    MarkClicked {
        chart: ChartId,
        datum: Option<serde_json::Value>,
        shift: bool,
    },

    /// The chart's background was clicked.
    ChartBackgroundClicked { chart: ChartId },

    /// The legend's background was clicked.
    LegendBackgroundClicked { chart: ChartId },

    /// The fullscreen toggle button was pressed.
    ToggleFullscreen { chart: ChartId },

    /// A polled snapshot is ready to be applied.
    SnapshotReady {
        chart: ChartId,
        records: Vec<SourceRecord>,
    },
}

impl ChartEvent {
    /// The chart this event targets.
    pub fn chart(&self) -> &ChartId {
        match self {
            ChartEvent::LegendItemClicked { chart, .. }
            | ChartEvent::MarkClicked { chart, .. }
            | ChartEvent::ChartBackgroundClicked { chart }
            | ChartEvent::LegendBackgroundClicked { chart }
            | ChartEvent::ToggleFullscreen { chart }
            | ChartEvent::SnapshotReady { chart, .. } => chart,
        }
    }
}
