//! Chartsight - legend interaction and live-update controller for reactive charts.
//!
//! Chartsight binds a reactive visualization runtime's view (named signals,
//! a color scale, data sources) to a host page: it renders and binds the
//! legend, owns single/multi category selection, classifies empty sources,
//! drives polling live updates with a sliding time window, and reconciles
//! fullscreen toggling with the view's height signal.
//!
//! The runtime itself stays external behind the [`runtime::View`] trait;
//! the host page is tracked in an in-memory mirror ([`page::Page`]) the
//! embedder syncs back to the document.

pub mod controller;
pub mod demo;
pub mod event;
pub mod fullscreen;
pub mod legend;
pub mod live;
pub mod mock;
pub mod page;
pub mod registry;
pub mod runtime;
pub mod selection;

// Re-export commonly used types at the crate root
pub use controller::ChartController;
pub use event::{ChartEvent, ChartId};
pub use legend::LegendBindings;
pub use live::{HttpFetcher, LiveSession, SnapshotFetcher};
pub use page::{LegendEntry, Page};
pub use registry::{ChartEntry, ViewRegistry};
pub use runtime::{Changeset, ColorScale, View};
pub use selection::{Selection, SelectionController};
