//! Composition layer for multi-panel scientific figures, including
//! geographic map panels.
//!
//! The crate resolves grid and mosaic layouts into ordered panel slots,
//! cascades per-panel cosmetics, computes map furniture (scale bars, lat/lon
//! ticks, basemap overlays), and describes all of it to a rendering backend
//! through a typed instruction stream. Pixels, fonts, tiles and file formats
//! stay on the backend's side of the [`render::Backend`] boundary; geodesy
//! stays behind [`geo::Projector`].
//!
//! ```no_run
//! use panelkit::{Figure, FigureOptions, Layout, PanelOptions, TraceBackend};
//!
//! let layout = Layout::from_json(r#"[[0, 0, 1], [2, ".", 1]]"#)?;
//! let backend = TraceBackend::new(std::io::stdout());
//! let mut figure = Figure::new(FigureOptions::new(layout), backend)?;
//! figure.panel(PanelOptions::new().title("a) wide"), |_panel| Ok(()))?;
//! figure.finish()?;
//! # Ok::<(), panelkit::FigureError>(())
//! ```

pub mod error;
pub mod figure;
pub mod geo;
pub mod geometry;
pub mod layout;
pub mod logging;
pub mod metrics;
pub mod panel;
pub mod registry;
pub mod render;
pub mod scalebar;
pub mod ticks;

pub use error::{FigureError, Result};
pub use figure::{Figure, FigureOptions, GeoPanelOptions, PanelContext};
pub use geo::{
    EquirectangularProjector, MapProjection, OverlayInk, Projector, TileProvider, utm_zone,
};
pub use geometry::{Extent, GridRegion, GridShape, Size};
pub use layout::{Cell, Label, Layout, PanelSlot, Resolved, resolve};
pub use logging::{FileSink, LogEvent, LogFields, LogLevel, LogSink, Logger, MemorySink};
pub use metrics::{FigureMetrics, MetricSnapshot};
pub use panel::{GridLines, PanelDefaults, PanelOptions, PanelStyle, Spines};
pub use registry::{PanelRegistry, PanelState};
pub use render::{Backend, Instruction, RecordingBackend, SaveTarget, TraceBackend};
pub use scalebar::{Placement, ScaleBar, Unit, compute_scalebar};
pub use ticks::{degree_labels, extent_ticks, guess_ticks};
