//! Figure sessions: resolve a layout once, acquire panels in order through
//! scoped closures, decorate them, and hand the result to the backend.
//!
//! The panel cursor lives on the `Figure` value, never in process-wide
//! state, so independent figures can be composed concurrently without
//! cross-talk.

use std::sync::{Arc, Mutex};

use serde_json::{Value, json};

use crate::error::{FigureError, Result};
use crate::geo::{EquirectangularProjector, MapProjection, Projector, TileProvider};
use crate::geometry::{GridShape, Size};
use crate::layout::{Label, Layout, PanelSlot, Resolved, resolve};
use crate::logging::{LogLevel, Logger, event_with, kv};
use crate::metrics::FigureMetrics;
use crate::panel::{
    GRID_ALPHA, GRID_COLOR, GridLines, PanelDefaults, PanelOptions, TITLE_FONT_SIZE,
};
use crate::registry::PanelRegistry;
use crate::render::{Backend, Instruction, SaveTarget};
use crate::scalebar::{Placement, Unit, compute_scalebar};
use crate::ticks::{degree_labels, extent_ticks};

const LOG_TARGET: &str = "panelkit::figure";
const METRICS_TARGET: &str = "panelkit::figure.metrics";

/// Configuration for a figure session.
#[derive(Clone)]
pub struct FigureOptions {
    pub title: String,
    pub layout: Layout,
    pub size: Size,
    /// Fallbacks for panel options left unset.
    pub defaults: PanelDefaults,
    /// Save instruction emitted by `finish`; `None` leaves the figure with
    /// the backend for interactive display.
    pub save: Option<SaveTarget>,
    /// Tick step for geographic panels; derived from the extent span when
    /// unset.
    pub tick_step: Option<f64>,
    pub scalebar_unit: Unit,
    pub scalebar_placement: Placement,
    /// Optional structured logger for session lifecycle events.
    pub logger: Option<Logger>,
    /// Metrics accumulator; a snapshot is logged when the session finishes.
    pub metrics: Option<Arc<Mutex<FigureMetrics>>>,
}

impl Default for FigureOptions {
    fn default() -> Self {
        Self {
            title: String::new(),
            layout: Layout::default(),
            size: Size::default(),
            defaults: PanelDefaults::default(),
            save: None,
            tick_step: None,
            scalebar_unit: Unit::default(),
            scalebar_placement: Placement::default(),
            logger: None,
            metrics: None,
        }
    }
}

impl FigureOptions {
    pub fn new(layout: Layout) -> Self {
        Self {
            layout,
            ..Self::default()
        }
    }

    pub fn title(mut self, text: impl Into<String>) -> Self {
        self.title = text.into();
        self
    }

    pub fn size(mut self, size: Size) -> Self {
        self.size = size;
        self
    }

    pub fn defaults(mut self, defaults: PanelDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn save(mut self, target: SaveTarget) -> Self {
        self.save = Some(target);
        self
    }

    pub fn tick_step(mut self, step: f64) -> Self {
        self.tick_step = Some(step);
        self
    }

    pub fn scalebar_unit(mut self, unit: Unit) -> Self {
        self.scalebar_unit = unit;
        self
    }

    pub fn logger(mut self, logger: Logger) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Enable metrics collection if it has not already been configured.
    pub fn enable_metrics(&mut self) {
        if self.metrics.is_none() {
            self.metrics = Some(Arc::new(Mutex::new(FigureMetrics::new())));
        }
    }

    /// Access the shared metrics handle if metrics are enabled.
    pub fn metrics_handle(&self) -> Option<Arc<Mutex<FigureMetrics>>> {
        self.metrics.as_ref().map(Arc::clone)
    }
}

/// Map-panel options: base cosmetics plus geographic concerns.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoPanelOptions {
    pub base: PanelOptions,
    /// Projection to swap the slot's axes to before drawing.
    pub projection: Option<MapProjection>,
    /// Basemap provider; without one the panel gets no map furniture.
    pub tiles: Option<TileProvider>,
    pub zoom: u8,
    pub tiles_cache: bool,
}

impl Default for GeoPanelOptions {
    fn default() -> Self {
        Self {
            base: PanelOptions::default(),
            projection: None,
            tiles: None,
            zoom: 10,
            tiles_cache: false,
        }
    }
}

impl GeoPanelOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn base(mut self, options: PanelOptions) -> Self {
        self.base = options;
        self
    }

    pub fn projection(mut self, projection: MapProjection) -> Self {
        self.projection = Some(projection);
        self
    }

    pub fn tiles(mut self, provider: TileProvider) -> Self {
        self.tiles = Some(provider);
        self
    }

    pub fn zoom(mut self, zoom: u8) -> Self {
        self.zoom = zoom;
        self
    }

    pub fn cached_tiles(mut self, cache: bool) -> Self {
        self.tiles_cache = cache;
        self
    }
}

/// Context handed to a panel closure while its slot is open.
pub struct PanelContext<'a> {
    slot: &'a PanelSlot,
    registry: &'a mut PanelRegistry,
}

impl PanelContext<'_> {
    pub fn slot(&self) -> &PanelSlot {
        self.slot
    }

    pub fn label(&self) -> &Label {
        &self.slot.label
    }

    pub fn order(&self) -> usize {
        self.slot.order
    }

    /// Queue a free-form drawing payload, forwarded untouched to the
    /// backend in finalization order.
    pub fn draw(&mut self, payload: Value) -> Result<()> {
        self.registry.queue(
            &self.slot.label,
            Instruction::Draw {
                slot: self.slot.order,
                payload,
            },
        )
    }
}

/// A figure being composed against a backend.
pub struct Figure<B: Backend> {
    options: FigureOptions,
    resolved: Resolved,
    registry: PanelRegistry,
    backend: B,
    projector: Box<dyn Projector>,
    cursor: usize,
}

impl<B: Backend> Figure<B> {
    /// Resolve the layout and allocate drawable regions on the backend.
    pub fn new(options: FigureOptions, mut backend: B) -> Result<Self> {
        let resolved = resolve(&options.layout)?;
        let mut registry = PanelRegistry::new();
        registry.sync_slots(&resolved);

        backend.apply(&Instruction::Allocate {
            shape: resolved.shape,
            slots: resolved.slots.clone(),
            size: options.size,
            title: options.title.clone(),
        })?;

        let figure = Self {
            options,
            resolved,
            registry,
            backend,
            projector: Box::new(EquirectangularProjector),
            cursor: 0,
        };
        figure.record(|metrics| {
            metrics.record_resolve();
            metrics.record_instructions(1);
        });
        figure.log(
            LogLevel::Info,
            "figure_resolved",
            [
                kv("panels", json!(figure.resolved.len())),
                kv("rows", json!(figure.resolved.shape.rows)),
                kv("cols", json!(figure.resolved.shape.cols)),
            ],
        );
        Ok(figure)
    }

    /// Swap the geodesy collaborator used for scale bars. Defaults to the
    /// built-in approximate projector.
    pub fn with_projector<P>(mut self, projector: P) -> Self
    where
        P: Projector + 'static,
    {
        self.projector = Box::new(projector);
        self
    }

    pub fn shape(&self) -> GridShape {
        self.resolved.shape
    }

    pub fn slots(&self) -> &[PanelSlot] {
        &self.resolved.slots
    }

    /// Index of the next slot a panel call will acquire.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Acquire the next panel slot, run `draw` inside it, then apply
    /// cosmetic decorations.
    ///
    /// Decorations are applied whether or not the closure succeeds, so a
    /// panel never escapes half-styled; the closure's error is returned
    /// afterwards.
    pub fn panel<T, F>(&mut self, options: PanelOptions, draw: F) -> Result<T>
    where
        F: FnOnce(&mut PanelContext<'_>) -> Result<T>,
    {
        let slot = self.acquire()?;
        let outcome = {
            let mut ctx = PanelContext {
                slot: &slot,
                registry: &mut self.registry,
            };
            draw(&mut ctx)
        };
        self.decorate(&slot, &options)?;
        self.flush()?;
        outcome
    }

    /// Like [`Figure::panel`], with map furniture applied at finalization:
    /// basemap overlay, lat/lon ticks, and a scale bar in the provider's
    /// overlay ink.
    pub fn geo_panel<T, F>(&mut self, options: GeoPanelOptions, draw: F) -> Result<T>
    where
        F: FnOnce(&mut PanelContext<'_>) -> Result<T>,
    {
        let slot = self.acquire()?;
        if let Some(projection) = options.projection.clone() {
            self.registry.queue(
                &slot.label,
                Instruction::Projection {
                    slot: slot.order,
                    projection,
                },
            )?;
        }
        let outcome = {
            let mut ctx = PanelContext {
                slot: &slot,
                registry: &mut self.registry,
            };
            draw(&mut ctx)
        };
        self.finalize_geo(&slot, &options)?;
        self.decorate(&slot, &options.base)?;
        self.flush()?;
        outcome
    }

    /// Flush pending work and emit the save instruction, returning the
    /// backend so callers can reclaim its buffer.
    pub fn finish(mut self) -> Result<B> {
        // A 1x1 figure that never opened a panel doubles as its own panel,
        // taking the figure title and default cosmetics.
        if self.cursor == 0 && self.resolved.len() == 1 {
            let slot = self.resolved.slots[0].clone();
            let mut options = PanelOptions::new();
            if !self.options.title.is_empty() {
                options = options.title(self.options.title.clone());
            }
            self.decorate(&slot, &options)?;
        }
        self.flush()?;

        if let Some(target) = self.options.save.clone() {
            self.backend.apply(&Instruction::Save {
                target: target.clone(),
            })?;
            self.record(|metrics| {
                metrics.record_save();
                metrics.record_instructions(1);
            });
            self.log(
                LogLevel::Info,
                "figure_saved",
                [kv("target", json!(format!("{target:?}")))],
            );
        }

        if let (Some(logger), Some(metrics)) =
            (self.options.logger.as_ref(), self.options.metrics.as_ref())
        {
            if let Ok(guard) = metrics.lock() {
                let _ = logger.log(guard.snapshot().to_log_event(METRICS_TARGET));
            }
        }
        Ok(self.backend)
    }

    fn acquire(&mut self) -> Result<PanelSlot> {
        let slot = self
            .resolved
            .slots
            .get(self.cursor)
            .cloned()
            .ok_or(FigureError::SlotsExhausted(self.resolved.len()))?;
        self.cursor += 1;
        self.record(FigureMetrics::record_panel);
        self.log(
            LogLevel::Debug,
            "panel_entered",
            [
                kv("label", json!(slot.label.to_string())),
                kv("order", json!(slot.order)),
            ],
        );
        Ok(slot)
    }

    fn decorate(&mut self, slot: &PanelSlot, options: &PanelOptions) -> Result<()> {
        let style = options.cascade(&self.options.defaults);
        let order = slot.order;
        let label = &slot.label;

        if let Some(text) = style.title {
            self.registry.queue(
                label,
                Instruction::Title {
                    slot: order,
                    text,
                    font_size: TITLE_FONT_SIZE,
                },
            )?;
        }
        self.registry.queue(
            label,
            Instruction::Spines {
                slot: order,
                spines: style.spines,
            },
        )?;
        if style.grid != GridLines::None {
            self.registry.queue(
                label,
                Instruction::GridLines {
                    slot: order,
                    axes: style.grid,
                    color: GRID_COLOR.to_string(),
                    alpha: GRID_ALPHA,
                },
            )?;
        }

        // A bounding extent overrides individual axis ranges.
        if let Some(extent) = style.extent {
            extent.validate()?;
            self.registry.queue(
                label,
                Instruction::XRange {
                    slot: order,
                    min: extent.x_min,
                    max: extent.x_max,
                },
            )?;
            self.registry.queue(
                label,
                Instruction::YRange {
                    slot: order,
                    min: extent.y_min,
                    max: extent.y_max,
                },
            )?;
        } else {
            if let Some((min, max)) = style.x_range {
                self.registry
                    .queue(label, Instruction::XRange { slot: order, min, max })?;
            }
            if let Some((min, max)) = style.y_range {
                self.registry
                    .queue(label, Instruction::YRange { slot: order, min, max })?;
            }
        }
        Ok(())
    }

    fn finalize_geo(&mut self, slot: &PanelSlot, options: &GeoPanelOptions) -> Result<()> {
        let Some(provider) = options.tiles else {
            return Ok(());
        };
        let extent = options
            .base
            .extent
            .or(self.options.defaults.extent)
            .ok_or(FigureError::MissingExtent)?;
        extent.validate()?;

        let order = slot.order;
        let label = &slot.label;
        self.registry.queue(
            label,
            Instruction::Basemap {
                slot: order,
                provider,
                zoom: options.zoom,
                cache: options.tiles_cache,
                extent,
            },
        )?;

        let (xs, ys) = extent_ticks(&extent, self.options.tick_step)?;
        let x_labels = degree_labels(&xs);
        let y_labels = degree_labels(&ys);
        self.registry.queue(
            label,
            Instruction::Ticks {
                slot: order,
                xs,
                ys,
                x_labels,
                y_labels,
            },
        )?;

        let bar = compute_scalebar(
            &extent,
            self.projector.as_ref(),
            self.options.scalebar_unit,
            self.options.scalebar_placement,
        )?;
        self.record(FigureMetrics::record_scalebar);
        self.log(
            LogLevel::Debug,
            "scalebar_computed",
            [
                kv("zone", json!(bar.zone)),
                kv("length", json!(bar.length)),
                kv("unit", json!(bar.unit.label())),
            ],
        );
        self.registry.queue(
            label,
            Instruction::ScaleBar {
                slot: order,
                bar,
                ink: provider.overlay_ink(),
            },
        )?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        let drained = self.registry.take_dirty();
        if drained.is_empty() {
            return Ok(());
        }
        for instruction in &drained {
            self.backend.apply(instruction)?;
        }
        self.record(|metrics| metrics.record_instructions(drained.len()));
        self.log(
            LogLevel::Debug,
            "instructions_applied",
            [kv("count", json!(drained.len()))],
        );
        Ok(())
    }

    fn log<I>(&self, level: LogLevel, message: &str, fields: I)
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        if let Some(logger) = self.options.logger.as_ref() {
            let _ = logger.log(event_with(level, LOG_TARGET, message, fields));
        }
    }

    fn record(&self, update: impl FnOnce(&mut FigureMetrics)) {
        if let Some(metrics) = self.options.metrics.as_ref() {
            if let Ok(mut guard) = metrics.lock() {
                update(&mut guard);
            }
        }
    }
}
