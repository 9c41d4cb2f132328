use std::io::Write;
use std::path::PathBuf;

use serde::Serialize;
use serde_json::Value;

use crate::error::{FigureError, Result};
use crate::geo::{MapProjection, OverlayInk, TileProvider};
use crate::geometry::{Extent, GridShape, Size};
use crate::layout::PanelSlot;
use crate::panel::{GridLines, Spines};
use crate::scalebar::ScaleBar;

/// Destination of a finished figure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SaveTarget {
    /// Write to a file; the backend infers the format from the extension.
    File(PathBuf),
    /// Render into an in-memory buffer owned by the backend.
    Buffer,
}

/// One structural or styling instruction for the rendering collaborator.
///
/// The composition core emits these in a deterministic order; backends own
/// everything visual (pixels, fonts, colors, file formats). Panels are
/// addressed by their resolved slot order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Instruction {
    /// Allocate drawable regions for every slot of the grid.
    Allocate {
        shape: GridShape,
        slots: Vec<PanelSlot>,
        size: Size,
        title: String,
    },
    /// Swap a slot's axes to a map projection.
    Projection {
        slot: usize,
        projection: MapProjection,
    },
    /// Left-aligned panel title.
    Title {
        slot: usize,
        text: String,
        font_size: u32,
    },
    Spines {
        slot: usize,
        spines: Spines,
    },
    GridLines {
        slot: usize,
        axes: GridLines,
        color: String,
        alpha: f64,
    },
    XRange {
        slot: usize,
        min: f64,
        max: f64,
    },
    YRange {
        slot: usize,
        min: f64,
        max: f64,
    },
    /// Free-form drawing payload forwarded untouched from user code.
    Draw {
        slot: usize,
        payload: Value,
    },
    Basemap {
        slot: usize,
        provider: TileProvider,
        zoom: u8,
        cache: bool,
        extent: Extent,
    },
    /// Tick positions plus preformatted labels for both axes.
    Ticks {
        slot: usize,
        xs: Vec<f64>,
        ys: Vec<f64>,
        x_labels: Vec<String>,
        y_labels: Vec<String>,
    },
    ScaleBar {
        slot: usize,
        bar: ScaleBar,
        ink: OverlayInk,
    },
    Save {
        target: SaveTarget,
    },
}

impl Instruction {
    /// The slot this instruction addresses, if it addresses one.
    pub fn slot(&self) -> Option<usize> {
        match self {
            Self::Allocate { .. } | Self::Save { .. } => None,
            Self::Projection { slot, .. }
            | Self::Title { slot, .. }
            | Self::Spines { slot, .. }
            | Self::GridLines { slot, .. }
            | Self::XRange { slot, .. }
            | Self::YRange { slot, .. }
            | Self::Draw { slot, .. }
            | Self::Basemap { slot, .. }
            | Self::Ticks { slot, .. }
            | Self::ScaleBar { slot, .. } => Some(*slot),
        }
    }
}

/// Rendering collaborator boundary.
///
/// Implementations receive instructions in emission order and may buffer or
/// draw eagerly as they see fit. Returning an error aborts composition.
pub trait Backend {
    fn apply(&mut self, instruction: &Instruction) -> Result<()>;
}

/// Backend that serializes every instruction as one JSON line on a writer.
///
/// Useful as a demo target and as a golden-output surface in tests; a real
/// plotting backend would translate instructions into draw calls instead.
pub struct TraceBackend<W: Write> {
    writer: W,
}

impl<W: Write> TraceBackend<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Backend for TraceBackend<W> {
    fn apply(&mut self, instruction: &Instruction) -> Result<()> {
        let line = serde_json::to_string(instruction)
            .map_err(|err| FigureError::Backend(err.to_string()))?;
        writeln!(self.writer, "{line}")?;
        Ok(())
    }
}

/// Backend that keeps instructions in memory for inspection.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    pub instructions: Vec<Instruction>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Instructions addressed to a given slot, in emission order.
    pub fn for_slot(&self, slot: usize) -> Vec<&Instruction> {
        self.instructions
            .iter()
            .filter(|instruction| instruction.slot() == Some(slot))
            .collect()
    }
}

impl Backend for RecordingBackend {
    fn apply(&mut self, instruction: &Instruction) -> Result<()> {
        self.instructions.push(instruction.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{Layout, resolve};

    #[test]
    fn trace_backend_writes_one_json_line_per_instruction() {
        let resolved = resolve(&Layout::grid(1, 2)).unwrap();
        let mut backend = TraceBackend::new(Vec::new());
        backend
            .apply(&Instruction::Allocate {
                shape: resolved.shape,
                slots: resolved.slots.clone(),
                size: Size::default(),
                title: "demo".to_string(),
            })
            .unwrap();
        backend
            .apply(&Instruction::Title {
                slot: 0,
                text: "a) first".to_string(),
                font_size: 10,
            })
            .unwrap();

        let text = String::from_utf8(backend.into_inner()).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["op"], "allocate");
        assert_eq!(first["shape"]["cols"], 2);
        let second: Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["op"], "title");
        assert_eq!(second["slot"], 0);
    }

    #[test]
    fn recording_backend_filters_by_slot() {
        let mut backend = RecordingBackend::new();
        backend
            .apply(&Instruction::Spines {
                slot: 0,
                spines: Spines::default(),
            })
            .unwrap();
        backend
            .apply(&Instruction::Spines {
                slot: 1,
                spines: Spines::all(),
            })
            .unwrap();
        backend
            .apply(&Instruction::Save {
                target: SaveTarget::Buffer,
            })
            .unwrap();

        assert_eq!(backend.for_slot(0).len(), 1);
        assert_eq!(backend.for_slot(1).len(), 1);
        assert_eq!(backend.instructions.len(), 3);
    }
}
