use std::cmp::Ordering;
use std::fmt;

use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

use crate::error::{FigureError, Result};
use crate::geometry::{GridRegion, GridShape};

/// Identifier of one panel region.
///
/// Uniform grids label their slots with positional indices; mosaics may use
/// either numbers or names. Ordering is the iteration contract: numeric
/// labels sort numerically, names sort lexically, and every numeric label
/// orders before every name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Label {
    Index(u64),
    Name(String),
}

impl Label {
    pub fn name(text: impl Into<String>) -> Self {
        Self::Name(text.into())
    }
}

impl Ord for Label {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Index(a), Self::Index(b)) => a.cmp(b),
            (Self::Name(a), Self::Name(b)) => a.cmp(b),
            (Self::Index(_), Self::Name(_)) => Ordering::Less,
            (Self::Name(_), Self::Index(_)) => Ordering::Greater,
        }
    }
}

impl PartialOrd for Label {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(index) => write!(f, "{index}"),
            Self::Name(name) => write!(f, "{name}"),
        }
    }
}

impl Serialize for Label {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Index(index) => serializer.serialize_u64(*index),
            Self::Name(name) => serializer.serialize_str(name),
        }
    }
}

impl<'de> Deserialize<'de> for Label {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Index(u64),
            Name(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Index(index) => Self::Index(index),
            Raw::Name(name) => Self::Name(name),
        })
    }
}

/// One cell of a mosaic row: labelled, or the `.` placeholder for an empty
/// cell that receives no panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    Empty,
    Label(Label),
}

/// The placeholder text marking an empty mosaic cell.
pub const EMPTY_CELL: &str = ".";

impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Self::Empty => serializer.serialize_str(EMPTY_CELL),
            Self::Label(label) => label.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Cell {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let label = Label::deserialize(deserializer)?;
        Ok(match label {
            Label::Name(name) if name == EMPTY_CELL => Self::Empty,
            other => Self::Label(other),
        })
    }
}

impl From<u64> for Cell {
    fn from(index: u64) -> Self {
        Self::Label(Label::Index(index))
    }
}

impl From<&str> for Cell {
    fn from(text: &str) -> Self {
        if text == EMPTY_CELL {
            Self::Empty
        } else {
            Self::Label(Label::name(text))
        }
    }
}

/// Layout descriptor: a uniform `(rows, cols)` grid or an explicit mosaic of
/// cell labels permitting merged regions.
///
/// The serde representation mirrors the literal forms users write:
/// `[2, 3]` is a grid, `[[0, 0, 1], [2, ".", 1]]` a mosaic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Layout {
    Grid(usize, usize),
    Mosaic(Vec<Vec<Cell>>),
}

impl Layout {
    pub const fn grid(rows: usize, cols: usize) -> Self {
        Self::Grid(rows, cols)
    }

    pub fn mosaic<R, C>(rows: R) -> Self
    where
        R: IntoIterator<Item = C>,
        C: IntoIterator<Item = Cell>,
    {
        Self::Mosaic(
            rows.into_iter()
                .map(|row| row.into_iter().collect())
                .collect(),
        )
    }

    /// Parse a layout from its JSON literal form.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|err| FigureError::InvalidLayout(err.to_string()))
    }
}

impl Default for Layout {
    fn default() -> Self {
        Self::Grid(1, 1)
    }
}

/// One resolved panel: its label, position in final iteration order, the
/// minimal bounding region within the grid, and the number of cells spanned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PanelSlot {
    pub label: Label,
    pub order: usize,
    pub region: GridRegion,
    pub cell_count: usize,
}

/// Output of [`resolve`]: the structural grid the backend must allocate and
/// the panel slots in final iteration order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    pub shape: GridShape,
    pub slots: Vec<PanelSlot>,
}

impl Resolved {
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Look up a slot by label.
    pub fn slot(&self, label: &Label) -> Option<&PanelSlot> {
        self.slots.iter().find(|slot| &slot.label == label)
    }
}

/// Resolve a layout descriptor into ordered panel slots.
///
/// Uniform grids produce `rows * cols` slots in row-major order, labelled by
/// position; a `1x1` grid still yields exactly one slot. Mosaics produce one
/// slot per distinct label, ordered by ascending label, each carrying its
/// minimal bounding rectangle. Purely a computation over the descriptor.
pub fn resolve(layout: &Layout) -> Result<Resolved> {
    match layout {
        Layout::Grid(rows, cols) => resolve_grid(*rows, *cols),
        Layout::Mosaic(rows) => super::mosaic::scan(rows),
    }
}

fn resolve_grid(rows: usize, cols: usize) -> Result<Resolved> {
    if rows == 0 || cols == 0 {
        return Err(FigureError::InvalidLayout(format!(
            "grid dimensions must be positive, got ({rows}, {cols})"
        )));
    }

    let shape = GridShape::new(rows, cols);
    let mut slots = Vec::with_capacity(shape.cell_count());
    for row in 0..rows {
        for col in 0..cols {
            let order = row * cols + col;
            slots.push(PanelSlot {
                label: Label::Index(order as u64),
                order,
                region: GridRegion::cell(row, col),
                cell_count: 1,
            });
        }
    }

    Ok(Resolved { shape, slots })
}
