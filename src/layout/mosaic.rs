use std::collections::BTreeMap;

use crate::error::{FigureError, Result};
use crate::geometry::{GridRegion, GridShape};

use super::core::{Cell, Label, PanelSlot, Resolved};

/// Accumulated placement of one mosaic label while scanning.
struct Placement {
    region: GridRegion,
    cell_count: usize,
}

impl Placement {
    fn start(row: usize, col: usize) -> Self {
        Self {
            region: GridRegion::cell(row, col),
            cell_count: 1,
        }
    }

    fn grow(&mut self, row: usize, col: usize) {
        self.region.row_start = self.region.row_start.min(row);
        self.region.row_end = self.region.row_end.max(row + 1);
        self.region.col_start = self.region.col_start.min(col);
        self.region.col_end = self.region.col_end.max(col + 1);
        self.cell_count += 1;
    }
}

/// Scan a mosaic row sequence into ordered panel slots.
///
/// Each distinct label collects its minimal bounding rectangle and the
/// multiplicity of cells it spans. A label whose cells do not fill that
/// rectangle is rejected rather than handed to the backend with a silently
/// wrong bounding box. Slot order is ascending label order.
pub(super) fn scan(rows: &[Vec<Cell>]) -> Result<Resolved> {
    let row_count = rows.len();
    let col_count = rows.first().map(Vec::len).unwrap_or(0);
    if row_count == 0 || col_count == 0 {
        return Err(FigureError::InvalidLayout(
            "mosaic must have at least one row and one column".to_string(),
        ));
    }
    if let Some(ragged) = rows.iter().position(|row| row.len() != col_count) {
        return Err(FigureError::InvalidLayout(format!(
            "mosaic rows must have equal length: row 0 has {col_count} cells, row {ragged} has {}",
            rows[ragged].len()
        )));
    }

    // BTreeMap keyed by label gives the ascending output order directly.
    let mut placements: BTreeMap<Label, Placement> = BTreeMap::new();
    for (row_index, row) in rows.iter().enumerate() {
        for (col_index, cell) in row.iter().enumerate() {
            let Cell::Label(label) = cell else {
                continue;
            };
            placements
                .entry(label.clone())
                .and_modify(|placement| placement.grow(row_index, col_index))
                .or_insert_with(|| Placement::start(row_index, col_index));
        }
    }

    if placements.is_empty() {
        return Err(FigureError::InvalidLayout(
            "mosaic has no labelled cells".to_string(),
        ));
    }

    let mut slots = Vec::with_capacity(placements.len());
    for (order, (label, placement)) in placements.into_iter().enumerate() {
        if placement.cell_count != placement.region.area() {
            return Err(FigureError::InvalidLayout(format!(
                "label `{label}` spans {} cells but its bounding rectangle holds {}; \
                 mosaic regions must be contiguous rectangles",
                placement.cell_count,
                placement.region.area()
            )));
        }
        slots.push(PanelSlot {
            label,
            order,
            region: placement.region,
            cell_count: placement.cell_count,
        });
    }

    Ok(Resolved {
        shape: GridShape::new(row_count, col_count),
        slots,
    })
}

#[cfg(test)]
mod tests {
    use super::super::core::{Layout, resolve};
    use super::*;

    fn mosaic(rows: &[&[&str]]) -> Layout {
        Layout::mosaic(
            rows.iter()
                .map(|row| row.iter().map(|cell| Cell::from(*cell))),
        )
    }

    #[test]
    fn reference_mosaic_resolves_in_label_order() {
        let layout = Layout::from_json(r#"[[0, 0, 1], [2, ".", 1]]"#).unwrap();
        let resolved = resolve(&layout).unwrap();

        assert_eq!(resolved.shape, GridShape::new(2, 3));
        assert_eq!(resolved.len(), 3);

        let labels: Vec<_> = resolved.slots.iter().map(|s| s.label.clone()).collect();
        assert_eq!(
            labels,
            vec![Label::Index(0), Label::Index(1), Label::Index(2)]
        );

        assert_eq!(resolved.slots[0].region, GridRegion::new(0, 1, 0, 2));
        assert_eq!(resolved.slots[0].cell_count, 2);
        assert_eq!(resolved.slots[1].region, GridRegion::new(0, 2, 2, 3));
        assert_eq!(resolved.slots[1].cell_count, 2);
        assert_eq!(resolved.slots[2].region, GridRegion::new(1, 2, 0, 1));
        assert_eq!(resolved.slots[2].cell_count, 1);

        let tall = resolved.slot(&Label::Index(1)).unwrap();
        assert_eq!(tall.region.row_span(), 2);
    }

    #[test]
    fn named_labels_sort_lexically() {
        let layout = mosaic(&[&["map", "map"], &["trace", "hist"]]);
        let resolved = resolve(&layout).unwrap();
        let labels: Vec<String> = resolved
            .slots
            .iter()
            .map(|s| s.label.to_string())
            .collect();
        assert_eq!(labels, vec!["hist", "map", "trace"]);
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let layout = mosaic(&[&["a", "a"], &["b"]]);
        assert!(matches!(
            resolve(&layout),
            Err(FigureError::InvalidLayout(_))
        ));
    }

    #[test]
    fn empty_mosaic_is_rejected() {
        assert!(resolve(&Layout::Mosaic(Vec::new())).is_err());
        assert!(resolve(&Layout::Mosaic(vec![Vec::new()])).is_err());
    }

    #[test]
    fn all_placeholder_mosaic_is_rejected() {
        let layout = mosaic(&[&[".", "."]]);
        assert!(matches!(
            resolve(&layout),
            Err(FigureError::InvalidLayout(_))
        ));
    }

    #[test]
    fn non_rectangular_label_is_rejected() {
        // `a` forms an L shape: bounding box 2x2 but only 3 cells.
        let layout = mosaic(&[&["a", "a"], &["a", "b"]]);
        let err = resolve(&layout).unwrap_err();
        assert!(err.to_string().contains("contiguous"));
    }

    #[test]
    fn disjoint_label_cells_are_rejected() {
        let layout = mosaic(&[&["a", "b", "a"]]);
        assert!(matches!(
            resolve(&layout),
            Err(FigureError::InvalidLayout(_))
        ));
    }

    #[test]
    fn full_rectangle_spanning_label_is_accepted() {
        let layout = mosaic(&[&["a", "a"], &["a", "a"]]);
        let resolved = resolve(&layout).unwrap();
        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved.slots[0].region, GridRegion::new(0, 2, 0, 2));
        assert_eq!(resolved.slots[0].cell_count, 4);
    }
}
