//! Hazard grid: the fixed set of cells (centroids) events report intensity on.
//!
//! Grids are immutable after construction and intended to be shared across
//! runs behind an `Arc`; nothing here mutates after `new`.

use serde::{Deserialize, Serialize};

use crate::geo::coords::LatLon;

/// Identifier of a hazard grid cell. Stable across events and runs.
pub type CellId = u32;

/// One grid cell: an id and its representative coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridCell {
    pub id: CellId,
    pub coord: LatLon,
}

/// The spatial grid of a hazard event set.
#[derive(Debug, Clone, PartialEq)]
pub struct HazardGrid {
    cells: Vec<GridCell>,
}

impl HazardGrid {
    /// Build a grid from cells. Cells are stored sorted by id so lookups and
    /// tie-breaks are independent of input order.
    pub fn new(mut cells: Vec<GridCell>) -> Self {
        cells.sort_by_key(|c| c.id);
        cells.dedup_by_key(|c| c.id);
        Self { cells }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cells(&self) -> &[GridCell] {
        &self.cells
    }

    /// Coordinate of a cell by id, if present.
    pub fn coord_of(&self, id: CellId) -> Option<LatLon> {
        self.cells
            .binary_search_by_key(&id, |c| c.id)
            .ok()
            .map(|i| self.cells[i].coord)
    }
}
