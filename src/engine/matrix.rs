//! Sparse event-by-exposure impact matrix.
//!
//! Compressed sparse rows: one row per event, one column per exposure
//! point, only nonzero impacts stored. Dense storage at production scale
//! (1e5 events by 1e5 points) is infeasible, so sparsity is part of the
//! contract, not an optimization.

use serde::Serialize;

/// Impact per (event, exposure point), nonzero entries only.
///
/// Invariant: every stored value is positive and bounded by the value of
/// the exposure point in its column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImpactMatrix {
    n_points: usize,
    row_offsets: Vec<usize>,
    cols: Vec<u32>,
    values: Vec<f64>,
}

impl ImpactMatrix {
    /// Assemble a matrix from per-event row segments, one segment per event
    /// in event order. Segments come from independent workers and are
    /// concatenated, never merged cell-by-cell.
    pub fn from_segments(n_points: usize, segments: Vec<Vec<(u32, f64)>>) -> Self {
        let nnz = segments.iter().map(Vec::len).sum();
        let mut row_offsets = Vec::with_capacity(segments.len() + 1);
        let mut cols = Vec::with_capacity(nnz);
        let mut values = Vec::with_capacity(nnz);
        row_offsets.push(0);
        for segment in segments {
            for (col, value) in segment {
                cols.push(col);
                values.push(value);
            }
            row_offsets.push(cols.len());
        }
        Self {
            n_points,
            row_offsets,
            cols,
            values,
        }
    }

    /// An empty matrix with the given dimensions.
    pub fn zero(n_events: usize, n_points: usize) -> Self {
        Self {
            n_points,
            row_offsets: vec![0; n_events + 1],
            cols: Vec::new(),
            values: Vec::new(),
        }
    }

    pub fn n_events(&self) -> usize {
        self.row_offsets.len() - 1
    }

    pub fn n_points(&self) -> usize {
        self.n_points
    }

    /// Number of stored (nonzero) entries.
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Entries of one event row as (point index, impact) pairs.
    pub fn row(&self, event_idx: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        let start = self.row_offsets[event_idx];
        let end = self.row_offsets[event_idx + 1];
        self.cols[start..end]
            .iter()
            .zip(&self.values[start..end])
            .map(|(&c, &v)| (c as usize, v))
    }

    /// Impact at one (event, point) position; unstored entries read as 0.
    pub fn get(&self, event_idx: usize, point_idx: usize) -> f64 {
        self.row(event_idx)
            .find(|&(col, _)| col == point_idx)
            .map(|(_, v)| v)
            .unwrap_or(0.0)
    }

    /// Total impact per event (row sums), in event order.
    pub fn event_totals(&self) -> Vec<f64> {
        (0..self.n_events())
            .map(|ev| self.row(ev).map(|(_, v)| v).sum())
            .collect()
    }

    /// Rewrite every stored entry through `f(point index, value)`, then drop
    /// entries that became non-positive. Used by the insurance-condition
    /// transformations.
    pub(crate) fn map_entries<F: FnMut(usize, f64) -> f64>(&mut self, mut f: F) {
        let mut new_offsets = Vec::with_capacity(self.row_offsets.len());
        let mut new_cols = Vec::with_capacity(self.cols.len());
        let mut new_values = Vec::with_capacity(self.values.len());
        new_offsets.push(0);
        for ev in 0..self.n_events() {
            let start = self.row_offsets[ev];
            let end = self.row_offsets[ev + 1];
            for i in start..end {
                let col = self.cols[i];
                let value = f(col as usize, self.values[i]);
                if value > 0.0 {
                    new_cols.push(col);
                    new_values.push(value);
                }
            }
            new_offsets.push(new_cols.len());
        }
        self.row_offsets = new_offsets;
        self.cols = new_cols;
        self.values = new_values;
    }
}
