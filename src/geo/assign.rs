//! Spatial assignment of exposure points to hazard grid cells.
//!
//! Built once per (exposure, grid) pair and reused across all events.
//! Assignment is deterministic: exact distance ties break to the lowest
//! cell id, and input order never changes the result.

use crate::exposure::ExposureInventory;
use crate::geo::coords::{LatLon, KM_PER_DEG};
use crate::geo::grid::{CellId, HazardGrid};

/// Default maximum assignment distance in km (matches the historical
/// nearest-neighbor threshold of the reference platform).
pub const DEFAULT_MAX_DISTANCE_KM: f64 = 100.0;

/// How exposure points are mapped onto grid cells.
///
/// Which scheme is appropriate is a domain policy choice; both produce a
/// valid [SpatialAssignment].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AssignStrategy {
    /// Full weight on the single nearest cell within `max_distance_km`.
    NearestCell { max_distance_km: f64 },
    /// Inverse-distance weights over up to `neighbors` nearest cells within
    /// `max_distance_km`, normalized to sum to 1. A point coincident with a
    /// cell takes full weight on that cell.
    InverseDistance {
        max_distance_km: f64,
        neighbors: usize,
    },
}

impl Default for AssignStrategy {
    fn default() -> Self {
        Self::NearestCell {
            max_distance_km: DEFAULT_MAX_DISTANCE_KM,
        }
    }
}

/// Mapping from exposure-point index to weighted grid cells.
///
/// Weights sum to 1 for mapped points. Points with no cell within the
/// distance threshold get an empty cell list and are recorded in
/// [excluded_points](SpatialAssignment::excluded_points) rather than
/// failing the run.
#[derive(Debug, Clone, PartialEq)]
pub struct SpatialAssignment {
    weights: Vec<Vec<(CellId, f64)>>,
    excluded: Vec<usize>,
}

impl SpatialAssignment {
    /// Number of exposure points covered (mapped or excluded).
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Weighted cells for one exposure point. Empty slice for excluded points.
    pub fn cells_for(&self, point_idx: usize) -> &[(CellId, f64)] {
        &self.weights[point_idx]
    }

    /// Indices of exposure points with no cell within the threshold,
    /// in ascending order.
    pub fn excluded_points(&self) -> &[usize] {
        &self.excluded
    }

    /// Sum of assignment weights for a point: 1 for mapped points, 0 for
    /// excluded ones (up to float rounding in the interpolated scheme).
    pub fn weight_sum(&self, point_idx: usize) -> f64 {
        self.weights[point_idx].iter().map(|(_, w)| w).sum()
    }
}

/// Assign every exposure point to grid cells under `strategy`.
///
/// Runs once per (exposure, grid) pair; the result is reused for all events
/// on the same grid. A single unmappable point is excluded and counted, it
/// never aborts the batch.
pub fn assign(
    exposure: &ExposureInventory,
    grid: &HazardGrid,
    strategy: AssignStrategy,
) -> SpatialAssignment {
    let locator = CellLocator::new(grid);
    let mut weights = Vec::with_capacity(exposure.len());
    let mut excluded = Vec::new();

    for (idx, point) in exposure.points().iter().enumerate() {
        let cells = match strategy {
            AssignStrategy::NearestCell { max_distance_km } => locator
                .nearest(&point.coord, max_distance_km)
                .map(|(id, _)| vec![(id, 1.0)])
                .unwrap_or_default(),
            AssignStrategy::InverseDistance {
                max_distance_km,
                neighbors,
            } => inverse_distance_weights(&locator, &point.coord, max_distance_km, neighbors),
        };
        if cells.is_empty() {
            excluded.push(idx);
        }
        weights.push(cells);
    }

    SpatialAssignment { weights, excluded }
}

fn inverse_distance_weights(
    locator: &CellLocator<'_>,
    coord: &LatLon,
    max_distance_km: f64,
    neighbors: usize,
) -> Vec<(CellId, f64)> {
    let candidates = locator.k_nearest(coord, max_distance_km, neighbors);
    if candidates.is_empty() {
        return Vec::new();
    }
    // Coincident cell takes everything; candidates are (distance, id)-sorted
    // so the lowest id wins among exact hits.
    if candidates[0].1 == 0.0 {
        return vec![(candidates[0].0, 1.0)];
    }
    let inv: Vec<f64> = candidates.iter().map(|&(_, d)| 1.0 / d).collect();
    let total: f64 = inv.iter().sum();
    candidates
        .iter()
        .zip(inv)
        .map(|(&(id, _), w)| (id, w / total))
        .collect()
}

/// Latitude-sorted cell index for windowed nearest-neighbor queries.
///
/// Candidate cells are narrowed to a latitude band of `max_distance_km`
/// around the query point (plus a longitude bound away from the poles)
/// before exact haversine distances are computed.
struct CellLocator<'a> {
    grid: &'a HazardGrid,
    by_lat: Vec<usize>,
}

impl<'a> CellLocator<'a> {
    fn new(grid: &'a HazardGrid) -> Self {
        let mut by_lat: Vec<usize> = (0..grid.len()).collect();
        by_lat.sort_by(|&a, &b| {
            let cells = grid.cells();
            cells[a]
                .coord
                .lat
                .partial_cmp(&cells[b].coord.lat)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        Self { grid, by_lat }
    }

    /// Visit every cell within `max_km`, yielding `(cell id, distance)`.
    fn for_each_within<F: FnMut(CellId, f64)>(&self, coord: &LatLon, max_km: f64, mut f: F) {
        let cells = self.grid.cells();
        let lat_margin = max_km / KM_PER_DEG;
        let lo = self
            .by_lat
            .partition_point(|&i| cells[i].coord.lat < coord.lat - lat_margin);
        let hi = self
            .by_lat
            .partition_point(|&i| cells[i].coord.lat <= coord.lat + lat_margin);

        // Longitude degrees shrink with cos(lat); skip the lon pre-filter
        // close to the poles where the bound degenerates.
        let cos_lat = coord.lat.to_radians().cos();
        let lon_margin = if cos_lat > 0.05 {
            Some(lat_margin / cos_lat)
        } else {
            None
        };

        for &i in &self.by_lat[lo..hi] {
            let cell = &cells[i];
            if let Some(margin) = lon_margin {
                let mut dlon = (cell.coord.lon - coord.lon).abs() % 360.0;
                if dlon > 180.0 {
                    dlon = 360.0 - dlon;
                }
                if dlon > margin {
                    continue;
                }
            }
            let d = coord.haversine_km(&cell.coord);
            if d <= max_km {
                f(cell.id, d);
            }
        }
    }

    /// Nearest cell within `max_km`; ties on exact distance break to the
    /// lowest cell id.
    fn nearest(&self, coord: &LatLon, max_km: f64) -> Option<(CellId, f64)> {
        let mut best: Option<(CellId, f64)> = None;
        self.for_each_within(coord, max_km, |id, d| {
            best = match best {
                None => Some((id, d)),
                Some((bid, bd)) if d < bd || (d == bd && id < bid) => Some((id, d)),
                keep => keep,
            };
        });
        best
    }

    /// Up to `k` nearest cells within `max_km`, sorted by (distance, id).
    fn k_nearest(&self, coord: &LatLon, max_km: f64, k: usize) -> Vec<(CellId, f64)> {
        if k == 0 {
            return Vec::new();
        }
        let mut candidates = Vec::new();
        self.for_each_within(coord, max_km, |id, d| candidates.push((id, d)));
        candidates.sort_by(|a, b| {
            a.1.partial_cmp(&b.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.0.cmp(&b.0))
        });
        candidates.truncate(k);
        candidates
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exposure::{ExposureInventory, ExposurePoint};
    use crate::geo::grid::GridCell;

    fn grid(cells: &[(CellId, f64, f64)]) -> HazardGrid {
        HazardGrid::new(
            cells
                .iter()
                .map(|&(id, lat, lon)| GridCell {
                    id,
                    coord: LatLon::new(lat, lon),
                })
                .collect(),
        )
    }

    fn inventory(coords: &[(f64, f64)]) -> ExposureInventory {
        ExposureInventory::new(
            coords
                .iter()
                .map(|&(lat, lon)| ExposurePoint {
                    coord: LatLon::new(lat, lon),
                    value: 1.0,
                    asset_type: "building".to_string(),
                })
                .collect(),
        )
    }

    #[test]
    fn nearest_cell_picks_closest() {
        let grid = grid(&[(0, 0.0, 0.0), (1, 0.0, 1.0), (2, 1.0, 0.0)]);
        let exp = inventory(&[(0.1, 0.9)]);
        let a = assign(&exp, &grid, AssignStrategy::default());
        assert_eq!(a.cells_for(0), &[(1, 1.0)]);
        assert!(a.excluded_points().is_empty());
    }

    #[test]
    fn distance_tie_breaks_to_lowest_cell_id() {
        // Two cells symmetric about the point, identical distance.
        let grid = grid(&[(9, 0.0, 1.0), (4, 0.0, -1.0)]);
        let exp = inventory(&[(0.0, 0.0)]);
        let a = assign(
            &exp,
            &grid,
            AssignStrategy::NearestCell {
                max_distance_km: 500.0,
            },
        );
        assert_eq!(a.cells_for(0), &[(4, 1.0)]);
    }

    #[test]
    fn point_beyond_threshold_is_excluded_not_an_error() {
        let grid = grid(&[(0, 0.0, 0.0)]);
        let exp = inventory(&[(10.0, 10.0), (0.01, 0.01)]);
        let a = assign(&exp, &grid, AssignStrategy::default());
        assert!(a.cells_for(0).is_empty());
        assert_eq!(a.excluded_points(), &[0]);
        assert_eq!(a.cells_for(1), &[(0, 1.0)]);
        assert_eq!(a.weight_sum(0), 0.0);
    }

    #[test]
    fn inverse_distance_weights_sum_to_one() {
        let grid = grid(&[(0, 0.0, 0.0), (1, 0.0, 1.0), (2, 1.0, 0.0), (3, 1.0, 1.0)]);
        let exp = inventory(&[(0.4, 0.6)]);
        let a = assign(
            &exp,
            &grid,
            AssignStrategy::InverseDistance {
                max_distance_km: 300.0,
                neighbors: 4,
            },
        );
        let cells = a.cells_for(0);
        assert_eq!(cells.len(), 4);
        let total: f64 = cells.iter().map(|(_, w)| w).sum();
        assert!((total - 1.0).abs() < 1e-12, "weights sum to {total}");
    }

    #[test]
    fn inverse_distance_coincident_point_takes_full_weight() {
        let grid = grid(&[(0, 0.0, 0.0), (1, 0.0, 1.0)]);
        let exp = inventory(&[(0.0, 0.0)]);
        let a = assign(
            &exp,
            &grid,
            AssignStrategy::InverseDistance {
                max_distance_km: 300.0,
                neighbors: 4,
            },
        );
        assert_eq!(a.cells_for(0), &[(0, 1.0)]);
    }

    #[test]
    fn assignment_is_deterministic_across_runs() {
        let grid = grid(&[(0, 0.0, 0.0), (1, 0.5, 0.5), (2, 1.0, 1.0)]);
        let exp = inventory(&[(0.2, 0.2), (0.7, 0.7), (50.0, 50.0)]);
        let one = assign(&exp, &grid, AssignStrategy::default());
        let two = assign(&exp, &grid, AssignStrategy::default());
        assert_eq!(one, two);
    }
}
