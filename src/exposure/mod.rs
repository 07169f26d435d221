//! Exposure inventory: geolocated asset values at risk.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::geo::coords::LatLon;

/// A single exposed asset: where it is, what it is worth, and which
/// vulnerability curve applies to it (via `asset_type`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExposurePoint {
    pub coord: LatLon,
    /// Monetary value. Non-positive values are rejected per-record at build
    /// time and counted in the run diagnostics.
    pub value: f64,
    /// Tag selecting the vulnerability curve for the run's hazard type.
    pub asset_type: String,
}

/// Ordered, immutable collection of exposure points. Point indices are the
/// column indices of the impact matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct ExposureInventory {
    points: Vec<ExposurePoint>,
}

impl ExposureInventory {
    pub fn new(points: Vec<ExposurePoint>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[ExposurePoint] {
        &self.points
    }

    /// Total inventory value, counting only positive entries.
    pub fn total_value(&self) -> f64 {
        self.points
            .iter()
            .map(|p| p.value)
            .filter(|v| *v > 0.0)
            .sum()
    }

    /// Distinct asset types in the inventory, sorted. The vulnerability
    /// model must cover every one of these for the run's hazard type.
    pub fn asset_types(&self) -> BTreeSet<&str> {
        self.points.iter().map(|p| p.asset_type.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(value: f64, asset_type: &str) -> ExposurePoint {
        ExposurePoint {
            coord: LatLon::new(0.0, 0.0),
            value,
            asset_type: asset_type.to_string(),
        }
    }

    #[test]
    fn total_value_ignores_non_positive_entries() {
        let inv = ExposureInventory::new(vec![
            point(100.0, "building"),
            point(-5.0, "building"),
            point(0.0, "road"),
            point(40.0, "road"),
        ]);
        assert_eq!(inv.total_value(), 140.0);
    }

    #[test]
    fn asset_types_are_distinct_and_sorted() {
        let inv = ExposureInventory::new(vec![
            point(1.0, "road"),
            point(1.0, "building"),
            point(1.0, "road"),
        ]);
        let types: Vec<&str> = inv.asset_types().into_iter().collect();
        assert_eq!(types, vec!["building", "road"]);
    }
}
