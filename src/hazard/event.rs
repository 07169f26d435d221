//! Stochastic hazard events: sparse intensity fields plus occurrence rates.

use serde::Serialize;

use crate::geo::grid::CellId;

/// Sparse intensity field over the hazard grid: nonzero intensity per cell
/// id, zero everywhere else. Entries are kept sorted by cell id; duplicate
/// cell ids are summed on construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntensityField {
    entries: Vec<(CellId, f64)>,
}

impl IntensityField {
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn from_entries(mut entries: Vec<(CellId, f64)>) -> Self {
        entries.sort_by_key(|&(id, _)| id);
        let mut merged: Vec<(CellId, f64)> = Vec::with_capacity(entries.len());
        for (id, v) in entries {
            match merged.last_mut() {
                Some((last_id, last_v)) if *last_id == id => *last_v += v,
                _ => merged.push((id, v)),
            }
        }
        merged.retain(|&(_, v)| v != 0.0);
        Self { entries: merged }
    }

    /// Intensity at a cell; absent cells read as 0.
    pub fn get(&self, cell: CellId) -> f64 {
        self.entries
            .binary_search_by_key(&cell, |&(id, _)| id)
            .map(|i| self.entries[i].1)
            .unwrap_or(0.0)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[(CellId, f64)] {
        &self.entries
    }
}

/// One stochastic event: identity, annual occurrence frequency, and its
/// intensity footprint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HazardEvent {
    pub id: u64,
    pub name: String,
    /// Annual occurrence frequency (Poisson rate, per year). Frequencies
    /// across an event set need not sum to 1. Negative values are rejected
    /// per-record at build time.
    pub frequency: f64,
    pub intensity: IntensityField,
}

impl HazardEvent {
    pub fn new(id: u64, name: impl Into<String>, frequency: f64, intensity: IntensityField) -> Self {
        Self {
            id,
            name: name.into(),
            frequency,
            intensity,
        }
    }
}

/// Ordered event set for one hazard type. Event indices are the row indices
/// of the impact matrix.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HazardEventSet {
    hazard_type: String,
    events: Vec<HazardEvent>,
}

impl HazardEventSet {
    pub fn new(hazard_type: impl Into<String>, events: Vec<HazardEvent>) -> Self {
        Self {
            hazard_type: hazard_type.into(),
            events,
        }
    }

    pub fn hazard_type(&self) -> &str {
        &self.hazard_type
    }

    pub fn events(&self) -> &[HazardEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Annual frequency per event, in event order.
    pub fn frequencies(&self) -> Vec<f64> {
        self.events.iter().map(|e| e.frequency).collect()
    }
}
