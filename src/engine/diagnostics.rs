//! Per-run diagnostics: non-fatal anomalies, counted and reported.
//!
//! Recoverable per-record issues never abort a run and are never swallowed;
//! they accumulate here and travel with the result.

use std::fmt;

use serde::Serialize;

/// Summary of every non-fatal anomaly observed while building one impact
/// matrix. Returned alongside the matrix and embedded in the final result.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunDiagnostics {
    /// Exposure-point indices with no grid cell within the assignment
    /// threshold. Excluded from impact, ascending order.
    pub excluded_points: Vec<usize>,
    /// Exposure records rejected for a zero, negative, or non-finite value.
    pub rejected_exposure_records: usize,
    /// Intensity entries rejected for a negative or non-finite value.
    pub rejected_intensity_entries: usize,
    /// Events rejected for a negative or non-finite annual frequency.
    pub rejected_frequency_records: usize,
}

impl RunDiagnostics {
    /// True when the run saw no excluded points and no rejected records.
    pub fn is_clean(&self) -> bool {
        self.excluded_points.is_empty()
            && self.rejected_exposure_records == 0
            && self.rejected_intensity_entries == 0
            && self.rejected_frequency_records == 0
    }

    /// Total rejected records across all kinds (excluded points counted
    /// separately).
    pub fn rejected_total(&self) -> usize {
        self.rejected_exposure_records
            + self.rejected_intensity_entries
            + self.rejected_frequency_records
    }

    /// Fold counts from a worker partition into this summary.
    pub(crate) fn absorb(&mut self, other: RunDiagnostics) {
        self.excluded_points.extend(other.excluded_points);
        self.rejected_exposure_records += other.rejected_exposure_records;
        self.rejected_intensity_entries += other.rejected_intensity_entries;
        self.rejected_frequency_records += other.rejected_frequency_records;
    }
}

impl fmt::Display for RunDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_clean() {
            return write!(f, "run clean: no excluded points, no rejected records");
        }
        write!(
            f,
            "excluded points: {}, rejected exposure records: {}, \
             rejected intensity entries: {}, rejected frequency records: {}",
            self.excluded_points.len(),
            self.rejected_exposure_records,
            self.rejected_intensity_entries,
            self.rejected_frequency_records,
        )
    }
}
