//! Impact matrix assembly: the event-by-exposure computation kernel.
//!
//! Entries are independent across (event, point) pairs, so the event axis
//! is partitioned into batches computed on parallel workers. Each worker
//! fills its own row segments; segments are concatenated in event order,
//! which makes the result bit-identical for any worker count.

use std::fmt;

use rayon::prelude::*;

use crate::engine::diagnostics::RunDiagnostics;
use crate::engine::matrix::ImpactMatrix;
use crate::exposure::ExposureInventory;
use crate::geo::assign::SpatialAssignment;
use crate::geo::grid::CellId;
use crate::hazard::event::{HazardEvent, HazardEventSet};
use crate::parallel::{batch_ranges, default_batch_count, WorkerPool};
use crate::vulnerability::curve::VulnerabilityCurve;
use crate::vulnerability::model::{ConfigError, VulnerabilityModel};

/// Tuning knobs for matrix assembly.
#[derive(Debug, Clone, Copy)]
pub struct BuildConfig {
    /// Entries with impact at or below this value are not stored. Keeps the
    /// matrix sparse by contract; 0 drops exactly the zero-damage entries.
    pub negligibility_threshold: f64,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            negligibility_threshold: 0.0,
        }
    }
}

/// Fatal, pre-computation failure of a build call.
#[derive(Debug, Clone, PartialEq)]
pub enum BuildError {
    /// Vulnerability configuration problem (missing or malformed curve).
    Config(ConfigError),
    /// The spatial assignment does not cover the exposure inventory.
    AssignmentSize { expected: usize, found: usize },
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
            Self::AssignmentSize { expected, found } => write!(
                f,
                "spatial assignment covers {found} points, exposure has {expected}"
            ),
        }
    }
}

impl std::error::Error for BuildError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::AssignmentSize { .. } => None,
        }
    }
}

impl From<ConfigError> for BuildError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

/// Per-point state resolved once before the event loop.
struct PointCtx<'a> {
    curve: &'a VulnerabilityCurve,
    value: f64,
    cells: &'a [(CellId, f64)],
    weight_sum: f64,
}

/// Build the sparse impact matrix on the global Rayon pool.
///
/// Configuration problems (missing or malformed vulnerability curves,
/// mismatched assignment) fail fast before any computation. Per-record data
/// problems never abort the run; they are counted in the returned
/// [RunDiagnostics].
pub fn build(
    events: &HazardEventSet,
    exposure: &ExposureInventory,
    assignment: &SpatialAssignment,
    model: &VulnerabilityModel,
    config: BuildConfig,
) -> Result<(ImpactMatrix, RunDiagnostics), BuildError> {
    build_with_pool(
        events,
        exposure,
        assignment,
        model,
        config,
        &WorkerPool::default(),
    )
}

/// Like [build], but on a caller-configured [WorkerPool].
pub fn build_with_pool(
    events: &HazardEventSet,
    exposure: &ExposureInventory,
    assignment: &SpatialAssignment,
    model: &VulnerabilityModel,
    config: BuildConfig,
    pool: &WorkerPool,
) -> Result<(ImpactMatrix, RunDiagnostics), BuildError> {
    if assignment.len() != exposure.len() {
        return Err(BuildError::AssignmentSize {
            expected: exposure.len(),
            found: assignment.len(),
        });
    }
    // Required-completeness over the whole inventory, before any work.
    model.check_complete(events.hazard_type(), exposure.asset_types())?;

    let mut diagnostics = RunDiagnostics {
        excluded_points: assignment.excluded_points().to_vec(),
        ..RunDiagnostics::default()
    };

    let points = resolve_points(events, exposure, assignment, model, &mut diagnostics)?;
    let event_usable = screen_frequencies(events, &mut diagnostics);

    let n_events = events.len();
    let ranges = batch_ranges(n_events, default_batch_count(n_events));
    let batches: Vec<(Vec<Vec<(u32, f64)>>, usize)> = pool.install(|| {
        ranges
            .par_iter()
            .map(|&(start, end)| {
                build_batch(
                    &events.events()[start..end],
                    &event_usable[start..end],
                    &points,
                    config.negligibility_threshold,
                )
            })
            .collect()
    });

    let mut segments = Vec::with_capacity(n_events);
    for (rows, rejected_intensities) in batches {
        segments.extend(rows);
        diagnostics.rejected_intensity_entries += rejected_intensities;
    }

    Ok((
        ImpactMatrix::from_segments(exposure.len(), segments),
        diagnostics,
    ))
}

/// Resolve the vulnerability curve and assignment slice per exposure point.
/// Points that cannot contribute (rejected value, excluded by assignment)
/// become `None` and are skipped by every event.
fn resolve_points<'a>(
    events: &HazardEventSet,
    exposure: &'a ExposureInventory,
    assignment: &'a SpatialAssignment,
    model: &'a VulnerabilityModel,
    diagnostics: &mut RunDiagnostics,
) -> Result<Vec<Option<PointCtx<'a>>>, BuildError> {
    let mut points = Vec::with_capacity(exposure.len());
    for (idx, point) in exposure.points().iter().enumerate() {
        if !(point.value > 0.0) || !point.value.is_finite() {
            diagnostics.rejected_exposure_records += 1;
            points.push(None);
            continue;
        }
        let cells = assignment.cells_for(idx);
        if cells.is_empty() {
            // Already listed in excluded_points by the indexer.
            points.push(None);
            continue;
        }
        let curve = model
            .get(events.hazard_type(), &point.asset_type)
            .ok_or_else(|| ConfigError::MissingCurve {
                hazard_type: events.hazard_type().to_string(),
                asset_type: point.asset_type.clone(),
            })?;
        points.push(Some(PointCtx {
            curve,
            value: point.value,
            cells,
            weight_sum: assignment.weight_sum(idx),
        }));
    }
    Ok(points)
}

/// Mark events whose frequency is usable; reject and count the rest.
fn screen_frequencies(events: &HazardEventSet, diagnostics: &mut RunDiagnostics) -> Vec<bool> {
    events
        .events()
        .iter()
        .map(|event| {
            let ok = event.frequency >= 0.0 && event.frequency.is_finite();
            if !ok {
                diagnostics.rejected_frequency_records += 1;
            }
            ok
        })
        .collect()
}

/// Compute the row segments for one contiguous batch of events.
/// Returns the rows plus the count of rejected intensity entries.
fn build_batch(
    events: &[HazardEvent],
    usable: &[bool],
    points: &[Option<PointCtx<'_>>],
    threshold: f64,
) -> (Vec<Vec<(u32, f64)>>, usize) {
    let mut rows = Vec::with_capacity(events.len());
    let mut rejected_intensities = 0usize;

    for (event, &event_ok) in events.iter().zip(usable) {
        if !event_ok || event.intensity.is_empty() {
            // An event with an empty footprint is valid: it just has no
            // impact entries.
            rows.push(Vec::new());
            continue;
        }
        rejected_intensities += event
            .intensity
            .entries()
            .iter()
            .filter(|&&(_, v)| v < 0.0 || !v.is_finite())
            .count();

        let mut row = Vec::new();
        for (idx, ctx) in points.iter().enumerate() {
            let Some(ctx) = ctx else { continue };
            let mut effective_intensity = 0.0;
            for &(cell, weight) in ctx.cells {
                let intensity = event.intensity.get(cell);
                if intensity > 0.0 && intensity.is_finite() {
                    effective_intensity += weight * intensity;
                }
            }
            if effective_intensity <= 0.0 {
                continue;
            }
            let fraction = ctx.curve.damage_fraction(effective_intensity);
            let impact = fraction * ctx.value * ctx.weight_sum;
            if impact > threshold && impact > 0.0 {
                row.push((idx as u32, impact));
            }
        }
        rows.push(row);
    }

    (rows, rejected_intensities)
}
