//! Risk metrics derived from the impact matrix and event frequencies.
//!
//! Expected annual impact per point is the frequency-weighted column sum;
//! the aggregate is the sum over points. The exceedance-frequency curve is
//! the cumulative frequency of events ordered by total impact.

use crate::engine::diagnostics::RunDiagnostics;
use crate::engine::matrix::ImpactMatrix;
use crate::engine::result::{ExceedancePoint, ImpactResult};
use crate::exposure::ExposureInventory;
use crate::hazard::event::HazardEventSet;

/// Derive all risk metrics for one run.
///
/// Frequencies rejected during the build (negative, non-finite) read as 0
/// here; their events carry no matrix entries either. Zero-frequency or
/// zero-impact events contribute nothing; zero-impact events are also left
/// off the exceedance curve.
pub fn aggregate(
    matrix: &ImpactMatrix,
    events: &HazardEventSet,
    exposure: &ExposureInventory,
    diagnostics: RunDiagnostics,
) -> ImpactResult {
    debug_assert_eq!(matrix.n_events(), events.len());
    debug_assert_eq!(matrix.n_points(), exposure.len());

    let frequencies: Vec<f64> = events
        .frequencies()
        .into_iter()
        .map(|f| if f.is_finite() && f > 0.0 { f } else { 0.0 })
        .collect();

    let mut eai_exp = vec![0.0; matrix.n_points()];
    for (event_idx, &frequency) in frequencies.iter().enumerate() {
        if frequency == 0.0 {
            continue;
        }
        for (point_idx, impact) in matrix.row(event_idx) {
            eai_exp[point_idx] += frequency * impact;
        }
    }
    let aai_agg = eai_exp.iter().sum();

    let at_event = matrix.event_totals();
    let curve = exceedance_curve(&at_event, &frequencies);

    ImpactResult::new(aai_agg, eai_exp, at_event, curve, diagnostics)
}

/// Build the exceedance-frequency curve from per-event totals.
///
/// Events sort by total impact descending; the frequency at each impact
/// level is the cumulative frequency of all events at least that severe.
/// Events with identical totals merge into one curve point with summed
/// frequency, so no two points share an impact value. Zero-impact events
/// are excluded. The returned curve ascends in impact.
pub fn exceedance_curve(at_event: &[f64], frequencies: &[f64]) -> Vec<ExceedancePoint> {
    let mut order: Vec<usize> = (0..at_event.len())
        .filter(|&i| at_event[i] > 0.0)
        .collect();
    order.sort_by(|&a, &b| {
        at_event[b]
            .partial_cmp(&at_event[a])
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.cmp(&b))
    });

    let mut curve: Vec<ExceedancePoint> = Vec::new();
    let mut cumulative = 0.0;
    for idx in order {
        cumulative += frequencies[idx];
        match curve.last_mut() {
            Some(last) if last.impact == at_event[idx] => last.frequency = cumulative,
            _ => curve.push(ExceedancePoint {
                impact: at_event[idx],
                frequency: cumulative,
            }),
        }
    }
    curve.reverse();
    curve
}
