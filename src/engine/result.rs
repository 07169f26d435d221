//! The immutable output of one engine run.

use serde::Serialize;

use crate::engine::diagnostics::RunDiagnostics;

/// One point of the exceedance-frequency curve: the annual frequency with
/// which total event impact reaches or exceeds `impact`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExceedancePoint {
    pub impact: f64,
    pub frequency: f64,
}

/// Impact at a requested return period, with an explicit flag when the
/// period lies outside the empirical frequency range of the curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReturnPeriodImpact {
    pub period_years: f64,
    pub impact: f64,
    /// True when the requested period could not be answered from within the
    /// curve (shorter than the finest resolved period, or longer than the
    /// rarest). The impact is then the clamped endpoint value.
    pub extrapolated: bool,
}

/// Derived risk metrics for one (hazard, exposure, vulnerability) run.
///
/// Constructed once by the aggregator and never mutated; holds no reference
/// back into engine state, so it can be handed to reporting code freely.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImpactResult {
    aai_agg: f64,
    eai_exp: Vec<f64>,
    at_event: Vec<f64>,
    curve: Vec<ExceedancePoint>,
    diagnostics: RunDiagnostics,
}

impl ImpactResult {
    pub(crate) fn new(
        aai_agg: f64,
        eai_exp: Vec<f64>,
        at_event: Vec<f64>,
        curve: Vec<ExceedancePoint>,
        diagnostics: RunDiagnostics,
    ) -> Self {
        Self {
            aai_agg,
            eai_exp,
            at_event,
            curve,
            diagnostics,
        }
    }

    /// Aggregate expected annual impact over the whole inventory.
    pub fn aai_agg(&self) -> f64 {
        self.aai_agg
    }

    /// Expected annual impact per exposure point, indexed like the
    /// inventory.
    pub fn eai_exp(&self) -> &[f64] {
        &self.eai_exp
    }

    /// Total impact per event, indexed like the event set.
    pub fn at_event(&self) -> &[f64] {
        &self.at_event
    }

    /// Exceedance-frequency curve, ascending in impact, frequency
    /// non-increasing. Impact values are unique: events with identical
    /// totals were merged.
    pub fn exceedance_curve(&self) -> &[ExceedancePoint] {
        &self.curve
    }

    /// Non-fatal anomalies observed while building the underlying matrix.
    pub fn diagnostics(&self) -> &RunDiagnostics {
        &self.diagnostics
    }

    /// Impacts at the requested return periods (years), by linear
    /// interpolation on the exceedance curve. Periods outside the curve's
    /// empirical frequency range are answered with the clamped endpoint and
    /// flagged as extrapolated, never silently treated as exact.
    pub fn return_period_impacts(&self, periods: &[f64]) -> Vec<ReturnPeriodImpact> {
        periods
            .iter()
            .map(|&period_years| self.impact_at_period(period_years))
            .collect()
    }

    fn impact_at_period(&self, period_years: f64) -> ReturnPeriodImpact {
        let flagged = |impact| ReturnPeriodImpact {
            period_years,
            impact,
            extrapolated: true,
        };
        if self.curve.is_empty() || !(period_years > 0.0) || !period_years.is_finite() {
            return flagged(0.0);
        }
        let frequency = 1.0 / period_years;
        // Curve is ascending in impact, so frequencies run high to low.
        let (max_freq, min_freq) = (self.curve[0].frequency, self.curve[self.curve.len() - 1].frequency);
        if frequency > max_freq {
            // Shorter period than the finest frequency resolution.
            return flagged(self.curve[0].impact);
        }
        if frequency < min_freq {
            return flagged(self.curve[self.curve.len() - 1].impact);
        }
        // First point whose frequency drops below the request brackets it
        // with its predecessor.
        let hi = self.curve.partition_point(|p| p.frequency >= frequency);
        if hi == 0 {
            return ReturnPeriodImpact {
                period_years,
                impact: self.curve[0].impact,
                extrapolated: false,
            };
        }
        if hi == self.curve.len() {
            return ReturnPeriodImpact {
                period_years,
                impact: self.curve[self.curve.len() - 1].impact,
                extrapolated: false,
            };
        }
        let lo = &self.curve[hi - 1];
        let hi = &self.curve[hi];
        let impact = if lo.frequency == hi.frequency {
            // Flat stretch (zero-frequency merge); take the larger impact.
            hi.impact
        } else {
            let t = (lo.frequency - frequency) / (lo.frequency - hi.frequency);
            lo.impact + t * (hi.impact - lo.impact)
        };
        ReturnPeriodImpact {
            period_years,
            impact,
            extrapolated: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result_with_curve(curve: Vec<ExceedancePoint>) -> ImpactResult {
        ImpactResult::new(0.0, vec![], vec![], curve, RunDiagnostics::default())
    }

    fn point(impact: f64, frequency: f64) -> ExceedancePoint {
        ExceedancePoint { impact, frequency }
    }

    #[test]
    fn exact_curve_frequencies_are_not_extrapolated() {
        let r = result_with_curve(vec![point(100.0, 0.1), point(500.0, 0.01)]);
        let out = r.return_period_impacts(&[10.0, 100.0]);
        assert_eq!(out[0].impact, 100.0);
        assert!(!out[0].extrapolated);
        assert_eq!(out[1].impact, 500.0);
        assert!(!out[1].extrapolated);
    }

    #[test]
    fn interpolates_between_curve_points() {
        let r = result_with_curve(vec![point(100.0, 0.1), point(500.0, 0.01)]);
        let out = r.return_period_impacts(&[1.0 / 0.055]);
        assert!(!out[0].extrapolated);
        assert!((out[0].impact - 300.0).abs() < 1e-9, "got {}", out[0].impact);
    }

    #[test]
    fn period_shorter_than_finest_resolution_is_flagged() {
        let r = result_with_curve(vec![point(100.0, 0.1), point(500.0, 0.01)]);
        let out = r.return_period_impacts(&[5.0]);
        assert!(out[0].extrapolated);
        assert_eq!(out[0].impact, 100.0);
    }

    #[test]
    fn period_beyond_rarest_event_is_flagged() {
        let r = result_with_curve(vec![point(100.0, 0.1), point(500.0, 0.01)]);
        let out = r.return_period_impacts(&[1000.0]);
        assert!(out[0].extrapolated);
        assert_eq!(out[0].impact, 500.0);
    }

    #[test]
    fn degenerate_periods_and_empty_curves_are_flagged_zero() {
        let empty = result_with_curve(vec![]);
        assert!(empty.return_period_impacts(&[100.0])[0].extrapolated);
        let r = result_with_curve(vec![point(100.0, 0.1)]);
        let out = r.return_period_impacts(&[0.0, -3.0, f64::NAN]);
        assert!(out.iter().all(|o| o.extrapolated && o.impact == 0.0));
    }
}
