//! Piecewise-linear intensity-to-damage curves.

use std::fmt;

use serde::Serialize;

/// Why a curve was rejected at construction time. Curve problems are
/// configuration errors: they abort the run before any computation starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurveError {
    /// No control points. Use [VulnerabilityCurve::null] for an explicit
    /// zero-damage curve instead.
    Empty,
    /// Control-point intensities not strictly increasing.
    NonIncreasingIntensity,
    /// Damage fractions decrease somewhere along the curve.
    DecreasingFraction,
    /// A damage fraction lies outside [0, 1].
    FractionOutOfRange,
    /// A control point contains a NaN or infinite value.
    NonFiniteControlPoint,
}

impl fmt::Display for CurveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "curve has no control points"),
            Self::NonIncreasingIntensity => {
                write!(f, "control-point intensities must be strictly increasing")
            }
            Self::DecreasingFraction => {
                write!(f, "damage fractions must be monotonically non-decreasing")
            }
            Self::FractionOutOfRange => write!(f, "damage fractions must lie in [0, 1]"),
            Self::NonFiniteControlPoint => write!(f, "control points must be finite"),
        }
    }
}

impl std::error::Error for CurveError {}

/// A validated intensity-to-damage-fraction curve.
///
/// Evaluation is piecewise linear between control points. Intensity below
/// the first control point yields 0; intensity above the last saturates at
/// the last fraction (no extrapolation beyond the curve's maximum).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VulnerabilityCurve {
    points: Vec<(f64, f64)>,
}

impl VulnerabilityCurve {
    /// Build a curve from `(intensity, damage fraction)` control points.
    pub fn new(points: Vec<(f64, f64)>) -> Result<Self, CurveError> {
        if points.is_empty() {
            return Err(CurveError::Empty);
        }
        for window in points.windows(2) {
            if window[1].0 <= window[0].0 {
                return Err(CurveError::NonIncreasingIntensity);
            }
            if window[1].1 < window[0].1 {
                return Err(CurveError::DecreasingFraction);
            }
        }
        for &(intensity, fraction) in &points {
            if !intensity.is_finite() || !fraction.is_finite() {
                return Err(CurveError::NonFiniteControlPoint);
            }
            if !(0.0..=1.0).contains(&fraction) {
                return Err(CurveError::FractionOutOfRange);
            }
        }
        Ok(Self { points })
    }

    /// The explicit zero-damage curve: "no vulnerability, no damage",
    /// as opposed to an undefined (hazard, asset) combination.
    pub fn null() -> Self {
        Self { points: Vec::new() }
    }

    pub fn is_null(&self) -> bool {
        self.points.is_empty()
    }

    pub fn control_points(&self) -> &[(f64, f64)] {
        &self.points
    }

    /// Damage fraction at `intensity`, always in [0, 1].
    pub fn damage_fraction(&self, intensity: f64) -> f64 {
        let Some(&(first_x, first_y)) = self.points.first() else {
            return 0.0;
        };
        if intensity.is_nan() || intensity < first_x {
            return 0.0;
        }
        if intensity == first_x {
            return first_y;
        }
        let (last_x, last_y) = self.points[self.points.len() - 1];
        if intensity >= last_x {
            return last_y;
        }
        // First control point strictly above `intensity`; its predecessor
        // exists because intensity > first_x.
        let hi = self.points.partition_point(|&(x, _)| x <= intensity);
        let (x0, y0) = self.points[hi - 1];
        let (x1, y1) = self.points[hi];
        let t = (intensity - x0) / (x1 - x0);
        (y0 + t * (y1 - y0)).clamp(0.0, 1.0)
    }
}
