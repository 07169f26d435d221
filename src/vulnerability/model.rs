//! Vulnerability model: the closed (hazard type, asset type) -> curve map.
//!
//! The map is checked for completeness once at configuration time against
//! the asset types a run actually needs, never per lookup. A missing
//! combination is a configuration error, distinct from any numeric edge
//! case during evaluation.

use std::collections::HashMap;
use std::fmt;

use crate::vulnerability::curve::{CurveError, VulnerabilityCurve};

/// Configuration-level failure. Fatal to the run: surfaced before any
/// impact computation starts.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// No curve registered for a required (hazard type, asset type) pair.
    MissingCurve {
        hazard_type: String,
        asset_type: String,
    },
    /// A curve failed validation on registration.
    InvalidCurve {
        hazard_type: String,
        asset_type: String,
        reason: CurveError,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingCurve {
                hazard_type,
                asset_type,
            } => write!(
                f,
                "no vulnerability curve for hazard type {hazard_type:?}, asset type {asset_type:?}"
            ),
            Self::InvalidCurve {
                hazard_type,
                asset_type,
                reason,
            } => write!(
                f,
                "invalid vulnerability curve for hazard type {hazard_type:?}, \
                 asset type {asset_type:?}: {reason}"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Curves keyed by (hazard type, asset type).
#[derive(Debug, Clone, Default)]
pub struct VulnerabilityModel {
    curves: HashMap<(String, String), VulnerabilityCurve>,
}

impl VulnerabilityModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a validated curve. Replaces any existing entry for the key.
    pub fn insert(
        &mut self,
        hazard_type: impl Into<String>,
        asset_type: impl Into<String>,
        curve: VulnerabilityCurve,
    ) {
        self.curves
            .insert((hazard_type.into(), asset_type.into()), curve);
    }

    /// Register a curve from raw control points, validating it here.
    pub fn insert_points(
        &mut self,
        hazard_type: impl Into<String>,
        asset_type: impl Into<String>,
        points: Vec<(f64, f64)>,
    ) -> Result<(), ConfigError> {
        let hazard_type = hazard_type.into();
        let asset_type = asset_type.into();
        let curve = VulnerabilityCurve::new(points).map_err(|reason| ConfigError::InvalidCurve {
            hazard_type: hazard_type.clone(),
            asset_type: asset_type.clone(),
            reason,
        })?;
        self.insert(hazard_type, asset_type, curve);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.curves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }

    pub fn get(&self, hazard_type: &str, asset_type: &str) -> Option<&VulnerabilityCurve> {
        self.curves
            .get(&(hazard_type.to_string(), asset_type.to_string()))
    }

    /// Evaluate the damage fraction for one (hazard, asset, intensity)
    /// triple. An unmapped type pair is a [ConfigError], not a zero.
    pub fn damage_fraction(
        &self,
        hazard_type: &str,
        asset_type: &str,
        intensity: f64,
    ) -> Result<f64, ConfigError> {
        self.get(hazard_type, asset_type)
            .map(|curve| curve.damage_fraction(intensity))
            .ok_or_else(|| ConfigError::MissingCurve {
                hazard_type: hazard_type.to_string(),
                asset_type: asset_type.to_string(),
            })
    }

    /// Required-completeness check: every asset type must have a curve for
    /// `hazard_type`. Runs once before computation; reports the first
    /// missing pair.
    pub fn check_complete<'a>(
        &self,
        hazard_type: &str,
        asset_types: impl IntoIterator<Item = &'a str>,
    ) -> Result<(), ConfigError> {
        for asset_type in asset_types {
            if self.get(hazard_type, asset_type).is_none() {
                return Err(ConfigError::MissingCurve {
                    hazard_type: hazard_type.to_string(),
                    asset_type: asset_type.to_string(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model() -> VulnerabilityModel {
        let mut m = VulnerabilityModel::new();
        m.insert_points("TC", "building", vec![(0.0, 0.0), (30.0, 0.1), (60.0, 0.5)])
            .unwrap();
        m.insert("TC", "park", VulnerabilityCurve::null());
        m
    }

    #[test]
    fn damage_fraction_uses_registered_curve() {
        let m = model();
        assert_eq!(m.damage_fraction("TC", "building", 30.0).unwrap(), 0.1);
    }

    #[test]
    fn null_curve_is_defined_zero_not_missing() {
        let m = model();
        assert_eq!(m.damage_fraction("TC", "park", 100.0).unwrap(), 0.0);
        assert!(m.get("TC", "park").is_some_and(VulnerabilityCurve::is_null));
    }

    #[test]
    fn missing_pair_is_a_config_error() {
        let m = model();
        let err = m.damage_fraction("FL", "building", 1.0).unwrap_err();
        assert_eq!(
            err,
            ConfigError::MissingCurve {
                hazard_type: "FL".to_string(),
                asset_type: "building".to_string(),
            }
        );
    }

    #[test]
    fn completeness_check_reports_first_missing_pair() {
        let m = model();
        assert!(m.check_complete("TC", ["building", "park"]).is_ok());
        let err = m.check_complete("TC", ["building", "bridge"]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingCurve { asset_type, .. } if asset_type == "bridge"));
    }

    #[test]
    fn invalid_points_surface_curve_reason() {
        let mut m = VulnerabilityModel::new();
        let err = m
            .insert_points("TC", "building", vec![(0.0, 0.9), (10.0, 0.1)])
            .unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidCurve {
                reason: crate::vulnerability::curve::CurveError::DecreasingFraction,
                ..
            }
        ));
    }
}
