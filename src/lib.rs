//! catrisk: probabilistic natural-catastrophe impact engine.
//!
//! Combines a stochastic hazard event set (sparse intensity fields with
//! annual occurrence frequencies), an exposure inventory (geolocated asset
//! values), and a vulnerability model (intensity-to-damage curves keyed by
//! hazard and asset type) into a sparse event-by-exposure impact matrix,
//! then derives expected annual impact and exceedance-frequency metrics.
//!
//! ```
//! use catrisk::engine::{run, BuildConfig};
//! use catrisk::exposure::{ExposureInventory, ExposurePoint};
//! use catrisk::geo::{AssignStrategy, GridCell, HazardGrid, LatLon};
//! use catrisk::hazard::{HazardEvent, HazardEventSet, IntensityField};
//! use catrisk::vulnerability::VulnerabilityModel;
//!
//! let grid = HazardGrid::new(vec![GridCell { id: 0, coord: LatLon::new(0.0, 0.0) }]);
//! let exposure = ExposureInventory::new(vec![ExposurePoint {
//!     coord: LatLon::new(0.0, 0.0),
//!     value: 1_000_000.0,
//!     asset_type: "building".to_string(),
//! }]);
//! let events = HazardEventSet::new(
//!     "TC",
//!     vec![HazardEvent::new(1, "storm", 0.01, IntensityField::from_entries(vec![(0, 30.0)]))],
//! );
//! let mut model = VulnerabilityModel::new();
//! model.insert_points("TC", "building", vec![(0.0, 0.0), (30.0, 0.1), (60.0, 0.5)]).unwrap();
//!
//! let result = run(
//!     &events,
//!     &exposure,
//!     &grid,
//!     &model,
//!     AssignStrategy::default(),
//!     BuildConfig::default(),
//! ).unwrap();
//! assert_eq!(result.aai_agg(), 1000.0);
//! ```

pub mod engine;
pub mod exposure;
pub mod export;
pub mod geo;
pub mod hazard;
pub mod parallel;
pub mod vulnerability;

pub use engine::{
    aggregate, build, build_with_pool, run, BuildConfig, BuildError, ExceedancePoint,
    ImpactMatrix, ImpactResult, ReturnPeriodImpact, RunDiagnostics,
};
pub use exposure::{ExposureInventory, ExposurePoint};
pub use geo::{assign, AssignStrategy, GridCell, HazardGrid, LatLon, SpatialAssignment};
pub use hazard::{HazardEvent, HazardEventSet, IntensityField};
pub use vulnerability::{ConfigError, CurveError, VulnerabilityCurve, VulnerabilityModel};
