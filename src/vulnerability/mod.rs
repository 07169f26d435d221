pub mod curve;
pub mod model;

pub use curve::{CurveError, VulnerabilityCurve};
pub use model::{ConfigError, VulnerabilityModel};
