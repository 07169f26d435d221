//! The impact calculation engine.
//!
//! Control flow for one run: spatial assignment (once per exposure/grid
//! pair) -> matrix assembly over events -> metric aggregation -> an
//! immutable [ImpactResult] handed to downstream consumers.

pub mod builder;
pub mod diagnostics;
pub mod insurance;
pub mod matrix;
pub mod metrics;
pub mod result;

pub use builder::{build, build_with_pool, BuildConfig, BuildError};
pub use diagnostics::RunDiagnostics;
pub use insurance::{apply_cover, apply_deductible, ConditionSizeError};
pub use matrix::ImpactMatrix;
pub use metrics::{aggregate, exceedance_curve};
pub use result::{ExceedancePoint, ImpactResult, ReturnPeriodImpact};

use crate::exposure::ExposureInventory;
use crate::geo::assign::{assign, AssignStrategy};
use crate::geo::grid::HazardGrid;
use crate::hazard::event::HazardEventSet;
use crate::vulnerability::model::VulnerabilityModel;

/// Run the whole engine in one call: assign, build, aggregate.
///
/// For callers that need the impact matrix itself (insurance conditions,
/// custom metrics), use [assign](crate::geo::assign::assign), [build] and
/// [aggregate] directly.
pub fn run(
    events: &HazardEventSet,
    exposure: &ExposureInventory,
    grid: &HazardGrid,
    model: &VulnerabilityModel,
    strategy: AssignStrategy,
    config: BuildConfig,
) -> Result<ImpactResult, BuildError> {
    let assignment = assign(exposure, grid, strategy);
    let (matrix, diagnostics) = build(events, exposure, &assignment, model, config)?;
    Ok(aggregate(&matrix, events, exposure, diagnostics))
}
