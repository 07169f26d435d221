pub mod assign;
pub mod coords;
pub mod grid;

pub use assign::{assign, AssignStrategy, SpatialAssignment, DEFAULT_MAX_DISTANCE_KM};
pub use coords::{LatLon, EARTH_RADIUS_KM, KM_PER_DEG};
pub use grid::{CellId, GridCell, HazardGrid};
