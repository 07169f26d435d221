pub mod event;

pub use event::{HazardEvent, HazardEventSet, IntensityField};
