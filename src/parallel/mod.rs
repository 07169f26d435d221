pub mod batch;
pub mod pool;

pub use batch::{batch_ranges, default_batch_count};
pub use pool::WorkerPool;
