//! Event-range batching for parallel matrix assembly.
//!
//! The builder splits the event axis into contiguous ranges; each range is
//! computed by one worker into its own row segments, and segments are
//! concatenated in event order afterwards.

/// Split `total` items into up to `num_batches` ranges `[start, end)`.
/// Batches are as equal in size as possible; later batches may be smaller.
///
/// # Example
/// ```
/// # use catrisk::parallel::batch_ranges;
/// let ranges = batch_ranges(100, 4);
/// assert_eq!(ranges, vec![(0, 25), (25, 50), (50, 75), (75, 100)]);
/// ```
pub fn batch_ranges(total: usize, num_batches: usize) -> Vec<(usize, usize)> {
    if total == 0 || num_batches == 0 {
        return Vec::new();
    }
    let num_batches = num_batches.min(total);
    let base = total / num_batches;
    let remainder = total % num_batches;
    let mut ranges = Vec::with_capacity(num_batches);
    let mut start = 0;
    for i in 0..num_batches {
        let size = base + if i < remainder { 1 } else { 0 };
        let end = start + size;
        ranges.push((start, end));
        start = end;
    }
    ranges
}

/// Batch count for `total` events: enough ranges to keep every worker busy
/// without making segments degenerate for small event sets.
pub fn default_batch_count(total: usize) -> usize {
    const EVENTS_PER_BATCH: usize = 256;
    total.div_ceil(EVENTS_PER_BATCH).max(1)
}
