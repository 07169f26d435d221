//! Insurance conditions applied on top of a built impact matrix.
//!
//! Deductibles and covers are per exposure point and transform the matrix
//! in place: entry' = clamp(entry - deductible, 0, cover). Entries reduced
//! to zero are dropped so the matrix stays sparse.

use std::fmt;

use crate::engine::matrix::ImpactMatrix;

/// Dimension failure of an insurance transformation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConditionSizeError {
    pub expected: usize,
    pub found: usize,
}

impl fmt::Display for ConditionSizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "condition vector covers {} points, matrix has {}",
            self.found, self.expected
        )
    }
}

impl std::error::Error for ConditionSizeError {}

/// Subtract a per-point deductible from every entry in its column, dropping
/// entries that fall to zero or below.
pub fn apply_deductible(
    matrix: &mut ImpactMatrix,
    deductible: &[f64],
) -> Result<(), ConditionSizeError> {
    check_len(matrix, deductible)?;
    matrix.map_entries(|point_idx, value| value - deductible[point_idx].max(0.0));
    Ok(())
}

/// Clip every entry to its column's cover, dropping entries whose cover
/// is zero.
pub fn apply_cover(matrix: &mut ImpactMatrix, cover: &[f64]) -> Result<(), ConditionSizeError> {
    check_len(matrix, cover)?;
    matrix.map_entries(|point_idx, value| value.min(cover[point_idx].max(0.0)));
    Ok(())
}

fn check_len(matrix: &ImpactMatrix, conditions: &[f64]) -> Result<(), ConditionSizeError> {
    if conditions.len() != matrix.n_points() {
        return Err(ConditionSizeError {
            expected: matrix.n_points(),
            found: conditions.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matrix() -> ImpactMatrix {
        ImpactMatrix::from_segments(2, vec![vec![(0, 100.0), (1, 30.0)], vec![(0, 10.0)]])
    }

    #[test]
    fn deductible_reduces_and_drops_entries() {
        let mut m = matrix();
        apply_deductible(&mut m, &[20.0, 50.0]).unwrap();
        assert_eq!(m.get(0, 0), 80.0);
        assert_eq!(m.get(0, 1), 0.0);
        assert_eq!(m.get(1, 0), 0.0);
        assert_eq!(m.nnz(), 1);
    }

    #[test]
    fn cover_clips_entries() {
        let mut m = matrix();
        apply_cover(&mut m, &[50.0, 0.0]).unwrap();
        assert_eq!(m.get(0, 0), 50.0);
        assert_eq!(m.get(0, 1), 0.0);
        assert_eq!(m.get(1, 0), 10.0);
        assert_eq!(m.nnz(), 2);
    }

    #[test]
    fn negative_conditions_are_treated_as_zero() {
        let mut m = matrix();
        apply_deductible(&mut m, &[-10.0, -10.0]).unwrap();
        assert_eq!(m, matrix());
        apply_cover(&mut m, &[-1.0, -1.0]).unwrap();
        assert_eq!(m.nnz(), 0);
    }

    #[test]
    fn wrong_length_is_rejected() {
        let mut m = matrix();
        let err = apply_deductible(&mut m, &[1.0]).unwrap_err();
        assert_eq!(
            err,
            ConditionSizeError {
                expected: 2,
                found: 1
            }
        );
    }
}
