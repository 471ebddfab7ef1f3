//! Dense 4×4 linear solve for the cubic normal equations.
//!
//! Gauss–Jordan elimination with partial pivoting on a fixed-size array,
//! in place. A pivot whose magnitude falls below [`PIVOT_TOL`] after the row
//! exchange means the system is (numerically) rank deficient.

use crate::error::IvSmileError;

/// Smallest pivot magnitude accepted before reporting a singular system.
pub(crate) const PIVOT_TOL: f64 = 1e-12;

/// Solve `m · θ = rhs` for θ, consuming both arguments.
///
/// # Errors
/// Returns [`IvSmileError::SingularSystem`] when a pivot is below [`PIVOT_TOL`].
pub(crate) fn solve_4x4(
    mut m: [[f64; 4]; 4],
    mut rhs: [f64; 4],
) -> crate::error::Result<[f64; 4]> {
    for col in 0..4 {
        // Largest magnitude in this column among the remaining rows
        let mut pivot_row = col;
        for row in col + 1..4 {
            if m[row][col].abs() > m[pivot_row][col].abs() {
                pivot_row = row;
            }
        }
        if pivot_row != col {
            m.swap(col, pivot_row);
            rhs.swap(col, pivot_row);
        }

        let pivot = m[col][col];
        if pivot.is_nan() || pivot.abs() < PIVOT_TOL {
            return Err(IvSmileError::SingularSystem { column: col, pivot });
        }

        for c in col..4 {
            m[col][c] /= pivot;
        }
        rhs[col] /= pivot;

        for row in 0..4 {
            if row == col {
                continue;
            }
            let factor = m[row][col];
            if factor == 0.0 {
                continue;
            }
            for c in col..4 {
                m[row][c] -= factor * m[col][c];
            }
            rhs[row] -= factor * rhs[col];
        }
    }
    Ok(rhs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn identity_returns_rhs() {
        let m = [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ];
        assert_eq!(solve_4x4(m, [1.0, 2.0, 3.0, 4.0]).unwrap(), [1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn requires_row_exchange() {
        // Zero leading entry: without pivoting the first step divides by zero.
        let m = [
            [0.0, 2.0, 0.0, 1.0],
            [3.0, 0.0, 1.0, 0.0],
            [0.0, 1.0, 4.0, 0.0],
            [1.0, 0.0, 0.0, 2.0],
        ];
        let x = [1.0, -2.0, 0.5, 3.0];
        let mut rhs = [0.0; 4];
        for (r, row) in m.iter().enumerate() {
            rhs[r] = row.iter().zip(&x).map(|(a, b)| a * b).sum();
        }
        let sol = solve_4x4(m, rhs).unwrap();
        for (s, e) in sol.iter().zip(&x) {
            assert_abs_diff_eq!(*s, *e, epsilon = 1e-12);
        }
    }

    #[test]
    fn rank_deficient_is_singular() {
        let m = [
            [1.0, 2.0, 3.0, 4.0],
            [2.0, 4.0, 6.0, 8.0],
            [0.0, 1.0, 0.0, 1.0],
            [1.0, 0.0, 1.0, 0.0],
        ];
        assert!(matches!(
            solve_4x4(m, [1.0, 2.0, 3.0, 4.0]),
            Err(IvSmileError::SingularSystem { .. })
        ));
    }

    #[test]
    fn nan_pivot_is_singular() {
        let mut m = [[0.0; 4]; 4];
        for (i, row) in m.iter_mut().enumerate() {
            row[i] = 1.0;
        }
        m[0][0] = f64::NAN;
        assert!(matches!(
            solve_4x4(m, [1.0; 4]),
            Err(IvSmileError::SingularSystem { column: 0, .. })
        ));
    }

    #[test]
    fn tiny_pivot_below_tolerance_is_singular() {
        let m = [
            [1e-13, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ];
        match solve_4x4(m, [1.0; 4]) {
            Err(IvSmileError::SingularSystem { column, pivot }) => {
                assert_eq!(column, 0);
                assert_eq!(pivot, 1e-13);
            }
            other => panic!("expected singular system, got {other:?}"),
        }
    }
}
