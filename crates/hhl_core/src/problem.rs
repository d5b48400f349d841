//! Linear-system input type
//!
//! `LinearSystem` is the validated input A·x = b. Validation happens
//! before any circuit construction: the matrix must be square, the
//! vector length must match, and the dimension must be an exact power
//! of two. Hermiticity is expected but advisory, matching the source
//! algorithm.

use crate::error::{HhlError, HhlResult};
use nalgebra::{DMatrix, DVector};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

/// Validated linear system A·x = b
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearSystem {
    matrix: DMatrix<Complex64>,
    vector: DVector<Complex64>,
}

impl LinearSystem {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Create a validated linear system.
    ///
    /// Errors if the matrix is not square, the vector length differs
    /// from the matrix dimension, or the dimension is not 2^n (n >= 1).
    pub fn new(matrix: DMatrix<Complex64>, vector: DVector<Complex64>) -> HhlResult<Self> {
        if matrix.nrows() != matrix.ncols() {
            return Err(HhlError::NonSquareMatrix {
                rows: matrix.nrows(),
                cols: matrix.ncols(),
            });
        }
        if matrix.nrows() != vector.len() {
            return Err(HhlError::DimensionMismatch {
                rows: matrix.nrows(),
                len: vector.len(),
            });
        }
        let dim = matrix.nrows();
        if dim < 2 || !dim.is_power_of_two() {
            return Err(HhlError::NotPowerOfTwo(dim));
        }
        Ok(Self { matrix, vector })
    }

    /// Build from real-valued rows and right-hand side (convenience)
    pub fn from_real(rows: &[&[f64]], rhs: &[f64]) -> HhlResult<Self> {
        let n = rows.len();
        let cols = rows.first().map(|r| r.len()).unwrap_or(0);
        let matrix = DMatrix::from_fn(n, cols, |i, j| Complex64::new(rows[i][j], 0.0));
        let vector = DVector::from_iterator(rhs.len(), rhs.iter().map(|&v| Complex64::new(v, 0.0)));
        Self::new(matrix, vector)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// The system matrix A
    pub fn matrix(&self) -> &DMatrix<Complex64> {
        &self.matrix
    }

    /// The right-hand side b
    pub fn vector(&self) -> &DVector<Complex64> {
        &self.vector
    }

    /// Matrix dimension (= vector length)
    pub fn dim(&self) -> usize {
        self.matrix.nrows()
    }

    /// Number of system-register qubits, log2(dim)
    pub fn num_qubits(&self) -> usize {
        self.dim().trailing_zeros() as usize
    }

    // ========================================================================
    // Diagnostics
    // ========================================================================

    /// Check A = A† entrywise within `tol`. Advisory only.
    pub fn is_hermitian(&self, tol: f64) -> bool {
        let n = self.dim();
        for i in 0..n {
            for j in 0..n {
                if (self.matrix[(i, j)] - self.matrix[(j, i)].conj()).norm() > tol {
                    return false;
                }
            }
        }
        true
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_system() {
        let sys = LinearSystem::from_real(&[&[1.0, 0.0], &[0.0, 2.0]], &[1.0, 1.0]).unwrap();
        assert_eq!(sys.dim(), 2);
        assert_eq!(sys.num_qubits(), 1);
        assert!(sys.is_hermitian(1e-12));
    }

    #[test]
    fn test_dimension_mismatch() {
        let err = LinearSystem::from_real(&[&[1.0, 0.0], &[0.0, 2.0]], &[1.0]).unwrap_err();
        assert_eq!(err, HhlError::DimensionMismatch { rows: 2, len: 1 });
    }

    #[test]
    fn test_not_power_of_two() {
        let err = LinearSystem::from_real(
            &[
                &[1.0, 0.0, 0.0],
                &[0.0, 2.0, 0.0],
                &[0.0, 0.0, 3.0],
            ],
            &[1.0, 1.0, 1.0],
        )
        .unwrap_err();
        assert_eq!(err, HhlError::NotPowerOfTwo(3));
    }

    #[test]
    fn test_non_square() {
        let matrix = DMatrix::from_element(2, 3, Complex64::new(1.0, 0.0));
        let vector = DVector::from_element(2, Complex64::new(1.0, 0.0));
        let err = LinearSystem::new(matrix, vector).unwrap_err();
        assert_eq!(err, HhlError::NonSquareMatrix { rows: 2, cols: 3 });
    }

    #[test]
    fn test_one_by_one_rejected() {
        let matrix = DMatrix::from_element(1, 1, Complex64::new(1.0, 0.0));
        let vector = DVector::from_element(1, Complex64::new(1.0, 0.0));
        assert_eq!(
            LinearSystem::new(matrix, vector).unwrap_err(),
            HhlError::NotPowerOfTwo(1)
        );
    }

    #[test]
    fn test_hermitian_check() {
        let matrix = DMatrix::from_row_slice(
            2,
            2,
            &[
                Complex64::new(1.0, 0.0),
                Complex64::new(0.0, 1.0),
                Complex64::new(0.0, 1.0), // should be -i for Hermitian
                Complex64::new(2.0, 0.0),
            ],
        );
        let vector = DVector::from_element(2, Complex64::new(1.0, 0.0));
        let sys = LinearSystem::new(matrix, vector).unwrap();
        assert!(!sys.is_hermitian(1e-12));
    }

    #[test]
    fn test_four_dim_valid() {
        let rows: Vec<Vec<f64>> = (0..4)
            .map(|i| (0..4).map(|j| if i == j { (i + 1) as f64 } else { 0.0 }).collect())
            .collect();
        let refs: Vec<&[f64]> = rows.iter().map(|r| r.as_slice()).collect();
        let sys = LinearSystem::from_real(&refs, &[1.0, 0.0, 0.0, 1.0]).unwrap();
        assert_eq!(sys.num_qubits(), 2);
    }
}
