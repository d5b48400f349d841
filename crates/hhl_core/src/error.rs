//! Error types for the HHL workspace
//!
//! One error enum covers the whole pipeline: input validation,
//! circuit construction, collaborator contracts, backend execution,
//! and numerical degeneracies during result extraction.

// Error variant fields are self-documenting via error messages
#![allow(missing_docs)]

use thiserror::Error;

/// Main error type for the HHL solver
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HhlError {
    // ========================================================================
    // Input Validation Errors
    // ========================================================================
    /// Matrix is not square
    #[error("Input matrix is not square: {rows}x{cols}")]
    NonSquareMatrix { rows: usize, cols: usize },

    /// Vector length does not match matrix dimension
    #[error("Input vector dimension {len} does not match matrix dimension {rows}")]
    DimensionMismatch { rows: usize, len: usize },

    /// Matrix dimension is not a power of two
    #[error("Matrix dimension {0} must be 2^n for integer n >= 1")]
    NotPowerOfTwo(usize),

    /// Invalid amplitude vector (zero norm, wrong length, ...)
    #[error("Invalid amplitude vector: {0}")]
    InvalidAmplitudes(String),

    /// Invalid bitstring format
    #[error("Invalid bitstring '{0}': must contain only '0' and '1'")]
    InvalidBitstring(String),

    /// Invalid measurement basis label
    #[error("Invalid basis '{0}': must be X, Y, or Z")]
    InvalidBasis(String),

    // ========================================================================
    // Circuit Errors
    // ========================================================================
    /// Gate on non-existent qubit
    #[error("Gate references qubit {qubit} but circuit has only {num_qubits} qubits")]
    QubitOutOfRange { qubit: usize, num_qubits: usize },

    /// Measurement into non-existent classical bit
    #[error("Measurement references clbit {clbit} but circuit has only {num_clbits} clbits")]
    ClbitOutOfRange { clbit: usize, num_clbits: usize },

    /// Gate has no well-defined inverse
    #[error("Gate '{0}' is not invertible")]
    NonInvertibleGate(String),

    /// Two measurements target the same classical bit
    #[error("Classical bit {0} is written by more than one measurement")]
    DuplicateMeasurement(usize),

    // ========================================================================
    // Collaborator Contract Errors
    // ========================================================================
    /// Register size disagreement between pipeline stages
    #[error("Register size mismatch between stages: expected {expected}, got {actual}")]
    RegisterSizeMismatch { expected: usize, actual: usize },

    // ========================================================================
    // Backend Errors
    // ========================================================================
    /// Backend execution error
    #[error("Backend error: {0}")]
    BackendError(String),

    /// Statevector requested from a counts-only result
    #[error("Execution result carries no statevector")]
    StatevectorUnavailable,

    /// Counts requested from a statevector result
    #[error("Execution result carries no measurement counts")]
    CountsUnavailable,

    // ========================================================================
    // Numerical Degeneracy Errors
    // ========================================================================
    /// Classical solve failed (singular or near-singular matrix)
    #[error("Classical solve failed: input matrix is singular or near-singular")]
    SingularSystem,

    /// Tomographic reconstruction undefined: reference entry rho[0,0] ~ 0
    #[error("Tomographic reconstruction undefined: rho[0,0] = {0:.3e} is not positive")]
    DegenerateReconstruction(f64),

    /// No shots survived post-selection (strict mode only)
    #[error("Post-selection left zero shots for tomography basis '{basis}'")]
    PostSelectionUnderflow { basis: String },

    // ========================================================================
    // Generic Errors
    // ========================================================================
    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(String),

    /// Internal error (should not happen)
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Result type alias for HHL operations
pub type HhlResult<T> = Result<T, HhlError>;

// ============================================================================
// Error Conversion Helpers
// ============================================================================

impl From<serde_json::Error> for HhlError {
    fn from(err: serde_json::Error) -> Self {
        HhlError::JsonError(err.to_string())
    }
}

// ============================================================================
// Error Helpers
// ============================================================================

impl HhlError {
    /// Check if error is an input validation error
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            HhlError::NonSquareMatrix { .. }
                | HhlError::DimensionMismatch { .. }
                | HhlError::NotPowerOfTwo(_)
                | HhlError::InvalidAmplitudes(_)
                | HhlError::InvalidBitstring(_)
                | HhlError::InvalidBasis(_)
        )
    }

    /// Check if error is a numerical degeneracy that must be surfaced
    pub fn is_degeneracy(&self) -> bool {
        matches!(
            self,
            HhlError::SingularSystem
                | HhlError::DegenerateReconstruction(_)
                | HhlError::PostSelectionUnderflow { .. }
        )
    }

    /// Check if error is a contract violation between pipeline stages
    pub fn is_contract_error(&self) -> bool {
        matches!(self, HhlError::RegisterSizeMismatch { .. })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = HhlError::NotPowerOfTwo(3);
        assert!(err.to_string().contains('3'));

        let err = HhlError::DimensionMismatch { rows: 4, len: 3 };
        assert!(err.to_string().contains('4'));
        assert!(err.to_string().contains('3'));
    }

    #[test]
    fn test_is_validation_error() {
        assert!(HhlError::NotPowerOfTwo(3).is_validation_error());
        assert!(!HhlError::BackendError("test".into()).is_validation_error());
    }

    #[test]
    fn test_is_degeneracy() {
        assert!(HhlError::SingularSystem.is_degeneracy());
        assert!(HhlError::DegenerateReconstruction(0.0).is_degeneracy());
        assert!(!HhlError::NotPowerOfTwo(3).is_degeneracy());
    }

    #[test]
    fn test_is_contract_error() {
        let err = HhlError::RegisterSizeMismatch {
            expected: 6,
            actual: 4,
        };
        assert!(err.is_contract_error());
        assert!(!err.is_validation_error());
    }
}
