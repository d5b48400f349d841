//! Stage contracts for the HHL pipeline
//!
//! The three algorithmic stages are pluggable behind fixed traits and
//! are resolved at construction time as typed values, never by runtime
//! name dispatch. Stage implementations emit gate fragments addressed
//! in the assembled circuit's flat qubit space; the assembler owns
//! register allocation and composition order.

use hhl_core::{Circuit, Gate, HhlResult, QubitId, Register};
use nalgebra::DVector;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

/// State exposed by an eigenvalue estimator to the reciprocal stage
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EstimatorProfile {
    /// Size of the eigenvalue register
    pub num_ancillae: usize,

    /// Whether negative eigenvalues are representable (top half of the
    /// phase range wraps to negative values)
    pub negative_evals: bool,

    /// Effective evolution time used for phase scaling
    pub evo_time: f64,
}

/// Initial-state preparation over the io register
pub trait InitialState: Send + Sync {
    /// Gates preparing the target state on `io` (assumed |0...0>)
    fn construct_circuit(&self, io: &Register) -> HhlResult<Vec<Gate>>;
}

/// Eigenvalue estimation (phase estimation) stage
pub trait EigenvalueEstimator: Send + Sync {
    /// (system register size, eigenvalue register size)
    fn register_sizes(&self) -> (usize, usize);

    /// Flag and timing state consumed by the reciprocal stage
    fn profile(&self) -> EstimatorProfile;

    /// Gates encoding eigenvalues of the operator into `eigenvalue`
    fn construct_circuit(&self, io: &Register, eigenvalue: &Register) -> HhlResult<Vec<Gate>>;

    /// Exact inverse of a previously constructed forward fragment,
    /// used to uncompute the eigenvalue register
    fn construct_inverse(&self, forward: &Circuit) -> HhlResult<Vec<Gate>> {
        forward.inverse_gates()
    }
}

/// Reciprocal/conditional-rotation stage
pub trait Reciprocal: Send + Sync {
    /// Eigenvalue register size this stage was configured for, if fixed
    fn expected_register_size(&self) -> Option<usize>;

    /// Gates rotating the `success` ancilla by the reciprocal of the
    /// eigenvalue encoded in `eigenvalue`
    fn construct_circuit(
        &self,
        eigenvalue: &Register,
        success: QubitId,
        profile: &EstimatorProfile,
    ) -> HhlResult<Vec<Gate>>;

    /// Statevector-path projection: sub-amplitudes of the io register
    /// on the success branch of the ancilla
    fn sv_to_resvec(
        &self,
        statevector: &DVector<Complex64>,
        num_q: usize,
    ) -> HhlResult<DVector<Complex64>>;
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_roundtrip() {
        let profile = EstimatorProfile {
            num_ancillae: 6,
            negative_evals: false,
            evo_time: 1.5,
        };
        let json = serde_json::to_string(&profile).unwrap();
        let back: EstimatorProfile = serde_json::from_str(&json).unwrap();
        assert_eq!(profile, back);
    }
}
