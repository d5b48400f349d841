//! Initial-state preparation from a classical vector
//!
//! Normalizes the right-hand-side vector and loads it onto the io
//! register as one dense initialize operation.

use crate::traits::InitialState;
use hhl_core::{Gate, HhlError, HhlResult, Register};
use nalgebra::DVector;
use num_complex::Complex64;

/// Prepares the io register in the normalized right-hand-side state
#[derive(Debug, Clone)]
pub struct VectorPrep {
    /// Normalized target amplitudes
    amplitudes: DVector<Complex64>,
}

impl VectorPrep {
    /// Create a preparation stage from an arbitrary nonzero vector
    pub fn new(vector: &DVector<Complex64>) -> HhlResult<Self> {
        let norm = vector.norm();
        if norm <= 0.0 || !norm.is_finite() {
            return Err(HhlError::InvalidAmplitudes(
                "right-hand-side vector has zero or non-finite norm".to_string(),
            ));
        }
        if !vector.len().is_power_of_two() {
            return Err(HhlError::NotPowerOfTwo(vector.len()));
        }
        Ok(Self {
            amplitudes: vector.map(|c| c / norm),
        })
    }

    /// Normalized amplitudes loaded by this stage
    pub fn amplitudes(&self) -> &DVector<Complex64> {
        &self.amplitudes
    }

    /// Number of qubits required by the target state
    pub fn num_qubits(&self) -> usize {
        self.amplitudes.len().trailing_zeros() as usize
    }
}

impl InitialState for VectorPrep {
    fn construct_circuit(&self, io: &Register) -> HhlResult<Vec<Gate>> {
        if (1usize << io.size()) != self.amplitudes.len() {
            return Err(HhlError::RegisterSizeMismatch {
                expected: self.num_qubits(),
                actual: io.size(),
            });
        }
        Ok(vec![Gate::Initialize {
            qubits: io.qubits().collect(),
            amplitudes: self.amplitudes.clone(),
        }])
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn real_vector(values: &[f64]) -> DVector<Complex64> {
        DVector::from_iterator(values.len(), values.iter().map(|&v| Complex64::new(v, 0.0)))
    }

    #[test]
    fn test_normalization() {
        let prep = VectorPrep::new(&real_vector(&[3.0, 4.0])).unwrap();
        assert_relative_eq!(prep.amplitudes()[0].re, 0.6, epsilon = 1e-12);
        assert_relative_eq!(prep.amplitudes()[1].re, 0.8, epsilon = 1e-12);
        assert_eq!(prep.num_qubits(), 1);
    }

    #[test]
    fn test_zero_vector_rejected() {
        assert!(matches!(
            VectorPrep::new(&real_vector(&[0.0, 0.0])),
            Err(HhlError::InvalidAmplitudes(_))
        ));
    }

    #[test]
    fn test_non_power_of_two_rejected() {
        assert!(matches!(
            VectorPrep::new(&real_vector(&[1.0, 1.0, 1.0])),
            Err(HhlError::NotPowerOfTwo(3))
        ));
    }

    #[test]
    fn test_register_size_checked() {
        let prep = VectorPrep::new(&real_vector(&[1.0, 1.0])).unwrap();
        let io = Register::new("io", 0, 2);
        assert_eq!(
            prep.construct_circuit(&io),
            Err(HhlError::RegisterSizeMismatch {
                expected: 1,
                actual: 2,
            })
        );
    }

    #[test]
    fn test_emits_initialize_on_register() {
        let prep = VectorPrep::new(&real_vector(&[1.0, 1.0, 1.0, 1.0])).unwrap();
        let io = Register::new("io", 0, 2);
        let gates = prep.construct_circuit(&io).unwrap();
        assert_eq!(gates.len(), 1);
        match &gates[0] {
            Gate::Initialize { qubits, amplitudes } => {
                assert_eq!(qubits, &vec![0, 1]);
                assert_eq!(amplitudes.len(), 4);
            }
            other => panic!("unexpected gate {:?}", other),
        }
    }
}
