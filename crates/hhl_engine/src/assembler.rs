//! Circuit assembly from the pluggable stages
//!
//! Composes state preparation, phase estimation, reciprocal rotation,
//! and the exact inverse of the estimation into one circuit, in that
//! strict order. Register layout is fixed: io at the bottom, the
//! eigenvalue register above it, the success ancilla on top. Register
//! size disagreements between stages are contract violations and fail
//! here, before any execution.

use hhl_core::{Circuit, ClbitId, HhlError, HhlResult, QubitId, Register};
use hhl_stages::{EigenvalueEstimator, InitialState, Reciprocal};
use serde::{Deserialize, Serialize};

/// Qubit-group layout of an assembled circuit
///
/// Immutable after assembly apart from the optional classical bit
/// bound to the success ancilla.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircuitDescriptor {
    /// System register holding the solution state
    pub io: Register,

    /// Eigenvalue register used by phase estimation
    pub eigenvalue: Register,

    /// Success ancilla rotated by the reciprocal stage
    pub success: QubitId,

    /// Classical bit the success ancilla is measured into, if any
    pub success_bit: Option<ClbitId>,
}

/// Composes the algorithmic stages into one circuit
pub struct CircuitAssembler {
    init_state: Box<dyn InitialState>,
    estimator: Box<dyn EigenvalueEstimator>,
    reciprocal: Box<dyn Reciprocal>,
}

impl CircuitAssembler {
    /// Create an assembler from its three stages
    pub fn new(
        init_state: Box<dyn InitialState>,
        estimator: Box<dyn EigenvalueEstimator>,
        reciprocal: Box<dyn Reciprocal>,
    ) -> Self {
        Self {
            init_state,
            estimator,
            reciprocal,
        }
    }

    /// Reciprocal stage, needed for statevector-path extraction
    pub fn reciprocal(&self) -> &dyn Reciprocal {
        self.reciprocal.as_ref()
    }

    /// Eigenvalue estimator stage
    pub fn estimator(&self) -> &dyn EigenvalueEstimator {
        self.estimator.as_ref()
    }

    /// Assemble the full circuit for a system register of `num_q` qubits
    pub fn assemble(
        &self,
        num_q: usize,
        with_measurement: bool,
    ) -> HhlResult<(Circuit, CircuitDescriptor)> {
        let (est_q, num_a) = self.estimator.register_sizes();
        if est_q != num_q {
            return Err(HhlError::RegisterSizeMismatch {
                expected: num_q,
                actual: est_q,
            });
        }
        if let Some(expected) = self.reciprocal.expected_register_size() {
            if expected != num_a {
                return Err(HhlError::RegisterSizeMismatch {
                    expected,
                    actual: num_a,
                });
            }
        }

        let io = Register::new("io", 0, num_q);
        let eigenvalue = Register::new("eigenvalue", num_q, num_a);
        let success: QubitId = num_q + num_a;
        let total = num_q + num_a + 1;

        let mut circuit = Circuit::with_name(total, "hhl");
        circuit.append(self.init_state.construct_circuit(&io)?)?;

        // forward estimation kept as a fragment for exact inversion
        let mut forward = Circuit::new(total);
        forward.append(self.estimator.construct_circuit(&io, &eigenvalue)?)?;
        circuit.append(forward.gates().to_vec())?;

        circuit.append(self.reciprocal.construct_circuit(
            &eigenvalue,
            success,
            &self.estimator.profile(),
        )?)?;

        circuit.append(self.estimator.construct_inverse(&forward)?)?;

        let success_bit = if with_measurement {
            let clbit = circuit.add_classical_register(1);
            circuit.measure(success, clbit)?;
            Some(clbit)
        } else {
            None
        };

        log::debug!(
            "assembled circuit: {} qubits, depth {}, {} gates",
            total,
            circuit.depth(),
            circuit.gate_count()
        );

        Ok((
            circuit,
            CircuitDescriptor {
                io,
                eigenvalue,
                success,
                success_bit,
            },
        ))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use hhl_stages::{LookupReciprocal, PhaseEstimation, VectorPrep};
    use nalgebra::{DMatrix, DVector};
    use num_complex::Complex64;

    fn stages(
        num_a: usize,
        reciprocal_size: Option<usize>,
    ) -> (Box<dyn InitialState>, Box<dyn EigenvalueEstimator>, Box<dyn Reciprocal>) {
        let matrix = DMatrix::from_row_slice(
            2,
            2,
            &[
                Complex64::new(1.0, 0.0),
                Complex64::new(0.0, 0.0),
                Complex64::new(0.0, 0.0),
                Complex64::new(2.0, 0.0),
            ],
        );
        let rhs = DVector::from_vec(vec![Complex64::new(1.0, 0.0), Complex64::new(1.0, 0.0)]);
        let mut reciprocal = LookupReciprocal::new();
        if let Some(size) = reciprocal_size {
            reciprocal = reciprocal.with_register_size(size);
        }
        (
            Box::new(VectorPrep::new(&rhs).unwrap()),
            Box::new(PhaseEstimation::new(&matrix, num_a).unwrap()),
            Box::new(reciprocal),
        )
    }

    #[test]
    fn test_register_layout() {
        let (prep, est, rec) = stages(4, None);
        let assembler = CircuitAssembler::new(prep, est, rec);
        let (circuit, descriptor) = assembler.assemble(1, false).unwrap();

        assert_eq!(circuit.num_qubits(), 6);
        assert_eq!(circuit.num_clbits(), 0);
        assert_eq!(descriptor.io.qubits(), 0..1);
        assert_eq!(descriptor.eigenvalue.qubits(), 1..5);
        assert_eq!(descriptor.success, 5);
        assert_eq!(descriptor.success_bit, None);
    }

    #[test]
    fn test_measurement_binds_success_to_clbit_zero() {
        let (prep, est, rec) = stages(4, None);
        let assembler = CircuitAssembler::new(prep, est, rec);
        let (circuit, descriptor) = assembler.assemble(1, true).unwrap();

        assert_eq!(descriptor.success_bit, Some(0));
        assert_eq!(circuit.num_clbits(), 1);
        assert_eq!(circuit.measurement_map().unwrap(), vec![(5, 0)]);
    }

    #[test]
    fn test_io_size_mismatch_fails_before_assembly() {
        let (prep, est, rec) = stages(4, None);
        let assembler = CircuitAssembler::new(prep, est, rec);
        assert_eq!(
            assembler.assemble(2, false).unwrap_err(),
            HhlError::RegisterSizeMismatch {
                expected: 2,
                actual: 1,
            }
        );
    }

    #[test]
    fn test_stage_contract_mismatch_surfaced() {
        // reciprocal pinned to 5 qubits against a 4-qubit estimator
        let (prep, est, rec) = stages(4, Some(5));
        let assembler = CircuitAssembler::new(prep, est, rec);
        let err = assembler.assemble(1, false).unwrap_err();
        assert!(err.is_contract_error());
    }

    #[test]
    fn test_no_measurement_without_request() {
        let (prep, est, rec) = stages(3, None);
        let assembler = CircuitAssembler::new(prep, est, rec);
        let (circuit, _) = assembler.assemble(1, false).unwrap();
        assert!(circuit.measurement_map().unwrap().is_empty());
    }
}
