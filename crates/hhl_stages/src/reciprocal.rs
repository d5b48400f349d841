//! Reciprocal rotation via eigenvalue lookup
//!
//! For every eigenvalue-register value m the decoded lambda determines
//! a controlled Ry angle `theta = 2*asin(C/lambda)` on the success
//! ancilla, with the scale C defaulting to the smallest representable
//! eigenvalue magnitude. The whole family of rotations is emitted as
//! one dense unitary over the eigenvalue register plus the ancilla.
//!
//! With negative eigenvalues enabled, register values in the top half
//! of the range decode through the two's-complement wrap to negative
//! lambdas; the rotation angle is negative there, marking the sign in
//! the ancilla phase.

use crate::traits::{EstimatorProfile, Reciprocal};
use hhl_core::{Gate, HhlError, HhlResult, QubitId, Register};
use nalgebra::{DMatrix, DVector};
use num_complex::Complex64;
use std::f64::consts::PI;

/// Lookup-table reciprocal rotation
#[derive(Debug, Clone, Default)]
pub struct LookupReciprocal {
    /// Eigenvalue register size this stage insists on, if any
    expected_size: Option<usize>,

    /// Override for the rotation scale C
    scale: Option<f64>,
}

impl LookupReciprocal {
    /// Create a lookup reciprocal with default scaling
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin the eigenvalue register size this stage accepts
    pub fn with_register_size(mut self, size: usize) -> Self {
        self.expected_size = Some(size);
        self
    }

    /// Override the rotation scale C
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = Some(scale);
        self
    }

    /// Decode a register value into an eigenvalue estimate
    pub fn decode(value: u64, profile: &EstimatorProfile) -> f64 {
        let range = (1u64 << profile.num_ancillae) as f64;
        let mut phase = value as f64 / range;
        if profile.negative_evals && phase >= 0.5 {
            phase -= 1.0;
        }
        2.0 * PI * phase / profile.evo_time
    }

    /// Effective rotation scale for a profile
    fn effective_scale(&self, profile: &EstimatorProfile) -> f64 {
        match self.scale {
            Some(c) => c,
            // smallest representable |lambda|, so every ratio C/lambda
            // stays within the asin domain
            None => 2.0 * PI / ((1u64 << profile.num_ancillae) as f64 * profile.evo_time),
        }
    }
}

impl Reciprocal for LookupReciprocal {
    fn expected_register_size(&self) -> Option<usize> {
        self.expected_size
    }

    fn construct_circuit(
        &self,
        eigenvalue: &Register,
        success: QubitId,
        profile: &EstimatorProfile,
    ) -> HhlResult<Vec<Gate>> {
        if let Some(expected) = self.expected_size {
            if eigenvalue.size() != expected {
                return Err(HhlError::RegisterSizeMismatch {
                    expected,
                    actual: eigenvalue.size(),
                });
            }
        }
        if eigenvalue.size() != profile.num_ancillae {
            return Err(HhlError::RegisterSizeMismatch {
                expected: profile.num_ancillae,
                actual: eigenvalue.size(),
            });
        }

        let range = 1usize << profile.num_ancillae;
        let scale = self.effective_scale(profile);

        // block-diagonal family of Ry rotations, ancilla bit on top:
        // index = ancilla_bit * range + register_value
        let mut matrix = DMatrix::<Complex64>::identity(2 * range, 2 * range);
        for m in 1..range {
            let lambda = Self::decode(m as u64, profile);
            let ratio = (scale / lambda).clamp(-1.0, 1.0);
            let theta = 2.0 * ratio.asin();
            let (sin, cos) = (theta / 2.0).sin_cos();
            matrix[(m, m)] = Complex64::new(cos, 0.0);
            matrix[(range + m, m)] = Complex64::new(sin, 0.0);
            matrix[(m, range + m)] = Complex64::new(-sin, 0.0);
            matrix[(range + m, range + m)] = Complex64::new(cos, 0.0);
        }

        let mut qubits: Vec<QubitId> = eigenvalue.qubits().collect();
        qubits.push(success);
        Ok(vec![Gate::Unitary {
            qubits,
            matrix,
            label: "reciprocal-ry".to_string(),
        }])
    }

    fn sv_to_resvec(
        &self,
        statevector: &DVector<Complex64>,
        num_q: usize,
    ) -> HhlResult<DVector<Complex64>> {
        let len = statevector.len();
        if len < 2 || !len.is_power_of_two() {
            return Err(HhlError::InvalidAmplitudes(format!(
                "statevector length {} is not a power of two",
                len
            )));
        }
        let half = len / 2;
        let dim = 1usize << num_q;
        if dim > half {
            return Err(HhlError::InvalidAmplitudes(format!(
                "statevector length {} cannot hold {} io qubits plus ancilla",
                len, num_q
            )));
        }

        // success ancilla is the top qubit; take the io sub-block of
        // the success branch with all other ancillae in |0>
        Ok(DVector::from_iterator(
            dim,
            (0..dim).map(|k| statevector[half + k]),
        ))
    }
}

// ============================================================================
// Tests
// ============================================================================
