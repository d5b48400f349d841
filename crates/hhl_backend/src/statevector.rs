//! Ideal statevector simulation
//!
//! Propagates the full amplitude vector through a circuit. The gate
//! kernels operate in place over the flat index space with qubit 0 as
//! the least significant bit. `Measure` gates are recorded but do not
//! collapse the state; the statevector path never samples.

use crate::execution::{Backend, ExecutionResult};
use hhl_core::{Circuit, Gate, HhlError, HhlResult};
use nalgebra::DVector;
use num_complex::Complex64;
use std::f64::consts::FRAC_1_SQRT_2;

/// Ideal statevector backend
pub struct StatevectorBackend {
    /// Backend name
    name: String,

    /// Number of qubits
    num_qubits: usize,
}

impl StatevectorBackend {
    /// Create a new statevector backend
    pub fn new(num_qubits: usize) -> Self {
        Self {
            name: "hhl_statevector".to_string(),
            num_qubits,
        }
    }

    /// Set backend name
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }
}

impl Backend for StatevectorBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    fn is_statevector(&self) -> bool {
        true
    }

    fn execute(&self, circuit: &Circuit) -> HhlResult<ExecutionResult> {
        if circuit.num_qubits() > self.num_qubits {
            return Err(HhlError::QubitOutOfRange {
                qubit: circuit.num_qubits(),
                num_qubits: self.num_qubits,
            });
        }
        let state = run_statevector(circuit)?;
        Ok(ExecutionResult::from_statevector(state, &self.name))
    }
}

// ============================================================================
// Propagation Engine
// ============================================================================

/// Run a circuit from |0...0> and return the final statevector
pub(crate) fn run_statevector(circuit: &Circuit) -> HhlResult<DVector<Complex64>> {
    let n = circuit.num_qubits();
    let mut state = vec![Complex64::new(0.0, 0.0); 1 << n];
    state[0] = Complex64::new(1.0, 0.0);

    for gate in circuit.gates() {
        apply_gate(&mut state, gate)?;
    }

    Ok(DVector::from_vec(state))
}

/// Apply one gate to the state in place
fn apply_gate(state: &mut [Complex64], gate: &Gate) -> HhlResult<()> {
    match gate {
        Gate::H(q) => apply_single(state, *q, |a, b| {
            (
                (a + b) * FRAC_1_SQRT_2,
                (a - b) * FRAC_1_SQRT_2,
            )
        }),
        Gate::X(q) => apply_single(state, *q, |a, b| (b, a)),
        Gate::Y(q) => apply_single(state, *q, |a, b| {
            (b * Complex64::new(0.0, -1.0), a * Complex64::new(0.0, 1.0))
        }),
        Gate::Z(q) => apply_single(state, *q, |a, b| (a, -b)),
        Gate::S(q) => apply_single(state, *q, |a, b| (a, b * Complex64::new(0.0, 1.0))),
        Gate::Sdg(q) => apply_single(state, *q, |a, b| (a, b * Complex64::new(0.0, -1.0))),
        Gate::Ry(q, angle) => {
            let c = (angle / 2.0).cos();
            let s = (angle / 2.0).sin();
            apply_single(state, *q, |a, b| (a * c - b * s, a * s + b * c))
        }
        Gate::Rz(q, angle) => {
            let phase_neg = Complex64::from_polar(1.0, -angle / 2.0);
            let phase_pos = Complex64::from_polar(1.0, angle / 2.0);
            apply_single(state, *q, |a, b| (a * phase_neg, b * phase_pos))
        }
        Gate::Cnot(c, t) => {
            let control_mask = 1usize << c;
            let target_mask = 1usize << t;
            for i in 0..state.len() {
                if (i & control_mask) != 0 && (i & target_mask) == 0 {
                    state.swap(i, i | target_mask);
                }
            }
            Ok(())
        }
        Gate::CPhase(c, t, angle) => {
            let mask = (1usize << c) | (1usize << t);
            let phase = Complex64::from_polar(1.0, *angle);
            for (i, amp) in state.iter_mut().enumerate() {
                if i & mask == mask {
                    *amp *= phase;
                }
            }
            Ok(())
        }
        Gate::Swap(q1, q2) => {
            let mask1 = 1usize << q1;
            let mask2 = 1usize << q2;
            for i in 0..state.len() {
                if (i & mask1) != 0 && (i & mask2) == 0 {
                    state.swap(i, i ^ mask1 ^ mask2);
                }
            }
            Ok(())
        }
        Gate::Unitary { qubits, matrix, .. } => apply_unitary(state, qubits, matrix),
        Gate::Initialize { qubits, amplitudes } => apply_initialize(state, qubits, amplitudes),
        Gate::Measure(_, _) | Gate::Barrier(_) => Ok(()),
    }
}

/// Apply a single-qubit gate via its action on the (|0>, |1>) amplitude pair
fn apply_single<F>(state: &mut [Complex64], q: usize, f: F) -> HhlResult<()>
where
    F: Fn(Complex64, Complex64) -> (Complex64, Complex64),
{
    let mask = 1usize << q;
    for i in 0..state.len() {
        if i & mask == 0 {
            let j = i | mask;
            let (new_i, new_j) = f(state[i], state[j]);
            state[i] = new_i;
            state[j] = new_j;
        }
    }
    Ok(())
}

/// Map a sub-space index onto the flat index bits of `qubits`
#[inline]
fn spread(sub: usize, qubits: &[usize]) -> usize {
    let mut out = 0usize;
    for (k, &q) in qubits.iter().enumerate() {
        out |= ((sub >> k) & 1) << q;
    }
    out
}

/// Apply a dense unitary over an ordered qubit list (gather/scatter)
fn apply_unitary(
    state: &mut [Complex64],
    qubits: &[usize],
    matrix: &nalgebra::DMatrix<Complex64>,
) -> HhlResult<()> {
    let k = qubits.len();
    let dim = 1usize << k;
    if matrix.nrows() != dim || matrix.ncols() != dim {
        return Err(HhlError::InternalError(format!(
            "unitary matrix is {}x{} but acts on {} qubits",
            matrix.nrows(),
            matrix.ncols(),
            k
        )));
    }

    let full_mask: usize = qubits.iter().map(|&q| 1usize << q).sum();
    let mut sub = vec![Complex64::new(0.0, 0.0); dim];

    for base in 0..state.len() {
        if base & full_mask != 0 {
            continue;
        }
        for (j, amp) in sub.iter_mut().enumerate() {
            *amp = state[base | spread(j, qubits)];
        }
        for row in 0..dim {
            let mut acc = Complex64::new(0.0, 0.0);
            for (col, &amp) in sub.iter().enumerate() {
                acc += matrix[(row, col)] * amp;
            }
            state[base | spread(row, qubits)] = acc;
        }
    }
    Ok(())
}

/// Prepare amplitudes on qubits currently in |0...0>
fn apply_initialize(
    state: &mut [Complex64],
    qubits: &[usize],
    amplitudes: &DVector<Complex64>,
) -> HhlResult<()> {
    let k = qubits.len();
    let dim = 1usize << k;
    if amplitudes.len() != dim {
        return Err(HhlError::InvalidAmplitudes(format!(
            "expected {} amplitudes for {} qubits, got {}",
            dim,
            k,
            amplitudes.len()
        )));
    }

    let full_mask: usize = qubits.iter().map(|&q| 1usize << q).sum();

    // Target qubits must be disentangled in |0...0>
    let residual: f64 = state
        .iter()
        .enumerate()
        .filter(|(i, _)| i & full_mask != 0)
        .map(|(_, amp)| amp.norm_sqr())
        .sum();
    if residual > 1e-12 {
        return Err(HhlError::InvalidAmplitudes(
            "initialize target qubits are not in |0...0>".to_string(),
        ));
    }

    for base in 0..state.len() {
        if base & full_mask != 0 {
            continue;
        }
        let rest = state[base];
        for j in 0..dim {
            state[base | spread(j, qubits)] = amplitudes[j] * rest;
        }
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
