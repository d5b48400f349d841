//! Quantum phase estimation over a Hermitian operator
//!
//! Encodes eigenvalues of the system matrix into the eigenvalue
//! register: a Hadamard layer, controlled evolutions exp(iAt*2^j)
//! applied as dense unitaries built from the classical
//! eigendecomposition, and a gate-level inverse Fourier transform.
//!
//! The register reads out little-endian: eigenvalue-register qubit j
//! carries bit j of the phase integer m, with lambda decoded as
//! `2*pi*m / (2^num_ancillae * evo_time)`. When negative eigenvalues
//! are enabled the top half of the phase range wraps to negative
//! values and the evolution time is halved accordingly.

use crate::traits::{EigenvalueEstimator, EstimatorProfile};
use hhl_core::{Gate, HhlError, HhlResult, QubitId, Register};
use nalgebra::{DMatrix, DVector};
use num_complex::Complex64;
use std::f64::consts::PI;

/// QPE-based eigenvalue estimator
#[derive(Debug, Clone)]
pub struct PhaseEstimation {
    /// System register size (log2 of the matrix dimension)
    num_qubits: usize,

    /// Eigenvalue register size
    num_ancillae: usize,

    /// Whether the top half of the phase range encodes negative values
    negative_evals: bool,

    /// Evolution time; scales eigenvalues into the phase range
    evo_time: f64,

    /// Largest eigenvalue magnitude, kept for evo_time recomputation
    lambda_max: f64,

    /// Classical eigenvalues of the operator
    eigenvalues: DVector<f64>,

    /// Corresponding orthonormal eigenvectors (columns)
    eigenvectors: DMatrix<Complex64>,
}

impl PhaseEstimation {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Create an estimator for a Hermitian matrix
    ///
    /// The evolution time defaults to `(1 - 2^-m) * 2*pi / lambda_max`
    /// so the largest eigenvalue maps onto the top representable phase.
    pub fn new(matrix: &DMatrix<Complex64>, num_ancillae: usize) -> HhlResult<Self> {
        if matrix.nrows() != matrix.ncols() {
            return Err(HhlError::NonSquareMatrix {
                rows: matrix.nrows(),
                cols: matrix.ncols(),
            });
        }
        let dim = matrix.nrows();
        if dim < 2 || !dim.is_power_of_two() {
            return Err(HhlError::NotPowerOfTwo(dim));
        }
        if num_ancillae == 0 {
            return Err(HhlError::InternalError(
                "eigenvalue register must have at least one qubit".to_string(),
            ));
        }

        if !is_hermitian(matrix, 1e-10) {
            log::warn!("matrix is not Hermitian within tolerance; results are undefined");
        }

        let eigen = nalgebra::SymmetricEigen::new(matrix.clone());
        let lambda_max = eigen.eigenvalues.iter().fold(0.0f64, |m, &l| m.max(l.abs()));
        if lambda_max <= 0.0 {
            return Err(HhlError::SingularSystem);
        }

        let mut pe = Self {
            num_qubits: dim.trailing_zeros() as usize,
            num_ancillae,
            negative_evals: false,
            evo_time: 0.0,
            lambda_max,
            eigenvalues: eigen.eigenvalues,
            eigenvectors: eigen.eigenvectors,
        };
        pe.evo_time = pe.default_evo_time();
        Ok(pe)
    }

    /// Enable or disable the negative-eigenvalue encoding
    ///
    /// Recomputes the default evolution time; call before any explicit
    /// `with_evo_time` override.
    pub fn with_negative_evals(mut self, negative_evals: bool) -> Self {
        self.negative_evals = negative_evals;
        self.evo_time = self.default_evo_time();
        self
    }

    /// Override the evolution time
    pub fn with_evo_time(mut self, evo_time: f64) -> Self {
        self.evo_time = evo_time;
        self
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Current evolution time
    pub fn evo_time(&self) -> f64 {
        self.evo_time
    }

    /// Classical eigenvalues of the operator
    pub fn eigenvalues(&self) -> &DVector<f64> {
        &self.eigenvalues
    }

    fn default_evo_time(&self) -> f64 {
        let resolution = 0.5f64.powi(self.num_ancillae as i32);
        if self.negative_evals {
            (0.5 - resolution) * 2.0 * PI / self.lambda_max
        } else {
            (1.0 - resolution) * 2.0 * PI / self.lambda_max
        }
    }

    // ========================================================================
    // Circuit construction
    // ========================================================================

    /// Dense matrix of exp(i * A * evo_time * 2^power)
    fn evolution(&self, power: u32) -> DMatrix<Complex64> {
        let dim = self.eigenvectors.nrows();
        let t = self.evo_time * (1u64 << power) as f64;
        let mut u = DMatrix::<Complex64>::zeros(dim, dim);
        for k in 0..dim {
            let phase = Complex64::from_polar(1.0, self.eigenvalues[k] * t);
            let v = self.eigenvectors.column(k);
            for r in 0..dim {
                for c in 0..dim {
                    u[(r, c)] += phase * v[r] * v[c].conj();
                }
            }
        }
        u
    }

    /// Controlled version of a dense unitary, control on the top bit
    fn controlled(u: &DMatrix<Complex64>) -> DMatrix<Complex64> {
        let dim = u.nrows();
        let mut m = DMatrix::<Complex64>::identity(2 * dim, 2 * dim);
        for r in 0..dim {
            for c in 0..dim {
                m[(dim + r, dim + c)] = u[(r, c)];
            }
        }
        m
    }
}

impl EigenvalueEstimator for PhaseEstimation {
    fn register_sizes(&self) -> (usize, usize) {
        (self.num_qubits, self.num_ancillae)
    }

    fn profile(&self) -> EstimatorProfile {
        EstimatorProfile {
            num_ancillae: self.num_ancillae,
            negative_evals: self.negative_evals,
            evo_time: self.evo_time,
        }
    }

    fn construct_circuit(&self, io: &Register, eigenvalue: &Register) -> HhlResult<Vec<Gate>> {
        if io.size() != self.num_qubits {
            return Err(HhlError::RegisterSizeMismatch {
                expected: self.num_qubits,
                actual: io.size(),
            });
        }
        if eigenvalue.size() != self.num_ancillae {
            return Err(HhlError::RegisterSizeMismatch {
                expected: self.num_ancillae,
                actual: eigenvalue.size(),
            });
        }

        let eig: Vec<QubitId> = eigenvalue.qubits().collect();
        let mut gates = Vec::new();

        for &q in &eig {
            gates.push(Gate::H(q));
        }

        // ancilla j controls U^(2^j)
        for (j, &ctrl) in eig.iter().enumerate() {
            let unitary = Self::controlled(&self.evolution(j as u32));
            let mut qubits: Vec<QubitId> = io.qubits().collect();
            qubits.push(ctrl);
            gates.push(Gate::Unitary {
                qubits,
                matrix: unitary,
                label: format!("c-evo-2^{}", j),
            });
        }

        gates.extend(inverse_qft_gates(eigenvalue)?);
        Ok(gates)
    }
}

// ============================================================================
// Fourier transform fragments
// ============================================================================

/// Gate-level QFT over a register, little-endian convention
pub fn qft_gates(register: &Register) -> Vec<Gate> {
    let n = register.size();
    let q: Vec<QubitId> = register.qubits().collect();
    let mut gates = Vec::new();
    for j in (0..n).rev() {
        gates.push(Gate::H(q[j]));
        for m in (0..j).rev() {
            gates.push(Gate::CPhase(q[m], q[j], PI / (1u64 << (j - m)) as f64));
        }
    }
    for i in 0..n / 2 {
        gates.push(Gate::Swap(q[i], q[n - 1 - i]));
    }
    gates
}

/// Gate-level inverse QFT over a register
pub fn inverse_qft_gates(register: &Register) -> HhlResult<Vec<Gate>> {
    qft_gates(register)
        .iter()
        .rev()
        .map(|g| g.dagger())
        .collect()
}

fn is_hermitian(matrix: &DMatrix<Complex64>, tol: f64) -> bool {
    for r in 0..matrix.nrows() {
        for c in 0..matrix.ncols() {
            if (matrix[(r, c)] - matrix[(c, r)].conj()).norm() > tol {
                return false;
            }
        }
    }
    true
}

// ============================================================================
// Tests
// ============================================================================
