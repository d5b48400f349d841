//! Tomographic reconstruction of the solution state
//!
//! Shot-path readout: one measurement circuit per Pauli basis setting
//! over the io register, executed as a single batch. Each variant's
//! counts are post-selected on the success clbit, marginalized onto the
//! io clbits, and fed into a least-squares density-matrix fit. The
//! reconstructed state is the fitted matrix's first column scaled by
//! `1/sqrt(rho[0,0])`, then normalized.
//!
//! A variant whose shots all fail post-selection carries the synthetic
//! `{"0": 0}` placeholder. Under the lenient policy it simply
//! contributes no equations to the fit; the strict policy turns it
//! into an explicit underflow error.

use crate::assembler::CircuitDescriptor;
use crate::config::PostSelectionPolicy;
use crate::postselect;
use hhl_core::{bit, format_bits, parse_bits, Basis, BasisString, Circuit, Counts, Gate, HhlError,
    HhlResult};
use hhl_backend::Backend;
use nalgebra::{DMatrix, DVector};
use num_complex::Complex64;
use std::f64::consts::FRAC_1_SQRT_2;

/// Reconstruction tolerance for the reference diagonal entry
const RHO_00_TOL: f64 = 1e-9;

/// Ordered set of Pauli measurement settings over a register
#[derive(Debug, Clone, PartialEq)]
pub struct TomographyBasisSet {
    settings: Vec<BasisString>,
}

impl TomographyBasisSet {
    /// Complete state-tomography set: all 3^n {X, Y, Z} combinations
    pub fn complete(num_q: usize) -> Self {
        const BASES: [Basis; 3] = [Basis::X, Basis::Y, Basis::Z];
        let total = 3usize.pow(num_q as u32);
        let mut settings = Vec::with_capacity(total);
        for index in 0..total {
            let mut digits = Vec::with_capacity(num_q);
            let mut rest = index;
            for _ in 0..num_q {
                digits.push(BASES[rest % 3]);
                rest /= 3;
            }
            settings.push(BasisString::new(digits));
        }
        Self { settings }
    }

    /// Settings in order
    pub fn settings(&self) -> &[BasisString] {
        &self.settings
    }

    /// Number of settings
    pub fn len(&self) -> usize {
        self.settings.len()
    }

    /// Whether the set is empty
    pub fn is_empty(&self) -> bool {
        self.settings.is_empty()
    }

    /// Measurement circuit variants: base circuit plus basis rotations
    /// and io measurements appended per setting
    ///
    /// Io qubit q is measured into clbit q+1; the base circuit already
    /// binds the success ancilla to clbit 0.
    pub fn variants(
        &self,
        base: &Circuit,
        descriptor: &CircuitDescriptor,
    ) -> HhlResult<Vec<Circuit>> {
        let io = &descriptor.io;
        let mut circuits = Vec::with_capacity(self.settings.len());
        for setting in &self.settings {
            let mut circuit = base.clone();
            let first_clbit = circuit.add_classical_register(io.size());
            for (offset, qubit) in io.qubits().enumerate() {
                circuit.append(Gate::basis_transform(qubit, setting.basis(offset)))?;
                circuit.measure(qubit, first_clbit + offset)?;
            }
            circuits.push(circuit);
        }
        Ok(circuits)
    }
}

/// Tomography outcome: state estimate plus per-basis success marginals
#[derive(Debug, Clone, PartialEq)]
pub struct Reconstruction {
    /// Unit-norm reconstructed system-register state
    pub vector: DVector<Complex64>,

    /// Success-bit marginal probability per basis setting
    pub probability_result: Vec<f64>,
}

/// Fits the solution state from post-selected measurement statistics
#[derive(Debug, Clone, Default)]
pub struct TomographicReconstructor {
    policy: PostSelectionPolicy,
}

impl TomographicReconstructor {
    /// Create a reconstructor with the given post-selection policy
    pub fn new(policy: PostSelectionPolicy) -> Self {
        Self { policy }
    }

    /// Run the full tomography pipeline against a backend
    pub fn reconstruct(
        &self,
        backend: &dyn Backend,
        base: &Circuit,
        descriptor: &CircuitDescriptor,
    ) -> HhlResult<Reconstruction> {
        let success_bit = descriptor.success_bit.ok_or_else(|| {
            HhlError::InternalError("tomography requires a measured success ancilla".to_string())
        })?;
        let num_q = descriptor.io.size();
        let targets: Vec<usize> = (0..num_q).map(|q| q + 1).collect();

        let basis_set = TomographyBasisSet::complete(num_q);
        let circuits = basis_set.variants(base, descriptor)?;
        let results = backend.execute_batch(&circuits)?;

        let mut probability_result = Vec::with_capacity(basis_set.len());
        let mut filtered_per_setting = Vec::with_capacity(basis_set.len());
        for (setting, result) in basis_set.settings().iter().zip(&results) {
            let counts = result.counts()?;
            probability_result.push(success_marginal(counts, success_bit)?);

            let filtered = postselect::filter(counts, success_bit, &targets)?;
            if postselect::is_placeholder(&filtered) {
                match self.policy {
                    PostSelectionPolicy::Strict => {
                        return Err(HhlError::PostSelectionUnderflow {
                            basis: setting.to_string(),
                        });
                    }
                    PostSelectionPolicy::Lenient => {
                        log::warn!("no shots survived post-selection for basis {}", setting);
                    }
                }
            }
            filtered_per_setting.push(filtered);
        }

        let rho = fit_density_matrix(basis_set.settings(), &filtered_per_setting, num_q)?;

        let rho_00 = rho[(0, 0)].re;
        if rho_00 <= RHO_00_TOL {
            return Err(HhlError::DegenerateReconstruction(rho_00));
        }
        let scale = rho_00.sqrt();
        let column: DVector<Complex64> =
            DVector::from_iterator(rho.nrows(), rho.column(0).iter().map(|c| c / scale));

        let norm = column.norm();
        if norm <= f64::EPSILON {
            return Err(HhlError::DegenerateReconstruction(norm));
        }
        Ok(Reconstruction {
            vector: column.map(|c| c / norm),
            probability_result,
        })
    }
}

/// Fraction of shots with the success clbit set
fn success_marginal(counts: &Counts, success_bit: usize) -> HhlResult<f64> {
    let mut success = 0u64;
    let mut total = 0u64;
    for (key, &count) in counts {
        if bit(parse_bits(key)?, success_bit) {
            success += count;
        }
        total += count;
    }
    if total == 0 {
        return Ok(0.0);
    }
    Ok(success as f64 / total as f64)
}

/// Least-squares density-matrix fit over Pauli projector statistics
///
/// One linear equation per (setting, outcome) pair with surviving
/// statistics: `Tr(P * rho) = p`, vectorized over the d^2 entries of
/// rho and solved via SVD.
fn fit_density_matrix(
    settings: &[BasisString],
    filtered: &[Counts],
    num_q: usize,
) -> HhlResult<DMatrix<Complex64>> {
    let dim = 1usize << num_q;
    let unknowns = dim * dim;

    let mut rows: Vec<DVector<Complex64>> = Vec::new();
    let mut rhs: Vec<Complex64> = Vec::new();

    for (setting, counts) in settings.iter().zip(filtered) {
        let total: u64 = counts.values().sum();
        if total == 0 {
            // placeholder variant, no equations
            continue;
        }
        for outcome in 0..dim as u64 {
            let count = counts
                .get(&format_bits(outcome, num_q))
                .copied()
                .unwrap_or(0);
            let psi = projector_state(setting, outcome, dim);
            let mut row = DVector::<Complex64>::zeros(unknowns);
            for r in 0..dim {
                for c in 0..dim {
                    row[r * dim + c] = psi[r].conj() * psi[c];
                }
            }
            rows.push(row);
            rhs.push(Complex64::new(count as f64 / total as f64, 0.0));
        }
    }

    if rows.len() < unknowns {
        return Err(HhlError::DegenerateReconstruction(rows.len() as f64));
    }

    let design = DMatrix::from_fn(rows.len(), unknowns, |r, c| rows[r][c]);
    let rhs = DVector::from_vec(rhs);
    let solution = design
        .svd(true, true)
        .solve(&rhs, 1e-12)
        .map_err(|_| HhlError::SingularSystem)?;

    Ok(DMatrix::from_fn(dim, dim, |r, c| solution[r * dim + c]))
}

/// Measured eigenstate of a Pauli setting for one outcome bitstring
///
/// The amplitude on basis index `idx` is the product over qubits of
/// the single-qubit eigenvector components; outcome bit q and index
/// bit q both follow the LSB-first convention.
fn projector_state(setting: &BasisString, outcome: u64, dim: usize) -> DVector<Complex64> {
    DVector::from_fn(dim, |idx, _| {
        let mut amp = Complex64::new(1.0, 0.0);
        for q in 0..setting.len() {
            amp *= single_qubit_amp(setting.basis(q), bit(outcome, q), bit(idx as u64, q));
        }
        amp
    })
}

fn single_qubit_amp(basis: Basis, outcome: bool, state_bit: bool) -> Complex64 {
    match basis {
        Basis::Z => {
            if state_bit == outcome {
                Complex64::new(1.0, 0.0)
            } else {
                Complex64::new(0.0, 0.0)
            }
        }
        Basis::X => {
            if state_bit && outcome {
                Complex64::new(-FRAC_1_SQRT_2, 0.0)
            } else {
                Complex64::new(FRAC_1_SQRT_2, 0.0)
            }
        }
        Basis::Y => {
            if !state_bit {
                Complex64::new(FRAC_1_SQRT_2, 0.0)
            } else if !outcome {
                Complex64::new(0.0, FRAC_1_SQRT_2)
            } else {
                Complex64::new(0.0, -FRAC_1_SQRT_2)
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::collections::HashMap;

    fn counts(pairs: &[(&str, u64)]) -> Counts {
        pairs.iter().map(|&(k, v)| (k.to_string(), v)).collect()
    }

    #[test]
    fn test_complete_set_size_and_order() {
        let set = TomographyBasisSet::complete(2);
        assert_eq!(set.len(), 9);
        // qubit 0 cycles fastest
        assert_eq!(set.settings()[0].to_string(), "XX");
        assert_eq!(set.settings()[1].to_string(), "YX");
        assert_eq!(set.settings()[3].to_string(), "XY");
    }

    #[test]
    fn test_projector_state_z_basis() {
        let setting = BasisString::parse("Z").unwrap();
        let psi = projector_state(&setting, 1, 2);
        assert_relative_eq!(psi[0].norm(), 0.0, epsilon = 1e-12);
        assert_relative_eq!(psi[1].re, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_projector_state_x_basis() {
        let setting = BasisString::parse("X").unwrap();
        let plus = projector_state(&setting, 0, 2);
        let minus = projector_state(&setting, 1, 2);
        assert_relative_eq!(plus[0].re, FRAC_1_SQRT_2, epsilon = 1e-12);
        assert_relative_eq!(plus[1].re, FRAC_1_SQRT_2, epsilon = 1e-12);
        assert_relative_eq!(minus[1].re, -FRAC_1_SQRT_2, epsilon = 1e-12);
    }

    #[test]
    fn test_projector_state_y_basis() {
        let setting = BasisString::parse("Y").unwrap();
        let plus = projector_state(&setting, 0, 2);
        assert_relative_eq!(plus[1].im, FRAC_1_SQRT_2, epsilon = 1e-12);
    }

    #[test]
    fn test_fit_recovers_basis_state() {
        // exact statistics for |1>: Z always reads 1, X and Y split
        let settings: Vec<BasisString> = ["X", "Y", "Z"]
            .iter()
            .map(|s| BasisString::parse(s).unwrap())
            .collect();
        let filtered = vec![
            counts(&[("0", 500), ("1", 500)]),
            counts(&[("0", 500), ("1", 500)]),
            counts(&[("1", 1000)]),
        ];
        let rho = fit_density_matrix(&settings, &filtered, 1).unwrap();
        assert_relative_eq!(rho[(1, 1)].re, 1.0, epsilon = 1e-9);
        assert_relative_eq!(rho[(0, 0)].norm(), 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_fit_recovers_plus_state() {
        let settings: Vec<BasisString> = ["X", "Y", "Z"]
            .iter()
            .map(|s| BasisString::parse(s).unwrap())
            .collect();
        let filtered = vec![
            counts(&[("0", 1000)]),
            counts(&[("0", 500), ("1", 500)]),
            counts(&[("0", 500), ("1", 500)]),
        ];
        let rho = fit_density_matrix(&settings, &filtered, 1).unwrap();
        assert_relative_eq!(rho[(0, 0)].re, 0.5, epsilon = 1e-9);
        assert_relative_eq!(rho[(0, 1)].re, 0.5, epsilon = 1e-9);
        assert_relative_eq!(rho[(0, 1)].im, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_fit_underdetermined_rejected() {
        let settings = vec![BasisString::parse("Z").unwrap()];
        let filtered = vec![counts(&[("0", 0)])];
        assert!(fit_density_matrix(&settings, &filtered, 1).is_err());
    }

    #[test]
    fn test_success_marginal() {
        let c = counts(&[("01", 30), ("00", 70)]);
        assert_relative_eq!(success_marginal(&c, 0).unwrap(), 0.3, epsilon = 1e-12);
    }

    #[test]
    fn test_empty_counts_marginal_is_zero() {
        let c: Counts = HashMap::new();
        assert_eq!(success_marginal(&c, 0).unwrap(), 0.0);
    }
}
