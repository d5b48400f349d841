//! Classical validation of the reconstructed state
//!
//! Solves the system directly, computes the fidelity of the
//! reconstructed state against the normalized classical solution, and
//! rescales the reconstructed state back into the original units.
//!
//! The phase correction is a single averaged global phase, the sum of
//! `angle(b_i * conj((A*v)_i))` over all components divided by the
//! register size. It assumes one dominant global phase error across
//! all amplitudes and is a best-effort heuristic, not a per-amplitude
//! phase fit; per-amplitude phase noise is out of its reach.

use hhl_core::{HhlError, HhlResult, LinearSystem};
use nalgebra::DVector;
use num_complex::Complex64;

/// Validation output: fidelity, rescaled and classical solutions
#[derive(Debug, Clone, PartialEq)]
pub struct Validation {
    /// `|<theoretical, reconstructed>|^2`, in [0, 1]
    pub fidelity: f64,

    /// Reconstructed state rescaled into the system's units
    pub solution: DVector<Complex64>,

    /// Direct classical solve of `A x = b`
    pub classical_solution: DVector<Complex64>,

    /// Eigenvalues of the system matrix
    pub classical_eigenvalues: Vec<Complex64>,
}

/// Validate a unit-norm reconstructed state against the classical solve
pub fn validate(
    reconstructed: &DVector<Complex64>,
    system: &LinearSystem,
) -> HhlResult<Validation> {
    let classical = system
        .matrix()
        .clone()
        .lu()
        .solve(system.vector())
        .ok_or(HhlError::SingularSystem)?;
    if classical.iter().any(|c| !c.re.is_finite() || !c.im.is_finite()) {
        return Err(HhlError::SingularSystem);
    }

    let theoretical = {
        let norm = classical.norm();
        if norm <= f64::EPSILON {
            return Err(HhlError::SingularSystem);
        }
        classical.map(|c| c / norm)
    };

    // conjugate on the reconstructed side
    let overlap: Complex64 = theoretical
        .iter()
        .zip(reconstructed.iter())
        .map(|(t, v)| t * v.conj())
        .sum();
    let fidelity = overlap.norm_sqr();

    let scaled = system.matrix() * reconstructed;
    let scaled_norm = scaled.norm();
    if scaled_norm <= f64::EPSILON {
        return Err(HhlError::DegenerateReconstruction(scaled_norm));
    }
    let norm_factor = system.vector().norm() / scaled_norm;

    let num_q = system.num_qubits();
    let phase: f64 = system
        .vector()
        .iter()
        .zip(scaled.iter())
        .map(|(b, s)| {
            let p = b * s.conj();
            // adding zero folds IEEE negative zeros so arg(0) is 0
            Complex64::new(p.re + 0.0, p.im + 0.0).arg()
        })
        .sum::<f64>()
        / num_q as f64;

    let correction = Complex64::from_polar(norm_factor, -phase);
    let solution = reconstructed.map(|c| c * correction);

    let eigen = nalgebra::SymmetricEigen::new(system.matrix().clone());
    let classical_eigenvalues = eigen
        .eigenvalues
        .iter()
        .map(|&l| Complex64::new(l, 0.0))
        .collect();

    Ok(Validation {
        fidelity,
        solution,
        classical_solution: classical,
        classical_eigenvalues,
    })
}

// ============================================================================
// Tests
// ============================================================================
