//! # HHL Engine
//!
//! Circuit assembly and result extraction for the HHL linear-system
//! solver: composes the pluggable stages into one circuit, runs it on
//! a backend, extracts the solution state either directly from the
//! statevector or by post-selected tomography, and validates against
//! the classical solve.
//!
//! ## Quick Start
//!
//! ```rust
//! use hhl_engine::prelude::*;
//! use hhl_backend::StatevectorBackend;
//! use hhl_core::LinearSystem;
//!
//! let system = LinearSystem::from_real(
//!     &[&[1.0, 0.0], &[0.0, 2.0]],
//!     &[1.0, 1.0],
//! ).unwrap();
//!
//! let backend = Box::new(StatevectorBackend::new(8));
//! let config = SolverConfig::default().with_num_ancillae(4);
//! let solver = HhlSolver::with_defaults(system, backend, config).unwrap();
//!
//! let record = solver.run().unwrap();
//! assert!(record.fidelity_hhl_to_classical <= 1.0 + 1e-9);
//! ```

#![warn(missing_docs)]

// ============================================================================
// Module Declarations
// ============================================================================

/// Circuit assembly from the pluggable stages
pub mod assembler;

/// Solver configuration
pub mod config;

/// Direct statevector extraction
pub mod extract;

/// Ancilla post-selection over measurement counts
pub mod postselect;

/// Pipeline orchestration and the output record
pub mod solver;

/// Tomographic state reconstruction
pub mod tomography;

/// Classical validation and rescaling
pub mod validate;

// ============================================================================
// Re-exports
// ============================================================================

pub use assembler::{CircuitAssembler, CircuitDescriptor};
pub use config::{PostSelectionPolicy, SolverConfig};
pub use extract::{extract, Extraction};
pub use solver::{HhlSolver, ProbabilityResult, SolutionRecord};
pub use tomography::{Reconstruction, TomographicReconstructor, TomographyBasisSet};
pub use validate::{validate, Validation};

// ============================================================================
// Prelude
// ============================================================================

pub mod prelude {
    //! Prelude module for convenient imports
    //!
    //! ```rust
    //! use hhl_engine::prelude::*;
    //! ```

    pub use crate::assembler::{CircuitAssembler, CircuitDescriptor};
    pub use crate::config::{PostSelectionPolicy, SolverConfig};
    pub use crate::solver::{HhlSolver, ProbabilityResult, SolutionRecord};
    pub use crate::tomography::{TomographicReconstructor, TomographyBasisSet};
}

// ============================================================================
// Integration Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use approx::assert_relative_eq;
    use hhl_backend::prelude::*;
    use hhl_core::{HhlError, LinearSystem};
    use hhl_stages::{LookupReciprocal, PhaseEstimation, VectorPrep};
    use nalgebra::DMatrix;
    use num_complex::Complex64;
    use std::f64::consts::PI;

    fn diag_system() -> LinearSystem {
        LinearSystem::from_real(&[&[1.0, 0.0], &[0.0, 2.0]], &[1.0, 1.0]).unwrap()
    }

    /// Solver over diag(1, 2) with an evolution time that makes both
    /// eigenvalues exactly representable in 4 register qubits
    fn exact_solver(backend: Box<dyn Backend>, config: SolverConfig) -> HhlSolver {
        let system = diag_system();
        let prep = VectorPrep::new(system.vector()).unwrap();
        let estimator = PhaseEstimation::new(system.matrix(), 4)
            .unwrap()
            .with_evo_time(PI / 4.0);
        let reciprocal = LookupReciprocal::new().with_register_size(4);
        HhlSolver::new(
            system,
            Box::new(prep),
            Box::new(estimator),
            Box::new(reciprocal),
            backend,
            config,
        )
    }

    #[test]
    fn test_end_to_end_statevector_path() {
        let solver = exact_solver(
            Box::new(StatevectorBackend::new(6)),
            SolverConfig::default(),
        );
        let record = solver.run().unwrap();

        assert_relative_eq!(record.fidelity_hhl_to_classical, 1.0, epsilon = 1e-6);
        assert_relative_eq!(record.solution_hhl[0].re, 1.0, epsilon = 1e-6);
        assert_relative_eq!(record.solution_hhl[1].re, 0.5, epsilon = 1e-6);
        assert_relative_eq!(record.solution_hhl[0].im, 0.0, epsilon = 1e-6);

        match record.probability_result {
            ProbabilityResult::Single(p) => {
                // C = 0.5: branch amplitudes (C/1, C/2) on normalized b
                assert_relative_eq!(p, 0.15625, epsilon = 1e-6);
            }
            other => panic!("unexpected probability result {:?}", other),
        }
    }

    #[test]
    fn test_end_to_end_tomography_path() {
        let solver = exact_solver(
            Box::new(SamplingBackend::new(6, 8000).with_seed(42)),
            SolverConfig::default(),
        );
        let record = solver.run().unwrap();

        // statistical path: close, not exact
        assert!(
            record.fidelity_hhl_to_classical > 0.8,
            "fidelity = {}",
            record.fidelity_hhl_to_classical
        );
        match &record.probability_result {
            ProbabilityResult::PerBasis(probs) => {
                assert_eq!(probs.len(), 3);
                for &p in probs {
                    assert!(p > 0.05 && p < 0.4, "success marginal = {}", p);
                }
            }
            other => panic!("unexpected probability result {:?}", other),
        }
    }

    #[test]
    fn test_non_power_of_two_fails_before_assembly() {
        let matrix = DMatrix::from_fn(3, 3, |r, c| {
            if r == c {
                Complex64::new(1.0, 0.0)
            } else {
                Complex64::new(0.0, 0.0)
            }
        });
        let vector = nalgebra::DVector::from_element(3, Complex64::new(1.0, 0.0));
        assert_eq!(
            LinearSystem::new(matrix, vector).unwrap_err(),
            HhlError::NotPowerOfTwo(3)
        );
    }

    #[test]
    fn test_strict_policy_surfaces_underflow() {
        // zero rotation scale: the success ancilla never fires, so
        // every basis variant loses all shots to post-selection
        let system = diag_system();
        let prep = VectorPrep::new(system.vector()).unwrap();
        let estimator = PhaseEstimation::new(system.matrix(), 4)
            .unwrap()
            .with_evo_time(PI / 4.0);
        let reciprocal = LookupReciprocal::new().with_scale(0.0);
        let solver = HhlSolver::new(
            system,
            Box::new(prep),
            Box::new(estimator),
            Box::new(reciprocal),
            Box::new(SamplingBackend::new(6, 200).with_seed(9)),
            SolverConfig::default().with_post_selection(PostSelectionPolicy::Strict),
        );

        assert!(matches!(
            solver.run().unwrap_err(),
            HhlError::PostSelectionUnderflow { .. }
        ));
    }

    #[test]
    fn test_lenient_policy_degenerates_explicitly() {
        let system = diag_system();
        let prep = VectorPrep::new(system.vector()).unwrap();
        let estimator = PhaseEstimation::new(system.matrix(), 4)
            .unwrap()
            .with_evo_time(PI / 4.0);
        let reciprocal = LookupReciprocal::new().with_scale(0.0);
        let solver = HhlSolver::new(
            system,
            Box::new(prep),
            Box::new(estimator),
            Box::new(reciprocal),
            Box::new(SamplingBackend::new(6, 200).with_seed(9)),
            SolverConfig::default(),
        );

        // all variants carry the placeholder, the fit has no equations
        assert!(matches!(
            solver.run().unwrap_err(),
            HhlError::DegenerateReconstruction(_)
        ));
    }
}
