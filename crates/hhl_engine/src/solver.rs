//! HHL pipeline orchestration
//!
//! One solver owns the validated system, the assembled stage set, the
//! backend, and the configuration. A run selects exactly one extraction
//! path up front from the backend capability flag, drives assembly,
//! execution, extraction and validation synchronously, and returns an
//! immutable result record. Backend failures propagate unchanged; there
//! are no retries at this layer.

use crate::assembler::CircuitAssembler;
use crate::config::SolverConfig;
use crate::extract;
use crate::tomography::TomographicReconstructor;
use crate::validate;
use hhl_backend::Backend;
use hhl_core::{HhlResult, LinearSystem};
use hhl_stages::{
    EigenvalueEstimator, InitialState, LookupReciprocal, PhaseEstimation, Reciprocal, VectorPrep,
};
use nalgebra::{DMatrix, DVector};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

/// Success probability of a run: one value on the statevector path,
/// one per basis setting on the tomography path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ProbabilityResult {
    /// Exact success-branch probability from the full statevector
    Single(f64),

    /// Success-bit marginal per tomography basis setting
    PerBasis(Vec<f64>),
}

/// Complete output of one solver run, built once and never mutated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolutionRecord {
    /// Success probability estimate(s)
    pub probability_result: ProbabilityResult,

    /// Unit-norm reconstructed state
    pub output_hhl: Vec<Complex64>,

    /// Fidelity of `output_hhl` against the classical solution
    pub fidelity_hhl_to_classical: f64,

    /// Reconstructed solution rescaled into the system's units
    pub solution_hhl: Vec<Complex64>,

    /// Input matrix, echoed for the record
    pub input_matrix: DMatrix<Complex64>,

    /// Input vector, echoed for the record
    pub input_vector: DVector<Complex64>,

    /// Eigenvalues of the input matrix
    pub eigenvalues_classical: Vec<Complex64>,

    /// Direct classical solution of the system
    pub solution_classical: Vec<Complex64>,

    /// Qubits plus classical bits of the assembled circuit
    pub circuit_width: usize,

    /// Depth of the assembled circuit
    pub circuit_depth: usize,

    /// Gate count of the assembled circuit
    pub gate_count_total: usize,
}

/// Hybrid quantum-classical linear-system solver
pub struct HhlSolver {
    system: LinearSystem,
    assembler: CircuitAssembler,
    backend: Box<dyn Backend>,
    config: SolverConfig,
}

impl HhlSolver {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Create a solver from explicitly chosen stages
    pub fn new(
        system: LinearSystem,
        init_state: Box<dyn InitialState>,
        estimator: Box<dyn EigenvalueEstimator>,
        reciprocal: Box<dyn Reciprocal>,
        backend: Box<dyn Backend>,
        config: SolverConfig,
    ) -> Self {
        Self {
            system,
            assembler: CircuitAssembler::new(init_state, estimator, reciprocal),
            backend,
            config,
        }
    }

    /// Create a solver with the default stage set: vector preparation,
    /// QPE eigenvalue estimation, and lookup reciprocal rotation
    pub fn with_defaults(
        system: LinearSystem,
        backend: Box<dyn Backend>,
        config: SolverConfig,
    ) -> HhlResult<Self> {
        let prep = VectorPrep::new(system.vector())?;
        let estimator = PhaseEstimation::new(system.matrix(), config.num_ancillae)?
            .with_negative_evals(config.negative_evals);
        let (_, num_a) = estimator.register_sizes();
        let reciprocal = LookupReciprocal::new().with_register_size(num_a);
        Ok(Self::new(
            system,
            Box::new(prep),
            Box::new(estimator),
            Box::new(reciprocal),
            backend,
            config,
        ))
    }

    /// The validated input system
    pub fn system(&self) -> &LinearSystem {
        &self.system
    }

    // ========================================================================
    // Pipeline
    // ========================================================================

    /// Run the full pipeline and assemble the output record
    pub fn run(&self) -> HhlResult<SolutionRecord> {
        let num_q = self.system.num_qubits();
        let statevector_path = self.backend.is_statevector();
        log::info!(
            "running HHL on {} ({} io qubits, {} path)",
            self.backend.name(),
            num_q,
            if statevector_path {
                "statevector"
            } else {
                "tomography"
            }
        );

        let (circuit, descriptor) = self.assembler.assemble(num_q, !statevector_path)?;

        let (output, probability_result) = if statevector_path {
            let result = self.backend.execute(&circuit)?;
            let extraction =
                extract::extract(self.assembler.reciprocal(), result.statevector()?, num_q)?;
            log::debug!("success-branch probability {:.6}", extraction.probability);
            (
                extraction.vector,
                ProbabilityResult::Single(extraction.probability),
            )
        } else {
            let reconstructor = TomographicReconstructor::new(self.config.post_selection);
            let reconstruction =
                reconstructor.reconstruct(self.backend.as_ref(), &circuit, &descriptor)?;
            (
                reconstruction.vector,
                ProbabilityResult::PerBasis(reconstruction.probability_result),
            )
        };

        let validation = validate::validate(&output, &self.system)?;
        log::info!(
            "fidelity to classical solution: {:.6}",
            validation.fidelity
        );

        Ok(SolutionRecord {
            probability_result,
            output_hhl: output.iter().copied().collect(),
            fidelity_hhl_to_classical: validation.fidelity,
            solution_hhl: validation.solution.iter().copied().collect(),
            input_matrix: self.system.matrix().clone(),
            input_vector: self.system.vector().clone(),
            eigenvalues_classical: validation.classical_eigenvalues,
            solution_classical: validation.classical_solution.iter().copied().collect(),
            circuit_width: circuit.width(),
            circuit_depth: circuit.depth(),
            gate_count_total: circuit.gate_count(),
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
