//! Solver configuration

use serde::{Deserialize, Serialize};

/// Handling of basis variants that lose all shots to post-selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PostSelectionPolicy {
    /// Keep the synthetic `{"0": 0}` placeholder entry and continue
    #[default]
    Lenient,

    /// Fail the run with an explicit underflow error
    Strict,
}

/// Solver configuration
///
/// Shots and seeding are properties of the sampling backend, not of
/// the solver; this only carries what the pipeline itself consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Post-selection strictness
    pub post_selection: PostSelectionPolicy,

    /// Eigenvalue register size for the default estimator
    pub num_ancillae: usize,

    /// Whether the default estimator encodes negative eigenvalues
    pub negative_evals: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            post_selection: PostSelectionPolicy::default(),
            num_ancillae: 6,
            negative_evals: false,
        }
    }
}

impl SolverConfig {
    /// Create a configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the post-selection policy
    pub fn with_post_selection(mut self, policy: PostSelectionPolicy) -> Self {
        self.post_selection = policy;
        self
    }

    /// Set the default estimator's eigenvalue register size
    pub fn with_num_ancillae(mut self, num_ancillae: usize) -> Self {
        self.num_ancillae = num_ancillae;
        self
    }

    /// Enable negative-eigenvalue encoding in the default estimator
    pub fn with_negative_evals(mut self, negative_evals: bool) -> Self {
        self.negative_evals = negative_evals;
        self
    }
}

// ============================================================================
// Tests
// ============================================================================
