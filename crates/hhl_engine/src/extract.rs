//! Direct statevector extraction
//!
//! Ideal-path readout: project the full amplitude vector onto the
//! success branch via the reciprocal stage's documented projection
//! rule, record the branch probability, and normalize.

use hhl_core::{HhlError, HhlResult};
use hhl_stages::Reciprocal;
use nalgebra::DVector;
use num_complex::Complex64;

/// Normalized success-branch state and its probability
#[derive(Debug, Clone, PartialEq)]
pub struct Extraction {
    /// Unit-norm system-register state
    pub vector: DVector<Complex64>,

    /// Probability of the success branch, `<v, v>` before normalization
    pub probability: f64,
}

/// Extract the solution state from a full statevector
pub fn extract(
    reciprocal: &dyn Reciprocal,
    statevector: &DVector<Complex64>,
    num_q: usize,
) -> HhlResult<Extraction> {
    let raw = reciprocal.sv_to_resvec(statevector, num_q)?;
    let probability = raw.norm_squared();
    if probability <= f64::EPSILON {
        return Err(HhlError::DegenerateReconstruction(probability));
    }
    let scale = probability.sqrt();
    Ok(Extraction {
        vector: raw.map(|c| c / scale),
        probability,
    })
}

// ============================================================================
// Tests
// ============================================================================
