//! Backend execution types and trait
//!
//! A backend runs a circuit (or batch) in one blocking call and returns
//! either a dense statevector or measurement counts, advertised up
//! front via the `is_statevector` capability flag. There is no retry or
//! timeout contract at this layer; failures propagate to the caller.

use hhl_core::{Circuit, Counts, HhlError, HhlResult};
use nalgebra::DVector;
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Payload of one circuit execution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExecutionPayload {
    /// Dense amplitude vector over all qubits (ideal path)
    Statevector(DVector<Complex64>),

    /// Measured bitstring -> occurrence count (shot path)
    Counts(Counts),
}

/// Execution metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecutionMetadata {
    /// Backend name
    pub backend: String,

    /// Whether simulation was used
    pub simulated: bool,

    /// Seed used (if any)
    pub seed: Option<u64>,
}

/// Result of one circuit execution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// Statevector or counts
    pub payload: ExecutionPayload,

    /// Number of shots executed (0 for statevector results)
    pub shots: u64,

    /// Execution metadata
    pub metadata: ExecutionMetadata,
}

impl ExecutionResult {
    /// Create a statevector result
    pub fn from_statevector(sv: DVector<Complex64>, backend: &str) -> Self {
        Self {
            payload: ExecutionPayload::Statevector(sv),
            shots: 0,
            metadata: ExecutionMetadata {
                backend: backend.to_string(),
                simulated: true,
                ..Default::default()
            },
        }
    }

    /// Create a counts result
    pub fn from_counts(counts: Counts, shots: u64, backend: &str) -> Self {
        Self {
            payload: ExecutionPayload::Counts(counts),
            shots,
            metadata: ExecutionMetadata {
                backend: backend.to_string(),
                simulated: true,
                ..Default::default()
            },
        }
    }

    /// Get the statevector, failing if this is a counts result
    pub fn statevector(&self) -> HhlResult<&DVector<Complex64>> {
        match &self.payload {
            ExecutionPayload::Statevector(sv) => Ok(sv),
            ExecutionPayload::Counts(_) => Err(HhlError::StatevectorUnavailable),
        }
    }

    /// Get the counts, failing if this is a statevector result
    pub fn counts(&self) -> HhlResult<&Counts> {
        match &self.payload {
            ExecutionPayload::Counts(counts) => Ok(counts),
            ExecutionPayload::Statevector(_) => Err(HhlError::CountsUnavailable),
        }
    }

    /// Total observed count over all bitstrings
    pub fn total_counts(&self) -> u64 {
        match &self.payload {
            ExecutionPayload::Counts(counts) => counts.values().sum(),
            ExecutionPayload::Statevector(_) => 0,
        }
    }

    /// Probability of one bitstring in a counts result
    pub fn probability(&self, bitstring: &str) -> f64 {
        match &self.payload {
            ExecutionPayload::Counts(counts) => {
                if self.shots == 0 {
                    return 0.0;
                }
                let count = counts.get(bitstring).copied().unwrap_or(0);
                count as f64 / self.shots as f64
            }
            ExecutionPayload::Statevector(_) => 0.0,
        }
    }
}

impl fmt::Display for ExecutionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.payload {
            ExecutionPayload::Statevector(sv) => {
                write!(f, "ExecutionResult(statevector, dim={})", sv.len())
            }
            ExecutionPayload::Counts(counts) => write!(
                f,
                "ExecutionResult(shots={}, unique={})",
                self.shots,
                counts.len()
            ),
        }
    }
}

/// Quantum backend trait
pub trait Backend: Send + Sync {
    /// Get backend name
    fn name(&self) -> &str;

    /// Get number of qubits
    fn num_qubits(&self) -> usize;

    /// Capability flag: true if `execute` returns dense statevectors
    fn is_statevector(&self) -> bool;

    /// Execute a circuit (single blocking call)
    fn execute(&self, circuit: &Circuit) -> HhlResult<ExecutionResult>;

    /// Execute multiple circuits as one batch
    fn execute_batch(&self, circuits: &[Circuit]) -> HhlResult<Vec<ExecutionResult>> {
        circuits.iter().map(|c| self.execute(c)).collect()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn make_counts() -> Counts {
        let mut counts = HashMap::new();
        counts.insert("00".to_string(), 600);
        counts.insert("11".to_string(), 400);
        counts
    }

    #[test]
    fn test_counts_result_accessors() {
        let result = ExecutionResult::from_counts(make_counts(), 1000, "test");
        assert_eq!(result.total_counts(), 1000);
        assert!((result.probability("00") - 0.6).abs() < 1e-12);
        assert!(result.counts().is_ok());
        assert_eq!(result.statevector(), Err(HhlError::StatevectorUnavailable));
    }

    #[test]
    fn test_statevector_result_accessors() {
        let sv = DVector::from_vec(vec![Complex64::new(1.0, 0.0), Complex64::new(0.0, 0.0)]);
        let result = ExecutionResult::from_statevector(sv, "test");
        assert!(result.statevector().is_ok());
        assert_eq!(result.counts(), Err(HhlError::CountsUnavailable));
        assert_eq!(result.shots, 0);
    }

    #[test]
    fn test_probability_unknown_key() {
        let result = ExecutionResult::from_counts(make_counts(), 1000, "test");
        assert_eq!(result.probability("01"), 0.0);
    }
}
