//! Shot-based sampling simulation
//!
//! Propagates the ideal statevector, then samples measurement outcomes
//! and renders them over the circuit's classical register. Counts keys
//! follow the workspace bit convention: clbit 0 is the rightmost
//! character. Seeded via `StdRng` for reproducibility.

use crate::execution::{Backend, ExecutionMetadata, ExecutionPayload, ExecutionResult};
use crate::statevector::run_statevector;
use hhl_core::{bit, format_bits, Circuit, Counts, HhlError, HhlResult};
use rand::prelude::*;
use rand::rngs::StdRng;
use std::collections::HashMap;

/// Shot-sampling backend over the ideal state
pub struct SamplingBackend {
    /// Backend name
    name: String,

    /// Number of qubits
    num_qubits: usize,

    /// Shots per circuit
    shots: u64,

    /// Random seed
    seed: Option<u64>,
}

impl SamplingBackend {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Create a new sampling backend
    pub fn new(num_qubits: usize, shots: u64) -> Self {
        Self {
            name: "hhl_sampler".to_string(),
            num_qubits,
            shots,
            seed: None,
        }
    }

    /// Set seed for reproducibility
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set backend name
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    /// Shots per circuit
    pub fn shots(&self) -> u64 {
        self.shots
    }

    // ========================================================================
    // Sampling
    // ========================================================================

    fn sample_counts(&self, circuit: &Circuit, rng: &mut StdRng) -> HhlResult<Counts> {
        let map = circuit.measurement_map()?;
        if map.is_empty() {
            return Err(HhlError::BackendError(
                "circuit has no measurements".to_string(),
            ));
        }

        let state = run_statevector(circuit)?;
        let probs: Vec<f64> = state.iter().map(|c| c.norm_sqr()).collect();
        let width = circuit.num_clbits();

        let mut counts: Counts = HashMap::new();
        for _ in 0..self.shots {
            let outcome = sample_index(&probs, rng);
            let mut clbits = 0u64;
            for &(q, c) in &map {
                if bit(outcome as u64, q) {
                    clbits |= 1 << c;
                }
            }
            *counts.entry(format_bits(clbits, width)).or_insert(0) += 1;
        }
        Ok(counts)
    }
}

/// Sample one index from a probability vector
fn sample_index(probs: &[f64], rng: &mut StdRng) -> usize {
    let r: f64 = rng.gen();
    let mut cumsum = 0.0;
    for (i, &p) in probs.iter().enumerate() {
        cumsum += p;
        if r < cumsum {
            return i;
        }
    }
    probs.len() - 1
}

impl Backend for SamplingBackend {
    fn name(&self) -> &str {
        &self.name
    }

    fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    fn is_statevector(&self) -> bool {
        false
    }

    fn execute(&self, circuit: &Circuit) -> HhlResult<ExecutionResult> {
        if circuit.num_qubits() > self.num_qubits {
            return Err(HhlError::QubitOutOfRange {
                qubit: circuit.num_qubits(),
                num_qubits: self.num_qubits,
            });
        }

        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let counts = self.sample_counts(circuit, &mut rng)?;
        Ok(ExecutionResult {
            payload: ExecutionPayload::Counts(counts),
            shots: self.shots,
            metadata: ExecutionMetadata {
                backend: self.name.clone(),
                simulated: true,
                seed: self.seed,
            },
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use hhl_core::Gate;

    fn bell_circuit() -> Circuit {
        let mut circuit = Circuit::new(2);
        circuit.add_gate(Gate::H(0)).unwrap();
        circuit.add_gate(Gate::Cnot(0, 1)).unwrap();
        circuit.add_classical_register(2);
        circuit.measure(0, 0).unwrap();
        circuit.measure(1, 1).unwrap();
        circuit
    }

    #[test]
    fn test_bell_counts() {
        let backend = SamplingBackend::new(2, 2000).with_seed(42);
        let result = backend.execute(&bell_circuit()).unwrap();

        let p00 = result.probability("00");
        let p11 = result.probability("11");
        assert!(p00 > 0.4 && p00 < 0.6, "P(00) = {}", p00);
        assert!(p11 > 0.4 && p11 < 0.6, "P(11) = {}", p11);
        assert!((p00 + p11 - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_seed_reproducibility() {
        let circuit = bell_circuit();
        let r1 = SamplingBackend::new(2, 500).with_seed(7).execute(&circuit).unwrap();
        let r2 = SamplingBackend::new(2, 500).with_seed(7).execute(&circuit).unwrap();
        assert_eq!(r1.counts().unwrap(), r2.counts().unwrap());
    }

    #[test]
    fn test_partial_measurement_marginalizes() {
        // Measure only qubit 1 of a Bell pair: ~50/50 over one clbit
        let mut circuit = Circuit::new(2);
        circuit.add_gate(Gate::H(0)).unwrap();
        circuit.add_gate(Gate::Cnot(0, 1)).unwrap();
        circuit.add_classical_register(1);
        circuit.measure(1, 0).unwrap();

        let backend = SamplingBackend::new(2, 2000).with_seed(11);
        let result = backend.execute(&circuit).unwrap();
        let p1 = result.probability("1");
        assert!(p1 > 0.4 && p1 < 0.6, "P(1) = {}", p1);
    }

    #[test]
    fn test_clbit_rendering_order() {
        // Qubit 0 in |1>, measured into clbit 1 of 2: key must be "10"
        let mut circuit = Circuit::new(1);
        circuit.add_gate(Gate::X(0)).unwrap();
        circuit.add_classical_register(2);
        circuit.measure(0, 1).unwrap();

        let backend = SamplingBackend::new(1, 100).with_seed(3);
        let result = backend.execute(&circuit).unwrap();
        assert_eq!(result.counts().unwrap().get("10"), Some(&100));
    }

    #[test]
    fn test_no_measurements_rejected() {
        let mut circuit = Circuit::new(1);
        circuit.add_gate(Gate::H(0)).unwrap();
        let backend = SamplingBackend::new(1, 100).with_seed(1);
        assert!(backend.execute(&circuit).is_err());
    }

    #[test]
    fn test_capability_flag() {
        assert!(!SamplingBackend::new(2, 10).is_statevector());
    }
}
