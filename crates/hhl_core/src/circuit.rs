//! Quantum circuit structure
//!
//! A circuit is a gate list over a fixed qubit count plus an optional
//! classical register. Pipeline stages produce gate fragments that are
//! appended in order; the composed circuit can be inverted gate-by-gate
//! for uncomputation.

use crate::error::{HhlError, HhlResult};
use crate::gate::Gate;
use crate::types::{ClbitId, QubitId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Quantum circuit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circuit {
    /// Number of qubits
    num_qubits: usize,

    /// Number of classical bits
    num_clbits: usize,

    /// Gate sequence
    gates: Vec<Gate>,

    /// Optional circuit name
    name: Option<String>,
}

impl Circuit {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Create a new empty circuit without classical bits
    pub fn new(num_qubits: usize) -> Self {
        Self {
            num_qubits,
            num_clbits: 0,
            gates: Vec::new(),
            name: None,
        }
    }

    /// Create a circuit with a name
    pub fn with_name(num_qubits: usize, name: impl Into<String>) -> Self {
        Self {
            num_qubits,
            num_clbits: 0,
            gates: Vec::new(),
            name: Some(name.into()),
        }
    }

    // ========================================================================
    // Basic Operations
    // ========================================================================

    /// Add a gate, validating qubit and clbit ranges
    pub fn add_gate(&mut self, gate: Gate) -> HhlResult<()> {
        for &qubit in &gate.qubits() {
            if qubit >= self.num_qubits {
                return Err(HhlError::QubitOutOfRange {
                    qubit,
                    num_qubits: self.num_qubits,
                });
            }
        }
        if let Some(clbit) = gate.clbit() {
            if clbit >= self.num_clbits {
                return Err(HhlError::ClbitOutOfRange {
                    clbit,
                    num_clbits: self.num_clbits,
                });
            }
        }
        self.gates.push(gate);
        Ok(())
    }

    /// Append a fragment of gates in order
    pub fn append(&mut self, gates: impl IntoIterator<Item = Gate>) -> HhlResult<()> {
        for gate in gates {
            self.add_gate(gate)?;
        }
        Ok(())
    }

    /// Grow the classical register by `n` bits, returning the index of
    /// the first new bit
    pub fn add_classical_register(&mut self, n: usize) -> ClbitId {
        let first = self.num_clbits;
        self.num_clbits += n;
        first
    }

    /// Measure a qubit into a classical bit
    pub fn measure(&mut self, qubit: QubitId, clbit: ClbitId) -> HhlResult<()> {
        self.add_gate(Gate::Measure(qubit, clbit))
    }

    /// Get number of qubits
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Get number of classical bits
    pub fn num_clbits(&self) -> usize {
        self.num_clbits
    }

    /// Get gates
    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    /// Get circuit name
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Check if circuit has no gates
    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }

    // ========================================================================
    // Circuit Analysis
    // ========================================================================

    /// Circuit width: qubits plus classical bits
    pub fn width(&self) -> usize {
        self.num_qubits + self.num_clbits
    }

    /// Total gate count (barriers excluded)
    pub fn gate_count(&self) -> usize {
        self.gates
            .iter()
            .filter(|g| !matches!(g, Gate::Barrier(_)))
            .count()
    }

    /// Circuit depth: longest dependency chain over qubits
    pub fn depth(&self) -> usize {
        if self.gates.is_empty() {
            return 0;
        }

        let mut qubit_depths = vec![0usize; self.num_qubits];

        for gate in &self.gates {
            if matches!(gate, Gate::Barrier(_)) {
                continue;
            }
            let qubits = gate.qubits();
            let max_depth = qubits
                .iter()
                .filter_map(|&q| qubit_depths.get(q))
                .max()
                .copied()
                .unwrap_or(0);
            for &q in &qubits {
                if q < self.num_qubits {
                    qubit_depths[q] = max_depth + 1;
                }
            }
        }

        qubit_depths.into_iter().max().unwrap_or(0)
    }

    /// Qubit-to-clbit measurement map, in gate order.
    ///
    /// Rejects two measurements writing the same classical bit.
    pub fn measurement_map(&self) -> HhlResult<Vec<(QubitId, ClbitId)>> {
        let mut map = Vec::new();
        for gate in &self.gates {
            if let Gate::Measure(q, c) = gate {
                if map.iter().any(|&(_, existing)| existing == *c) {
                    return Err(HhlError::DuplicateMeasurement(*c));
                }
                map.push((*q, *c));
            }
        }
        Ok(map)
    }

    // ========================================================================
    // Inversion
    // ========================================================================

    /// The inverse circuit: gates reversed and daggered.
    ///
    /// Fails if any gate is non-invertible (measurement, initialize).
    pub fn inverse(&self) -> HhlResult<Circuit> {
        let mut inv = Circuit::new(self.num_qubits);
        inv.num_clbits = self.num_clbits;
        if let Some(name) = &self.name {
            inv.name = Some(format!("{}_dg", name));
        }
        for gate in self.gates.iter().rev() {
            inv.add_gate(gate.dagger()?)?;
        }
        Ok(inv)
    }

    /// Inverted gate sequence without the circuit wrapper
    pub fn inverse_gates(&self) -> HhlResult<Vec<Gate>> {
        self.gates
            .iter()
            .rev()
            .map(|g| g.dagger())
            .collect::<HhlResult<Vec<_>>>()
    }
}

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Circuit({} qubits, {} clbits, {} gates)",
            self.num_qubits,
            self.num_clbits,
            self.gates.len()
        )?;
        writeln!(f, "  Depth: {}", self.depth())?;
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
