//! Named qubit register windows
//!
//! The assembled HHL circuit addresses three named qubit groups: the
//! system ("io") register, the eigenvalue register, and the single
//! success ancilla. A register is a contiguous window into the flat
//! qubit space.

use crate::types::QubitId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

/// Contiguous named qubit register
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Register {
    /// Register name
    name: String,

    /// First qubit index
    start: QubitId,

    /// Number of qubits
    size: usize,
}

impl Register {
    /// Create a register covering `size` qubits from `start`
    pub fn new(name: impl Into<String>, start: QubitId, size: usize) -> Self {
        Self {
            name: name.into(),
            start,
            size,
        }
    }

    /// Register name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// First qubit index
    pub fn start(&self) -> QubitId {
        self.start
    }

    /// Number of qubits
    pub fn size(&self) -> usize {
        self.size
    }

    /// One past the last qubit index
    pub fn end(&self) -> QubitId {
        self.start + self.size
    }

    /// Iterate over the qubit indices
    pub fn qubits(&self) -> Range<QubitId> {
        self.start..self.end()
    }

    /// Check if a qubit belongs to this register
    pub fn contains(&self, qubit: QubitId) -> bool {
        qubit >= self.start && qubit < self.end()
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}..{}]", self.name, self.start, self.end())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_window() {
        let r = Register::new("eigenvalue", 2, 4);
        assert_eq!(r.start(), 2);
        assert_eq!(r.end(), 6);
        assert_eq!(r.size(), 4);
        assert_eq!(r.qubits().collect::<Vec<_>>(), vec![2, 3, 4, 5]);
    }

    #[test]
    fn test_contains() {
        let r = Register::new("io", 0, 2);
        assert!(r.contains(0));
        assert!(r.contains(1));
        assert!(!r.contains(2));
    }

    #[test]
    fn test_display() {
        let r = Register::new("io", 0, 2);
        assert_eq!(r.to_string(), "io[0..2]");
    }
}
