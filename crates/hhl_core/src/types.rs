//! Core types for the HHL workspace
//!
//! Type aliases, bit-level helpers for measurement bitstrings, and the
//! Pauli measurement bases used by state tomography.
//!
//! Bit convention (fixed throughout the workspace): classical bit 0 is
//! the least significant bit, rendered as the rightmost character of a
//! counts bitstring.

use crate::error::{HhlError, HhlResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

// ============================================================================
// Type Aliases
// ============================================================================

/// Qubit identifier (0-indexed)
pub type QubitId = usize;

/// Classical bit identifier (0-indexed)
pub type ClbitId = usize;

/// Measurement counts: bitstring -> count
pub type Counts = HashMap<String, u64>;

// ============================================================================
// Bit Helpers
// ============================================================================

/// Parse a counts bitstring into an integer (rightmost char = bit 0)
pub fn parse_bits(s: &str) -> HhlResult<u64> {
    if s.is_empty() || !s.chars().all(|c| c == '0' || c == '1') {
        return Err(HhlError::InvalidBitstring(s.to_string()));
    }
    u64::from_str_radix(s, 2).map_err(|_| HhlError::InvalidBitstring(s.to_string()))
}

/// Render an integer as a fixed-width bitstring (bit 0 rightmost)
pub fn format_bits(value: u64, width: usize) -> String {
    format!("{:0width$b}", value, width = width)
}

/// Extract a single bit by position (position 0 = least significant)
#[inline]
pub fn bit(value: u64, position: usize) -> bool {
    (value >> position) & 1 == 1
}

// ============================================================================
// Measurement Basis
// ============================================================================

/// Pauli measurement basis for a single qubit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Basis {
    /// Pauli-X basis (H before measurement)
    X,
    /// Pauli-Y basis (Sdg then H before measurement)
    Y,
    /// Computational (Pauli-Z) basis
    Z,
}

impl Basis {
    /// Parse from a single character label
    pub fn parse(c: char) -> HhlResult<Self> {
        match c {
            'X' | 'x' => Ok(Basis::X),
            'Y' | 'y' => Ok(Basis::Y),
            'Z' | 'z' => Ok(Basis::Z),
            other => Err(HhlError::InvalidBasis(other.to_string())),
        }
    }

    /// Single-character label
    pub fn label(&self) -> char {
        match self {
            Basis::X => 'X',
            Basis::Y => 'Y',
            Basis::Z => 'Z',
        }
    }
}

impl fmt::Display for Basis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ============================================================================
// Basis String
// ============================================================================

/// Per-qubit measurement bases, qubit 0 first
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BasisString {
    bases: Vec<Basis>,
}

impl BasisString {
    /// Create from a vector of bases
    pub fn new(bases: Vec<Basis>) -> Self {
        Self { bases }
    }

    /// All-Z basis string (plain computational measurement)
    pub fn all_z(n: usize) -> Self {
        Self {
            bases: vec![Basis::Z; n],
        }
    }

    /// Parse from a label like "XYZ" (qubit 0 first)
    pub fn parse(s: &str) -> HhlResult<Self> {
        let bases = s.chars().map(Basis::parse).collect::<HhlResult<_>>()?;
        Ok(Self { bases })
    }

    /// Number of qubits covered
    pub fn len(&self) -> usize {
        self.bases.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.bases.is_empty()
    }

    /// Basis for one qubit
    pub fn basis(&self, qubit: usize) -> Basis {
        self.bases[qubit]
    }

    /// Iterate over per-qubit bases
    pub fn iter(&self) -> impl Iterator<Item = &Basis> {
        self.bases.iter()
    }
}

impl fmt::Display for BasisString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in &self.bases {
            write!(f, "{}", b)?;
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bits() {
        assert_eq!(parse_bits("101").unwrap(), 5);
        assert_eq!(parse_bits("0").unwrap(), 0);
        assert!(parse_bits("").is_err());
        assert!(parse_bits("10a").is_err());
    }

    #[test]
    fn test_format_bits() {
        assert_eq!(format_bits(5, 4), "0101");
        assert_eq!(format_bits(0, 3), "000");
    }

    #[test]
    fn test_bit_lsb_convention() {
        // "110" = 6: bit 0 (rightmost char) is 0, bits 1 and 2 are set
        let v = parse_bits("110").unwrap();
        assert!(!bit(v, 0));
        assert!(bit(v, 1));
        assert!(bit(v, 2));
    }

    #[test]
    fn test_bits_roundtrip() {
        for v in 0..16u64 {
            assert_eq!(parse_bits(&format_bits(v, 4)).unwrap(), v);
        }
    }

    #[test]
    fn test_basis_parse() {
        assert_eq!(Basis::parse('X').unwrap(), Basis::X);
        assert_eq!(Basis::parse('y').unwrap(), Basis::Y);
        assert!(Basis::parse('Q').is_err());
    }

    #[test]
    fn test_basis_string() {
        let bs = BasisString::parse("XYZ").unwrap();
        assert_eq!(bs.len(), 3);
        assert_eq!(bs.basis(0), Basis::X);
        assert_eq!(bs.basis(2), Basis::Z);
        assert_eq!(bs.to_string(), "XYZ");
    }

    #[test]
    fn test_all_z() {
        let bs = BasisString::all_z(4);
        assert!(bs.iter().all(|&b| b == Basis::Z));
    }
}
