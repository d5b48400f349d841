//! # HHL Core
//!
//! Foundation types for the HHL linear-system solver: errors, gates,
//! circuits, named registers, and the validated `LinearSystem` input.
//!
//! ## Quick Start
//!
//! ```rust
//! use hhl_core::prelude::*;
//!
//! // Validated input: 2x2 Hermitian system
//! let system = LinearSystem::from_real(&[&[1.0, 0.0], &[0.0, 2.0]], &[1.0, 1.0]).unwrap();
//! assert_eq!(system.num_qubits(), 1);
//!
//! // Circuits are gate lists over a flat qubit space
//! let mut circuit = Circuit::new(2);
//! circuit.add_gate(Gate::H(0)).unwrap();
//! circuit.add_gate(Gate::Cnot(0, 1)).unwrap();
//! assert_eq!(circuit.depth(), 2);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// ============================================================================
// Module Declarations
// ============================================================================

/// Core types and bit helpers
pub mod types;

/// Error types
pub mod error;

/// Quantum gates
pub mod gate;

/// Circuit structure
pub mod circuit;

/// Named qubit registers
pub mod register;

/// Linear-system input
pub mod problem;

// ============================================================================
// Re-exports
// ============================================================================

pub use circuit::Circuit;
pub use error::{HhlError, HhlResult};
pub use gate::{Angle, Gate};
pub use problem::LinearSystem;
pub use register::Register;
pub use types::{bit, format_bits, parse_bits, Basis, BasisString, ClbitId, Counts, QubitId};

// ============================================================================
// Prelude
// ============================================================================

pub mod prelude {
    //! Convenient imports for common use cases
    //!
    //! ```rust
    //! use hhl_core::prelude::*;
    //! ```

    pub use crate::circuit::Circuit;
    pub use crate::error::{HhlError, HhlResult};
    pub use crate::gate::{Angle, Gate};
    pub use crate::problem::LinearSystem;
    pub use crate::register::Register;
    pub use crate::types::{
        bit, format_bits, parse_bits, Basis, BasisString, ClbitId, Counts, QubitId,
    };
}

// ============================================================================
// Version Information
// ============================================================================

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");

// ============================================================================
// Integration Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::prelude::*;

    #[test]
    fn test_register_layout_for_system() {
        let system = LinearSystem::from_real(&[&[1.0, 0.0], &[0.0, 2.0]], &[1.0, 1.0]).unwrap();
        let num_q = system.num_qubits();
        let num_a = 4;

        let io = Register::new("io", 0, num_q);
        let eigenvalue = Register::new("eigenvalue", num_q, num_a);
        let success = Register::new("success", num_q + num_a, 1);

        assert_eq!(io.end(), eigenvalue.start());
        assert_eq!(eigenvalue.end(), success.start());
        assert!(!io.contains(success.start()));
    }

    #[test]
    fn test_fragment_composition_and_inverse() {
        // prep fragment, then a "rotation" fragment, then its inverse
        let mut circuit = Circuit::new(3);
        circuit
            .append(vec![Gate::H(0), Gate::H(1), Gate::H(2)])
            .unwrap();

        let mut fragment = Circuit::new(3);
        fragment
            .append(vec![Gate::CPhase(0, 1, 0.5), Gate::S(2)])
            .unwrap();

        circuit.append(fragment.gates().to_vec()).unwrap();
        circuit.append(fragment.inverse_gates().unwrap()).unwrap();

        assert_eq!(circuit.gate_count(), 7);
        // inverse fragment ends with the dagger of the first fragment gate
        assert_eq!(
            circuit.gates().last().unwrap(),
            &Gate::CPhase(0, 1, -0.5)
        );
    }

    #[test]
    fn test_validation_before_any_circuit() {
        // 3x3 system: must fail at input validation, never reaching circuits
        let err =
            LinearSystem::from_real(&[&[1.0; 3], &[2.0; 3], &[3.0; 3]], &[1.0, 1.0, 1.0])
                .unwrap_err();
        assert!(err.is_validation_error());
    }

    #[test]
    fn test_counts_bit_conventions() {
        // clbit 0 is the rightmost char of a counts key
        let v = parse_bits("101").unwrap();
        assert!(bit(v, 0));
        assert!(!bit(v, 1));
        assert!(bit(v, 2));
        assert_eq!(format_bits(v, 3), "101");
    }
}
