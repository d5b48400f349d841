//! # HHL Backend
//!
//! Execution abstraction for the HHL pipeline: a `Backend` trait with a
//! statevector capability flag, an ideal statevector simulator, and a
//! shot-based sampling simulator.
//!
//! ## Quick Start
//!
//! ```rust
//! use hhl_backend::prelude::*;
//! use hhl_core::{Circuit, Gate};
//!
//! let backend = StatevectorBackend::new(2);
//!
//! let mut circuit = Circuit::new(2);
//! circuit.add_gate(Gate::H(0)).unwrap();
//! circuit.add_gate(Gate::Cnot(0, 1)).unwrap();
//!
//! let result = backend.execute(&circuit).unwrap();
//! let sv = result.statevector().unwrap();
//! assert_eq!(sv.len(), 4);
//! ```
//!
//! ## Shot Sampling
//!
//! ```rust
//! use hhl_backend::prelude::*;
//! use hhl_core::{Circuit, Gate};
//!
//! let backend = SamplingBackend::new(2, 1000).with_seed(42);
//!
//! let mut circuit = Circuit::new(2);
//! circuit.add_gate(Gate::H(0)).unwrap();
//! circuit.add_gate(Gate::Cnot(0, 1)).unwrap();
//! circuit.add_classical_register(2);
//! circuit.measure(0, 0).unwrap();
//! circuit.measure(1, 1).unwrap();
//!
//! let result = backend.execute(&circuit).unwrap();
//! assert_eq!(result.shots, 1000);
//! ```

#![warn(missing_docs)]

// ============================================================================
// Module Declarations
// ============================================================================

/// Execution types and backend trait
pub mod execution;

/// Ideal statevector simulator
pub mod statevector;

/// Shot-based sampling simulator
pub mod sampling;

// ============================================================================
// Re-exports
// ============================================================================

pub use execution::{Backend, ExecutionMetadata, ExecutionPayload, ExecutionResult};
pub use sampling::SamplingBackend;
pub use statevector::StatevectorBackend;

// ============================================================================
// Prelude
// ============================================================================

pub mod prelude {
    //! Prelude module for convenient imports
    //!
    //! ```rust
    //! use hhl_backend::prelude::*;
    //! ```

    pub use crate::execution::{Backend, ExecutionMetadata, ExecutionPayload, ExecutionResult};
    pub use crate::sampling::SamplingBackend;
    pub use crate::statevector::StatevectorBackend;
}

// ============================================================================
// Integration Tests
// ============================================================================
