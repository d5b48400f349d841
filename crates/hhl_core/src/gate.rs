//! Quantum gate definitions for the HHL circuit pipeline
//!
//! A closed gate set sized for this algorithm: the standard single- and
//! two-qubit gates used by phase estimation and tomography rotations,
//! plus two dense operations — `Unitary` for controlled evolution and
//! the reciprocal rotation, and `Initialize` for state preparation.

use crate::error::{HhlError, HhlResult};
use crate::types::{Basis, ClbitId, QubitId};
use nalgebra::{DMatrix, DVector};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Rotation angle in radians
pub type Angle = f64;

/// Quantum gate enumeration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Gate {
    // ========================================================================
    // Single-Qubit Gates
    // ========================================================================
    /// Hadamard gate
    H(QubitId),

    /// Pauli-X gate
    X(QubitId),

    /// Pauli-Y gate
    Y(QubitId),

    /// Pauli-Z gate
    Z(QubitId),

    /// S gate (sqrt(Z))
    S(QubitId),

    /// S-dagger gate
    Sdg(QubitId),

    /// Rotation around Y-axis
    Ry(QubitId, Angle),

    /// Rotation around Z-axis
    Rz(QubitId, Angle),

    // ========================================================================
    // Two-Qubit Gates
    // ========================================================================
    /// Controlled-NOT (control, target)
    Cnot(QubitId, QubitId),

    /// Controlled phase: diag(1, 1, 1, e^{i*angle}) on (control, target)
    CPhase(QubitId, QubitId, Angle),

    /// SWAP gate
    Swap(QubitId, QubitId),

    // ========================================================================
    // Dense Operations
    // ========================================================================
    /// Arbitrary unitary over an ordered qubit list.
    ///
    /// Qubit `qubits[k]` is bit k of the matrix index, so `qubits[0]`
    /// is the least significant bit.
    Unitary {
        /// Target qubits, least significant first
        qubits: Vec<QubitId>,
        /// Unitary matrix of dimension 2^qubits.len()
        matrix: DMatrix<Complex64>,
        /// Short label for display
        label: String,
    },

    /// Prepare an amplitude vector on qubits currently in |0...0>.
    ///
    /// `qubits[k]` is bit k of the amplitude index.
    Initialize {
        /// Target qubits, least significant first
        qubits: Vec<QubitId>,
        /// Normalized amplitudes of length 2^qubits.len()
        amplitudes: DVector<Complex64>,
    },

    // ========================================================================
    // Measurement and Control
    // ========================================================================
    /// Measure a qubit into a classical bit
    Measure(QubitId, ClbitId),

    /// Barrier (composition marker between pipeline stages)
    Barrier(Vec<QubitId>),
}

impl Gate {
    // ========================================================================
    // Gate Properties
    // ========================================================================

    /// Get qubits involved in this gate
    pub fn qubits(&self) -> Vec<QubitId> {
        match self {
            Gate::H(q)
            | Gate::X(q)
            | Gate::Y(q)
            | Gate::Z(q)
            | Gate::S(q)
            | Gate::Sdg(q)
            | Gate::Ry(q, _)
            | Gate::Rz(q, _)
            | Gate::Measure(q, _) => vec![*q],

            Gate::Cnot(c, t) | Gate::Swap(c, t) => vec![*c, *t],
            Gate::CPhase(c, t, _) => vec![*c, *t],

            Gate::Unitary { qubits, .. } | Gate::Initialize { qubits, .. } => qubits.clone(),
            Gate::Barrier(qubits) => qubits.clone(),
        }
    }

    /// Classical bit written by this gate, if any
    pub fn clbit(&self) -> Option<ClbitId> {
        match self {
            Gate::Measure(_, c) => Some(*c),
            _ => None,
        }
    }

    /// Check if this is a measurement
    pub fn is_measurement(&self) -> bool {
        matches!(self, Gate::Measure(_, _))
    }

    /// Check if this gate changes quantum state (barriers do not)
    pub fn is_unitary_op(&self) -> bool {
        !matches!(self, Gate::Measure(_, _) | Gate::Barrier(_))
    }

    /// Gate name for display and error messages
    pub fn name(&self) -> &'static str {
        match self {
            Gate::H(_) => "h",
            Gate::X(_) => "x",
            Gate::Y(_) => "y",
            Gate::Z(_) => "z",
            Gate::S(_) => "s",
            Gate::Sdg(_) => "sdg",
            Gate::Ry(_, _) => "ry",
            Gate::Rz(_, _) => "rz",
            Gate::Cnot(_, _) => "cx",
            Gate::CPhase(_, _, _) => "cp",
            Gate::Swap(_, _) => "swap",
            Gate::Unitary { .. } => "unitary",
            Gate::Initialize { .. } => "initialize",
            Gate::Measure(_, _) => "measure",
            Gate::Barrier(_) => "barrier",
        }
    }

    // ========================================================================
    // Inversion
    // ========================================================================

    /// The inverse (dagger) of this gate.
    ///
    /// Fails for `Measure` and `Initialize`, which are not unitary.
    pub fn dagger(&self) -> HhlResult<Gate> {
        match self {
            Gate::H(q) => Ok(Gate::H(*q)),
            Gate::X(q) => Ok(Gate::X(*q)),
            Gate::Y(q) => Ok(Gate::Y(*q)),
            Gate::Z(q) => Ok(Gate::Z(*q)),
            Gate::S(q) => Ok(Gate::Sdg(*q)),
            Gate::Sdg(q) => Ok(Gate::S(*q)),
            Gate::Ry(q, a) => Ok(Gate::Ry(*q, -a)),
            Gate::Rz(q, a) => Ok(Gate::Rz(*q, -a)),
            Gate::Cnot(c, t) => Ok(Gate::Cnot(*c, *t)),
            Gate::CPhase(c, t, a) => Ok(Gate::CPhase(*c, *t, -a)),
            Gate::Swap(a, b) => Ok(Gate::Swap(*a, *b)),
            Gate::Unitary {
                qubits,
                matrix,
                label,
            } => Ok(Gate::Unitary {
                qubits: qubits.clone(),
                matrix: matrix.adjoint(),
                label: format!("{}_dg", label),
            }),
            Gate::Barrier(qs) => Ok(Gate::Barrier(qs.clone())),
            Gate::Initialize { .. } | Gate::Measure(_, _) => {
                Err(HhlError::NonInvertibleGate(self.name().to_string()))
            }
        }
    }

    // ========================================================================
    // Basis Rotations
    // ========================================================================

    /// Gates rotating the given measurement basis into Z, applied before
    /// a computational-basis measurement
    pub fn basis_transform(qubit: QubitId, basis: Basis) -> Vec<Gate> {
        match basis {
            Basis::X => vec![Gate::H(qubit)],
            Basis::Y => vec![Gate::Sdg(qubit), Gate::H(qubit)],
            Basis::Z => vec![],
        }
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:?}", self.name(), self.qubits())
    }
}

// ============================================================================
// Tests
// ============================================================================
