//! Build-time and lookup errors.

use crate::gate::GateKind;
use thiserror::Error;

/// Errors that can occur while constructing a [`crate::circuit::Circuit`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BuildError {
    /// A gate type string did not match any entry in the enumerated gate
    /// type set (case-insensitive).
    #[error("unsupported gate type: {0}")]
    UnsupportedGate(String),

    /// A gate was given the wrong number of inputs for its type, e.g. a
    /// `NOT` with anything other than exactly one input.
    #[error("{kind:?} requires {expected}, got {got}")]
    ArityError {
        kind: GateKind,
        expected: &'static str,
        got: usize,
    },
}

/// Errors that can occur while looking up a net by name.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("unknown net: {0}")]
    UnknownNet(String),
}
