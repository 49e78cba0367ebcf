//! # Navigation Errors
//!
//! Two kinds of failure live here:
//!
//! - **Configuration errors** are caller mistakes (duplicate directional
//!   inputs, navigating before any tree exists). They go straight back to
//!   whoever called the registration or navigation API and never halt the
//!   engine.
//! - **Invariant violations** mean the navigation history can no longer be
//!   trusted. The engine halts on the first one and refuses further
//!   navigation.
//!
//! `back` with nothing behind it and `forward` with nothing ahead are not
//! errors at all, they are no-ops.

use std::fmt;

use crate::core::binding::Direction;
use crate::core::host::InputId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavError {
    /// Two directions were bound to the same input.
    DuplicateInput {
        first: Direction,
        second: Direction,
        input: InputId,
    },
    /// A navigation call arrived before any tree was registered.
    NoActiveSession { operation: &'static str },
    /// Navigation state is corrupt. Fatal.
    Invariant(String),
    /// The engine was halted by an earlier invariant violation.
    Halted,
}

impl NavError {
    /// True for errors that must stop navigation for good.
    pub fn is_fatal(&self) -> bool {
        matches!(self, NavError::Invariant(_) | NavError::Halted)
    }
}

impl fmt::Display for NavError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NavError::DuplicateInput {
                first,
                second,
                input,
            } => write!(
                f,
                "cursor controls must be unique: {first} and {second} are both bound to '{input}'"
            ),
            NavError::NoActiveSession { operation } => {
                write!(f, "{operation} called before any menu tree was registered")
            }
            NavError::Invariant(msg) => write!(f, "navigation invariant violated: {msg}"),
            NavError::Halted => write!(f, "navigation halted after an invariant violation"),
        }
    }
}

impl std::error::Error for NavError {}
