//! Telemenu library exports for testing

use clap::ValueEnum;

use crate::core::binding::DirectionalControls;

pub mod core;
pub mod tui;

#[cfg(test)]
pub mod test_support;

/// Directional control preset for new menu trees.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum ControlScheme {
    /// Arrow keys
    #[default]
    Arrows,
    /// h/j/k/l
    Vim,
}

impl ControlScheme {
    pub fn controls(self) -> DirectionalControls {
        match self {
            ControlScheme::Arrows => DirectionalControls::arrows(),
            ControlScheme::Vim => DirectionalControls::vim(),
        }
    }

    /// The other preset, used when the operator swaps schemes at runtime.
    pub fn toggled(self) -> Self {
        match self {
            ControlScheme::Arrows => ControlScheme::Vim,
            ControlScheme::Vim => ControlScheme::Arrows,
        }
    }
}
