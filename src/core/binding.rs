//! # Directional Binding
//!
//! Maps the four cursor directions to host inputs. Each menu tree owns one
//! binding; the engine hands it to the current menu on every transition and
//! dispatches it once per tick.
//!
//! The four inputs must be pairwise distinct. A binding that reuses an
//! input is rejected when it is built or changed, never at dispatch time.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::error::NavError;
use crate::core::host::{InputId, InputSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Dispatch order.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    fn index(self) -> usize {
        match self {
            Direction::Up => 0,
            Direction::Down => 1,
            Direction::Left => 2,
            Direction::Right => 3,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The raw input assignment for the four directions, as it appears in
/// config files and in `rebind_directional_controls`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectionalControls {
    pub up: InputId,
    pub down: InputId,
    pub left: InputId,
    pub right: InputId,
}

impl DirectionalControls {
    pub fn new(
        up: impl Into<InputId>,
        down: impl Into<InputId>,
        left: impl Into<InputId>,
        right: impl Into<InputId>,
    ) -> Self {
        Self {
            up: up.into(),
            down: down.into(),
            left: left.into(),
            right: right.into(),
        }
    }

    /// Arrow keys / gamepad dpad.
    pub fn arrows() -> Self {
        Self::new("up", "down", "left", "right")
    }

    /// h/j/k/l.
    pub fn vim() -> Self {
        Self::new("k", "j", "h", "l")
    }
}

/// A validated set of four distinct directional inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectionalBinding {
    inputs: [InputId; 4],
}

impl DirectionalBinding {
    pub fn new(controls: DirectionalControls) -> Result<Self, NavError> {
        let DirectionalControls {
            up,
            down,
            left,
            right,
        } = controls;
        let inputs = [up, down, left, right];
        check_unique(&inputs)?;
        Ok(Self { inputs })
    }

    pub fn input(&self, direction: Direction) -> &InputId {
        &self.inputs[direction.index()]
    }

    /// Rebind a single direction. The binding is left untouched if `input`
    /// is already used by another direction.
    pub fn rebind(&mut self, direction: Direction, input: InputId) -> Result<(), NavError> {
        let mut candidate = self.inputs.clone();
        candidate[direction.index()] = input;
        check_unique(&candidate)?;
        self.inputs = candidate;
        Ok(())
    }

    pub fn controls(&self) -> DirectionalControls {
        let [up, down, left, right] = self.inputs.clone();
        DirectionalControls {
            up,
            down,
            left,
            right,
        }
    }

    /// Invoke `on_fire` for every direction whose input is actuated this
    /// tick, in `Direction::ALL` order. Returns how many fired.
    pub fn dispatch(&self, source: &dyn InputSource, mut on_fire: impl FnMut(Direction)) -> usize {
        let mut fired = 0;
        for direction in Direction::ALL {
            if source.is_actuated(self.input(direction)) {
                on_fire(direction);
                fired += 1;
            }
        }
        fired
    }
}

fn check_unique(inputs: &[InputId; 4]) -> Result<(), NavError> {
    for (i, a) in Direction::ALL.iter().enumerate() {
        for b in &Direction::ALL[i + 1..] {
            if inputs[a.index()] == inputs[b.index()] {
                return Err(NavError::DuplicateInput {
                    first: *a,
                    second: *b,
                    input: inputs[a.index()].clone(),
                });
            }
        }
    }
    Ok(())
}
