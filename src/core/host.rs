//! # Host Capabilities
//!
//! The engine never touches hardware. It reads inputs through
//! [`InputSource`] and writes telemetry through [`DisplayChannel`]; the
//! host (robot runtime, terminal, test harness) provides both.

use std::collections::HashSet;
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Opaque identifier of a host input (a button, a key, a gamepad axis
/// threshold). The engine only compares identifiers for equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InputId(String);

impl InputId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InputId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for InputId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Answers "is this input actuated right now?". Queried every tick for
/// each bound input; edge semantics are the host's business.
pub trait InputSource {
    fn is_actuated(&self, input: &InputId) -> bool;
}

impl InputSource for HashSet<InputId> {
    fn is_actuated(&self, input: &InputId) -> bool {
        self.contains(input)
    }
}

/// The telemetry screen. Lines are staged with `write_line` and become
/// visible on `flush`.
pub trait DisplayChannel {
    fn clear(&mut self);
    fn write_line(&mut self, key: &str, value: &str);
    fn flush(&mut self);

    /// How often the host should push telemetry out. Hosts without a
    /// transmission cadence ignore this.
    fn set_transmission_interval(&mut self, _interval: Duration) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_set_input_source() {
        let pressed: HashSet<InputId> = ["a", "tab"].into_iter().map(InputId::from).collect();
        assert!(pressed.is_actuated(&InputId::new("tab")));
        assert!(!pressed.is_actuated(&InputId::new("b")));
    }

    #[test]
    fn test_input_id_serializes_as_plain_string() {
        let json = serde_json::to_string(&InputId::new("dpad_up")).unwrap();
        assert_eq!(json, r#""dpad_up""#);
    }
}
