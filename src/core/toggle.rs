//! Rising-edge detector used to debounce the cycle button.

/// Fires exactly once per contiguous run of `true` inputs.
#[derive(Debug, Clone, Default)]
pub struct Toggle {
    previous: bool,
    firing: bool,
}

impl Toggle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed this tick's raw button state.
    pub fn update(&mut self, raw: bool) {
        self.firing = raw && !self.previous;
        self.previous = raw;
    }

    /// True only on the tick where the input went false → true.
    pub fn is_firing(&self) -> bool {
        self.firing
    }
}
