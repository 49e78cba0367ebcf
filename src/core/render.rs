//! Redraw throttle.
//!
//! Rendering plus a telemetry flush is the expensive part of a tick, so it
//! only happens once the active menu's refresh interval has elapsed, or
//! right away when input forced it.

use std::time::{Duration, Instant};

/// The pure decision: render if forced, if nothing was ever rendered, or if
/// at least `min_interval` has passed since the last render.
pub fn should_render(
    last_render: Option<Instant>,
    min_interval: Duration,
    force: bool,
    now: Instant,
) -> bool {
    force
        || last_render.is_none_or(|last| now.saturating_duration_since(last) >= min_interval)
}

#[derive(Debug, Clone, Default)]
pub struct RenderScheduler {
    last_render: Option<Instant>,
}

impl RenderScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn should_render(&self, now: Instant, min_interval: Duration, force: bool) -> bool {
        should_render(self.last_render, min_interval, force, now)
    }

    pub fn mark_rendered(&mut self, now: Instant) {
        self.last_render = Some(now);
    }

    pub fn last_render(&self) -> Option<Instant> {
        self.last_render
    }

    /// Forget the last render so the next tick draws unconditionally.
    pub fn reset(&mut self) {
        self.last_render = None;
    }
}
