//! # Menu
//!
//! The engine treats every screen as an opaque [`Menu`]: it calls the
//! lifecycle hooks and never looks at what the menu shows. Menus are owned
//! by exactly one slot of one session at a time (current, history or redo)
//! and move between slots by value.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::core::action::Action;
use crate::core::binding::{Direction, DirectionalBinding};
use crate::core::host::{DisplayChannel, InputSource};
use crate::core::payload::Payload;

/// Cursor blink / redraw cadence used when a menu does not ask for one.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_millis(250);

pub trait Menu {
    /// Short human-readable name, used in logs and the host's title bar.
    fn title(&self) -> &str;

    /// Called on every transition into this menu.
    fn init(&mut self, payload: Payload);

    /// Write this menu's lines to the display. The engine flushes afterwards.
    fn render(&mut self, display: &mut dyn DisplayChannel);

    /// Poll the menu's own item listeners. Return `true` to force a redraw
    /// this tick regardless of the refresh interval.
    fn update_listeners(&mut self, _input: &dyn InputSource) -> bool {
        false
    }

    fn cursor_up(&mut self) {}
    fn cursor_down(&mut self) {}
    fn cursor_left(&mut self) {}
    fn cursor_right(&mut self) {}

    /// Minimum time between unforced redraws while this menu is current.
    fn refresh_interval(&self) -> Duration {
        DEFAULT_REFRESH_INTERVAL
    }

    /// The directional controls now driving this menu's cursor.
    fn set_bound_controls(&mut self, _binding: &DirectionalBinding) {}

    /// Payload used when this menu is inflated.
    fn default_payload(&self) -> Payload {
        Payload::new()
    }

    /// Called right before `render` with whether the redraw was forced by
    /// input rather than by the refresh interval.
    fn notify_forced_redraw(&mut self, _forced: bool) {}

    /// A navigation request queued by the menu itself, drained by the
    /// engine once per tick.
    fn take_action(&mut self) -> Option<Action> {
        None
    }

    /// Route a directional intent to the matching cursor hook.
    fn cursor(&mut self, direction: Direction) {
        match direction {
            Direction::Up => self.cursor_up(),
            Direction::Down => self.cursor_down(),
            Direction::Left => self.cursor_left(),
            Direction::Right => self.cursor_right(),
        }
    }
}

/// Identity stamped on a menu when it enters the engine. Used only for
/// invariant audits and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MenuId(u64);

static NEXT_MENU_ID: AtomicU64 = AtomicU64::new(1);

impl MenuId {
    pub fn next() -> Self {
        Self(NEXT_MENU_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for MenuId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A menu plus its identity, as stored in a session.
pub struct MenuSlot {
    pub id: MenuId,
    pub menu: Box<dyn Menu>,
}

impl MenuSlot {
    pub fn new(menu: Box<dyn Menu>) -> Self {
        Self {
            id: MenuId::next(),
            menu,
        }
    }
}

impl fmt::Debug for MenuSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MenuSlot")
            .field("id", &self.id)
            .field("title", &self.menu.title())
            .finish()
    }
}
