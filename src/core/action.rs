//! # Actions
//!
//! A menu cannot reach the engine that owns it, so when a screen wants to
//! navigate (open a submenu, return a result to its parent) it queues an
//! `Action`. The engine drains it right after the listener update and
//! applies it through the same operations the host calls.
//!
//! ```text
//! Menu::update_listeners()  →  Menu::take_action()  →  engine applies it
//! ```
//!
//! All navigation therefore funnels through the single owner of the engine,
//! one tick at a time.

use std::fmt;

use crate::core::menu::Menu;
use crate::core::payload::Payload;

pub enum Action {
    /// Push a new menu onto the active tree.
    Inflate(Box<dyn Menu>),
    /// Return to the previous menu, handing it this payload.
    Back(Payload),
    /// Redo the last `Back`, handing the restored menu this payload.
    Forward(Payload),
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Inflate(menu) => f.debug_tuple("Inflate").field(&menu.title()).finish(),
            Action::Back(payload) => f.debug_tuple("Back").field(payload).finish(),
            Action::Forward(payload) => f.debug_tuple("Forward").field(payload).finish(),
        }
    }
}
