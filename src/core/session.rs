//! # Session
//!
//! One menu tree: the menu on screen, the menus behind it and the menus
//! ahead of it after a `back`.
//!
//! ```text
//! history (back stack)      current      redo (forward stack)
//! [root, a, b]          ←     c     →     [e, d]
//!        back():  c → redo,  b → current
//!     forward():  current → history,  redo top → current
//!     inflate():  current → history,  redo cleared
//! ```
//!
//! A menu sits in exactly one of the three places at any time. `inflate`
//! always discards the redo stack, so `forward` only works right after a
//! `back`.
//!
//! After `inflate` and `back` the new current menu ignores input for a
//! short settle window so the press that triggered the transition is not
//! consumed a second time by the menu that just appeared.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use log::debug;

use crate::core::binding::DirectionalBinding;
use crate::core::error::NavError;
use crate::core::host::InputSource;
use crate::core::menu::{Menu, MenuId, MenuSlot};
use crate::core::payload::Payload;

#[derive(Debug)]
pub struct Session {
    current: MenuSlot,
    history: Vec<MenuSlot>,
    redo: Vec<MenuSlot>,
    /// Input is ignored until this instant.
    settle_until: Option<Instant>,
}

impl Session {
    /// Start a tree at `root`, initialized with an empty payload.
    pub fn new(root: Box<dyn Menu>, binding: &DirectionalBinding) -> Self {
        let mut current = MenuSlot::new(root);
        current.menu.set_bound_controls(binding);
        current.menu.init(Payload::new());
        debug!("Started tree at {} {}", current.menu.title(), current.id);
        Self {
            current,
            history: Vec::new(),
            redo: Vec::new(),
            settle_until: None,
        }
    }

    /// Throw away all history and restart this tree at `root`.
    pub fn start_root(&mut self, root: Box<dyn Menu>, binding: &DirectionalBinding) {
        *self = Self::new(root, binding);
    }

    /// Push `menu` on top of the current one. Always clears redo.
    pub fn inflate(
        &mut self,
        menu: Box<dyn Menu>,
        binding: &DirectionalBinding,
        now: Instant,
        settle: Duration,
    ) {
        let previous = std::mem::replace(&mut self.current, MenuSlot::new(menu));
        self.history.push(previous);
        if !self.redo.is_empty() {
            debug!("Inflate discards {} redo entries", self.redo.len());
        }
        self.redo.clear();

        let payload = self.current.menu.default_payload();
        self.enter_current(binding, payload);
        self.settle(now, settle);
        debug!(
            "Inflated {} {} (depth {})",
            self.current.menu.title(),
            self.current.id,
            self.history.len()
        );
    }

    /// Return to the previous menu. Returns `false` (and changes nothing)
    /// when there is nowhere to go back to.
    pub fn back(
        &mut self,
        payload: Payload,
        binding: &DirectionalBinding,
        now: Instant,
        settle: Duration,
    ) -> bool {
        let Some(previous) = self.history.pop() else {
            debug!("Back ignored: {} is the root", self.current.menu.title());
            return false;
        };
        let left = std::mem::replace(&mut self.current, previous);
        self.redo.push(left);

        self.enter_current(binding, payload);
        self.settle(now, settle);
        debug!(
            "Back to {} {} (redo depth {})",
            self.current.menu.title(),
            self.current.id,
            self.redo.len()
        );
        true
    }

    /// Redo the most recent `back`. Returns `false` when redo is empty.
    /// `settle` is `None` unless the host opted into settling on forward.
    pub fn forward(
        &mut self,
        payload: Payload,
        binding: &DirectionalBinding,
        now: Instant,
        settle: Option<Duration>,
    ) -> bool {
        let Some(next) = self.redo.pop() else {
            debug!("Forward ignored: nothing to redo");
            return false;
        };
        let left = std::mem::replace(&mut self.current, next);
        self.history.push(left);

        self.enter_current(binding, payload);
        if let Some(window) = settle {
            self.settle(now, window);
        }
        debug!(
            "Forward to {} {} (depth {})",
            self.current.menu.title(),
            self.current.id,
            self.history.len()
        );
        true
    }

    fn enter_current(&mut self, binding: &DirectionalBinding, payload: Payload) {
        self.current.menu.set_bound_controls(binding);
        self.current.menu.init(payload);
    }

    fn settle(&mut self, now: Instant, window: Duration) {
        self.settle_until = Some(now + window);
    }

    pub fn is_settling(&self, now: Instant) -> bool {
        self.settle_until.is_some_and(|until| now < until)
    }

    /// Run the current menu's listeners for this tick: directional
    /// dispatch first, then the menu's own items. Everything is skipped
    /// while settling. Returns whether a redraw should be forced.
    pub fn update_listeners(
        &mut self,
        binding: &DirectionalBinding,
        input: &dyn InputSource,
        now: Instant,
    ) -> bool {
        if self.is_settling(now) {
            return false;
        }
        self.settle_until = None;

        let menu = &mut self.current.menu;
        let moved = binding.dispatch(input, |direction| menu.cursor(direction));
        let forced = menu.update_listeners(input);
        moved > 0 || forced
    }

    /// Tell the current menu which controls drive it now.
    pub fn rebind(&mut self, binding: &DirectionalBinding) {
        self.current.menu.set_bound_controls(binding);
    }

    /// Verify that no menu occupies more than one slot.
    pub fn check_invariants(&self) -> Result<(), NavError> {
        let mut seen = HashSet::new();
        let slots = std::iter::once(&self.current)
            .chain(self.history.iter())
            .chain(self.redo.iter());
        for slot in slots {
            if !seen.insert(slot.id) {
                return Err(NavError::Invariant(format!(
                    "menu {} ({}) is held in more than one place in its tree",
                    slot.menu.title(),
                    slot.id
                )));
            }
        }
        Ok(())
    }

    pub fn current(&self) -> &dyn Menu {
        self.current.menu.as_ref()
    }

    pub fn current_mut(&mut self) -> &mut dyn Menu {
        self.current.menu.as_mut()
    }

    pub fn current_id(&self) -> MenuId {
        self.current.id
    }

    pub fn history_depth(&self) -> usize {
        self.history.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo.len()
    }

    /// Titles from the root up to (not including) the current menu.
    pub fn history_titles(&self) -> Vec<&str> {
        self.history.iter().map(|slot| slot.menu.title()).collect()
    }

    /// Titles of redo entries, next-to-restore last.
    pub fn redo_titles(&self) -> Vec<&str> {
        self.redo.iter().map(|slot| slot.menu.title()).collect()
    }

    #[cfg(test)]
    pub(crate) fn corrupt_for_test(&mut self) {
        let clone = MenuSlot {
            id: self.current.id,
            menu: Box::new(crate::test_support::ProbeMenu::new("duplicate").0),
        };
        self.history.push(clone);
    }
}
