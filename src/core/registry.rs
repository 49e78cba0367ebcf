//! # Session Registry
//!
//! All menu trees, each paired with its own directional binding, in a
//! fixed rotation order. One pair is active at a time.
//!
//! ```text
//! trees:   [ (A, binding_a), (B, binding_b), (C, binding_c) ]
//!                               ^ active
//! rotate():  active = (active + 1) % len      → C, then A, then B …
//! ```
//!
//! Rotation only moves the index: no pair is created, dropped or reordered,
//! and no session's history is touched.

use log::debug;

use crate::core::binding::DirectionalBinding;
use crate::core::error::NavError;
use crate::core::session::Session;

#[derive(Debug)]
struct Tree {
    session: Session,
    binding: DirectionalBinding,
}

#[derive(Debug, Default)]
pub struct SessionRegistry {
    trees: Vec<Tree>,
    active: usize,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a tree and make it the active one.
    pub fn register(&mut self, session: Session, binding: DirectionalBinding) {
        self.trees.push(Tree { session, binding });
        self.active = self.trees.len() - 1;
        debug!("Registered tree {} of {}", self.active + 1, self.trees.len());
    }

    /// Activate the next tree in round-robin order.
    pub fn rotate(&mut self) -> Result<(), NavError> {
        if self.trees.is_empty() {
            return Err(NavError::Invariant(
                "tried to cycle menu trees but none are registered".to_string(),
            ));
        }
        self.active = (self.active + 1) % self.trees.len();
        debug!("Rotated to tree {} of {}", self.active + 1, self.trees.len());
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }

    pub fn len(&self) -> usize {
        self.trees.len()
    }

    /// Position of the active tree, `None` when empty.
    pub fn active_index(&self) -> Option<usize> {
        (!self.trees.is_empty()).then_some(self.active)
    }

    pub fn active_session(&self) -> Option<&Session> {
        self.trees.get(self.active).map(|t| &t.session)
    }

    pub fn active_binding(&self) -> Option<&DirectionalBinding> {
        self.trees.get(self.active).map(|t| &t.binding)
    }

    /// The active session together with its binding, split so both can be
    /// used at once.
    pub fn active_parts_mut(&mut self) -> Option<(&mut Session, &DirectionalBinding)> {
        self.trees
            .get_mut(self.active)
            .map(|t| (&mut t.session, &t.binding))
    }

    /// Replace the active tree's binding and hand it to its current menu.
    pub fn replace_active_binding(&mut self, binding: DirectionalBinding) -> Result<(), NavError> {
        let tree = self
            .trees
            .get_mut(self.active)
            .ok_or(NavError::NoActiveSession {
                operation: "rebind_directional_controls",
            })?;
        tree.binding = binding;
        tree.session.rebind(&tree.binding);
        Ok(())
    }

    /// Drop every tree.
    pub fn clear(&mut self) {
        self.trees.clear();
        self.active = 0;
    }
}
