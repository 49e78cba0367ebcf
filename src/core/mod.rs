//! # Core Navigation Engine
//!
//! Stacked, multi-tree menu navigation for a small telemetry screen driven
//! by four directional inputs and one cycle input. It knows nothing about
//! terminals, gamepads or robots: inputs and the display arrive through the
//! traits in [`host`].
//!
//! ```text
//!                  ┌──────────────────────────────┐
//!                  │       NavigationEngine       │
//!                  │  advance() once per tick     │
//!                  └──────────────┬───────────────┘
//!          ┌──────────────────────┼──────────────────────┐
//!          ▼                      ▼                      ▼
//!   ┌─────────────┐        ┌─────────────┐        ┌─────────────┐
//!   │  Registry   │        │   Toggle    │        │   Render    │
//!   │ trees +     │        │ cycle input │        │  throttle   │
//!   │ bindings    │        │ edge detect │        │             │
//!   └──────┬──────┘        └─────────────┘        └─────────────┘
//!          ▼
//!   ┌─────────────┐
//!   │   Session   │  history ← current → redo
//!   └─────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`engine`]: the host-facing API and the per-tick sequence
//! - [`registry`]: round-robin collection of trees and their bindings
//! - [`session`]: one tree's back/forward history
//! - [`binding`]: directional inputs → cursor intents
//! - [`toggle`]: rising-edge detector for the cycle button
//! - [`render`]: redraw throttle
//! - [`menu`], [`payload`], [`action`]: what flows between screens
//! - [`host`], [`clock`]: capabilities supplied by the host
//! - [`config`]: settings file and override resolution

pub mod action;
pub mod binding;
pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod host;
pub mod menu;
pub mod payload;
pub mod registry;
pub mod render;
pub mod session;
pub mod toggle;

pub use action::Action;
pub use binding::{Direction, DirectionalBinding, DirectionalControls};
pub use engine::{EngineSettings, NavigationEngine};
pub use error::NavError;
pub use host::{DisplayChannel, InputId, InputSource};
pub use menu::Menu;
pub use payload::Payload;
