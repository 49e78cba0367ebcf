//! # Navigation Engine
//!
//! Ties the registry, the cycle toggle and the render throttle together
//! behind the API the host calls.
//!
//! ## Tick order
//!
//! Every `advance()` runs the same fixed sequence, so a rotation triggered
//! by the cycle button never affects the render decision of its own tick:
//!
//! ```text
//! 1. no trees registered?           → return
//! 2. active session listeners       → forced redraw?
//!    (directional dispatch + the menu's own items, skipped while settling)
//! 3. drain the menu's queued Action → apply, force redraw
//! 4. render throttle                → render + flush
//! 5. cycle toggle                   → rotate, rebind controls
//! ```
//!
//! ## Failure
//!
//! Configuration mistakes are returned to the caller and change nothing.
//! An invariant violation halts the engine for good: the display shows a
//! diagnostic and every later navigation call returns `NavError::Halted`.

use std::time::{Duration, Instant};

use log::{debug, error, info, warn};

use crate::core::action::Action;
use crate::core::binding::{DirectionalBinding, DirectionalControls};
use crate::core::clock::{Clock, SystemClock};
use crate::core::error::NavError;
use crate::core::host::{DisplayChannel, InputId, InputSource};
use crate::core::menu::Menu;
use crate::core::payload::Payload;
use crate::core::registry::SessionRegistry;
use crate::core::render::RenderScheduler;
use crate::core::session::Session;
use crate::core::toggle::Toggle;

pub const DEFAULT_SETTLE_WINDOW: Duration = Duration::from_millis(250);
pub const DEFAULT_TRANSMISSION_INTERVAL: Duration = Duration::from_millis(50);
pub const DEFAULT_IDLE_TRANSMISSION_INTERVAL: Duration = Duration::from_millis(250);

/// Title line written to the display when the engine halts.
pub const HALT_BANNER: &str = "NAVIGATION HALTED";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSettings {
    /// Input ignored after `inflate` / `back`.
    pub settle_window: Duration,
    /// Also settle after `forward`.
    pub settle_on_forward: bool,
    /// Telemetry cadence requested while the engine is attached.
    pub transmission_interval: Duration,
    /// Telemetry cadence restored on shutdown.
    pub idle_transmission_interval: Duration,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            settle_window: DEFAULT_SETTLE_WINDOW,
            settle_on_forward: false,
            transmission_interval: DEFAULT_TRANSMISSION_INTERVAL,
            idle_transmission_interval: DEFAULT_IDLE_TRANSMISSION_INTERVAL,
        }
    }
}

pub struct NavigationEngine<D: DisplayChannel> {
    registry: SessionRegistry,
    display: D,
    clock: Box<dyn Clock>,
    settings: EngineSettings,
    cycle_input: Option<InputId>,
    cycle_toggle: Toggle,
    scheduler: RenderScheduler,
    halted: Option<String>,
    /// Set while the display runs at the attached transmission interval.
    attached: bool,
}

impl<D: DisplayChannel> NavigationEngine<D> {
    pub fn new(display: D, settings: EngineSettings) -> Self {
        Self::with_clock(display, settings, Box::new(SystemClock))
    }

    pub fn with_clock(mut display: D, settings: EngineSettings, clock: Box<dyn Clock>) -> Self {
        display.set_transmission_interval(settings.transmission_interval);
        info!("Navigation engine attached ({:?})", settings);
        Self {
            registry: SessionRegistry::new(),
            display,
            clock,
            settings,
            cycle_input: None,
            cycle_toggle: Toggle::new(),
            scheduler: RenderScheduler::new(),
            halted: None,
            attached: true,
        }
    }

    // ------------------------------------------------------------------
    // Host API
    // ------------------------------------------------------------------

    /// Start a new menu tree rooted at `root` and switch to it.
    ///
    /// Fails without registering anything if `controls` reuses an input.
    pub fn register_new_tree(
        &mut self,
        root: Box<dyn Menu>,
        controls: DirectionalControls,
    ) -> Result<(), NavError> {
        self.ensure_running()?;
        let binding = DirectionalBinding::new(controls).inspect_err(|e| {
            warn!("Rejected new tree rooted at {}: {}", root.title(), e);
        })?;
        if !self.attached {
            self.display
                .set_transmission_interval(self.settings.transmission_interval);
            self.attached = true;
        }
        let session = Session::new(root, &binding);
        info!(
            "New menu tree rooted at {} (tree {})",
            session.current().title(),
            self.registry.len() + 1
        );
        self.registry.register(session, binding);
        self.scheduler.reset();
        Ok(())
    }

    /// The input that cycles between trees. Until set, trees never cycle.
    pub fn set_cycle_input(&mut self, input: InputId) {
        info!("Cycle input set to '{}'", input);
        self.cycle_input = Some(input);
    }

    /// Push `menu` onto the active tree.
    pub fn navigate_into(&mut self, menu: Box<dyn Menu>) -> Result<(), NavError> {
        self.ensure_running()?;
        let now = self.clock.now();
        let settle = self.settings.settle_window;
        let (session, binding) = self.active_parts("navigate_into")?;
        session.inflate(menu, binding, now, settle);
        self.audit()
    }

    /// Return to the previous menu of the active tree. `Ok(false)` when
    /// already at the root.
    pub fn navigate_back(&mut self, payload: Option<Payload>) -> Result<bool, NavError> {
        self.ensure_running()?;
        let now = self.clock.now();
        let settle = self.settings.settle_window;
        let (session, binding) = self.active_parts("navigate_back")?;
        let moved = session.back(payload.unwrap_or_default(), binding, now, settle);
        self.audit()?;
        Ok(moved)
    }

    /// Redo the last `navigate_back` of the active tree. `Ok(false)` when
    /// there is nothing to redo.
    pub fn navigate_forward(&mut self, payload: Option<Payload>) -> Result<bool, NavError> {
        self.ensure_running()?;
        let now = self.clock.now();
        let settle = self
            .settings
            .settle_on_forward
            .then_some(self.settings.settle_window);
        let (session, binding) = self.active_parts("navigate_forward")?;
        let moved = session.forward(payload.unwrap_or_default(), binding, now, settle);
        self.audit()?;
        Ok(moved)
    }

    /// Replace the active tree's directional controls.
    pub fn rebind_directional_controls(
        &mut self,
        controls: DirectionalControls,
    ) -> Result<(), NavError> {
        self.ensure_running()?;
        if self.registry.is_empty() {
            return Err(self.usage_error("rebind_directional_controls"));
        }
        let binding = DirectionalBinding::new(controls).inspect_err(|e| {
            warn!("Rejected rebind: {}", e);
        })?;
        info!("Rebinding directional controls to {:?}", binding.controls());
        self.registry.replace_active_binding(binding)
    }

    /// Run one control-loop tick.
    pub fn advance(&mut self, input: &dyn InputSource) -> Result<(), NavError> {
        if self.halted.is_some() {
            return Ok(());
        }
        let result = self.tick(input);
        if let Err(ref e) = result
            && e.is_fatal()
        {
            self.halt(e);
        }
        result
    }

    /// Release every tree and hand the display back to the host.
    pub fn shutdown(&mut self) {
        info!(
            "Shutting down navigation engine ({} trees)",
            self.registry.len()
        );
        self.registry.clear();
        self.cycle_input = None;
        self.cycle_toggle = Toggle::new();
        self.scheduler.reset();
        self.display.clear();
        self.display.flush();
        self.display
            .set_transmission_interval(self.settings.idle_transmission_interval);
        self.attached = false;
    }

    // ------------------------------------------------------------------
    // Introspection
    // ------------------------------------------------------------------

    pub fn session_count(&self) -> usize {
        self.registry.len()
    }

    pub fn active_index(&self) -> Option<usize> {
        self.registry.active_index()
    }

    pub fn active_session(&self) -> Option<&Session> {
        self.registry.active_session()
    }

    pub fn active_binding(&self) -> Option<&DirectionalBinding> {
        self.registry.active_binding()
    }

    pub fn cycle_input(&self) -> Option<&InputId> {
        self.cycle_input.as_ref()
    }

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn is_halted(&self) -> bool {
        self.halted.is_some()
    }

    /// Why the engine halted, if it did.
    pub fn halt_reason(&self) -> Option<&str> {
        self.halted.as_deref()
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    // ------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------

    fn tick(&mut self, input: &dyn InputSource) -> Result<(), NavError> {
        let now = self.clock.now();
        let Some((session, binding)) = self.registry.active_parts_mut() else {
            return Ok(());
        };

        let mut force = session.update_listeners(binding, input, now);
        if let Some(action) = session.current_mut().take_action() {
            self.apply(action, now)?;
            force = true;
        }

        self.render_if_due(now, force);

        let raw = self
            .cycle_input
            .as_ref()
            .is_some_and(|id| input.is_actuated(id));
        self.cycle_toggle.update(raw);
        if self.cycle_toggle.is_firing() {
            self.registry.rotate()?;
            if let Some((session, binding)) = self.registry.active_parts_mut() {
                session.rebind(binding);
            }
            debug!(
                "Cycled to tree {:?} of {}",
                self.registry.active_index().map(|i| i + 1),
                self.registry.len()
            );
        }

        self.audit()
    }

    fn apply(&mut self, action: Action, now: Instant) -> Result<(), NavError> {
        debug!("Applying menu action {:?}", action);
        let settle = self.settings.settle_window;
        let forward_settle = self.settings.settle_on_forward.then_some(settle);
        let (session, binding) = self.active_parts("apply")?;
        match action {
            Action::Inflate(menu) => session.inflate(menu, binding, now, settle),
            Action::Back(payload) => {
                session.back(payload, binding, now, settle);
            }
            Action::Forward(payload) => {
                session.forward(payload, binding, now, forward_settle);
            }
        }
        self.audit()
    }

    fn render_if_due(&mut self, now: Instant, force: bool) {
        let Some((session, _)) = self.registry.active_parts_mut() else {
            return;
        };
        let interval = session.current().refresh_interval();
        if !self.scheduler.should_render(now, interval, force) {
            return;
        }
        let menu = session.current_mut();
        menu.notify_forced_redraw(force);
        self.display.clear();
        menu.render(&mut self.display);
        self.display.flush();
        self.scheduler.mark_rendered(now);
    }

    fn active_parts(
        &mut self,
        operation: &'static str,
    ) -> Result<(&mut Session, &DirectionalBinding), NavError> {
        if self.registry.is_empty() {
            return Err(self.usage_error(operation));
        }
        self.registry
            .active_parts_mut()
            .ok_or(NavError::NoActiveSession { operation })
    }

    fn usage_error(&self, operation: &'static str) -> NavError {
        let err = NavError::NoActiveSession { operation };
        warn!("{}", err);
        err
    }

    fn ensure_running(&self) -> Result<(), NavError> {
        if self.halted.is_some() {
            return Err(NavError::Halted);
        }
        Ok(())
    }

    /// Check the active session and halt on corruption.
    fn audit(&mut self) -> Result<(), NavError> {
        let Some(session) = self.registry.active_session() else {
            return Ok(());
        };
        if let Err(e) = session.check_invariants() {
            self.halt(&e);
            return Err(e);
        }
        Ok(())
    }

    fn halt(&mut self, cause: &NavError) {
        if self.halted.is_some() {
            return;
        }
        let reason = cause.to_string();
        error!("Halting navigation: {}", reason);
        self.display.clear();
        self.display.write_line(HALT_BANNER, &reason);
        self.display.flush();
        self.halted = Some(reason);
    }

    #[cfg(test)]
    pub(crate) fn corrupt_active_for_test(&mut self) {
        if let Some((session, _)) = self.registry.active_parts_mut() {
            session.corrupt_for_test();
        }
    }
}

impl<D: DisplayChannel> Drop for NavigationEngine<D> {
    fn drop(&mut self) {
        if self.attached {
            self.shutdown();
        }
    }
}
