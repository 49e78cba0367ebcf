//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::rc::Rc;
use std::time::{Duration, Instant};

use crate::core::action::Action;
use crate::core::binding::{Direction, DirectionalBinding, DirectionalControls};
use crate::core::clock::Clock;
use crate::core::host::{DisplayChannel, InputId, InputSource};
use crate::core::menu::Menu;
use crate::core::payload::Payload;

#[derive(Default)]
struct ProbeLog {
    inits: Vec<Payload>,
    renders: usize,
    cursor_moves: Vec<Direction>,
    bound: Option<DirectionalControls>,
    forced_notices: Vec<bool>,
    force_next_update: bool,
    pending: Option<Action>,
}

/// Shared view into what a [`ProbeMenu`] has been asked to do. Stays
/// readable after the menu itself has been moved into the engine.
#[derive(Clone, Default)]
pub struct Probe(Rc<RefCell<ProbeLog>>);

impl Probe {
    pub fn inits(&self) -> Vec<Payload> {
        self.0.borrow().inits.clone()
    }

    pub fn last_init(&self) -> Option<Payload> {
        self.0.borrow().inits.last().cloned()
    }

    pub fn renders(&self) -> usize {
        self.0.borrow().renders
    }

    pub fn cursor_moves(&self) -> Vec<Direction> {
        self.0.borrow().cursor_moves.clone()
    }

    pub fn bound_controls(&self) -> Option<DirectionalControls> {
        self.0.borrow().bound.clone()
    }

    pub fn forced_notices(&self) -> Vec<bool> {
        self.0.borrow().forced_notices.clone()
    }

    /// Make the next `update_listeners` call report a forced redraw.
    pub fn force_next_update(&self) {
        self.0.borrow_mut().force_next_update = true;
    }

    /// Queue an action for the engine to drain on the next tick.
    pub fn queue_action(&self, action: Action) {
        self.0.borrow_mut().pending = Some(action);
    }
}

/// A menu that records every hook call into its [`Probe`].
pub struct ProbeMenu {
    title: String,
    interval: Duration,
    default_payload: Payload,
    probe: Probe,
}

impl ProbeMenu {
    pub fn new(title: &str) -> (Self, Probe) {
        let probe = Probe::default();
        let menu = Self {
            title: title.to_string(),
            interval: Duration::from_millis(250),
            default_payload: Payload::new(),
            probe: probe.clone(),
        };
        (menu, probe)
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn with_default_payload(mut self, payload: Payload) -> Self {
        self.default_payload = payload;
        self
    }

    /// Boxed menu plus its probe, ready to hand to a session or engine.
    pub fn boxed(title: &str) -> (Box<dyn Menu>, Probe) {
        let (menu, probe) = Self::new(title);
        (Box::new(menu), probe)
    }
}

impl Menu for ProbeMenu {
    fn title(&self) -> &str {
        &self.title
    }

    fn init(&mut self, payload: Payload) {
        self.probe.0.borrow_mut().inits.push(payload);
    }

    fn render(&mut self, display: &mut dyn DisplayChannel) {
        self.probe.0.borrow_mut().renders += 1;
        display.write_line("menu", &self.title);
    }

    fn update_listeners(&mut self, _input: &dyn InputSource) -> bool {
        std::mem::take(&mut self.probe.0.borrow_mut().force_next_update)
    }

    fn cursor_up(&mut self) {
        self.probe.0.borrow_mut().cursor_moves.push(Direction::Up);
    }

    fn cursor_down(&mut self) {
        self.probe.0.borrow_mut().cursor_moves.push(Direction::Down);
    }

    fn cursor_left(&mut self) {
        self.probe.0.borrow_mut().cursor_moves.push(Direction::Left);
    }

    fn cursor_right(&mut self) {
        self.probe.0.borrow_mut().cursor_moves.push(Direction::Right);
    }

    fn refresh_interval(&self) -> Duration {
        self.interval
    }

    fn set_bound_controls(&mut self, binding: &DirectionalBinding) {
        self.probe.0.borrow_mut().bound = Some(binding.controls());
    }

    fn default_payload(&self) -> Payload {
        self.default_payload.clone()
    }

    fn notify_forced_redraw(&mut self, forced: bool) {
        self.probe.0.borrow_mut().forced_notices.push(forced);
    }

    fn take_action(&mut self) -> Option<Action> {
        self.probe.0.borrow_mut().pending.take()
    }
}

#[derive(Default)]
struct DisplayLog {
    staged: Vec<(String, String)>,
    frames: Vec<Vec<(String, String)>>,
    clears: usize,
    interval: Option<Duration>,
}

/// Display channel that keeps every flushed frame.
#[derive(Clone, Default)]
pub struct RecordingDisplay(Rc<RefCell<DisplayLog>>);

impl RecordingDisplay {
    pub fn flush_count(&self) -> usize {
        self.0.borrow().frames.len()
    }

    pub fn last_frame(&self) -> Vec<(String, String)> {
        self.0.borrow().frames.last().cloned().unwrap_or_default()
    }

    pub fn clears(&self) -> usize {
        self.0.borrow().clears
    }

    pub fn transmission_interval(&self) -> Option<Duration> {
        self.0.borrow().interval
    }
}

impl DisplayChannel for RecordingDisplay {
    fn clear(&mut self) {
        let mut log = self.0.borrow_mut();
        log.staged.clear();
        log.clears += 1;
    }

    fn write_line(&mut self, key: &str, value: &str) {
        self.0
            .borrow_mut()
            .staged
            .push((key.to_string(), value.to_string()));
    }

    fn flush(&mut self) {
        let mut log = self.0.borrow_mut();
        let frame = std::mem::take(&mut log.staged);
        log.frames.push(frame);
    }

    fn set_transmission_interval(&mut self, interval: Duration) {
        self.0.borrow_mut().interval = Some(interval);
    }
}

/// Clock that only moves when told to.
#[derive(Clone)]
pub struct ManualClock(Rc<Cell<Instant>>);

impl ManualClock {
    pub fn new() -> Self {
        Self(Rc::new(Cell::new(Instant::now())))
    }

    pub fn advance_ms(&self, ms: u64) {
        self.0.set(self.0.get() + Duration::from_millis(ms));
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.0.get()
    }
}

pub fn arrows() -> DirectionalBinding {
    DirectionalBinding::new(DirectionalControls::arrows()).unwrap()
}

pub fn pressed(names: &[&str]) -> HashSet<InputId> {
    names.iter().map(|n| InputId::new(*n)).collect()
}

pub fn nothing_pressed() -> HashSet<InputId> {
    HashSet::new()
}
