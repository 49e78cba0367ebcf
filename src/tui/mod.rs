//! # TUI Host
//!
//! The ratatui-specific layer. Plays the part of the robot runtime: it
//! polls the keyboard, calls `advance()` once per tick and shows the
//! telemetry frame the engine flushed.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Tick Cadence
//!
//! The loop waits for keys up to the engine's requested transmission
//! interval, so an idle screen still ticks often enough for cursor blink
//! and settle windows to expire. The terminal is only redrawn when the
//! engine flushed a new frame, the host changed navigation state, or the
//! terminal was resized.

mod component;
pub mod event;
pub mod menus;
pub mod telemetry;
mod ui;

use log::{error, info, warn};
use std::io::{self, stdout};

use crossterm::cursor::{Hide, Show};
use crossterm::event::{
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;

use crate::ControlScheme;
use crate::core::binding::DirectionalControls;
use crate::core::clock::{Clock, SystemClock};
use crate::core::config::ResolvedConfig;
use crate::core::engine::NavigationEngine;
use crate::core::error::NavError;
use crate::core::host::InputSource;
use crate::tui::event::{KeyboardInput, collect_inputs};
use crate::tui::menus::DemoContext;
use crate::tui::telemetry::TelemetryBuffer;

/// Keys the host handles itself, outside any menu.
const NEW_TREE_KEY: &str = "n";
const SWAP_SCHEME_KEY: &str = "r";
const QUIT_KEYS: [&str; 2] = ["q", "esc"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostOutcome {
    Continue,
    Quit,
}

/// The engine plus the host-level controls wrapped around it.
pub struct Host {
    pub engine: NavigationEngine<TelemetryBuffer>,
    config: ResolvedConfig,
    ctx: DemoContext,
    scheme: ControlScheme,
    controls: DirectionalControls,
    trees_started: usize,
}

impl Host {
    /// Build the engine and register the first tree.
    pub fn new(
        config: ResolvedConfig,
        scheme: ControlScheme,
        clock: Box<dyn Clock>,
    ) -> Result<Self, NavError> {
        let engine =
            NavigationEngine::with_clock(TelemetryBuffer::new(), config.settings.clone(), clock);
        let ctx = DemoContext {
            select: config.select.clone(),
            refresh_interval: config.refresh_interval,
        };
        let controls = config.controls.clone();
        let mut host = Self {
            engine,
            config,
            ctx,
            scheme,
            controls,
            trees_started: 0,
        };
        host.engine.set_cycle_input(host.config.cycle.clone());
        host.start_tree()?;
        Ok(host)
    }

    fn start_tree(&mut self) -> Result<(), NavError> {
        let root = menus::main_menu(&self.ctx, self.trees_started + 1);
        self.engine.register_new_tree(root, self.controls.clone())?;
        self.trees_started += 1;
        Ok(())
    }

    fn swap_scheme(&mut self) -> Result<(), NavError> {
        let next = self.scheme.toggled();
        self.engine.rebind_directional_controls(next.controls())?;
        info!("Swapped directional controls to {:?}", next);
        self.scheme = next;
        self.controls = next.controls();
        Ok(())
    }

    /// Apply one tick of keyboard input: host keys first, then the engine.
    /// Returns whether the host changed navigation state itself.
    pub fn handle(&mut self, input: &KeyboardInput) -> (HostOutcome, bool) {
        if input.interrupted || QUIT_KEYS.iter().any(|k| input.was_pressed(k)) {
            return (HostOutcome::Quit, false);
        }

        let mut changed = false;
        if input.was_pressed(NEW_TREE_KEY) {
            changed |= report("start tree", self.start_tree()).is_some();
        }
        if input.is_actuated(&self.config.back) {
            changed |= report("back", self.engine.navigate_back(None)).unwrap_or(false);
        }
        if input.is_actuated(&self.config.forward) {
            changed |= report("forward", self.engine.navigate_forward(None)).unwrap_or(false);
        }
        if input.was_pressed(SWAP_SCHEME_KEY) {
            changed |= report("swap controls", self.swap_scheme()).is_some();
        }

        report("advance", self.engine.advance(input));
        (HostOutcome::Continue, changed)
    }
}

/// Log a failed host-level call. Fatal errors have already been put on the
/// telemetry screen by the engine.
fn report<T>(what: &str, result: Result<T, NavError>) -> Option<T> {
    match result {
        Ok(v) => Some(v),
        Err(e) if e.is_fatal() => {
            error!("{} failed: {}", what, e);
            None
        }
        Err(e) => {
            warn!("{} failed: {}", what, e);
            None
        }
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> io::Result<Self> {
        // Report press/release separately so held keys don't auto-repeat
        // into the engine as fresh presses
        execute!(
            stdout(),
            Hide,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
        info!("Terminal modes enabled (hidden cursor, keyboard enhancement)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), PopKeyboardEnhancementFlags, Show);
    }
}

pub fn run(config: ResolvedConfig, scheme: ControlScheme) -> io::Result<()> {
    let mut host = Host::new(config, scheme, Box::new(SystemClock)).map_err(io::Error::other)?;

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    let mut needs_redraw = true; // Force first frame
    loop {
        if needs_redraw {
            terminal.draw(|f| ui::draw_ui(f, &host.engine))?;
            needs_redraw = false;
        }

        let timeout = host.engine.display().transmission_interval();
        let input = collect_inputs(timeout)?;

        let (outcome, changed) = host.handle(&input);
        if outcome == HostOutcome::Quit {
            info!("Quit requested");
            break;
        }

        let flushed = host.engine.display_mut().take_dirty();
        needs_redraw = flushed || changed || input.resized;
    }

    host.engine.shutdown();
    ratatui::restore();
    Ok(())
}
