//! Keyboard polling.
//!
//! Every key pressed during one poll window becomes an [`InputId`] that is
//! actuated for exactly one engine tick, which gives the engine the
//! edge-triggered buttons it expects.

use std::collections::HashSet;
use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::core::host::{InputId, InputSource};

/// Inputs observed during one poll window.
#[derive(Debug, Default)]
pub struct KeyboardInput {
    pressed: HashSet<InputId>,
    /// Terminal was resized, redraw even if nothing else changed.
    pub resized: bool,
    /// Ctrl+C
    pub interrupted: bool,
}

impl KeyboardInput {
    pub fn press(&mut self, input: InputId) {
        self.pressed.insert(input);
    }

    pub fn is_empty(&self) -> bool {
        self.pressed.is_empty()
    }

    pub fn was_pressed(&self, name: &str) -> bool {
        self.pressed.contains(&InputId::new(name))
    }
}

impl InputSource for KeyboardInput {
    fn is_actuated(&self, input: &InputId) -> bool {
        self.pressed.contains(input)
    }
}

/// Wait up to `timeout` for the first event, then drain everything already
/// queued without blocking.
pub fn collect_inputs(timeout: Duration) -> io::Result<KeyboardInput> {
    let mut input = KeyboardInput::default();
    let mut wait = timeout;
    while event::poll(wait)? {
        match event::read()? {
            Event::Key(key_event) => {
                log::debug!(
                    "Key event: {:?} with modifiers {:?}",
                    key_event.code,
                    key_event.modifiers
                );
                if is_interrupt(&key_event) {
                    input.interrupted = true;
                } else if let Some(id) = key_to_input(&key_event) {
                    input.press(id);
                }
            }
            Event::Resize(_, _) => input.resized = true,
            _ => {}
        }
        wait = Duration::ZERO;
    }
    Ok(input)
}

fn is_interrupt(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c')
}

/// Map a key press to the input identifier used in config files.
/// Releases and repeats are ignored.
pub fn key_to_input(key: &KeyEvent) -> Option<InputId> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    let name = match key.code {
        KeyCode::Up => "up".to_string(),
        KeyCode::Down => "down".to_string(),
        KeyCode::Left => "left".to_string(),
        KeyCode::Right => "right".to_string(),
        KeyCode::Tab => "tab".to_string(),
        KeyCode::Enter => "enter".to_string(),
        KeyCode::Backspace => "backspace".to_string(),
        KeyCode::Esc => "esc".to_string(),
        KeyCode::Char(' ') => "space".to_string(),
        KeyCode::Char(c) => c.to_lowercase().to_string(),
        KeyCode::F(n) => format!("f{n}"),
        _ => return None,
    };
    Some(InputId::new(name))
}
