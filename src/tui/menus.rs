//! # Demo Menus
//!
//! Concrete screens for the terminal host. They exercise every engine
//! feature: nested trees, payloads in both directions, menu-queued
//! navigation and per-menu refresh cadence.
//!
//! ```text
//! Main
//! ├── Drive ── Intake (info)
//! │        └── Arm (info)
//! ├── Color picker  (enter returns the pick to Main)
//! └── About (info)
//! ```

use std::time::Duration;

use crate::core::action::Action;
use crate::core::binding::{DirectionalBinding, DirectionalControls};
use crate::core::host::{DisplayChannel, InputId, InputSource};
use crate::core::menu::Menu;
use crate::core::payload::Payload;

/// What every demo menu needs to know about the host.
#[derive(Debug, Clone)]
pub struct DemoContext {
    pub select: InputId,
    pub refresh_interval: Duration,
}

type Builder = fn(&DemoContext) -> Box<dyn Menu>;

enum EntryAction {
    /// Inflate a child menu.
    Open(Builder),
    /// Go back, handing the label to the parent under `"picked"`.
    Pick,
}

struct Entry {
    label: &'static str,
    action: EntryAction,
}

/// A vertical list with a blinking cursor. Up/down move, enter or right
/// activates the entry, left goes back.
pub struct ListMenu {
    title: String,
    entries: Vec<Entry>,
    selected: usize,
    blink_on: bool,
    note: Option<String>,
    controls: Option<DirectionalControls>,
    pending: Option<Action>,
    ctx: DemoContext,
}

impl ListMenu {
    fn new(title: impl Into<String>, ctx: &DemoContext, entries: Vec<Entry>) -> Self {
        Self {
            title: title.into(),
            entries,
            selected: 0,
            blink_on: true,
            note: None,
            controls: None,
            pending: None,
            ctx: ctx.clone(),
        }
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    fn activate(&mut self) {
        let Some(entry) = self.entries.get(self.selected) else {
            return;
        };
        self.pending = Some(match entry.action {
            EntryAction::Open(build) => Action::Inflate(build(&self.ctx)),
            EntryAction::Pick => Action::Back(Payload::new().with("picked", entry.label)),
        });
    }
}

impl Menu for ListMenu {
    fn title(&self) -> &str {
        &self.title
    }

    fn init(&mut self, payload: Payload) {
        self.pending = None;
        if let Some(picked) = payload.get_as::<String>("picked") {
            self.note = Some(format!("last pick: {picked}"));
        }
    }

    fn render(&mut self, display: &mut dyn DisplayChannel) {
        display.write_line(&self.title, "");
        for (i, entry) in self.entries.iter().enumerate() {
            let marker = if i == self.selected && self.blink_on {
                ">"
            } else {
                " "
            };
            display.write_line(marker, entry.label);
        }
        if let Some(note) = &self.note {
            display.write_line("", "");
            display.write_line("note", note);
        }
        if let Some(c) = &self.controls {
            display.write_line(
                "controls",
                &format!("{} {} {} {}", c.up, c.down, c.left, c.right),
            );
        }
    }

    fn update_listeners(&mut self, input: &dyn InputSource) -> bool {
        if input.is_actuated(&self.ctx.select) {
            self.activate();
            return true;
        }
        false
    }

    fn cursor_up(&mut self) {
        if !self.entries.is_empty() {
            self.selected = (self.selected + self.entries.len() - 1) % self.entries.len();
        }
    }

    fn cursor_down(&mut self) {
        if !self.entries.is_empty() {
            self.selected = (self.selected + 1) % self.entries.len();
        }
    }

    fn cursor_left(&mut self) {
        self.pending = Some(Action::Back(Payload::new()));
    }

    fn cursor_right(&mut self) {
        self.activate();
    }

    fn refresh_interval(&self) -> Duration {
        self.ctx.refresh_interval
    }

    fn set_bound_controls(&mut self, binding: &DirectionalBinding) {
        self.controls = Some(binding.controls());
    }

    fn notify_forced_redraw(&mut self, forced: bool) {
        // Keep the cursor visible while the operator is moving it
        self.blink_on = forced || !self.blink_on;
    }

    fn take_action(&mut self) -> Option<Action> {
        self.pending.take()
    }
}

/// Shows the payload it was entered with. Left goes back.
pub struct InfoMenu {
    title: String,
    defaults: Payload,
    shown: Payload,
    pending: Option<Action>,
    refresh_interval: Duration,
}

impl InfoMenu {
    fn new(title: impl Into<String>, ctx: &DemoContext, defaults: Payload) -> Self {
        Self {
            title: title.into(),
            defaults,
            shown: Payload::new(),
            pending: None,
            // Static content, no cursor to blink
            refresh_interval: ctx.refresh_interval * 4,
        }
    }
}

impl Menu for InfoMenu {
    fn title(&self) -> &str {
        &self.title
    }

    fn init(&mut self, payload: Payload) {
        self.pending = None;
        self.shown = payload;
    }

    fn render(&mut self, display: &mut dyn DisplayChannel) {
        display.write_line(&self.title, "");
        if self.shown.is_empty() {
            display.write_line("", "(no data)");
        }
        for (key, value) in self.shown.iter() {
            let text = match value {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            display.write_line(key, &text);
        }
    }

    fn cursor_left(&mut self) {
        self.pending = Some(Action::Back(Payload::new()));
    }

    fn refresh_interval(&self) -> Duration {
        self.refresh_interval
    }

    fn default_payload(&self) -> Payload {
        self.defaults.clone()
    }

    fn take_action(&mut self) -> Option<Action> {
        self.pending.take()
    }
}

// ============================================================================
// Menu trees
// ============================================================================

/// Root of a fresh tree. `tree_no` only appears in the title.
pub fn main_menu(ctx: &DemoContext, tree_no: usize) -> Box<dyn Menu> {
    Box::new(ListMenu::new(
        format!("Main #{tree_no}"),
        ctx,
        vec![
            Entry {
                label: "Drive",
                action: EntryAction::Open(drive_menu),
            },
            Entry {
                label: "Color picker",
                action: EntryAction::Open(color_picker),
            },
            Entry {
                label: "About",
                action: EntryAction::Open(about),
            },
        ],
    ))
}

fn drive_menu(ctx: &DemoContext) -> Box<dyn Menu> {
    Box::new(ListMenu::new(
        "Drive",
        ctx,
        vec![
            Entry {
                label: "Intake",
                action: EntryAction::Open(intake_info),
            },
            Entry {
                label: "Arm",
                action: EntryAction::Open(arm_info),
            },
        ],
    ))
}

fn color_picker(ctx: &DemoContext) -> Box<dyn Menu> {
    let pick = |label| Entry {
        label,
        action: EntryAction::Pick,
    };
    Box::new(ListMenu::new(
        "Color picker",
        ctx,
        vec![pick("red"), pick("green"), pick("blue")],
    ))
}

fn intake_info(ctx: &DemoContext) -> Box<dyn Menu> {
    Box::new(InfoMenu::new(
        "Intake",
        ctx,
        Payload::new().with("motor", "intake").with("power", 0.8),
    ))
}

fn arm_info(ctx: &DemoContext) -> Box<dyn Menu> {
    Box::new(InfoMenu::new(
        "Arm",
        ctx,
        Payload::new().with("motor", "arm").with("limit_deg", 135),
    ))
}

fn about(ctx: &DemoContext) -> Box<dyn Menu> {
    Box::new(InfoMenu::new(
        "About",
        ctx,
        Payload::new()
            .with("app", "telemenu")
            .with("version", env!("CARGO_PKG_VERSION")),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{RecordingDisplay, nothing_pressed, pressed};

    fn ctx() -> DemoContext {
        DemoContext {
            select: InputId::new("enter"),
            refresh_interval: Duration::from_millis(250),
        }
    }

    fn list(entries: Vec<Entry>) -> ListMenu {
        ListMenu::new("list", &ctx(), entries)
    }

    fn picks() -> Vec<Entry> {
        ["a", "b", "c"]
            .into_iter()
            .map(|label| Entry {
                label,
                action: EntryAction::Pick,
            })
            .collect()
    }

    #[test]
    fn test_cursor_wraps_both_ways() {
        let mut menu = list(picks());
        menu.cursor_up();
        assert_eq!(menu.selected(), 2);
        menu.cursor_down();
        assert_eq!(menu.selected(), 0);
    }

    #[test]
    fn test_select_on_pick_entry_queues_back_with_payload() {
        let mut menu = list(picks());
        menu.cursor_down();
        assert!(!menu.update_listeners(&nothing_pressed()));
        assert!(menu.update_listeners(&pressed(&["enter"])));
        match menu.take_action() {
            Some(Action::Back(payload)) => {
                assert_eq!(payload.get_as::<String>("picked").as_deref(), Some("b"));
            }
            other => panic!("expected Back, got {other:?}"),
        }
        assert!(menu.take_action().is_none());
    }

    #[test]
    fn test_right_opens_child() {
        let mut main = ListMenu::new(
            "main",
            &ctx(),
            vec![Entry {
                label: "About",
                action: EntryAction::Open(about),
            }],
        );
        main.cursor_right();
        match main.take_action() {
            Some(Action::Inflate(child)) => assert_eq!(child.title(), "About"),
            other => panic!("expected Inflate, got {other:?}"),
        }
    }

    #[test]
    fn test_init_with_pick_shows_note() {
        let mut menu = list(picks());
        menu.init(Payload::new().with("picked", "green"));
        let mut display = RecordingDisplay::default();
        menu.render(&mut display);
        display.flush();
        assert!(
            display
                .last_frame()
                .contains(&("note".to_string(), "last pick: green".to_string()))
        );
    }

    #[test]
    fn test_cursor_blinks_unless_forced() {
        let mut menu = list(picks());
        menu.notify_forced_redraw(false);
        assert!(!menu.blink_on);
        menu.notify_forced_redraw(false);
        assert!(menu.blink_on);
        menu.notify_forced_redraw(false);
        menu.notify_forced_redraw(true);
        assert!(menu.blink_on);
    }

    #[test]
    fn test_info_menu_shows_default_payload_after_inflate() {
        let mut info = InfoMenu::new("Arm", &ctx(), Payload::new().with("limit_deg", 135));
        let payload = info.default_payload();
        info.init(payload);
        let mut display = RecordingDisplay::default();
        info.render(&mut display);
        display.flush();
        assert_eq!(
            display.last_frame(),
            vec![
                ("Arm".to_string(), String::new()),
                ("limit_deg".to_string(), "135".to_string()),
            ]
        );
    }
}
