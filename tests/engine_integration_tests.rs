use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::rc::Rc;
use std::time::{Duration, Instant};

use telemenu::core::clock::Clock;
use telemenu::core::{
    Action, DirectionalControls, DisplayChannel, EngineSettings, InputId, InputSource, Menu,
    NavError, NavigationEngine, Payload,
};

// ============================================================================
// Helper Types
// ============================================================================

/// What a menu saw, shared with the test after the menu moves into the engine.
#[derive(Default)]
struct Seen {
    inits: Vec<Payload>,
    renders: usize,
}

/// Menu that queues a `Back` carrying `"answer"` when the `enter` input fires.
struct TestMenu {
    title: String,
    interval: Duration,
    seen: Rc<RefCell<Seen>>,
    pending: Option<Action>,
}

impl TestMenu {
    fn boxed(title: &str) -> (Box<dyn Menu>, Rc<RefCell<Seen>>) {
        Self::with_interval(title, Duration::from_millis(250))
    }

    fn with_interval(title: &str, interval: Duration) -> (Box<dyn Menu>, Rc<RefCell<Seen>>) {
        let seen = Rc::new(RefCell::new(Seen::default()));
        let menu = TestMenu {
            title: title.to_string(),
            interval,
            seen: seen.clone(),
            pending: None,
        };
        (Box::new(menu), seen)
    }
}

impl Menu for TestMenu {
    fn title(&self) -> &str {
        &self.title
    }

    fn init(&mut self, payload: Payload) {
        self.seen.borrow_mut().inits.push(payload);
    }

    fn render(&mut self, display: &mut dyn DisplayChannel) {
        self.seen.borrow_mut().renders += 1;
        display.write_line("menu", &self.title);
    }

    fn update_listeners(&mut self, input: &dyn InputSource) -> bool {
        if input.is_actuated(&InputId::new("enter")) {
            self.pending = Some(Action::Back(Payload::new().with("answer", 42)));
            return true;
        }
        false
    }

    fn refresh_interval(&self) -> Duration {
        self.interval
    }

    fn take_action(&mut self) -> Option<Action> {
        self.pending.take()
    }
}

/// Display that keeps only flushed frames.
#[derive(Clone, Default)]
struct FrameLog {
    staged: Rc<RefCell<Vec<(String, String)>>>,
    frames: Rc<RefCell<Vec<Vec<(String, String)>>>>,
}

impl FrameLog {
    fn frame_count(&self) -> usize {
        self.frames.borrow().len()
    }
}

impl DisplayChannel for FrameLog {
    fn clear(&mut self) {
        self.staged.borrow_mut().clear();
    }

    fn write_line(&mut self, key: &str, value: &str) {
        self.staged
            .borrow_mut()
            .push((key.to_string(), value.to_string()));
    }

    fn flush(&mut self) {
        let frame = self.staged.borrow().clone();
        self.frames.borrow_mut().push(frame);
    }
}

#[derive(Clone)]
struct StepClock(Rc<Cell<Instant>>);

impl StepClock {
    fn new() -> Self {
        Self(Rc::new(Cell::new(Instant::now())))
    }

    fn step_ms(&self, ms: u64) {
        self.0.set(self.0.get() + Duration::from_millis(ms));
    }
}

impl Clock for StepClock {
    fn now(&self) -> Instant {
        self.0.get()
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

fn keys(names: &[&str]) -> HashSet<InputId> {
    names.iter().map(|n| InputId::new(*n)).collect()
}

fn engine() -> (NavigationEngine<FrameLog>, FrameLog, StepClock) {
    let display = FrameLog::default();
    let clock = StepClock::new();
    let engine = NavigationEngine::with_clock(
        display.clone(),
        EngineSettings::default(),
        Box::new(clock.clone()),
    );
    (engine, display, clock)
}

fn current_title<D: DisplayChannel>(engine: &NavigationEngine<D>) -> String {
    engine
        .active_session()
        .expect("active tree")
        .current()
        .title()
        .to_string()
}

/// Press `input` for one tick, then release it for one tick.
fn tap<D: DisplayChannel>(engine: &mut NavigationEngine<D>, input: &str) {
    engine.advance(&keys(&[input])).unwrap();
    engine.advance(&keys(&[])).unwrap();
}

// ============================================================================
// Navigation
// ============================================================================

#[test]
fn test_two_trees_cycle_and_history() {
    let (mut engine, _, _) = engine();
    let (a, _) = TestMenu::boxed("A");
    let (m2, _) = TestMenu::boxed("M2");
    engine
        .register_new_tree(a, DirectionalControls::arrows())
        .unwrap();
    engine
        .register_new_tree(m2, DirectionalControls::arrows())
        .unwrap();
    engine.set_cycle_input(InputId::new("x"));

    // Newest tree is active right after registering
    assert_eq!(current_title(&engine), "M2");

    engine.advance(&keys(&["x"])).unwrap();
    assert_eq!(current_title(&engine), "A");

    // Held input does not cycle again
    engine.advance(&keys(&["x"])).unwrap();
    assert_eq!(current_title(&engine), "A");

    engine.advance(&keys(&[])).unwrap();
    engine.advance(&keys(&["x"])).unwrap();
    assert_eq!(current_title(&engine), "M2");

    let (m3, _) = TestMenu::boxed("M3");
    engine.navigate_into(m3).unwrap();
    let session = engine.active_session().unwrap();
    assert_eq!(session.current().title(), "M3");
    assert_eq!(session.history_titles(), vec!["M2"]);

    assert!(engine.navigate_back(None).unwrap());
    let session = engine.active_session().unwrap();
    assert_eq!(session.current().title(), "M2");
    assert_eq!(session.redo_titles(), vec!["M3"]);

    assert!(engine.navigate_forward(None).unwrap());
    let session = engine.active_session().unwrap();
    assert_eq!(session.current().title(), "M3");
    assert_eq!(session.history_titles(), vec!["M2"]);
    assert!(session.redo_titles().is_empty());
}

#[test]
fn test_cycling_n_times_returns_to_start() {
    let (mut engine, _, _) = engine();
    for title in ["one", "two", "three"] {
        let (menu, _) = TestMenu::boxed(title);
        engine
            .register_new_tree(menu, DirectionalControls::arrows())
            .unwrap();
    }
    engine.set_cycle_input(InputId::new("x"));

    let start = engine.active_index();
    for _ in 0..engine.session_count() {
        tap(&mut engine, "x");
    }
    assert_eq!(engine.active_index(), start);
}

#[test]
fn test_menu_back_action_hands_payload_to_parent() {
    let (mut engine, _, clock) = engine();
    let (root, root_seen) = TestMenu::boxed("root");
    engine
        .register_new_tree(root, DirectionalControls::arrows())
        .unwrap();
    let (child, _) = TestMenu::boxed("child");
    engine.navigate_into(child).unwrap();

    // Still settling: the child ignores the press
    engine.advance(&keys(&["enter"])).unwrap();
    assert_eq!(current_title(&engine), "child");

    clock.step_ms(300);
    engine.advance(&keys(&["enter"])).unwrap();
    assert_eq!(current_title(&engine), "root");

    let seen = root_seen.borrow();
    let last = seen.inits.last().unwrap();
    assert_eq!(last.get_as::<i64>("answer"), Some(42));
}

#[test]
fn test_back_at_root_and_forward_without_redo() {
    let (mut engine, _, _) = engine();
    let (root, _) = TestMenu::boxed("root");
    engine
        .register_new_tree(root, DirectionalControls::arrows())
        .unwrap();

    assert!(!engine.navigate_back(None).unwrap());
    assert!(!engine.navigate_forward(None).unwrap());
    assert_eq!(current_title(&engine), "root");
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_duplicate_controls_rejected() {
    let (mut engine, _, _) = engine();
    let (menu, _) = TestMenu::boxed("root");
    let result = engine.register_new_tree(menu, DirectionalControls::new("k", "k", "h", "l"));

    assert!(matches!(result, Err(NavError::DuplicateInput { .. })));
    assert_eq!(engine.session_count(), 0);
}

#[test]
fn test_rebind_rejects_duplicates_and_keeps_old_binding() {
    let (mut engine, _, _) = engine();
    let (menu, _) = TestMenu::boxed("root");
    engine
        .register_new_tree(menu, DirectionalControls::arrows())
        .unwrap();

    let result =
        engine.rebind_directional_controls(DirectionalControls::new("a", "b", "a", "c"));
    assert!(matches!(result, Err(NavError::DuplicateInput { .. })));
    assert_eq!(
        engine.active_binding().map(|b| b.controls()),
        Some(DirectionalControls::arrows())
    );
}

#[test]
fn test_navigation_without_trees_is_usage_error() {
    let (mut engine, _, _) = engine();
    let (menu, _) = TestMenu::boxed("orphan");

    assert!(matches!(
        engine.navigate_into(menu),
        Err(NavError::NoActiveSession { .. })
    ));
    assert!(matches!(
        engine.navigate_back(None),
        Err(NavError::NoActiveSession { .. })
    ));
    // Ticking with nothing registered is harmless
    engine.advance(&keys(&["x"])).unwrap();
    assert!(!engine.is_halted());
}

// ============================================================================
// Rendering
// ============================================================================

#[test]
fn test_render_throttled_to_refresh_interval() {
    let (mut engine, display, clock) = engine();
    let (menu, seen) = TestMenu::with_interval("slow", Duration::from_millis(100));
    engine
        .register_new_tree(menu, DirectionalControls::arrows())
        .unwrap();

    engine.advance(&keys(&[])).unwrap();
    assert_eq!(display.frame_count(), 1);

    clock.step_ms(50);
    engine.advance(&keys(&[])).unwrap();
    assert_eq!(display.frame_count(), 1);

    clock.step_ms(50);
    engine.advance(&keys(&[])).unwrap();
    assert_eq!(display.frame_count(), 2);
    assert_eq!(seen.borrow().renders, 2);

    let frames = display.frames.borrow();
    assert_eq!(
        frames.last().unwrap(),
        &vec![("menu".to_string(), "slow".to_string())]
    );
}

#[test]
fn test_shutdown_clears_display() {
    let (mut engine, display, _) = engine();
    let (menu, _) = TestMenu::boxed("root");
    engine
        .register_new_tree(menu, DirectionalControls::arrows())
        .unwrap();
    engine.advance(&keys(&[])).unwrap();

    engine.shutdown();
    assert_eq!(engine.session_count(), 0);
    assert!(display.frames.borrow().last().unwrap().is_empty());
}
