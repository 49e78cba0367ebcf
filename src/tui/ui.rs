use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::core::engine::NavigationEngine;
use crate::tui::component::Component;
use crate::tui::telemetry::{TelemetryBuffer, TelemetryPane};

/// One-line header: which tree is active, where we are in it, and whether
/// the engine halted.
pub struct TitleBar {
    pub tree: Option<(usize, usize)>,
    pub menu_title: Option<String>,
    pub depth: usize,
    pub redo: usize,
    pub halted: bool,
}

impl TitleBar {
    pub fn from_engine(engine: &NavigationEngine<TelemetryBuffer>) -> Self {
        let session = engine.active_session();
        Self {
            tree: engine
                .active_index()
                .map(|i| (i + 1, engine.session_count())),
            menu_title: session.map(|s| s.current().title().to_string()),
            depth: session.map_or(0, |s| s.history_depth()),
            redo: session.map_or(0, |s| s.redo_depth()),
            halted: engine.is_halted(),
        }
    }

    pub fn text(&self) -> String {
        let tree = match self.tree {
            Some((k, n)) => format!("tree {k}/{n}"),
            None => "no trees".to_string(),
        };
        let menu = self.menu_title.as_deref().unwrap_or("-");
        format!("{tree} │ {menu} │ back {} │ fwd {}", self.depth, self.redo)
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![Span::styled(
            format!(" telemenu │ {}", self.text()),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )];
        if self.halted {
            spans.push(Span::styled(
                "  HALTED",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ));
        }
        frame.render_widget(
            Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray)),
            area,
        );
    }
}

const HELP_TEXT: &str =
    " tab cycle  n new tree  ⌫ back  ] forward  enter select  r swap keys  q quit ";

pub fn draw_ui(frame: &mut Frame, engine: &NavigationEngine<TelemetryBuffer>) {
    use Constraint::{Length, Min};
    let layout = Layout::vertical([Length(1), Min(0), Length(1)]);
    let [title_area, main_area, help_area] = layout.areas(frame.area());

    TitleBar::from_engine(engine).render(frame, title_area);

    let mut telemetry = TelemetryPane {
        lines: engine.display().lines(),
        halted: engine.is_halted(),
    };
    telemetry.render(frame, main_area);

    frame.render_widget(
        Paragraph::new(HELP_TEXT).style(Style::default().fg(Color::DarkGray)),
        help_area,
    );
}
