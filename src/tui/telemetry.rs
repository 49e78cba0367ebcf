//! # Telemetry Buffer
//!
//! The terminal's stand-in for a robot's telemetry channel. The engine
//! stages `key: value` lines and commits them with `flush`; the terminal
//! only ever draws the last committed frame.

use std::time::Duration;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Padding, Paragraph};
use unicode_width::UnicodeWidthChar;

use crate::core::host::DisplayChannel;
use crate::core::menu::DEFAULT_REFRESH_INTERVAL;
use crate::tui::component::Component;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelemetryLine {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Default)]
pub struct TelemetryBuffer {
    staged: Vec<TelemetryLine>,
    visible: Vec<TelemetryLine>,
    dirty: bool,
    transmission_interval: Option<Duration>,
}

impl TelemetryBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// The last flushed frame.
    pub fn lines(&self) -> &[TelemetryLine] {
        &self.visible
    }

    /// True once after each flush. The event loop redraws only then.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// How often the host loop should tick. Falls back to the default
    /// refresh cadence before the engine has asked for anything.
    pub fn transmission_interval(&self) -> Duration {
        self.transmission_interval.unwrap_or(DEFAULT_REFRESH_INTERVAL)
    }
}

impl DisplayChannel for TelemetryBuffer {
    fn clear(&mut self) {
        self.staged.clear();
    }

    fn write_line(&mut self, key: &str, value: &str) {
        self.staged.push(TelemetryLine {
            key: key.to_string(),
            value: value.to_string(),
        });
    }

    fn flush(&mut self) {
        self.visible = std::mem::take(&mut self.staged);
        self.dirty = true;
    }

    fn set_transmission_interval(&mut self, interval: Duration) {
        log::debug!("Telemetry transmission interval set to {:?}", interval);
        self.transmission_interval = Some(interval);
    }
}

/// Draws a telemetry frame as `key: value` rows inside a bordered block.
pub struct TelemetryPane<'a> {
    pub lines: &'a [TelemetryLine],
    pub halted: bool,
}

impl Component for TelemetryPane<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let border_color = if self.halted { Color::Red } else { Color::DarkGray };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color))
            .title(" Telemetry ")
            .padding(Padding::horizontal(1));

        let inner_width = area.width.saturating_sub(4) as usize; // borders + padding
        let rows: Vec<Line> = self
            .lines
            .iter()
            .map(|line| format_line(line, inner_width, self.halted))
            .collect();

        frame.render_widget(Paragraph::new(rows).block(block), area);
    }
}

fn format_line(line: &TelemetryLine, width: usize, halted: bool) -> Line<'static> {
    let key_style = if halted {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Cyan)
    };
    if line.value.is_empty() {
        return Line::from(Span::styled(fit_width(&line.key, width), key_style));
    }
    if line.key.is_empty() {
        return Line::from(Span::raw(fit_width(&line.value, width)));
    }
    let key = fit_width(&line.key, width);
    let remaining = width.saturating_sub(display_width(&key) + 2);
    Line::from(vec![
        Span::styled(key, key_style),
        Span::raw(": "),
        Span::raw(fit_width(&line.value, remaining)),
    ])
}

fn display_width(s: &str) -> usize {
    s.chars().map(|c| c.width().unwrap_or(0)).sum()
}

/// Truncate `s` to at most `max_width` terminal columns, ending with "…"
/// when something was cut.
pub fn fit_width(s: &str, max_width: usize) -> String {
    if display_width(s) <= max_width {
        return s.to_string();
    }
    if max_width == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > max_width - 1 {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}
