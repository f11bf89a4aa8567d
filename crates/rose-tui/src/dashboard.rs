//! The single dashboard panel: state the render step writes into, plus the
//! widgets that draw it.

use chrono::{DateTime, Local};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Gauge, Paragraph},
};

use rose_core::{ControlKind, DisplayState};

use crate::action::Action;
use crate::theme;
use crate::widgets::display_indicator::display_span;
use crate::widgets::reading::{fraction_ratio, percent_ratio};

/// Everything the dashboard shows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardState {
    pub decay: String,
    pub battery: String,
    pub display: Option<DisplayState>,
    /// Times the toggle indicator was repainted.
    pub repaints: u64,
    /// Wall-clock time of the last completed render.
    pub last_updated: Option<DateTime<Local>>,
    /// Most recent failure, cleared by the next successful render.
    pub last_error: Option<String>,
    /// Control whose request is in flight.
    pub pending: Option<ControlKind>,
}

impl DashboardState {
    /// Apply a field write or request result. Other actions leave the
    /// state untouched.
    pub fn apply(&mut self, action: &Action, now: DateTime<Local>) {
        match action {
            Action::DecayText(text) => self.decay.clone_from(text),
            Action::BatteryText(text) => self.battery.clone_from(text),
            Action::DisplayValue(state) => self.display = Some(*state),
            Action::DisplayRepaint => self.repaints += 1,
            Action::RenderComplete => {
                self.last_updated = Some(now);
                self.last_error = None;
            }
            Action::RefreshFailed(message) => self.last_error = Some(message.clone()),
            Action::Fire(kind) => self.pending = Some(*kind),
            Action::ActionFinished { kind, error } => {
                if self.pending == Some(*kind) {
                    self.pending = None;
                }
                if let Some(message) = error {
                    self.last_error = Some(format!("{} failed: {message}", kind.label()));
                }
            }
            _ => {}
        }
    }

    /// Whether the last reading is older than `max_age`, or missing.
    pub fn is_stale(&self, now: DateTime<Local>, max_age: std::time::Duration) -> bool {
        self.last_updated
            .is_none_or(|at| (now - at).to_std().unwrap_or_default() > max_age)
    }

    /// "12s ago"-style age of the last render.
    pub fn age(&self, now: DateTime<Local>) -> Option<String> {
        let elapsed = (now - self.last_updated?).to_std().unwrap_or_default();
        let secs = std::time::Duration::from_secs(elapsed.as_secs());
        Some(format!("{} ago", humantime::format_duration(secs)))
    }
}

// ── Rendering ────────────────────────────────────────────────────────

/// Draw the dashboard panel into `area`.
pub fn render(frame: &mut Frame, area: Rect, state: &DashboardState, server: &str) {
    let block = Block::default()
        .title(format!(" rose · {server} "))
        .title_style(theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border_focused());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::vertical([
        Constraint::Length(3), // decay
        Constraint::Length(3), // battery
        Constraint::Length(1), // display
        Constraint::Length(1), // spacer
        Constraint::Length(1), // last updated
        Constraint::Min(0),    // status / error
    ])
    .split(inner);

    frame.render_widget(
        field_gauge("Decay", &state.decay, fraction_ratio(&state.decay), theme::decay_gauge),
        rows[0],
    );
    frame.render_widget(
        field_gauge("Battery", &state.battery, percent_ratio(&state.battery), theme::battery_gauge),
        rows[1],
    );

    let display = Line::from(vec![
        Span::styled(" Display  ", theme::key_hint()),
        display_span(state.display),
    ]);
    frame.render_widget(Paragraph::new(display), rows[2]);

    let now = Local::now();
    let updated = state.last_updated.map_or_else(
        || "waiting for first reading".to_owned(),
        |at| {
            format!(
                "{} ({})",
                at.format("%H:%M:%S"),
                state.age(now).unwrap_or_default()
            )
        },
    );
    let updated = Line::from(vec![
        Span::styled(" Updated  ", theme::key_hint()),
        Span::styled(updated, theme::value_style()),
    ]);
    frame.render_widget(Paragraph::new(updated), rows[4]);

    if let Some(line) = status_line(state) {
        frame.render_widget(Paragraph::new(line), rows[5]);
    }
}

fn field_gauge<'a>(
    title: &'a str,
    text: &'a str,
    ratio: Option<f64>,
    style: fn(f64) -> Style,
) -> Gauge<'a> {
    let ratio = ratio.unwrap_or(0.0);
    let label = if text.is_empty() { "-" } else { text };
    Gauge::default()
        .block(
            Block::default()
                .title(format!(" {title} "))
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(theme::border_default()),
        )
        .gauge_style(style(ratio))
        .ratio(ratio)
        .label(Span::styled(label, theme::value_style()))
}

fn status_line(state: &DashboardState) -> Option<Line<'static>> {
    if let Some(kind) = state.pending {
        return Some(Line::from(Span::styled(
            format!(" {}…", kind.label()),
            Style::default().fg(theme::ELECTRIC_YELLOW),
        )));
    }
    state.last_error.as_ref().map(|message| {
        Line::from(Span::styled(
            format!(" {message}"),
            Style::default().fg(theme::ERROR_RED),
        ))
    })
}
