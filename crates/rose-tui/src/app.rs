//! Application core: event loop, poller wiring, action dispatch.

use std::sync::Arc;
use std::time::Duration;

use chrono::Local;
use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use rose_api::RoseClient;
use rose_core::{ControlKind, ControlSet, Poller, PollerConfig, RefreshSchedule};

use crate::action::Action;
use crate::dashboard::{self, DashboardState};
use crate::event::{Event, EventReader};
use crate::theme;
use crate::tui::Tui;
use crate::view::ChannelView;

/// Top-level application state and event loop.
pub struct App {
    poller: Poller<RoseClient, ChannelView>,
    controls: ControlSet,
    server: String,
    dashboard: DashboardState,
    running: bool,
    help_visible: bool,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
}

impl App {
    pub fn new(config: &PollerConfig) -> Result<Self> {
        let (action_tx, action_rx) = mpsc::unbounded_channel();

        let view = Arc::new(ChannelView::new(action_tx.clone()));
        let poller = Poller::new(config.build_client()?, view, config.poll_interval);

        Ok(Self {
            poller,
            controls: ControlSet::from_paths(&config.actions),
            server: config.server.to_string(),
            dashboard: DashboardState::default(),
            running: true,
            help_visible: false,
            action_tx,
            action_rx,
        })
    }

    /// Run the main event loop.
    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;

        let startup = self.start_polling();
        let mut events = EventReader::new(Duration::from_millis(100));

        info!(server = %self.server, controls = self.controls.len(), "dashboard started");

        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            match event {
                Event::Key(key) => {
                    if let Some(action) = self.handle_key_event(key) {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Resize(w, h) => self.action_tx.send(Action::Resize(w, h))?,
                Event::FocusGained => {
                    if let Some(action) = self.on_focus_gained(Local::now()) {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Render => self.action_tx.send(Action::Render)?,
            }

            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action);

                if action == Action::Render {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        events.stop();
        stop_polling(startup).await;
        info!("dashboard stopped");
        Ok(())
    }

    /// Kick off the repeating refresh. Resolves to the schedule once the
    /// first read completes.
    fn start_polling(&self) -> JoinHandle<Option<RefreshSchedule>> {
        let poller = self.poller.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            let refresh = poller.refresh(true).await;
            if let Err(e) = refresh.outcome {
                let _ = tx.send(Action::RefreshFailed(e.to_string()));
            }
            refresh.schedule
        })
    }

    /// Map a key event to an action.
    pub fn handle_key_event(&self, key: KeyEvent) -> Option<Action> {
        if self.help_visible {
            return match key.code {
                KeyCode::Esc | KeyCode::Char('?' | 'q') => Some(Action::ToggleHelp),
                _ => None,
            };
        }

        match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c'))
            | (KeyModifiers::NONE, KeyCode::Char('q')) => Some(Action::Quit),
            (KeyModifiers::NONE, KeyCode::Char('?')) => Some(Action::ToggleHelp),
            (KeyModifiers::NONE, KeyCode::Char('d')) => self.fire(ControlKind::Decay),
            (KeyModifiers::NONE, KeyCode::Char('r')) => self.fire(ControlKind::Revert),
            (KeyModifiers::NONE, KeyCode::Char('t')) => self.fire(ControlKind::DisplayToggle),
            (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char('R')) => {
                Some(Action::RefreshNow)
            }
            _ => None,
        }
    }

    /// Coming back to a dashboard whose reading has outlived the poll
    /// interval re-reads at once instead of waiting out the schedule.
    fn on_focus_gained(&self, now: chrono::DateTime<Local>) -> Option<Action> {
        self.dashboard
            .is_stale(now, self.poller.interval())
            .then_some(Action::RefreshNow)
    }

    /// Controls without a configured path are not registered, so their
    /// keys do nothing.
    fn fire(&self, kind: ControlKind) -> Option<Action> {
        self.controls.get(kind).map(|_| Action::Fire(kind))
    }

    /// Process a single action: update state and start requests.
    fn process_action(&mut self, action: &Action) {
        match action {
            Action::Quit => self.running = false,
            Action::ToggleHelp => self.help_visible = !self.help_visible,
            Action::RefreshNow => self.spawn_refresh(),
            Action::Fire(kind) => {
                // One control request at a time.
                if self.dashboard.pending.is_some() {
                    debug!(control = %kind, "request already in flight, ignoring");
                    return;
                }
                self.dashboard.apply(action, Local::now());
                self.spawn_control(*kind);
            }
            Action::Render | Action::Resize(..) => {}
            other => {
                self.dashboard.apply(other, Local::now());
            }
        }
    }

    fn spawn_refresh(&self) {
        let poller = self.poller.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            if let Err(e) = poller.refresh(false).await.outcome {
                let _ = tx.send(Action::RefreshFailed(e.to_string()));
            }
        });
    }

    fn spawn_control(&self, kind: ControlKind) {
        let Some(control) = self.controls.get(kind).cloned() else {
            return;
        };
        let poller = self.poller.clone();
        let tx = self.action_tx.clone();
        tokio::spawn(async move {
            let outcome = poller.activate(&control).await;
            let error = outcome.action.err().map(|e| e.to_string());
            let _ = tx.send(Action::ActionFinished { kind, error });
            if let Err(e) = outcome.refresh {
                let _ = tx.send(Action::RefreshFailed(e.to_string()));
            }
        });
    }

    // ── Rendering ────────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        let layout = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(area);

        dashboard::render(frame, layout[0], &self.dashboard, &self.server);
        self.render_status_bar(frame, layout[1]);

        if self.help_visible {
            self.render_help_overlay(frame, area);
        }
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![Span::raw(" ")];
        for control in self.controls.iter() {
            spans.push(Span::styled(key_for(control.kind), theme::key_hint_key()));
            spans.push(Span::styled(format!(" {}  ", control.kind.label()), theme::key_hint()));
        }
        spans.extend([
            Span::styled("R", theme::key_hint_key()),
            Span::styled(" refresh  ", theme::key_hint()),
            Span::styled("?", theme::key_hint_key()),
            Span::styled(" help  ", theme::key_hint()),
            Span::styled("q", theme::key_hint_key()),
            Span::styled(" quit", theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_help_overlay(&self, frame: &mut Frame, area: Rect) {
        let width = 44u16.min(area.width.saturating_sub(4));
        let height = 12u16.min(area.height.saturating_sub(2));
        let help_area = Rect::new(
            area.x + area.width.saturating_sub(width) / 2,
            area.y + area.height.saturating_sub(height) / 2,
            width,
            height,
        );

        frame.render_widget(Clear, help_area);
        let block = Block::default()
            .title(" Keyboard Shortcuts ")
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_focused())
            .style(Style::default().bg(theme::BG_DARK));

        let mut lines = vec![Line::from("")];
        for control in self.controls.iter() {
            lines.push(help_line(key_for(control.kind), control.kind.label()));
        }
        lines.extend([
            help_line("R", "Refresh now"),
            help_line("?", "This help"),
            help_line("q", "Quit"),
            Line::from(""),
            Line::from(Span::styled(
                format!(
                    "  Polling every {}",
                    humantime::format_duration(self.poller.interval())
                ),
                theme::key_hint(),
            )),
        ]);

        frame.render_widget(Paragraph::new(lines).block(block), help_area);
    }
}

fn key_for(kind: ControlKind) -> &'static str {
    match kind {
        ControlKind::Decay => "d",
        ControlKind::Revert => "r",
        ControlKind::DisplayToggle => "t",
    }
}

fn help_line(key: &'static str, label: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {key:<6}"), theme::key_hint_key()),
        Span::styled(label, theme::key_hint()),
    ])
}

/// Cancel the repeating refresh on the way out.
async fn stop_polling(startup: JoinHandle<Option<RefreshSchedule>>) {
    if !startup.is_finished() {
        // First read still in flight: no schedule exists yet.
        startup.abort();
        return;
    }
    match startup.await {
        Ok(Some(schedule)) => schedule.cancel(),
        Ok(None) => {}
        Err(e) => warn!(error = %e, "startup refresh task failed"),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use url::Url;

    use rose_core::ActionPaths;

    use super::*;

    fn app(actions: ActionPaths) -> App {
        let mut config = PollerConfig::new(Url::parse("http://127.0.0.1:9").unwrap());
        config.actions = actions;
        App::new(&config).unwrap()
    }

    fn all_actions() -> ActionPaths {
        ActionPaths {
            decay: Some("/rose/decay".parse().unwrap()),
            revert: Some("/rose/revert".parse().unwrap()),
            display: Some("/rose/display".parse().unwrap()),
        }
    }

    fn key(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    #[tokio::test]
    async fn keys_map_to_controls() {
        let app = app(all_actions());
        assert_eq!(app.handle_key_event(key('d')), Some(Action::Fire(ControlKind::Decay)));
        assert_eq!(app.handle_key_event(key('r')), Some(Action::Fire(ControlKind::Revert)));
        assert_eq!(
            app.handle_key_event(key('t')),
            Some(Action::Fire(ControlKind::DisplayToggle))
        );
        assert_eq!(
            app.handle_key_event(KeyEvent::new(KeyCode::Char('R'), KeyModifiers::SHIFT)),
            Some(Action::RefreshNow)
        );
        assert_eq!(app.handle_key_event(key('x')), None);
    }

    #[tokio::test]
    async fn quit_keys() {
        let app = app(all_actions());
        assert_eq!(app.handle_key_event(key('q')), Some(Action::Quit));
        assert_eq!(
            app.handle_key_event(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Action::Quit)
        );
    }

    #[tokio::test]
    async fn unregistered_control_key_does_nothing() {
        let app = app(ActionPaths {
            display: None,
            ..all_actions()
        });
        assert_eq!(app.handle_key_event(key('t')), None);
        assert_eq!(app.handle_key_event(key('d')), Some(Action::Fire(ControlKind::Decay)));
    }

    #[tokio::test]
    async fn help_overlay_swallows_keys() {
        let mut app = app(all_actions());
        app.process_action(&Action::ToggleHelp);
        assert_eq!(app.handle_key_event(key('d')), None);
        assert_eq!(app.handle_key_event(key('?')), Some(Action::ToggleHelp));
    }

    #[tokio::test]
    async fn quit_stops_the_loop() {
        let mut app = app(all_actions());
        app.process_action(&Action::Quit);
        assert!(!app.running);
    }

    #[tokio::test]
    async fn focus_refreshes_only_a_stale_dashboard() {
        let mut app = app(all_actions());
        let now = Local::now();
        assert_eq!(app.on_focus_gained(now), Some(Action::RefreshNow));

        app.process_action(&Action::RenderComplete);
        assert_eq!(app.on_focus_gained(Local::now()), None);
    }

    #[tokio::test]
    async fn field_writes_reach_the_dashboard() {
        let mut app = app(all_actions());
        app.process_action(&Action::BatteryText("55%".into()));
        assert_eq!(app.dashboard.battery, "55%");
    }
}
