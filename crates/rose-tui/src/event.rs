//! Terminal input for the dashboard.
//!
//! A background task turns crossterm's event stream into the few events the
//! dashboard reacts to, interleaved with a fixed render tick.

use std::time::Duration;

use crossterm::event::{Event as CrosstermEvent, EventStream, KeyEvent, KeyEventKind};
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

#[derive(Debug, PartialEq, Eq)]
pub enum Event {
    Key(KeyEvent),
    /// Terminal was resized to (cols, rows).
    Resize(u16, u16),
    /// The terminal window regained focus; the reading on screen may be old.
    FocusGained,
    Render,
}

/// Keep key presses, resizes and focus gains. Key releases and repeats,
/// mouse input and focus loss are dropped.
fn translate(event: CrosstermEvent) -> Option<Event> {
    match event {
        CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Some(Event::Key(key)),
        CrosstermEvent::Resize(w, h) => Some(Event::Resize(w, h)),
        CrosstermEvent::FocusGained => Some(Event::FocusGained),
        _ => None,
    }
}

/// Owns the input task; stops it on [`stop`](Self::stop) or drop.
pub struct EventReader {
    rx: mpsc::UnboundedReceiver<Event>,
    cancel: CancellationToken,
}

impl EventReader {
    /// Start reading input, emitting [`Event::Render`] every `render_rate`.
    pub fn new(render_rate: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();
        tokio::spawn(read_input(tx, cancel.clone(), render_rate));
        Self { rx, cancel }
    }

    /// Next event, or `None` once the input task has ended.
    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }

    pub fn stop(&self) {
        self.cancel.cancel();
    }
}

impl Drop for EventReader {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn read_input(
    tx: mpsc::UnboundedSender<Event>,
    cancel: CancellationToken,
    render_rate: Duration,
) {
    let mut input = EventStream::new();
    let mut render = tokio::time::interval(render_rate);
    render.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        let event = tokio::select! {
            () = cancel.cancelled() => break,
            _ = render.tick() => Event::Render,
            Some(Ok(raw)) = input.next() => match translate(raw) {
                Some(event) => event,
                None => continue,
            },
        };

        if tx.send(event).is_err() {
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyCode, KeyEventState, KeyModifiers};
    use pretty_assertions::assert_eq;

    use super::*;

    fn key(kind: KeyEventKind) -> KeyEvent {
        KeyEvent {
            code: KeyCode::Char('d'),
            modifiers: KeyModifiers::NONE,
            kind,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn only_key_presses_pass() {
        assert_eq!(
            translate(CrosstermEvent::Key(key(KeyEventKind::Press))),
            Some(Event::Key(key(KeyEventKind::Press)))
        );
        assert_eq!(translate(CrosstermEvent::Key(key(KeyEventKind::Release))), None);
        assert_eq!(translate(CrosstermEvent::Key(key(KeyEventKind::Repeat))), None);
    }

    #[test]
    fn focus_gain_passes_focus_loss_does_not() {
        assert_eq!(translate(CrosstermEvent::FocusGained), Some(Event::FocusGained));
        assert_eq!(translate(CrosstermEvent::FocusLost), None);
    }

    #[test]
    fn resize_carries_dimensions() {
        assert_eq!(translate(CrosstermEvent::Resize(80, 24)), Some(Event::Resize(80, 24)));
    }
}
