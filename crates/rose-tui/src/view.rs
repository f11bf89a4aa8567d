//! Render target that forwards every field write into the action loop.

use tokio::sync::mpsc;

use rose_core::{DisplayState, StatusView};

use crate::action::Action;

/// [`StatusView`] backed by the app's action channel.
///
/// Writes arrive from the poller's tasks; the event loop applies them to
/// the dashboard state in order and redraws on the next render tick.
pub struct ChannelView {
    tx: mpsc::UnboundedSender<Action>,
}

impl ChannelView {
    pub fn new(tx: mpsc::UnboundedSender<Action>) -> Self {
        Self { tx }
    }

    fn send(&self, action: Action) {
        // The receiver only goes away while the app shuts down.
        let _ = self.tx.send(action);
    }
}

impl StatusView for ChannelView {
    fn set_decay(&self, text: &str) {
        self.send(Action::DecayText(text.to_owned()));
    }

    fn set_battery(&self, text: &str) {
        self.send(Action::BatteryText(text.to_owned()));
    }

    fn set_display(&self, state: DisplayState) {
        self.send(Action::DisplayValue(state));
    }

    fn repaint_display(&self) {
        self.send(Action::DisplayRepaint);
    }

    fn render_complete(&self) {
        self.send(Action::RenderComplete);
    }
}
