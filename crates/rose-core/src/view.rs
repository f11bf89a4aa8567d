// ── Render targets ──
//
// The render step writes a snapshot into whatever owns the display
// fields: an in-memory field set for the CLI, a channel into the
// dashboard, or a recording view in tests.

use std::sync::RwLock;

use serde::Serialize;

use crate::model::{DisplayState, StatusSnapshot};

/// A set of display fields the render step writes into.
///
/// Writes are total replacements of a field's value. Implementations are
/// shared between the repeating refresh task and action handlers, hence
/// `&self` plus `Send + Sync`.
pub trait StatusView: Send + Sync {
    /// Replace the decay field text.
    fn set_decay(&self, text: &str);

    /// Replace the battery field text.
    fn set_battery(&self, text: &str);

    /// Set the display toggle control's value.
    fn set_display(&self, state: DisplayState);

    /// Re-synchronize the toggle control's visual state with its value.
    /// Setting the value alone does not guarantee the control repaints.
    fn repaint_display(&self);

    /// Called once after every field of a snapshot has been written.
    fn render_complete(&self) {}
}

/// Write `snapshot` into `view`.
///
/// Decay becomes `"<decay>/<max_decay>"`, battery becomes `"<battery>%"`.
/// When the snapshot carries a display flag, the toggle is set to
/// `"on"`/`"off"` and then repainted. Views learn that the snapshot is
/// fully written through [`StatusView::render_complete`].
pub fn render<V: StatusView + ?Sized>(snapshot: &StatusSnapshot, view: &V) {
    view.set_decay(&snapshot.decay_text());
    view.set_battery(&snapshot.battery_text());

    if let Some(state) = snapshot.display_state() {
        view.set_display(state);
        view.repaint_display();
    }
    view.render_complete();
}

// ── In-memory fields ─────────────────────────────────────────────

/// Current contents of a [`StatusFields`] view.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RenderedStatus {
    pub decay: String,
    pub battery: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<DisplayState>,
    /// Number of times the toggle control has been repainted.
    #[serde(skip)]
    pub repaints: u64,
}

impl RenderedStatus {
    /// `true` until the first successful render.
    pub fn is_blank(&self) -> bool {
        self.decay.is_empty() && self.battery.is_empty()
    }
}

/// Display fields held in memory.
#[derive(Debug, Default)]
pub struct StatusFields {
    fields: RwLock<RenderedStatus>,
}

impl StatusFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the fields as they stand now.
    pub fn current(&self) -> RenderedStatus {
        self.fields.read().expect("status fields lock poisoned").clone()
    }
}

impl StatusView for StatusFields {
    fn set_decay(&self, text: &str) {
        self.fields.write().expect("status fields lock poisoned").decay = text.to_owned();
    }

    fn set_battery(&self, text: &str) {
        self.fields.write().expect("status fields lock poisoned").battery = text.to_owned();
    }

    fn set_display(&self, state: DisplayState) {
        self.fields.write().expect("status fields lock poisoned").display = Some(state);
    }

    fn repaint_display(&self) {
        self.fields.write().expect("status fields lock poisoned").repaints += 1;
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    /// Records every call in order.
    #[derive(Default)]
    struct RecordingView {
        calls: Mutex<Vec<String>>,
    }

    impl RecordingView {
        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl StatusView for RecordingView {
        fn set_decay(&self, text: &str) {
            self.calls.lock().unwrap().push(format!("decay={text}"));
        }
        fn set_battery(&self, text: &str) {
            self.calls.lock().unwrap().push(format!("battery={text}"));
        }
        fn set_display(&self, state: DisplayState) {
            self.calls.lock().unwrap().push(format!("display={state}"));
        }
        fn repaint_display(&self) {
            self.calls.lock().unwrap().push("repaint".into());
        }
        fn render_complete(&self) {
            self.calls.lock().unwrap().push("complete".into());
        }
    }

    #[test]
    fn renders_decay_and_battery() {
        let view = StatusFields::new();
        render(
            &StatusSnapshot {
                decay: 12,
                max_decay: 20,
                battery: 87,
                display: None,
            },
            &view,
        );

        let fields = view.current();
        assert_eq!(fields.decay, "12/20");
        assert_eq!(fields.battery, "87%");
        assert_eq!(fields.display, None);
        assert_eq!(fields.repaints, 0);
    }

    #[test]
    fn display_is_set_then_repainted() {
        let view = RecordingView::default();
        render(
            &StatusSnapshot {
                decay: 0,
                max_decay: 20,
                battery: 100,
                display: Some(true),
            },
            &view,
        );

        assert_eq!(
            view.calls(),
            ["decay=0/20", "battery=100%", "display=on", "repaint", "complete"]
        );
    }

    #[test]
    fn later_render_replaces_earlier_values() {
        let view = StatusFields::new();
        let mut snap = StatusSnapshot {
            decay: 3,
            max_decay: 14,
            battery: 90,
            display: Some(true),
        };
        render(&snap, &view);
        snap.decay = 4;
        snap.battery = 89;
        snap.display = Some(false);
        render(&snap, &view);

        let fields = view.current();
        assert_eq!(fields.decay, "4/14");
        assert_eq!(fields.battery, "89%");
        assert_eq!(fields.display, Some(DisplayState::Off));
        assert_eq!(fields.repaints, 2);
    }

    #[test]
    fn blank_until_first_render() {
        assert!(StatusFields::new().current().is_blank());
    }
}
