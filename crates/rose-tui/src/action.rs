//! All possible UI actions. Actions are the sole mechanism for state mutation.

use rose_core::{ControlKind, DisplayState};

/// Every state transition in the dashboard is expressed as an Action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // ── Lifecycle ──────────────────────────────────────────────────
    Quit,
    Render,
    Resize(u16, u16),
    ToggleHelp,

    // ── User commands ─────────────────────────────────────────────
    /// Fire a registered control.
    Fire(ControlKind),
    /// One-shot manual refresh.
    RefreshNow,

    // ── Field writes (from the poller's render step) ──────────────
    DecayText(String),
    BatteryText(String),
    DisplayValue(DisplayState),
    DisplayRepaint,
    RenderComplete,

    // ── Request results ───────────────────────────────────────────
    RefreshFailed(String),
    ActionFinished {
        kind: ControlKind,
        error: Option<String>,
    },
}
