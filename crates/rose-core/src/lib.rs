// rose-core: Polling and render layer between rose-api and the front ends (CLI/TUI).

pub mod config;
pub mod controls;
pub mod error;
pub mod model;
pub mod poller;
pub mod view;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{ActionPaths, DEFAULT_POLL_INTERVAL, PollerConfig, TlsVerification};
pub use controls::{ActionControl, ControlKind, ControlSet};
pub use error::CoreError;
pub use model::{ActionUrl, DisplayState, StatusSnapshot};
pub use poller::{ActionOutcome, Poller, Refresh, RefreshSchedule, StatusSource};
pub use view::{RenderedStatus, StatusFields, StatusView, render};
