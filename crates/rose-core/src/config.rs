// ── Runtime poller configuration ──
//
// These types describe *how* to reach the device and how often to poll.
// They never touch disk: the CLI/TUI build a `PollerConfig` (usually via
// `rose-config`) and hand it in.

use std::time::Duration;

use url::Url;

use rose_api::client::DEFAULT_STATUS_PATH;
use rose_api::{RoseClient, TlsMode, TransportConfig};

use crate::error::CoreError;
use crate::model::ActionUrl;

/// Delay between the end of one repeating refresh and the start of the next.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(600_000);

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification (self-signed certs).
    DangerAcceptInvalid,
}

/// Command resources exposed by the device. A `None` entry means the
/// corresponding control is not offered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionPaths {
    pub decay: Option<ActionUrl>,
    pub revert: Option<ActionUrl>,
    pub display: Option<ActionUrl>,
}

/// Configuration for polling a single device.
#[derive(Debug, Clone)]
pub struct PollerConfig {
    /// Device base URL (e.g., `http://192.168.1.50:8080`).
    pub server: Url,
    /// Status resource path.
    pub status_path: String,
    /// Delay between repeating refreshes.
    pub poll_interval: Duration,
    /// TLS verification strategy.
    pub tls: TlsVerification,
    /// Request timeout.
    pub timeout: Duration,
    /// Action resources for the controls.
    pub actions: ActionPaths,
}

impl PollerConfig {
    /// Config for `server` with the device's stock paths and timings.
    pub fn new(server: Url) -> Self {
        Self {
            server,
            status_path: DEFAULT_STATUS_PATH.into(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            tls: TlsVerification::default(),
            timeout: Duration::from_secs(30),
            actions: ActionPaths::default(),
        }
    }

    /// Build the HTTP client described by this config.
    pub fn build_client(&self) -> Result<RoseClient, CoreError> {
        let transport = TransportConfig {
            tls: tls_to_transport(&self.tls),
            timeout: self.timeout,
        };
        let client = RoseClient::new(self.server.clone(), &transport)?;
        Ok(client.with_status_path(self.status_path.clone()))
    }
}

fn tls_to_transport(tls: &TlsVerification) -> TlsMode {
    match tls {
        TlsVerification::SystemDefaults => TlsMode::System,
        TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
        TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
    }
}
