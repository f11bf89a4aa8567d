// ── Core error types ──
//
// Poller-level errors. Consumers never see raw reqwest errors or serde
// messages directly; the `From<rose_api::Error>` impl translates
// transport-layer failures into these variants.

use thiserror::Error;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Connection errors ────────────────────────────────────────────
    #[error("Cannot connect to device at {url}: {reason}")]
    ConnectionFailed { url: String, reason: String },

    #[error("Request to {url} timed out")]
    Timeout { url: String },

    // ── Response errors ──────────────────────────────────────────────
    #[error("Resource not found: {url}")]
    NotFound { url: String },

    #[error("API error: {message}")]
    Api {
        message: String,
        /// HTTP status code (if applicable).
        status: Option<u16>,
    },

    #[error("Malformed status response: {message}")]
    MalformedStatus { message: String },

    // ── Input errors ─────────────────────────────────────────────────
    #[error("Invalid action URL '{value}': {reason}")]
    InvalidActionUrl { value: String, reason: String },

    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// Returns `true` if the device could not be reached at all.
    pub fn is_unreachable(&self) -> bool {
        matches!(self, Self::ConnectionFailed { .. } | Self::Timeout { .. })
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<rose_api::Error> for CoreError {
    fn from(err: rose_api::Error) -> Self {
        match err {
            rose_api::Error::Transport(ref e) => {
                let url = e
                    .url()
                    .map_or_else(|| "<unknown>".into(), ToString::to_string);
                if e.is_timeout() {
                    CoreError::Timeout { url }
                } else if e.is_connect() {
                    CoreError::ConnectionFailed {
                        url,
                        reason: e.to_string(),
                    }
                } else {
                    CoreError::Api {
                        message: e.to_string(),
                        status: e.status().map(|s| s.as_u16()),
                    }
                }
            }
            rose_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            rose_api::Error::Tls(msg) => CoreError::ConnectionFailed {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            rose_api::Error::Http { status: 404, url } => CoreError::NotFound { url },
            rose_api::Error::Http { status, url } => CoreError::Api {
                message: format!("HTTP {status} from {url}"),
                status: Some(status),
            },
            rose_api::Error::Deserialization { message, body: _ } => {
                CoreError::MalformedStatus { message }
            }
        }
    }
}
