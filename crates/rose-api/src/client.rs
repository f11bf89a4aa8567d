// Device HTTP client
//
// Wraps `reqwest::Client` with base-URL path joining, status checking,
// and body decoding. The device exposes one read resource and a handful
// of command resources, all plain GETs.

use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::models::StatusResponse;
use crate::transport::TransportConfig;

/// Default path of the status resource.
pub const DEFAULT_STATUS_PATH: &str = "/rose/data";

/// Maximum number of body characters kept in error previews.
const BODY_PREVIEW_CHARS: usize = 200;

/// Raw HTTP client for the rose device.
///
/// Every request is a GET without a body or auth headers. Paths are
/// appended to the base URL, so a base with a path prefix
/// (`http://proxy/rose-device`) is preserved.
#[derive(Debug, Clone)]
pub struct RoseClient {
    http: reqwest::Client,
    base_url: Url,
    status_path: String,
}

impl RoseClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// The `base_url` is the device root, e.g. `http://192.168.1.50:8080`.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, base_url))
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self {
            http,
            base_url,
            status_path: DEFAULT_STATUS_PATH.into(),
        }
    }

    /// Use a different status resource path.
    pub fn with_status_path(mut self, path: impl Into<String>) -> Self {
        self.status_path = path.into();
        self
    }

    /// The device base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The status resource path.
    pub fn status_path(&self) -> &str {
        &self.status_path
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build a full URL for a device resource path: `{base}{path}`.
    pub fn resource_url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Ok(Url::parse(&format!("{base}/{path}"))?)
    }

    // ── Endpoints ────────────────────────────────────────────────────

    /// Read the current device status.
    ///
    /// `GET /rose/data`
    pub async fn status(&self) -> Result<StatusResponse, Error> {
        let url = self.resource_url(&self.status_path)?;
        debug!("GET {}", url);

        let resp = self.http.get(url.clone()).send().await?;
        let resp = check_status(resp, &url)?;
        let body = resp.text().await?;
        trace!(body = %body, "status body");

        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: format!("{e} (body preview: {:?})", preview(&body)),
            body,
        })
    }

    /// Fire a command resource (decay, revert, display toggle, ...).
    ///
    /// `GET <path>` -- the response body is ignored; only completion and
    /// status matter.
    pub async fn send_action(&self, path: &str) -> Result<(), Error> {
        let url = self.resource_url(path)?;
        debug!("GET {} (action)", url);

        let resp = self.http.get(url.clone()).send().await?;
        check_status(resp, &url)?;
        Ok(())
    }
}

fn check_status(resp: reqwest::Response, url: &Url) -> Result<reqwest::Response, Error> {
    let status = resp.status();
    if status.is_success() {
        Ok(resp)
    } else {
        Err(Error::Http {
            status: status.as_u16(),
            url: url.to_string(),
        })
    }
}

fn preview(body: &str) -> String {
    body.chars().take(BODY_PREVIEW_CHARS).collect()
}
