// ── Domain model ──
//
// The status snapshot read from the device, the display toggle state,
// and the validated action path type used by controls.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use rose_api::StatusResponse;

use crate::error::CoreError;

// ── StatusSnapshot ───────────────────────────────────────────────

/// One reading of the device, consumed once by the render step.
///
/// Never cached: each poll produces a fresh snapshot that fully replaces
/// whatever was rendered before.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    pub decay: i64,
    pub max_decay: i64,
    pub battery: i64,
    /// Absent on firmware that predates the display toggle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<bool>,
}

impl StatusSnapshot {
    /// Decay field text: `"<decay>/<max_decay>"`.
    pub fn decay_text(&self) -> String {
        format!("{}/{}", self.decay, self.max_decay)
    }

    /// Battery field text: `"<battery>%"`.
    pub fn battery_text(&self) -> String {
        format!("{}%", self.battery)
    }

    pub fn display_state(&self) -> Option<DisplayState> {
        self.display.map(DisplayState::from)
    }
}

impl From<StatusResponse> for StatusSnapshot {
    fn from(resp: StatusResponse) -> Self {
        Self {
            decay: resp.decay,
            max_decay: resp.max_decay,
            battery: resp.battery,
            display: resp.display,
        }
    }
}

// ── DisplayState ─────────────────────────────────────────────────

/// Value of the display toggle control.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DisplayState {
    On,
    Off,
}

impl DisplayState {
    pub fn is_on(self) -> bool {
        self == Self::On
    }
}

impl From<bool> for DisplayState {
    fn from(enabled: bool) -> Self {
        if enabled { Self::On } else { Self::Off }
    }
}

// ── ActionUrl ────────────────────────────────────────────────────

/// A server-relative resource path for a state-changing command.
///
/// Always starts with a single `/` and carries no scheme or host, so it
/// can only ever address the configured device.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ActionUrl(String);

impl ActionUrl {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for ActionUrl {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| CoreError::InvalidActionUrl {
            value: s.to_owned(),
            reason: reason.to_owned(),
        };

        let path = s.trim();
        if path.is_empty() {
            return Err(invalid("path is empty"));
        }
        if !path.starts_with('/') {
            return Err(invalid("must be a server-relative path starting with '/'"));
        }
        if path.starts_with("//") {
            return Err(invalid("protocol-relative URLs are not allowed"));
        }
        if path.chars().any(char::is_whitespace) {
            return Err(invalid("path contains whitespace"));
        }
        Ok(Self(path.to_owned()))
    }
}

impl TryFrom<String> for ActionUrl {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ActionUrl> for String {
    fn from(url: ActionUrl) -> Self {
        url.0
    }
}

impl fmt::Display for ActionUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn snapshot(decay: i64, max_decay: i64, battery: i64) -> StatusSnapshot {
        StatusSnapshot {
            decay,
            max_decay,
            battery,
            display: None,
        }
    }

    #[test]
    fn field_texts() {
        let s = snapshot(12, 20, 87);
        assert_eq!(s.decay_text(), "12/20");
        assert_eq!(s.battery_text(), "87%");
        assert_eq!(s.display_state(), None);
    }

    #[test]
    fn negative_battery_renders_verbatim() {
        assert_eq!(snapshot(0, 14, -1).battery_text(), "-1%");
    }

    #[test]
    fn display_state_strings() {
        assert_eq!(DisplayState::from(true).to_string(), "on");
        assert_eq!(DisplayState::from(false).as_ref(), "off");
        assert_eq!("on".parse::<DisplayState>().unwrap(), DisplayState::On);
    }

    #[test]
    fn action_url_accepts_server_paths() {
        let url: ActionUrl = " /rose/decay ".parse().unwrap();
        assert_eq!(url.as_str(), "/rose/decay");
        assert_eq!(url.to_string(), "/rose/decay");
    }

    #[test]
    fn action_url_rejects_foreign_targets() {
        for bad in ["", "rose/decay", "//evil.example/x", "http://evil/x", "/rose/de cay"] {
            let err = bad.parse::<ActionUrl>().unwrap_err();
            assert!(
                matches!(err, CoreError::InvalidActionUrl { .. }),
                "{bad:?} -> {err:?}"
            );
        }
    }

    #[test]
    fn action_url_deserializes_with_validation() {
        let ok: ActionUrl = serde_json::from_str(r#""/rose/revert""#).unwrap();
        assert_eq!(ok.as_str(), "/rose/revert");
        assert!(serde_json::from_str::<ActionUrl>(r#""revert""#).is_err());
    }
}
