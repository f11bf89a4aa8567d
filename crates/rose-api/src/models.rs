// Wire types served by the device.

use serde::{Deserialize, Serialize};

/// Body of `GET /rose/data`.
///
/// Older firmware omits `display`; the other three fields are always sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusResponse {
    pub decay: i64,
    pub max_decay: i64,
    pub battery: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<bool>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn display_is_optional() {
        let resp: StatusResponse =
            serde_json::from_str(r#"{"decay":3,"max_decay":14,"battery":55}"#).unwrap();
        assert_eq!(resp.display, None);
        assert_eq!(resp.max_decay, 14);
    }

    #[test]
    fn missing_battery_is_rejected() {
        let result = serde_json::from_str::<StatusResponse>(r#"{"decay":3,"max_decay":14}"#);
        assert!(result.is_err());
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let resp: StatusResponse = serde_json::from_str(
            r#"{"decay":0,"max_decay":14,"battery":100,"display":true,"uptime":42}"#,
        )
        .unwrap();
        assert_eq!(resp.display, Some(true));
    }
}
