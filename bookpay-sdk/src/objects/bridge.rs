//! Messages posted by the script injected into the hosted checkout page.
//!
//! Every path in the script (link-click override, `window.open` override,
//! DOM mutation observer, polling fallback, console forwarding) funnels into
//! one tagged JSON object:
//!
//! ```json
//! {"type":"url_scheme","url":"mobile://success?tx=1"}
//! {"type":"payment_success"}
//! {"type":"payment_cancel","reason":"Giao dịch thất bại"}
//! {"type":"console_log","message":"widget ready"}
//! ```

use serde::de::Error as _;
use serde::{Deserialize, Serialize};

/// A structured message emitted by the injected page script.
///
/// Unknown `type` tags, missing tags and missing required fields all fail
/// to deserialize; the host treats such payloads as malformed and drops them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScriptMessage {
    /// Page console output forwarded for diagnostics. Never classified.
    ConsoleLog {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    /// A custom-scheme URL captured from a link click or `window.open`.
    UrlScheme { url: String },
    /// The provider's success marker appeared in the page.
    PaymentSuccess {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
    /// The provider's cancel or error marker appeared in the page.
    ///
    /// `reason` is only set for error markers.
    PaymentCancel {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },
}

impl ScriptMessage {
    /// Parse a raw message string as delivered by the web-view bridge.
    ///
    /// Only JSON objects are accepted. serde would otherwise read a tagged
    /// enum from an array such as `["payment_success"]`.
    pub fn parse(raw: &str) -> Result<Self, serde_json::Error> {
        let value: serde_json::Value = serde_json::from_str(raw)?;
        if !value.is_object() {
            return Err(serde_json::Error::custom(
                "script message must be a JSON object with a `type` field",
            ));
        }
        serde_json::from_value(value)
    }

    /// The wire tag of this message.
    pub fn kind(&self) -> &'static str {
        match self {
            ScriptMessage::ConsoleLog { .. } => "console_log",
            ScriptMessage::UrlScheme { .. } => "url_scheme",
            ScriptMessage::PaymentSuccess { .. } => "payment_success",
            ScriptMessage::PaymentCancel { .. } => "payment_cancel",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tagged_payloads() {
        let msg = ScriptMessage::parse(r#"{"type":"url_scheme","url":"mobile://success?tx=1"}"#)
            .unwrap();
        assert_eq!(
            msg,
            ScriptMessage::UrlScheme {
                url: "mobile://success?tx=1".to_string()
            }
        );

        let msg = ScriptMessage::parse(r#"{"type":"payment_success"}"#).unwrap();
        assert_eq!(msg, ScriptMessage::PaymentSuccess { message: None });

        let msg =
            ScriptMessage::parse(r#"{"type":"payment_cancel","reason":"declined","extra":1}"#)
                .unwrap();
        assert_eq!(
            msg,
            ScriptMessage::PaymentCancel {
                message: None,
                reason: Some("declined".to_string())
            }
        );
    }

    #[test]
    fn test_malformed_payloads_are_rejected() {
        assert!(ScriptMessage::parse("not json").is_err());
        assert!(ScriptMessage::parse(r#"{"url":"mobile://success"}"#).is_err());
        assert!(ScriptMessage::parse(r#"{"type":"payment_refund"}"#).is_err());
        assert!(ScriptMessage::parse(r#"{"type":"url_scheme"}"#).is_err());
        assert!(ScriptMessage::parse(r#"["payment_success"]"#).is_err());
        assert!(ScriptMessage::parse(r#"["url_scheme","mobile://success"]"#).is_err());
        assert!(ScriptMessage::parse(r#""payment_success""#).is_err());
        assert!(ScriptMessage::parse("null").is_err());
    }

    #[test]
    fn test_kind_matches_wire_tag() {
        let msg = ScriptMessage::ConsoleLog {
            message: Some("hi".to_string()),
        };
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], msg.kind());
    }
}
