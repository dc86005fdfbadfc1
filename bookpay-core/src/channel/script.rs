//! Script injected into the hosted checkout page.

use crate::config::ChannelPolicy;

const BRIDGE_SCRIPT: &str = include_str!("../../assets/bridge.js");

/// Render the page script for `policy`.
///
/// Strings are substituted as JSON literals, which are valid JavaScript
/// expressions, so marker text never needs escaping by hand.
pub fn injected_script(policy: &ChannelPolicy) -> String {
    let poll_ms = policy.poll_interval.as_millis().max(1);
    BRIDGE_SCRIPT
        .replace("__BOOKPAY_SCHEME__", &js_literal(&policy.scheme))
        .replace("__BOOKPAY_POLL_MS__", &poll_ms.to_string())
        .replace(
            "__BOOKPAY_SUCCESS_MARKERS__",
            &js_literal(&policy.success_markers),
        )
        .replace(
            "__BOOKPAY_ERROR_MARKERS__",
            &js_literal(&policy.error_markers),
        )
}

fn js_literal<T: serde::Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "null".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_placeholders_are_filled() {
        let policy = ChannelPolicy {
            poll_interval: Duration::from_millis(1500),
            success_markers: vec!["Paid \"ok\"".to_string()],
            ..ChannelPolicy::default()
        };
        let script = injected_script(&policy);

        assert!(!script.contains("__BOOKPAY_"));
        assert!(script.contains(r#"var SCHEME = "mobile";"#));
        assert!(script.contains("var POLL_MS = 1500;"));
        assert!(script.contains(r#"["Paid \"ok\""]"#));
        assert!(script.contains("window.open = function"));
        assert!(script.contains("MutationObserver"));
    }

    #[test]
    fn test_default_poll_is_one_second() {
        let script = injected_script(&ChannelPolicy::default());
        assert!(script.contains("var POLL_MS = 1000;"));
    }
}
