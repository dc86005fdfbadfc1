//! Signal classification.

use crate::config::ChannelPolicy;
use crate::events::{ChannelSignal, Classification};
use bookpay_sdk::objects::ScriptMessage;
use thiserror::Error;
use tracing::debug;

/// A script message that could not be understood.
#[derive(Debug, Error)]
pub enum SignalError {
    #[error("malformed script message: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// How a URL using the custom scheme reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemeMatch {
    /// `scheme://success...`
    Success,
    /// `scheme://cancel...`
    Cancel,
    /// Any other URL on the custom scheme.
    Other,
}

impl SchemeMatch {
    pub fn classification(self) -> Option<Classification> {
        match self {
            SchemeMatch::Success => Some(Classification::Success),
            SchemeMatch::Cancel => Some(Classification::Cancelled),
            SchemeMatch::Other => None,
        }
    }
}

/// Match `url` against the custom `scheme`.
///
/// Returns `None` when the URL uses any other scheme. The scheme compares
/// case-insensitively, as does the `success`/`cancel` prefix after it.
pub fn match_scheme(url: &str, scheme: &str) -> Option<SchemeMatch> {
    let (url_scheme, rest) = url.trim().split_once(':')?;
    if scheme.is_empty() || !url_scheme.eq_ignore_ascii_case(scheme) {
        return None;
    }
    let rest = rest.trim_start_matches('/').to_ascii_lowercase();
    if rest.starts_with("cancel") {
        Some(SchemeMatch::Cancel)
    } else if rest.starts_with("success") {
        Some(SchemeMatch::Success)
    } else {
        Some(SchemeMatch::Other)
    }
}

/// Classify a parsed script message.
///
/// `url_scheme` messages go through [`match_scheme`], the same rule the
/// navigation path uses, so a `mobile://success` link classifies identically
/// whichever way it reaches the host.
pub fn classify_message(message: &ScriptMessage, scheme: &str) -> Option<Classification> {
    match message {
        ScriptMessage::ConsoleLog { message } => {
            debug!(message = message.as_deref().unwrap_or_default(), "Checkout page console");
            None
        }
        ScriptMessage::UrlScheme { url } => {
            match_scheme(url, scheme).and_then(SchemeMatch::classification)
        }
        ScriptMessage::PaymentSuccess { .. } => Some(Classification::Success),
        ScriptMessage::PaymentCancel { reason: Some(reason), .. } => Some(Classification::Failed {
            reason: reason.clone(),
        }),
        ScriptMessage::PaymentCancel { reason: None, .. } => Some(Classification::Cancelled),
    }
}

/// Classify one raw signal.
///
/// `Ok(None)` means the signal carries no outcome (the session stays
/// pending). `Err` means the script payload was malformed; callers drop it.
pub fn classify(
    signal: &ChannelSignal,
    policy: &ChannelPolicy,
) -> Result<Option<Classification>, SignalError> {
    match signal {
        ChannelSignal::NavigationIntercepted { url } => Ok(match_scheme(url, &policy.scheme)
            .and_then(SchemeMatch::classification)),
        ChannelSignal::ScriptMessage { payload } => {
            let message = ScriptMessage::parse(payload)?;
            Ok(classify_message(&message, &policy.scheme))
        }
    }
}
