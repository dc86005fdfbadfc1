//! Event type definitions.

use crate::session::{PaymentSession, SessionId, SessionStatus};
use bookpay_sdk::objects::{OrderCode, PaymentTarget};
use serde::{Deserialize, Serialize};

/// Where a classified signal came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalSource {
    /// An intercepted navigation of the embedded surface.
    Navigation,
    /// A message posted by the injected page script.
    ScriptMessage,
    /// The user confirmed cancellation after pressing back.
    UserCancel,
}

impl std::fmt::Display for SignalSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SignalSource::Navigation => write!(f, "navigation"),
            SignalSource::ScriptMessage => write!(f, "script_message"),
            SignalSource::UserCancel => write!(f, "user_cancel"),
        }
    }
}

/// A raw signal from the embedded surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelSignal {
    /// The hosted page attempted to navigate to `url`.
    NavigationIntercepted { url: String },
    /// The injected script posted `payload`, unparsed.
    ScriptMessage { payload: String },
}

impl ChannelSignal {
    pub fn source(&self) -> SignalSource {
        match self {
            ChannelSignal::NavigationIntercepted { .. } => SignalSource::Navigation,
            ChannelSignal::ScriptMessage { .. } => SignalSource::ScriptMessage,
        }
    }
}

/// A signal addressed to one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelEvent {
    pub session_id: SessionId,
    pub signal: ChannelSignal,
}

/// Result of classifying one signal, before it is bound to a session.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Classification {
    Success,
    Cancelled,
    Failed { reason: String },
}

/// Terminal result of a payment session.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum Outcome {
    Success {
        order_code: OrderCode,
        target: PaymentTarget,
    },
    Cancelled {
        order_code: OrderCode,
        target: PaymentTarget,
    },
    Failed {
        order_code: OrderCode,
        target: PaymentTarget,
        reason: String,
    },
}

impl Outcome {
    /// Bind a classification to the session it was observed on.
    pub fn for_session(classification: Classification, session: &PaymentSession) -> Self {
        let order_code = session.order_code().clone();
        let target = session.target().clone();
        match classification {
            Classification::Success => Outcome::Success { order_code, target },
            Classification::Cancelled => Outcome::Cancelled { order_code, target },
            Classification::Failed { reason } => Outcome::Failed {
                order_code,
                target,
                reason,
            },
        }
    }

    pub fn order_code(&self) -> &OrderCode {
        match self {
            Outcome::Success { order_code, .. }
            | Outcome::Cancelled { order_code, .. }
            | Outcome::Failed { order_code, .. } => order_code,
        }
    }

    pub fn target(&self) -> &PaymentTarget {
        match self {
            Outcome::Success { target, .. }
            | Outcome::Cancelled { target, .. }
            | Outcome::Failed { target, .. } => target,
        }
    }

    /// The session status this outcome moves to.
    pub fn terminal_status(&self) -> SessionStatus {
        match self {
            Outcome::Success { .. } => SessionStatus::Succeeded,
            Outcome::Cancelled { .. } => SessionStatus::Cancelled,
            Outcome::Failed { .. } => SessionStatus::Failed,
        }
    }
}

/// Ask the router to finish a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRequest {
    pub session_id: SessionId,
    pub outcome: Outcome,
    pub source: SignalSource,
}
