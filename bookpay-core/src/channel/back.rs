//! Hardware back button while the checkout page is open.
//!
//! Back never drops a session silently: it asks for confirmation first, and
//! only an accepted confirmation finishes the session as cancelled.

use crate::events::{Classification, Outcome, RouteRequest, RouteRequestSender, SignalSource};
use crate::session::PaymentSession;
use thiserror::Error;
use tracing::info;

/// Confirmation text shown when back is pressed on an open checkout.
pub const CANCEL_PROMPT: &str = "Cancel this transaction?";

/// What the host should do with a back press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackPress {
    /// Show a yes/no dialog with this prompt.
    Confirm { prompt: &'static str },
    /// The session is already finished; nothing to confirm.
    Ignored,
}

/// What happened to a confirmation answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelDecision {
    /// The user chose to stay; the session stays pending.
    Declined,
    /// A cancel outcome was handed to the router.
    Requested,
    /// The session finished before the answer arrived.
    AlreadyFinished,
}

/// The outcome router has shut down.
#[derive(Debug, Error)]
#[error("outcome router is not running")]
pub struct RouterUnavailable;

pub fn on_back_press(session: &PaymentSession) -> BackPress {
    if session.is_pending() {
        BackPress::Confirm {
            prompt: CANCEL_PROMPT,
        }
    } else {
        BackPress::Ignored
    }
}

/// Handle the answer to [`CANCEL_PROMPT`].
///
/// An accepted cancel skips classification and goes straight to the router.
/// If another outcome reaches the router first, that one stands.
pub async fn confirm_cancel(
    session: &PaymentSession,
    accepted: bool,
    route_tx: &RouteRequestSender,
) -> Result<CancelDecision, RouterUnavailable> {
    if !accepted {
        return Ok(CancelDecision::Declined);
    }
    if !session.is_pending() {
        return Ok(CancelDecision::AlreadyFinished);
    }

    info!(
        session_id = %session.id(),
        order_code = %session.order_code(),
        "User confirmed payment cancellation"
    );

    route_tx
        .send(RouteRequest {
            session_id: session.id(),
            outcome: Outcome::for_session(Classification::Cancelled, session),
            source: SignalSource::UserCancel,
        })
        .await
        .map_err(|_| RouterUnavailable)?;

    Ok(CancelDecision::Requested)
}
