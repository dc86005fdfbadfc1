//! Terminal screens and the navigation seam.
//!
//! The router never talks to a UI toolkit directly. It drives a
//! [`Navigator`], which the host implements; [`RouteBoard`] is the in-memory
//! one the bridge serves to its shell.

mod board;
mod failure;
mod wallet;

pub use board::{RouteBoard, RouteEntry};
pub use failure::{FailureMount, FailureScreen};
pub use wallet::WalletScreen;

use crate::events::{Outcome, SignalSource};
use crate::session::{SessionId, SessionStatus};
use async_trait::async_trait;
use bookpay_sdk::objects::{OrderCode, PaymentTarget};
use serde::{Deserialize, Serialize};

/// Navigation side of the host.
#[async_trait]
pub trait Navigator: Send + Sync {
    /// Close the embedded checkout surface of `session_id`.
    async fn close_surface(&self, session_id: SessionId);

    /// Replace the whole navigation stack with `route`.
    async fn reset_stack(&self, session_id: SessionId, route: Route);
}

/// A terminal screen plus its parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "screen", rename_all = "snake_case")]
pub enum Route {
    Wallet(WalletParams),
    BookingSuccess(SuccessParams),
    Failure(FailureParams),
}

impl Route {
    /// The screen for `outcome`.
    pub fn for_outcome(outcome: &Outcome, source: SignalSource) -> Self {
        let order_code = outcome.order_code().clone();
        match (outcome, outcome.target()) {
            (Outcome::Success { .. }, PaymentTarget::Wallet { wallet_id }) => {
                Route::Wallet(WalletParams {
                    refresh: true,
                    order_code: Some(order_code),
                    wallet_id: Some(wallet_id.clone()),
                    source: Some(source),
                })
            }
            (Outcome::Success { .. }, PaymentTarget::Booking { booking_id }) => {
                Route::BookingSuccess(SuccessParams {
                    order_code,
                    booking_id: *booking_id,
                    source,
                })
            }
            (Outcome::Cancelled { .. } | Outcome::Failed { .. }, target) => {
                let (kind, reason) = match outcome {
                    Outcome::Failed { reason, .. } => (FailureKind::Failed, Some(reason.clone())),
                    _ => (FailureKind::Cancelled, None),
                };
                Route::Failure(FailureParams {
                    order_code: Some(order_code),
                    booking_id: target.booking_id(),
                    wallet_id: target.wallet_id().map(str::to_string),
                    kind,
                    reason,
                    source: Some(source),
                })
            }
        }
    }

    /// The session status that leads to this screen.
    pub fn terminal_status(&self) -> SessionStatus {
        match self {
            Route::Wallet(_) | Route::BookingSuccess(_) => SessionStatus::Succeeded,
            Route::Failure(params) => match params.kind {
                FailureKind::Cancelled => SessionStatus::Cancelled,
                FailureKind::Failed => SessionStatus::Failed,
            },
        }
    }

    pub fn screen_name(&self) -> &'static str {
        match self {
            Route::Wallet(_) => "wallet",
            Route::BookingSuccess(_) => "booking_success",
            Route::Failure(_) => "failure",
        }
    }
}

/// Wallet screen. `refresh` asks it to reload the balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletParams {
    #[serde(default)]
    pub refresh: bool,
    #[serde(default)]
    pub order_code: Option<OrderCode>,
    #[serde(default)]
    pub wallet_id: Option<String>,
    #[serde(default)]
    pub source: Option<SignalSource>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuccessParams {
    pub order_code: OrderCode,
    pub booking_id: i64,
    pub source: SignalSource,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    #[default]
    Failed,
    Cancelled,
}

/// Failure screen parameters.
///
/// Every identifier is optional because the screen can also be reached by
/// restoring a stack after the process was killed.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailureParams {
    #[serde(default)]
    pub order_code: Option<OrderCode>,
    #[serde(default)]
    pub booking_id: Option<i64>,
    #[serde(default)]
    pub wallet_id: Option<String>,
    #[serde(default)]
    pub kind: FailureKind,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub source: Option<SignalSource>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_routes_per_outcome() {
        let wallet = PaymentTarget::Wallet {
            wallet_id: "w-1".to_string(),
        };
        let booking = PaymentTarget::Booking { booking_id: 42 };
        let code = OrderCode::new("ABC");

        let route = Route::for_outcome(
            &Outcome::Success {
                order_code: code.clone(),
                target: wallet.clone(),
            },
            SignalSource::Navigation,
        );
        let Route::Wallet(params) = route else {
            panic!("expected wallet route");
        };
        assert!(params.refresh);
        assert_eq!(params.wallet_id.as_deref(), Some("w-1"));

        let route = Route::for_outcome(
            &Outcome::Success {
                order_code: code.clone(),
                target: booking.clone(),
            },
            SignalSource::ScriptMessage,
        );
        assert_eq!(route.screen_name(), "booking_success");

        let route = Route::for_outcome(
            &Outcome::Failed {
                order_code: code.clone(),
                target: booking,
                reason: "declined".to_string(),
            },
            SignalSource::ScriptMessage,
        );
        assert_eq!(
            route,
            Route::Failure(FailureParams {
                order_code: Some(code.clone()),
                booking_id: Some(42),
                wallet_id: None,
                kind: FailureKind::Failed,
                reason: Some("declined".to_string()),
                source: Some(SignalSource::ScriptMessage),
            })
        );

        let route = Route::for_outcome(
            &Outcome::Cancelled {
                order_code: code,
                target: wallet,
            },
            SignalSource::UserCancel,
        );
        let Route::Failure(params) = route else {
            panic!("expected failure route");
        };
        assert_eq!(params.kind, FailureKind::Cancelled);
        assert_eq!(params.wallet_id.as_deref(), Some("w-1"));
    }

    #[test]
    fn test_route_wire_shape() {
        let json = serde_json::to_value(Route::BookingSuccess(SuccessParams {
            order_code: OrderCode::new("ABC"),
            booking_id: 42,
            source: SignalSource::Navigation,
        }))
        .unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "screen": "booking_success",
                "orderCode": "ABC",
                "bookingId": 42,
                "source": "navigation"
            })
        );

        let params: FailureParams =
            serde_json::from_str(r#"{"bookingId": 42, "orderCode": 991}"#).unwrap();
        assert_eq!(params.booking_id, Some(42));
        assert_eq!(params.order_code, Some(OrderCode::new("991")));
        assert_eq!(params.kind, FailureKind::Failed);
    }
}
