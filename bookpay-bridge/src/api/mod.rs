//! Bridge API handlers.
//!
//! The web-view shell calls these endpoints on the device's loopback
//! interface: it reports what the checkout surface does and asks which
//! screen to show next.
//!
//! # Endpoints
//!
//! - `POST /amount/normalize`               – normalize a typed amount
//! - `GET  /amount/presets`                 – quick-pick amounts
//! - `POST /sessions`                       – open a payment session
//! - `POST /sessions/{id}/navigation`       – intercept a navigation
//! - `POST /sessions/{id}/messages`         – injected-script message
//! - `POST /sessions/{id}/back`             – hardware back pressed
//! - `POST /sessions/{id}/back/confirm`     – answer to the cancel prompt
//! - `GET  /sessions/{id}/route`            – terminal route, once decided
//! - `POST /screens/failure/mount`          – failure screen mounted
//! - `POST /screens/wallet/mount`           – wallet screen mounted

mod amount;
mod screens;
mod sessions;

use crate::state::AppState;
use axum::{
    Json, Router,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use bookpay_core::amount::AmountError;
use bookpay_core::channel::RouterUnavailable;
use bookpay_core::session::SessionError;
use serde::Serialize;
use thiserror::Error;

/// Build the bridge API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/amount/normalize", post(amount::normalize))
        .route("/amount/presets", get(amount::presets))
        .route("/sessions", post(sessions::create_session))
        .route("/sessions/{session_id}/navigation", post(sessions::navigation))
        .route("/sessions/{session_id}/messages", post(sessions::message))
        .route("/sessions/{session_id}/back", post(sessions::back))
        .route("/sessions/{session_id}/back/confirm", post(sessions::confirm_back))
        .route("/sessions/{session_id}/route", get(sessions::route))
        .route("/screens/failure/mount", post(screens::failure_mount))
        .route("/screens/wallet/mount", post(screens::wallet_mount))
}

#[derive(Debug, Error)]
pub enum BridgeApiError {
    #[error(transparent)]
    Session(#[from] SessionError),

    #[error(transparent)]
    Amount(#[from] AmountError),

    #[error("session not found")]
    NotFound,

    #[error(transparent)]
    RouterUnavailable(#[from] RouterUnavailable),

    #[error("payment channel is not running")]
    ChannelUnavailable,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    error: String,
    retryable: bool,
}

impl IntoResponse for BridgeApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, retryable) = match &self {
            BridgeApiError::Session(SessionError::Validation(_)) | BridgeApiError::Amount(_) => {
                (StatusCode::UNPROCESSABLE_ENTITY, false)
            }
            BridgeApiError::Session(e @ SessionError::Backend(_)) => {
                tracing::warn!(error = %e, "Checkout issuance failed");
                (StatusCode::BAD_GATEWAY, e.is_retryable())
            }
            BridgeApiError::Session(SessionError::InvalidCheckoutUrl(url)) => {
                tracing::error!(checkout_url = %url, "Backend issued an unusable checkout URL");
                (StatusCode::BAD_GATEWAY, false)
            }
            BridgeApiError::NotFound => (StatusCode::NOT_FOUND, false),
            BridgeApiError::RouterUnavailable(_) | BridgeApiError::ChannelUnavailable => {
                tracing::error!(error = %self, "Bridge pipeline is down");
                (StatusCode::SERVICE_UNAVAILABLE, false)
            }
        };
        let body = ErrorBody {
            error: self.to_string(),
            retryable,
        };
        (status, Json(body)).into_response()
    }
}
