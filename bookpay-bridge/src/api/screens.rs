use crate::state::AppState;
use axum::{Json, extract::State, response::IntoResponse};
use bookpay_core::screens::{FailureMount, FailureParams, FailureScreen, WalletParams, WalletScreen};
use serde::Serialize;

#[derive(Serialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
enum FailureMountResponse {
    HoldRelease { released: bool },
    TrailCleared { cleared: bool },
    Nothing,
}

/// `POST /screens/failure/mount` – the failure screen appeared.
///
/// Repeats the reconciliation the router attempted, keyed by the same
/// identifiers. Always succeeds; the call outcome is informational.
pub(super) async fn failure_mount(
    state: State<AppState>,
    Json(params): Json<FailureParams>,
) -> impl IntoResponse {
    let screen = FailureScreen::new(params, state.reconciliation.clone());
    let effect = match screen.on_mount().await {
        FailureMount::HoldRelease { released } => FailureMountResponse::HoldRelease { released },
        FailureMount::TrailCleared { cleared } => FailureMountResponse::TrailCleared { cleared },
        FailureMount::Nothing | FailureMount::AlreadyMounted => FailureMountResponse::Nothing,
    };
    Json(effect)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WalletMountResponse {
    trail_cleared: bool,
}

/// `POST /screens/wallet/mount` – the wallet screen appeared.
pub(super) async fn wallet_mount(
    state: State<AppState>,
    Json(params): Json<WalletParams>,
) -> impl IntoResponse {
    let screen = WalletScreen::new(params, state.reconciliation.clone());
    Json(WalletMountResponse {
        trail_cleared: screen.on_mount().await,
    })
}
