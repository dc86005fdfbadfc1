use super::BridgeApiError;
use crate::state::AppState;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use bookpay_core::channel::{
    BackPress, CancelDecision, NavigationAction, NavigationOrigin, confirm_cancel,
    decide_navigation, injected_script, on_back_press,
};
use bookpay_core::events::{ChannelEvent, ChannelSignal};
use bookpay_core::screens::{Route, RouteEntry};
use bookpay_core::session::{SessionId, SessionStatus};
use bookpay_sdk::objects::{OrderCode, PaymentTarget};
use serde::{Deserialize, Serialize};
use url::Url;

#[derive(Deserialize)]
pub(super) struct CreateSessionRequest {
    amount: u64,
    method: String,
    target: PaymentTarget,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateSessionResponse {
    session_id: SessionId,
    order_code: OrderCode,
    checkout_url: Url,
    injected_script: String,
}

/// `POST /sessions` – open a session and hand back the page to load.
pub(super) async fn create_session(
    state: State<AppState>,
    Json(body): Json<CreateSessionRequest>,
) -> Result<impl IntoResponse, BridgeApiError> {
    let session = state
        .factory
        .create(body.amount, &body.method, body.target)
        .await?;
    let injected_script = injected_script(&*state.policy.read().await);

    Ok((
        StatusCode::CREATED,
        Json(CreateSessionResponse {
            session_id: session.id(),
            order_code: session.order_code().clone(),
            checkout_url: session.checkout_url().clone(),
            injected_script,
        }),
    ))
}

#[derive(Deserialize)]
pub(super) struct NavigationRequest {
    url: String,
}

#[derive(Serialize)]
struct NavigationResponse {
    action: NavigationAction,
    origin: NavigationOrigin,
}

/// `POST /sessions/{id}/navigation` – decide whether the surface may load
/// `url`. Custom-scheme navigations are also queued for classification.
pub(super) async fn navigation(
    state: State<AppState>,
    Path(session_id): Path<SessionId>,
    Json(body): Json<NavigationRequest>,
) -> Result<impl IntoResponse, BridgeApiError> {
    let decision = decide_navigation(&body.url, &*state.policy.read().await);

    if decision.origin == NavigationOrigin::CustomScheme {
        state
            .senders
            .channel_event
            .send(ChannelEvent {
                session_id,
                signal: ChannelSignal::NavigationIntercepted { url: body.url },
            })
            .await
            .map_err(|_| BridgeApiError::ChannelUnavailable)?;
    } else {
        tracing::debug!(
            session_id = %session_id,
            url = %body.url,
            origin = ?decision.origin,
            action = ?decision.action,
            "Checkout navigation"
        );
    }

    Ok(Json(NavigationResponse {
        action: decision.action,
        origin: decision.origin,
    }))
}

/// `POST /sessions/{id}/messages` – raw payload from the injected script.
///
/// Always accepted; malformed payloads are dropped by the channel.
pub(super) async fn message(
    state: State<AppState>,
    Path(session_id): Path<SessionId>,
    payload: String,
) -> Result<impl IntoResponse, BridgeApiError> {
    state
        .senders
        .channel_event
        .send(ChannelEvent {
            session_id,
            signal: ChannelSignal::ScriptMessage { payload },
        })
        .await
        .map_err(|_| BridgeApiError::ChannelUnavailable)?;
    Ok(StatusCode::ACCEPTED)
}

#[derive(Serialize)]
struct BackResponse {
    confirm: bool,
    prompt: Option<&'static str>,
}

/// `POST /sessions/{id}/back` – the user pressed back on the checkout.
pub(super) async fn back(
    state: State<AppState>,
    Path(session_id): Path<SessionId>,
) -> impl IntoResponse {
    let press = match state.registry.get(session_id).await {
        Some(session) => on_back_press(&session),
        None => BackPress::Ignored,
    };
    Json(match press {
        BackPress::Confirm { prompt } => BackResponse {
            confirm: true,
            prompt: Some(prompt),
        },
        BackPress::Ignored => BackResponse {
            confirm: false,
            prompt: None,
        },
    })
}

#[derive(Deserialize)]
pub(super) struct ConfirmBackRequest {
    accepted: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "snake_case")]
enum ConfirmBackDecision {
    Declined,
    Requested,
    AlreadyFinished,
}

#[derive(Serialize)]
struct ConfirmBackResponse {
    decision: ConfirmBackDecision,
}

/// `POST /sessions/{id}/back/confirm` – answer to the cancel prompt.
pub(super) async fn confirm_back(
    state: State<AppState>,
    Path(session_id): Path<SessionId>,
    Json(body): Json<ConfirmBackRequest>,
) -> Result<impl IntoResponse, BridgeApiError> {
    let decision = match state.registry.get(session_id).await {
        Some(session) => {
            confirm_cancel(&session, body.accepted, &state.senders.route_request).await?
        }
        None if state.board.get(session_id).await.is_some() => CancelDecision::AlreadyFinished,
        None => return Err(BridgeApiError::NotFound),
    };
    let decision = match decision {
        CancelDecision::Declined => ConfirmBackDecision::Declined,
        CancelDecision::Requested => ConfirmBackDecision::Requested,
        CancelDecision::AlreadyFinished => ConfirmBackDecision::AlreadyFinished,
    };
    Ok(Json(ConfirmBackResponse { decision }))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RouteResponse {
    status: SessionStatus,
    #[serde(flatten)]
    entry: RouteEntry,
}

/// `GET /sessions/{id}/route` – where the shell should be.
///
/// A pending session has no route yet. Once routed, the session leaves the
/// registry and the route board hands its entry out exactly once.
pub(super) async fn route(
    state: State<AppState>,
    Path(session_id): Path<SessionId>,
) -> Result<impl IntoResponse, BridgeApiError> {
    if let Some(session) = state.registry.get(session_id).await {
        return Ok(Json(RouteResponse {
            status: session.status(),
            entry: state.board.get(session_id).await.unwrap_or_default(),
        }));
    }
    let entry = state
        .board
        .take_routed(session_id)
        .await
        .ok_or(BridgeApiError::NotFound)?;
    let status = entry
        .route
        .as_ref()
        .map_or(SessionStatus::Pending, Route::terminal_status);
    Ok(Json(RouteResponse { status, entry }))
}
