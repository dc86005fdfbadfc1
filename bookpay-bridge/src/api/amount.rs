use super::BridgeApiError;
use crate::state::AppState;
use axum::{Json, extract::State, response::IntoResponse};
use bookpay_core::amount::{self, AmountInput};
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
pub(super) struct NormalizeRequest {
    #[serde(default)]
    raw: String,
    /// Quick-pick index, instead of `raw`.
    #[serde(default)]
    preset: Option<usize>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NormalizeResponse {
    display_text: String,
    numeric_amount: u64,
    valid: bool,
    highlighted_preset: Option<usize>,
}

/// `POST /amount/normalize` – normalize what the user typed or picked.
pub(super) async fn normalize(
    state: State<AppState>,
    Json(body): Json<NormalizeRequest>,
) -> Result<impl IntoResponse, BridgeApiError> {
    let mut input = AmountInput::new(&*state.amount.read().await);
    match body.preset {
        Some(index) => {
            input.pick_preset(index)?;
        }
        None => {
            input.edit(&body.raw);
        }
    }
    let value = input.value();
    Ok(Json(NormalizeResponse {
        display_text: value.display_text.clone(),
        numeric_amount: value.numeric_amount,
        valid: input.is_valid(),
        highlighted_preset: input.highlighted_preset(),
    }))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Preset {
    amount: u64,
    display_text: String,
}

/// `GET /amount/presets` – quick-pick amounts in display order.
pub(super) async fn presets(state: State<AppState>) -> impl IntoResponse {
    let config = state.amount.read().await;
    let format = config.format();
    let presets: Vec<Preset> = config
        .presets
        .iter()
        .map(|amount| Preset {
            amount: *amount,
            display_text: amount::format_amount(*amount, format),
        })
        .collect();
    Json(presets)
}
