use std::sync::Arc;

use crate::{api::with_store, error::ApiResult, main_lib::AppState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use pinsight_core::fx::CurrencyEntry;

/// Resolved entries followed by placeholders for codes still missing a
/// multiplier.
async fn list_currencies(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<CurrencyEntry>>> {
    Ok(Json(state.store.snapshot().currencies))
}

async fn upsert_currency(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CurrencyEntry>,
) -> ApiResult<Json<CurrencyEntry>> {
    let saved = with_store(&state, move |store| store.upsert_currency(payload)).await?;
    Ok(Json(saved))
}

async fn delete_currency(
    Path(code): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<StatusCode> {
    with_store(&state, move |store| store.remove_currency(&code)).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/currencies", get(list_currencies).put(upsert_currency))
        .route("/currencies/{code}", delete(delete_currency))
}
