use std::sync::Arc;

use crate::{api::with_store, error::ApiResult, main_lib::AppState};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use pinsight_core::accounts::{Account, AccountUpdate, BrokerageSnapshot};
use serde::Deserialize;
use tracing::info;

async fn list_accounts(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<Account>>> {
    Ok(Json(state.store.snapshot().accounts))
}

async fn create_account(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<Account>,
) -> ApiResult<Json<Account>> {
    let created = with_store(&state, move |store| store.add_account(payload)).await?;
    // Domain events handle the summary recompute
    Ok(Json(created))
}

async fn update_account(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    Json(payload): Json<AccountUpdate>,
) -> ApiResult<Json<Account>> {
    let updated = with_store(&state, move |store| store.update_account(&id, payload)).await?;
    Ok(Json(updated))
}

async fn delete_account(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<StatusCode> {
    with_store(&state, move |store| store.remove_account(&id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImportQuery {
    include_cash: Option<bool>,
}

/// Merges a scraped brokerage page into the accounts.
async fn import_brokerage_snapshot(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ImportQuery>,
    Json(snapshot): Json<BrokerageSnapshot>,
) -> ApiResult<Json<Account>> {
    let include_cash = query.include_cash.unwrap_or(state.options.include_cash);
    let account = with_store(&state, move |store| {
        store.import_snapshot(&snapshot, include_cash)
    })
    .await?;
    info!(
        "Imported {} positions for account {}",
        account.positions.len(),
        account.id
    );
    Ok(Json(account))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/accounts", get(list_accounts).post(create_account))
        .route("/accounts/{id}", put(update_account).delete(delete_account))
        .route("/brokerage-snapshots", post(import_brokerage_snapshot))
}
