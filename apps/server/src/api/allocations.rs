use std::sync::Arc;

use crate::{api::with_store, error::ApiResult, main_lib::AppState};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use pinsight_core::allocations::{parse_description, AllocationRule, AssetClassWeight};
use serde::{Deserialize, Serialize};

/// An allocation rule together with its editable description.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AllocationView {
    #[serde(flatten)]
    rule: AllocationRule,
    description: String,
    resolved: bool,
}

impl From<AllocationRule> for AllocationView {
    fn from(rule: AllocationRule) -> Self {
        Self {
            description: rule.description(),
            resolved: rule.is_resolved(),
            rule,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SetAllocationBody {
    ticker: String,
    description: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ParseBody {
    description: String,
}

async fn list_allocations(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<AllocationView>>> {
    let rules = state.store.snapshot().allocations;
    Ok(Json(rules.into_iter().map(AllocationView::from).collect()))
}

async fn set_allocation(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SetAllocationBody>,
) -> ApiResult<Json<AllocationView>> {
    let rule = with_store(&state, move |store| {
        store.set_allocation(&body.ticker, &body.description)
    })
    .await?;
    Ok(Json(AllocationView::from(rule)))
}

async fn delete_allocation(
    Path(ticker): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<StatusCode> {
    with_store(&state, move |store| store.remove_allocation(&ticker)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Validates a description without storing it.
async fn parse_allocation(Json(body): Json<ParseBody>) -> ApiResult<Json<Vec<AssetClassWeight>>> {
    Ok(Json(parse_description(&body.description)?))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/allocations", get(list_allocations).put(set_allocation))
        .route("/allocations/parse", post(parse_allocation))
        .route("/allocations/{ticker}", delete(delete_allocation))
}
