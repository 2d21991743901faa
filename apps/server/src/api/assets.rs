use std::sync::Arc;

use crate::{error::ApiResult, main_lib::AppState};
use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use pinsight_core::portfolio::export::{export_file_name, ExportKind};
use pinsight_core::portfolio::{AggregationOptions, AssetSummary};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryQuery {
    include_cash: Option<bool>,
}

impl SummaryQuery {
    fn options(&self, defaults: AggregationOptions) -> AggregationOptions {
        AggregationOptions {
            include_cash: self.include_cash.unwrap_or(defaults.include_cash),
        }
    }
}

async fn get_assets(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SummaryQuery>,
) -> ApiResult<Json<AssetSummary>> {
    Ok(Json(state.store.summary(&query.options(state.options))))
}

fn csv_response(kind: ExportKind, body: String) -> impl IntoResponse {
    let file_name = export_file_name(chrono::Local::now().date_naive(), kind);
    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file_name),
            ),
        ],
        body,
    )
}

async fn export_portfolio_csv(State(state): State<Arc<AppState>>) -> ApiResult<impl IntoResponse> {
    let csv = state.store.portfolio_csv()?;
    Ok(csv_response(ExportKind::Portfolio, csv))
}

async fn export_assets_csv(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SummaryQuery>,
) -> ApiResult<impl IntoResponse> {
    let csv = state.store.assets_csv(&query.options(state.options))?;
    Ok(csv_response(ExportKind::Assets, csv))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/assets", get(get_assets))
        .route("/exports/portfolio.csv", get(export_portfolio_csv))
        .route("/exports/assets.csv", get(export_assets_csv))
}
