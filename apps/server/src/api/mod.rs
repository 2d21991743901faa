mod accounts;
mod allocations;
mod assets;
mod currencies;
mod portfolio;

use std::sync::Arc;

use axum::{http::HeaderValue, routing::get, Router};
use pinsight_core::store::PortfolioStore;
use tokio::task;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{config::Config, error::ApiResult, main_lib::AppState};

pub async fn healthz() -> &'static str {
    "ok"
}

/// Runs a store mutation on the blocking pool, since every mutation writes
/// the data file synchronously.
pub(crate) async fn with_store<T, F>(state: &AppState, f: F) -> ApiResult<T>
where
    F: FnOnce(&PortfolioStore) -> pinsight_core::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let store = state.store.clone();
    let result = task::spawn_blocking(move || f(&store)).await?;
    Ok(result?)
}

pub fn app_router(state: Arc<AppState>, config: &Config) -> Router {
    let cors = if config.cors_allow.iter().any(|o| o == "*") {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins = config
            .cors_allow
            .iter()
            .filter_map(|o| match o.parse::<HeaderValue>() {
                Ok(origin) => Some(origin),
                Err(_) => {
                    tracing::warn!("Ignoring invalid CORS origin: {}", o);
                    None
                }
            })
            .collect::<Vec<_>>();
        CorsLayer::new().allow_origin(origins)
    };

    let api = Router::new()
        .route("/healthz", get(healthz))
        .merge(accounts::router())
        .merge(currencies::router())
        .merge(allocations::router())
        .merge(assets::router())
        .merge(portfolio::router());

    Router::new()
        .nest("/api/v1", api)
        .with_state(state)
        .layer(cors)
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(TraceLayer::new_for_http())
}
