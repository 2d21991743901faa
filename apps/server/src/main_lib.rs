use std::sync::Arc;

use crate::{
    config::Config, domain_events::WebDomainEventSink, events::EventBus,
    storage::JsonFileRepository,
};
use pinsight_core::portfolio::AggregationOptions;
use pinsight_core::store::PortfolioStore;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Capacity of the broadcast bus feeding the SSE stream.
const EVENT_BUS_CAPACITY: usize = 256;

pub struct AppState {
    pub store: Arc<PortfolioStore>,
    pub event_bus: EventBus,
    /// Defaults for the asset summary, overridable per request
    pub options: AggregationOptions,
}

pub fn init_tracing() {
    let log_format = std::env::var("PINSIGHT_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    tracing::info!("Portfolio data path in use: {}", config.data_path.display());
    let repository = Arc::new(JsonFileRepository::new(config.data_path.clone()));

    // Phase 1: the sink buffers events until the worker is started
    let domain_event_sink = Arc::new(WebDomainEventSink::new());
    let store = Arc::new(PortfolioStore::open(repository, domain_event_sink.clone())?);

    let options = AggregationOptions {
        include_cash: config.include_cash,
    };
    let event_bus = EventBus::new(EVENT_BUS_CAPACITY);

    // Phase 2: start processing, including the load event emitted above
    domain_event_sink.start_worker(store.clone(), event_bus.clone(), options);

    Ok(Arc::new(AppState {
        store,
        event_bus,
        options,
    }))
}
