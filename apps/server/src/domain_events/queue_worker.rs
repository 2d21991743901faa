//! Event queue worker for processing domain events.
//!
//! Receives events from an mpsc channel, debounces them, then recomputes the
//! asset summary once per batch.

use std::sync::Arc;
use std::time::Duration;

use pinsight_core::events::DomainEvent;
use pinsight_core::portfolio::AggregationOptions;
use pinsight_core::store::PortfolioStore;
use tokio::sync::mpsc;

use crate::events::{EventBus, ServerEvent, PORTFOLIO_ASSETS_UPDATED, PORTFOLIO_UPDATE_ERROR};

/// Debounce window for collecting events before processing.
pub(crate) const DEBOUNCE_DURATION: Duration = Duration::from_millis(250);

/// Dependencies needed by the queue worker for processing events.
pub struct QueueWorkerDeps {
    pub store: Arc<PortfolioStore>,
    pub event_bus: EventBus,
    pub options: AggregationOptions,
}

/// Runs the event queue worker.
///
/// A burst of events (e.g. loading all collections, then an import) results
/// in a single recompute once the channel has been quiet for the debounce
/// window.
pub async fn event_queue_worker(
    mut rx: mpsc::UnboundedReceiver<DomainEvent>,
    deps: Arc<QueueWorkerDeps>,
) {
    tracing::info!("Domain event queue worker started");

    let mut pending_events: Vec<DomainEvent> = Vec::new();

    loop {
        if !pending_events.is_empty() {
            tokio::select! {
                event = rx.recv() => {
                    match event {
                        Some(e) => pending_events.push(e),
                        None => {
                            // Channel closed, process remaining and exit
                            process_event_batch(&pending_events, &deps);
                            tracing::info!("Domain event queue worker shutting down");
                            return;
                        }
                    }
                }
                _ = tokio::time::sleep(DEBOUNCE_DURATION) => {
                    let batch = std::mem::take(&mut pending_events);
                    process_event_batch(&batch, &deps);
                }
            }
        } else {
            match rx.recv().await {
                Some(e) => pending_events.push(e),
                None => {
                    tracing::info!("Domain event queue worker shutting down");
                    return;
                }
            }
        }
    }
}

/// Recomputes the summary and publishes it.
fn process_event_batch(events: &[DomainEvent], deps: &QueueWorkerDeps) {
    let kinds: Vec<&str> = events.iter().map(DomainEvent::kind).collect();
    tracing::info!(
        "Processing batch of {} domain event(s): {:?}",
        events.len(),
        kinds
    );

    let summary = deps.store.summary(&deps.options);
    match serde_json::to_value(&summary) {
        Ok(payload) => {
            tracing::debug!(
                "Asset summary recomputed: {} classes, total {}",
                summary.items.len(),
                summary.total
            );
            deps.event_bus
                .publish(ServerEvent::with_payload(PORTFOLIO_ASSETS_UPDATED, payload));
        }
        Err(e) => {
            tracing::error!("Failed to serialize asset summary: {}", e);
            deps.event_bus.publish(ServerEvent::with_payload(
                PORTFOLIO_UPDATE_ERROR,
                serde_json::json!({ "message": e.to_string() }),
            ));
        }
    }
}
