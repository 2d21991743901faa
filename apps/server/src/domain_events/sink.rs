//! Web domain event sink implementation.
//!
//! Receives domain events and sends them to a background queue worker
//! for debounced processing.

use std::sync::{Arc, Mutex, PoisonError};

use pinsight_core::events::{DomainEvent, DomainEventSink};
use pinsight_core::portfolio::AggregationOptions;
use pinsight_core::store::PortfolioStore;
use tokio::sync::mpsc;

use super::queue_worker::{event_queue_worker, QueueWorkerDeps};
use crate::events::EventBus;

/// Domain event sink for the web server runtime.
///
/// # Two-Phase Initialization
///
/// The store needs the sink and the worker needs the store, so:
///
/// 1. Create the sink with `new()` - this just creates the channel
/// 2. Call `start_worker()` once the store exists - this spawns the worker
///
/// Events emitted in between are buffered in the channel.
pub struct WebDomainEventSink {
    tx: mpsc::UnboundedSender<DomainEvent>,
    rx: Mutex<Option<mpsc::UnboundedReceiver<DomainEvent>>>,
}

impl WebDomainEventSink {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            tx,
            rx: Mutex::new(Some(rx)),
        }
    }

    /// Spawns the background worker. Later calls are ignored.
    pub fn start_worker(
        &self,
        store: Arc<PortfolioStore>,
        event_bus: EventBus,
        options: AggregationOptions,
    ) {
        let Some(rx) = self
            .rx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        else {
            tracing::warn!("Domain event worker already started");
            return;
        };

        let deps = Arc::new(QueueWorkerDeps {
            store,
            event_bus,
            options,
        });
        tokio::spawn(event_queue_worker(rx, deps));
    }

    #[cfg(test)]
    pub fn with_sender(tx: mpsc::UnboundedSender<DomainEvent>) -> Self {
        Self {
            tx,
            rx: Mutex::new(None),
        }
    }
}

impl Default for WebDomainEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl DomainEventSink for WebDomainEventSink {
    fn emit(&self, event: DomainEvent) {
        // Best-effort: a closed channel only means the worker is gone.
        if let Err(e) = self.tx.send(event) {
            tracing::warn!("Failed to emit domain event: {}", e);
        }
    }
}
