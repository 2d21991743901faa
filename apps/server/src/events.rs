use serde_json::Value;
use tokio::sync::broadcast;

/// Emitted whenever the asset summary was recomputed.
pub const PORTFOLIO_ASSETS_UPDATED: &str = "portfolio:assets-updated";
/// Emitted when recomputing the summary failed.
pub const PORTFOLIO_UPDATE_ERROR: &str = "portfolio:update-error";

/// Serializable envelope that carries event names and optional payloads.
#[derive(Clone, Debug)]
pub struct ServerEvent {
    pub name: &'static str,
    pub payload: Option<Value>,
}

impl ServerEvent {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            payload: None,
        }
    }

    pub fn with_payload(name: &'static str, payload: Value) -> Self {
        Self {
            name,
            payload: Some(payload),
        }
    }
}

/// Broadcast bus that fans out events to every connected client.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<ServerEvent>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _receiver) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ServerEvent> {
        self.sender.subscribe()
    }

    pub fn publish(&self, event: ServerEvent) {
        // No subscribers or lagging ones are not an error for the producer.
        let _ = self.sender.send(event);
    }
}
