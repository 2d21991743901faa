//! Domain events runtime bridge for the web server.
//!
//! Receives domain events via DomainEventSink, debounces them, recomputes
//! the asset summary and publishes it on the event bus as
//! `portfolio:assets-updated`.

mod queue_worker;
mod sink;

pub use sink::WebDomainEventSink;
