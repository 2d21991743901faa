//! Domain events module.
//!
//! Event types and the sink trait the portfolio store emits through after
//! every change. The server implements the sink to schedule recomputation.

mod domain_event;
mod sink;

pub use domain_event::*;
pub use sink::*;
