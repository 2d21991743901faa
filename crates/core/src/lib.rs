//! Pinsight Core - portfolio allocation and aggregation engine.
//!
//! Parses allocation descriptions, normalizes position values into one
//! reporting currency, aggregates them per asset class and keeps the result
//! consistent as accounts, currencies and rules change. Persistence and
//! change delivery are abstracted behind traits implemented by the runtime.

pub mod accounts;
pub mod allocations;
pub mod constants;
pub mod errors;
pub mod events;
pub mod fx;
pub mod portfolio;
pub mod store;

pub use portfolio::*;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
