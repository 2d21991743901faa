//! Portfolio allocation module for the asset class breakdown.

mod allocation_model;
mod allocation_service;


pub use allocation_model::*;
pub(crate) use allocation_service::resolved_rules_by_ticker;
pub use allocation_service::{aggregate, aggregate_with};
