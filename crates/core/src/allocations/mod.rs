//! Allocations module - per-ticker asset class rules and their text form.

mod allocation_parser;
mod allocations_model;


pub use allocation_parser::{describe, parse_description};
pub use allocations_model::{Allocation, AllocationRule, AssetClassWeight};
