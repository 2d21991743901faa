//! Portfolio module - aggregation, gap detection and reports.

pub mod allocation;
pub mod export;
pub mod gaps;

pub use allocation::{aggregate, aggregate_with, AggregationOptions, AssetClassTotal, AssetSummary};
