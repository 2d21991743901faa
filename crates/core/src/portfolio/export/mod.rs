//! CSV reports of the portfolio and its asset class breakdown.

mod export_model;
mod export_service;


pub use export_model::*;
pub use export_service::{asset_rows, assets_csv, portfolio_csv, portfolio_rows};
