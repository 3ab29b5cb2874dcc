//! Portfolio snapshot module - position valuation, portfolio totals and caching.

mod chart_dates;
pub mod market_data_loader;
pub mod portfolio_calculator;
mod positions_model;
pub mod snapshot_cache;
mod snapshot_model;
pub mod snapshot_service;
mod snapshot_traits;

pub use chart_dates::build_chart_dates;
pub use market_data_loader::*;
pub use portfolio_calculator::*;
pub use positions_model::*;
pub use snapshot_cache::*;
pub use snapshot_model::*;
pub use snapshot_service::*;
pub use snapshot_traits::*;

#[cfg(test)]
mod portfolio_calculator_tests;
