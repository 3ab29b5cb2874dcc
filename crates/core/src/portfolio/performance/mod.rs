//! Performance strategies, reporting periods and their aggregation.

mod calculator_factory;
mod calculator_traits;
mod date_range;
mod date_range_aggregator;
pub mod performance_model;
mod position_aggregator;
mod roai_calculator;
mod roi_calculator;

pub use calculator_factory::create_performance_calculator;
pub use calculator_traits::PerformanceCalculatorTrait;
pub use date_range_aggregator::{date_range_performance, range_performance, value_at_or_before};
pub use performance_model::*;
pub use position_aggregator::aggregate_positions;
pub use roai_calculator::RoaiPortfolioCalculator;
pub use roi_calculator::RoiPortfolioCalculator;
