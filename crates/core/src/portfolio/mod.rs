//! Portfolio performance engine.

pub mod metrics;
pub mod performance;
pub mod portfolio_order;
pub mod snapshot;
pub mod transaction_points;

pub use portfolio_order::{normalize_activities, PortfolioOrder};
