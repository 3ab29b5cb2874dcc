//! Perfolio Core - portfolio performance engine.
//!
//! Folds a ledger of activities into transaction points, values every symbol over a
//! reporting grid and aggregates the results into a [`PortfolioSnapshot`]. Prices
//! and exchange rates come from the collaborator traits in [`market_data`] and
//! [`fx`].

pub mod activities;
pub mod constants;
pub mod errors;
pub mod fx;
pub mod market_data;
pub mod portfolio;
pub mod settings;
pub mod utils;

pub use activities::{Activity, ActivityType};
pub use portfolio::performance::{DateRange, PerformanceCalculationType};
pub use portfolio::snapshot::{
    PortfolioSnapshot, PortfolioSnapshotService, PortfolioSnapshotServiceTrait, TimelinePosition,
};
pub use settings::CalculationSettings;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
