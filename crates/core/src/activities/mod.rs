//! Activities module - ledger events consumed by the performance engine.

mod activities_constants;
mod activities_errors;
mod activities_model;

#[cfg(test)]
mod activities_model_tests;

pub use activities_constants::*;
pub use activities_errors::ActivityError;
pub use activities_model::{sort_activities, Activity, ActivityType};
