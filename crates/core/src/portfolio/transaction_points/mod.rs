//! Transaction points: cumulative per-symbol holdings after each activity date.

mod transaction_point_builder;
mod transaction_point_model;

pub use transaction_point_builder::*;
pub use transaction_point_model::*;
