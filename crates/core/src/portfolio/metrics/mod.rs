//! Per-symbol valuation: order sequencing and the metrics walk.

mod order_sequence;
mod symbol_metrics_calculator;
mod symbol_metrics_model;

pub use order_sequence::{boundary_index, build_order_sequence};
pub use symbol_metrics_calculator::compute_symbol_metrics;
pub use symbol_metrics_model::*;
