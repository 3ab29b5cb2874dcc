use super::performance_model::{OverallPerformance, PerformanceCalculationType};
use crate::errors::Result;
use crate::portfolio::metrics::{SymbolMetrics, SymbolMetricsInput};
use crate::portfolio::snapshot::TimelinePosition;

/// Return methodology plugged into the snapshot computation.
///
/// Implementations are stateless and shared across the parallel per-symbol walks.
pub trait PerformanceCalculatorTrait: Send + Sync {
    fn calculation_type(&self) -> PerformanceCalculationType;

    /// Valuation walk of one symbol over the input window.
    fn get_symbol_metrics(&self, input: &SymbolMetricsInput<'_>) -> Result<SymbolMetrics>;

    /// Portfolio totals of the valued positions.
    fn calculate_overall_performance(&self, positions: &[TimelinePosition]) -> OverallPerformance;
}
