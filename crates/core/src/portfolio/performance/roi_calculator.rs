use super::calculator_traits::PerformanceCalculatorTrait;
use super::performance_model::{OverallPerformance, PerformanceCalculationType};
use super::position_aggregator::aggregate_positions;
use crate::errors::Result;
use crate::portfolio::metrics::{
    compute_symbol_metrics, InvestmentBasis, SymbolMetrics, SymbolMetricsInput,
};
use crate::portfolio::snapshot::TimelinePosition;

/// Simple return on investment: performance relative to the capital put in, i.e. the
/// value held at the window start plus all later purchases. Sales never reduce it.
#[derive(Debug, Default, Clone, Copy)]
pub struct RoiPortfolioCalculator;

impl PerformanceCalculatorTrait for RoiPortfolioCalculator {
    fn calculation_type(&self) -> PerformanceCalculationType {
        PerformanceCalculationType::Roi
    }

    fn get_symbol_metrics(&self, input: &SymbolMetricsInput<'_>) -> Result<SymbolMetrics> {
        compute_symbol_metrics(input, InvestmentBasis::InvestedCapital)
    }

    fn calculate_overall_performance(&self, positions: &[TimelinePosition]) -> OverallPerformance {
        aggregate_positions(positions)
    }
}
