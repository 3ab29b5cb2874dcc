use super::calculator_traits::PerformanceCalculatorTrait;
use super::performance_model::{OverallPerformance, PerformanceCalculationType};
use super::position_aggregator::aggregate_positions;
use crate::errors::Result;
use crate::portfolio::metrics::{
    compute_symbol_metrics, InvestmentBasis, SymbolMetrics, SymbolMetricsInput,
};
use crate::portfolio::snapshot::TimelinePosition;

/// Return on average investment: performance relative to the day-weighted average
/// of the capital held in each symbol.
#[derive(Debug, Default, Clone, Copy)]
pub struct RoaiPortfolioCalculator;

impl PerformanceCalculatorTrait for RoaiPortfolioCalculator {
    fn calculation_type(&self) -> PerformanceCalculationType {
        PerformanceCalculationType::Roai
    }

    fn get_symbol_metrics(&self, input: &SymbolMetricsInput<'_>) -> Result<SymbolMetrics> {
        compute_symbol_metrics(input, InvestmentBasis::TimeWeightedAverage)
    }

    fn calculate_overall_performance(&self, positions: &[TimelinePosition]) -> OverallPerformance {
        aggregate_positions(positions)
    }
}
