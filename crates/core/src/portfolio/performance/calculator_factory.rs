use std::sync::Arc;

use super::calculator_traits::PerformanceCalculatorTrait;
use super::performance_model::PerformanceCalculationType;
use super::roai_calculator::RoaiPortfolioCalculator;
use super::roi_calculator::RoiPortfolioCalculator;

pub fn create_performance_calculator(
    calculation_type: PerformanceCalculationType,
) -> Arc<dyn PerformanceCalculatorTrait> {
    match calculation_type {
        PerformanceCalculationType::Roai => Arc::new(RoaiPortfolioCalculator),
        PerformanceCalculationType::Roi => Arc::new(RoiPortfolioCalculator),
    }
}
