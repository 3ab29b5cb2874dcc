//! Portfolio snapshot domain models.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::TimelinePosition;
use crate::portfolio::performance::{DateRange, PerformanceCalculationType, RangePerformance};

/// Symbol that could not be valued.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetErrorItem {
    pub symbol: String,
    pub message: String,
}

impl std::fmt::Display for AssetErrorItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.symbol, self.message)
    }
}

/// Portfolio totals on one reporting-grid date, summed over all symbols.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoricalDataItem {
    pub date: NaiveDate,
    /// Investment added on this date
    pub investment_value_with_currency_effect: Decimal,
    pub net_performance: Decimal,
    pub net_performance_with_currency_effect: Decimal,
    pub net_performance_in_percentage: Decimal,
    pub net_performance_in_percentage_with_currency_effect: Decimal,
    pub total_investment: Decimal,
    pub total_investment_value_with_currency_effect: Decimal,
    pub time_weighted_investment: Decimal,
    pub time_weighted_investment_with_currency_effect: Decimal,
    pub value: Decimal,
    pub value_with_currency_effect: Decimal,
}

/// Complete result of a snapshot computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioSnapshot {
    pub base_currency: String,
    pub calculation_type: PerformanceCalculationType,
    pub created_at: DateTime<Utc>,
    pub start_date: Option<NaiveDate>,
    pub end_date: NaiveDate,

    /// Number of buy, sell and stake activities
    pub activities_count: usize,
    pub positions: Vec<TimelinePosition>,
    pub historical_data: Vec<HistoricalDataItem>,
    pub performance_by_date_range: BTreeMap<DateRange, RangePerformance>,

    pub current_value_in_base_currency: Decimal,
    pub total_investment: Decimal,
    pub total_investment_with_currency_effect: Decimal,
    pub total_fees_with_currency_effect: Decimal,
    pub total_interest_with_currency_effect: Decimal,
    pub total_liabilities_with_currency_effect: Decimal,
    pub total_dividend_in_base_currency: Decimal,

    pub gross_performance: Decimal,
    pub gross_performance_with_currency_effect: Decimal,
    pub gross_performance_percentage: Decimal,
    pub gross_performance_percentage_with_currency_effect: Decimal,
    pub net_performance: Decimal,
    pub net_performance_with_currency_effect: Decimal,
    pub net_performance_percentage: Decimal,
    pub net_performance_percentage_with_currency_effect: Decimal,
    pub total_time_weighted_investment: Decimal,
    pub total_time_weighted_investment_with_currency_effect: Decimal,

    pub dividend_yield_trailing_twelve_months: Decimal,
    pub dividend_yield_annualized: Decimal,

    pub errors: Vec<AssetErrorItem>,
    pub has_errors: bool,
}

impl PortfolioSnapshot {
    /// Snapshot of a portfolio without any activity up to `end_date`.
    pub fn empty(
        base_currency: &str,
        calculation_type: PerformanceCalculationType,
        end_date: NaiveDate,
    ) -> Self {
        PortfolioSnapshot {
            base_currency: base_currency.to_string(),
            calculation_type,
            created_at: Utc::now(),
            start_date: None,
            end_date,
            activities_count: 0,
            positions: Vec::new(),
            historical_data: Vec::new(),
            performance_by_date_range: BTreeMap::new(),
            current_value_in_base_currency: Decimal::ZERO,
            total_investment: Decimal::ZERO,
            total_investment_with_currency_effect: Decimal::ZERO,
            total_fees_with_currency_effect: Decimal::ZERO,
            total_interest_with_currency_effect: Decimal::ZERO,
            total_liabilities_with_currency_effect: Decimal::ZERO,
            total_dividend_in_base_currency: Decimal::ZERO,
            gross_performance: Decimal::ZERO,
            gross_performance_with_currency_effect: Decimal::ZERO,
            gross_performance_percentage: Decimal::ZERO,
            gross_performance_percentage_with_currency_effect: Decimal::ZERO,
            net_performance: Decimal::ZERO,
            net_performance_with_currency_effect: Decimal::ZERO,
            net_performance_percentage: Decimal::ZERO,
            net_performance_percentage_with_currency_effect: Decimal::ZERO,
            total_time_weighted_investment: Decimal::ZERO,
            total_time_weighted_investment_with_currency_effect: Decimal::ZERO,
            dividend_yield_trailing_twelve_months: Decimal::ZERO,
            dividend_yield_annualized: Decimal::ZERO,
            errors: Vec::new(),
            has_errors: false,
        }
    }

    pub fn position(&self, symbol: &str) -> Option<&TimelinePosition> {
        self.positions.iter().find(|position| position.symbol == symbol)
    }
}
