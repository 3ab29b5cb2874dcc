use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::activities::ActivityType;
use crate::fx::DailyExchangeRates;
use crate::market_data::MarketSymbolMap;
use crate::portfolio::performance::DateRange;
use crate::portfolio::portfolio_order::PortfolioOrder;

/// Synthetic orders placed on the window boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BoundaryMarker {
    Start,
    End,
}

impl BoundaryMarker {
    pub fn as_str(&self) -> &'static str {
        match self {
            BoundaryMarker::Start => "start",
            BoundaryMarker::End => "end",
        }
    }
}

/// Working copy of an order inside one symbol's valuation walk.
///
/// Synthetic orders (window boundaries and gap fills) are zero-quantity buys that only
/// carry a price, so the walk can value the holding on every grid date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrichedOrder {
    pub date: NaiveDate,
    pub activity_type: ActivityType,
    pub quantity: Decimal,
    pub unit_price: Option<Decimal>,
    pub unit_price_from_market_data: Option<Decimal>,
    pub fee: Decimal,
    pub boundary: Option<BoundaryMarker>,
    pub synthetic: bool,
    pub unit_price_in_base_currency: Option<Decimal>,
    pub unit_price_in_base_currency_with_currency_effect: Option<Decimal>,
    pub fee_in_base_currency: Decimal,
    pub fee_in_base_currency_with_currency_effect: Decimal,
}

impl EnrichedOrder {
    pub fn from_order(order: &PortfolioOrder) -> Self {
        EnrichedOrder {
            date: order.date,
            activity_type: order.activity_type,
            quantity: order.quantity,
            unit_price: Some(order.unit_price),
            unit_price_from_market_data: None,
            fee: order.fee,
            boundary: None,
            synthetic: false,
            unit_price_in_base_currency: None,
            unit_price_in_base_currency_with_currency_effect: None,
            fee_in_base_currency: Decimal::ZERO,
            fee_in_base_currency_with_currency_effect: Decimal::ZERO,
        }
    }

    pub fn synthetic(
        date: NaiveDate,
        unit_price: Option<Decimal>,
        boundary: Option<BoundaryMarker>,
    ) -> Self {
        EnrichedOrder {
            date,
            activity_type: ActivityType::Buy,
            quantity: Decimal::ZERO,
            unit_price,
            unit_price_from_market_data: if boundary.is_none() { unit_price } else { None },
            fee: Decimal::ZERO,
            boundary,
            synthetic: true,
            unit_price_in_base_currency: None,
            unit_price_in_base_currency_with_currency_effect: None,
            fee_in_base_currency: Decimal::ZERO,
            fee_in_base_currency_with_currency_effect: Decimal::ZERO,
        }
    }

    /// Same-day ordering: the start marker precedes real orders, the end marker
    /// follows them.
    pub(crate) fn intraday_rank(&self) -> u8 {
        match self.boundary {
            Some(BoundaryMarker::Start) => 0,
            None => 1,
            Some(BoundaryMarker::End) => 2,
        }
    }

    /// Price used to value the holding at this order: the traded price for buys and
    /// sells, the market price otherwise.
    pub fn valuation_price(&self) -> Option<Decimal> {
        if self.activity_type.is_trade() {
            self.unit_price
        } else {
            self.unit_price_from_market_data
        }
    }
}

/// Which capital the performance percentages are measured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvestmentBasis {
    /// Day-weighted average of the capital at risk (ROAI)
    TimeWeightedAverage,
    /// Value held at the window start plus every later purchase (ROI)
    InvestedCapital,
}

/// Everything one symbol's valuation walk needs. Read-only and shared across the
/// parallel per-symbol computations.
#[derive(Debug, Clone, Copy)]
pub struct SymbolMetricsInput<'a> {
    pub symbol: &'a str,
    /// Orders of `symbol` only
    pub orders: &'a [PortfolioOrder],
    /// Reporting grid, ascending
    pub chart_dates: &'a [NaiveDate],
    pub market_symbol_map: &'a MarketSymbolMap,
    /// Rates from the symbol's currency into the base currency
    pub exchange_rates: &'a DailyExchangeRates,
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Date of the "current" exchange rate and reference of the trailing window
    pub as_of: NaiveDate,
    pub date_ranges: &'a [DateRange],
    pub dividend_trailing_days: u32,
}

/// Result of one symbol's valuation walk.
///
/// Totals are relative to the window start unless noted. Series are keyed by grid
/// date. Amounts in base currency without `with_currency_effect` use the exchange
/// rate of `as_of`; the `with_currency_effect` variants use the rate of each order's
/// date.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolMetrics {
    pub symbol: String,
    pub has_errors: bool,
    /// Market data was missing, so only income, fees and cost basis were folded
    pub income_only: bool,
    pub total_units: Decimal,
    /// Market price at the window end, in the symbol's currency
    pub unit_price_at_end: Option<Decimal>,

    pub initial_value: Option<Decimal>,
    pub initial_value_with_currency_effect: Option<Decimal>,
    /// Cost basis at the window end
    pub total_investment: Decimal,
    pub total_investment_with_currency_effect: Decimal,

    pub fees: Decimal,
    pub fees_with_currency_effect: Decimal,
    pub fees_per_unit: Decimal,
    pub fees_per_unit_with_currency_effect: Decimal,

    pub gross_performance: Decimal,
    pub gross_performance_with_currency_effect: Decimal,
    pub gross_performance_percentage: Decimal,
    pub gross_performance_percentage_with_currency_effect: Decimal,
    pub net_performance: Decimal,
    pub net_performance_with_currency_effect: Decimal,
    pub net_performance_percentage: Decimal,
    pub net_performance_percentage_with_currency_effect: Decimal,

    /// Denominator of the percentages, as chosen by the [`InvestmentBasis`]
    pub time_weighted_investment: Decimal,
    pub time_weighted_investment_with_currency_effect: Decimal,

    pub total_dividend: Decimal,
    pub total_dividend_in_base_currency: Decimal,
    pub total_dividend_in_base_currency_with_currency_effect: Decimal,
    /// Dividends within the trailing window before `as_of`, at their dates' rates
    pub trailing_dividend_in_base_currency: Decimal,
    pub total_interest: Decimal,
    pub total_interest_in_base_currency: Decimal,
    pub total_interest_in_base_currency_with_currency_effect: Decimal,
    pub total_liabilities: Decimal,
    pub total_liabilities_in_base_currency: Decimal,
    pub total_liabilities_in_base_currency_with_currency_effect: Decimal,

    pub current_values: BTreeMap<NaiveDate, Decimal>,
    pub current_values_with_currency_effect: BTreeMap<NaiveDate, Decimal>,
    pub investment_values_accumulated: BTreeMap<NaiveDate, Decimal>,
    pub investment_values_accumulated_with_currency_effect: BTreeMap<NaiveDate, Decimal>,
    /// Investment added on each date (not cumulative)
    pub investment_values_with_currency_effect: BTreeMap<NaiveDate, Decimal>,
    pub net_performance_values: BTreeMap<NaiveDate, Decimal>,
    pub net_performance_values_with_currency_effect: BTreeMap<NaiveDate, Decimal>,
    pub time_weighted_investment_values: BTreeMap<NaiveDate, Decimal>,
    pub time_weighted_investment_values_with_currency_effect: BTreeMap<NaiveDate, Decimal>,

    pub net_performance_with_currency_effect_map: BTreeMap<DateRange, Decimal>,
    pub net_performance_percentage_with_currency_effect_map: BTreeMap<DateRange, Decimal>,
}

impl SymbolMetrics {
    pub fn empty(symbol: &str) -> Self {
        SymbolMetrics {
            symbol: symbol.to_string(),
            ..Default::default()
        }
    }
}
