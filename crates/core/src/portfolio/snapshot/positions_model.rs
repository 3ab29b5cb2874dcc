use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::portfolio::performance::DateRange;

/// Valued holding of one symbol at the snapshot's end date.
///
/// `investment`, the market value and every performance figure are in the base
/// currency; `average_price`, `market_price`, `fee` and `dividend` are in the
/// symbol's currency. Performance fields are `None` when the symbol could not be
/// valued (`has_errors`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelinePosition {
    pub symbol: String,
    pub currency: String,
    pub quantity: Decimal,
    pub average_price: Decimal,
    pub first_buy_date: NaiveDate,
    pub last_activity_date: NaiveDate,
    pub transaction_count: u32,

    pub investment: Decimal,
    pub investment_with_currency_effect: Decimal,
    pub fee: Decimal,
    pub fee_in_base_currency: Decimal,

    pub market_price: Decimal,
    pub market_price_in_base_currency: Decimal,
    pub value_in_base_currency: Decimal,

    pub dividend: Decimal,
    pub dividend_in_base_currency: Decimal,
    pub trailing_dividend_in_base_currency: Decimal,
    pub dividend_yield_trailing_twelve_months: Decimal,
    pub dividend_yield_annualized: Decimal,
    pub interest_in_base_currency: Decimal,
    pub liabilities_in_base_currency: Decimal,

    pub gross_performance: Option<Decimal>,
    pub gross_performance_with_currency_effect: Option<Decimal>,
    pub gross_performance_percentage: Option<Decimal>,
    pub gross_performance_percentage_with_currency_effect: Option<Decimal>,
    pub net_performance: Option<Decimal>,
    pub net_performance_with_currency_effect: Option<Decimal>,
    pub net_performance_percentage: Option<Decimal>,
    pub net_performance_percentage_with_currency_effect: Option<Decimal>,
    pub net_performance_with_currency_effect_map: Option<BTreeMap<DateRange, Decimal>>,
    pub net_performance_percentage_with_currency_effect_map: Option<BTreeMap<DateRange, Decimal>>,
    pub time_weighted_investment: Option<Decimal>,
    pub time_weighted_investment_with_currency_effect: Option<Decimal>,

    pub has_errors: bool,
}
