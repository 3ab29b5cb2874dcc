//! Synchronous snapshot assembly over pre-loaded market data.

use chrono::NaiveDate;
use log::{debug, warn};
use rayon::prelude::*;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;
use std::time::Instant;

use super::chart_dates::build_chart_dates;
use super::market_data_loader::{MarketDataRequest, PortfolioMarketData};
use super::{AssetErrorItem, HistoricalDataItem, PortfolioSnapshot, TimelinePosition};
use crate::activities::is_counted_activity;
use crate::errors::{CalculatorError, Result};
use crate::portfolio::metrics::{SymbolMetrics, SymbolMetricsInput};
use crate::portfolio::performance::{
    create_performance_calculator, date_range_performance, DateRange, PerformanceCalculationType,
    PerformanceCalculatorTrait,
};
use crate::portfolio::portfolio_order::PortfolioOrder;
use crate::portfolio::transaction_points::{
    build_transaction_points, TransactionPoint, TransactionPointItem,
};
use crate::settings::CalculationSettings;
use crate::utils::time_utils::sub_days;

/// Holds a sorted ledger and its derived transaction points for one snapshot.
///
/// The window runs from the day before the first activity to `end_date`. All market
/// data must be fetched up front (see [`PortfolioCalculator::market_data_request`]);
/// [`PortfolioCalculator::compute_snapshot`] does no I/O.
pub struct PortfolioCalculator {
    orders: Vec<PortfolioOrder>,
    orders_by_symbol: HashMap<String, Vec<PortfolioOrder>>,
    transaction_points: Vec<TransactionPoint>,
    base_currency: String,
    calculator: Arc<dyn PerformanceCalculatorTrait>,
    start_date: Option<NaiveDate>,
    end_date: NaiveDate,
    chart_dates: Vec<NaiveDate>,
    date_ranges: Vec<DateRange>,
    dividend_trailing_days: u32,
}

impl PortfolioCalculator {
    pub fn new(
        mut orders: Vec<PortfolioOrder>,
        calculation_type: PerformanceCalculationType,
        base_currency: &str,
        end_date: NaiveDate,
        settings: &CalculationSettings,
    ) -> Self {
        orders.sort_by_key(|order| order.date);
        let transaction_points = build_transaction_points(&orders);

        let mut orders_by_symbol: HashMap<String, Vec<PortfolioOrder>> = HashMap::new();
        for order in &orders {
            orders_by_symbol
                .entry(order.symbol.clone())
                .or_default()
                .push(order.clone());
        }

        let start_date = orders
            .first()
            .map(|order| sub_days(order.date, 1))
            .filter(|start| *start < end_date);
        let (chart_dates, date_ranges) = match start_date {
            Some(start) => (
                build_chart_dates(
                    start,
                    end_date,
                    transaction_points.iter().map(|point| point.date),
                    settings.max_chart_items,
                ),
                DateRange::ranges_for_window(start, end_date),
            ),
            None => (Vec::new(), Vec::new()),
        };

        PortfolioCalculator {
            orders,
            orders_by_symbol,
            transaction_points,
            base_currency: base_currency.to_string(),
            calculator: create_performance_calculator(calculation_type),
            start_date,
            end_date,
            chart_dates,
            date_ranges,
            dividend_trailing_days: settings.dividend_trailing_days,
        }
    }

    pub fn transaction_points(&self) -> &[TransactionPoint] {
        &self.transaction_points
    }

    pub fn chart_dates(&self) -> &[NaiveDate] {
        &self.chart_dates
    }

    pub fn start_date(&self) -> Option<NaiveDate> {
        self.start_date
    }

    /// Symbols, currencies and dates the snapshot will look up.
    pub fn market_data_request(&self) -> MarketDataRequest {
        let symbols: BTreeSet<&String> = self.orders.iter().map(|order| &order.symbol).collect();
        let currencies: BTreeSet<&String> =
            self.orders.iter().map(|order| &order.currency).collect();

        let mut rate_dates: BTreeSet<NaiveDate> = self.chart_dates.iter().copied().collect();
        rate_dates.extend(self.orders.iter().map(|order| order.date));
        rate_dates.insert(self.end_date);

        MarketDataRequest {
            base_currency: self.base_currency.clone(),
            symbols: symbols.into_iter().cloned().collect(),
            currencies: currencies.into_iter().cloned().collect(),
            price_dates: self.chart_dates.clone(),
            rate_dates: rate_dates.into_iter().collect(),
        }
    }

    /// Values every holding of the last transaction point at or before the end date
    /// and sums them into the portfolio snapshot.
    pub fn compute_snapshot(&self, market_data: &PortfolioMarketData) -> Result<PortfolioSnapshot> {
        let started = Instant::now();
        let calculation_type = self.calculator.calculation_type();
        let empty = || PortfolioSnapshot::empty(&self.base_currency, calculation_type, self.end_date);

        let start = match self.start_date {
            Some(start) => start,
            None => return Ok(empty()),
        };
        let last_point = match self
            .transaction_points
            .iter()
            .rev()
            .find(|point| point.date <= self.end_date)
        {
            Some(point) => point,
            None => return Ok(empty()),
        };

        let valued: Vec<(TimelinePosition, SymbolMetrics)> = last_point
            .items
            .par_iter()
            .map(|item| self.value_item(item, last_point.date, start, market_data))
            .collect::<Result<Vec<_>>>()?;

        let errors: Vec<AssetErrorItem> = valued
            .iter()
            .filter(|(position, _)| position.has_errors && position.investment > Decimal::ZERO)
            .map(|(position, _)| AssetErrorItem {
                symbol: position.symbol.clone(),
                message: format!("Missing market data for {}", position.symbol),
            })
            .collect();
        for error in &errors {
            warn!("{}", error);
        }

        let historical_data = self.historical_data(start, &valued);
        let net_series: BTreeMap<NaiveDate, Decimal> = historical_data
            .iter()
            .map(|item| (item.date, item.net_performance_with_currency_effect))
            .collect();
        let basis_series: BTreeMap<NaiveDate, Decimal> = historical_data
            .iter()
            .map(|item| (item.date, item.time_weighted_investment_with_currency_effect))
            .collect();
        let performance_by_date_range = date_range_performance(
            &self.date_ranges,
            &net_series,
            &basis_series,
            start,
            self.end_date,
        );

        let any_symbol_errors = valued.iter().any(|(_, metrics)| metrics.has_errors);
        let positions: Vec<TimelinePosition> =
            valued.into_iter().map(|(position, _)| position).collect();
        let overall = self.calculator.calculate_overall_performance(&positions);

        let activities_count = self
            .orders
            .iter()
            .filter(|order| order.date <= self.end_date)
            .filter(|order| is_counted_activity(order.activity_type.as_str()))
            .count();

        debug!(
            "Computed {} snapshot of {} positions over {} grid dates in {:?}",
            calculation_type,
            positions.len(),
            historical_data.len(),
            started.elapsed()
        );

        Ok(PortfolioSnapshot {
            start_date: Some(start),
            activities_count,
            positions,
            historical_data,
            performance_by_date_range,
            current_value_in_base_currency: overall.current_value_in_base_currency,
            total_investment: overall.total_investment,
            total_investment_with_currency_effect: overall.total_investment_with_currency_effect,
            total_fees_with_currency_effect: overall.total_fees_with_currency_effect,
            total_interest_with_currency_effect: overall.total_interest_with_currency_effect,
            total_liabilities_with_currency_effect: overall.total_liabilities_with_currency_effect,
            total_dividend_in_base_currency: overall.total_dividend_in_base_currency,
            gross_performance: overall.gross_performance,
            gross_performance_with_currency_effect: overall.gross_performance_with_currency_effect,
            gross_performance_percentage: overall.gross_performance_percentage,
            gross_performance_percentage_with_currency_effect: overall
                .gross_performance_percentage_with_currency_effect,
            net_performance: overall.net_performance,
            net_performance_with_currency_effect: overall.net_performance_with_currency_effect,
            net_performance_percentage: overall.net_performance_percentage,
            net_performance_percentage_with_currency_effect: overall
                .net_performance_percentage_with_currency_effect,
            total_time_weighted_investment: overall.total_time_weighted_investment,
            total_time_weighted_investment_with_currency_effect: overall
                .total_time_weighted_investment_with_currency_effect,
            dividend_yield_trailing_twelve_months: overall.dividend_yield_trailing_twelve_months,
            dividend_yield_annualized: overall.dividend_yield_annualized,
            errors,
            has_errors: any_symbol_errors || overall.has_errors,
            ..empty()
        })
    }

    fn value_item(
        &self,
        item: &TransactionPointItem,
        point_date: NaiveDate,
        start: NaiveDate,
        market_data: &PortfolioMarketData,
    ) -> Result<(TimelinePosition, SymbolMetrics)> {
        let orders = self.orders_by_symbol.get(&item.symbol).ok_or_else(|| {
            CalculatorError::MissingSymbolAccumulator {
                symbol: item.symbol.clone(),
                date: point_date,
            }
        })?;
        let exchange_rates = market_data.exchange_rates.for_currency(&item.currency);

        let input = SymbolMetricsInput {
            symbol: &item.symbol,
            orders,
            chart_dates: &self.chart_dates,
            market_symbol_map: &market_data.market_symbol_map,
            exchange_rates,
            start,
            end: self.end_date,
            as_of: self.end_date,
            date_ranges: &self.date_ranges,
            dividend_trailing_days: self.dividend_trailing_days,
        };
        let metrics = self.calculator.get_symbol_metrics(&input)?;
        let position = build_position(item, &metrics, exchange_rates.rate_or_one(self.end_date));
        Ok((position, metrics))
    }

    fn historical_data(
        &self,
        start: NaiveDate,
        valued: &[(TimelinePosition, SymbolMetrics)],
    ) -> Vec<HistoricalDataItem> {
        let sum = |date: &NaiveDate, series: fn(&SymbolMetrics) -> &BTreeMap<NaiveDate, Decimal>| {
            valued
                .iter()
                .map(|(_, metrics)| series(metrics).get(date).copied().unwrap_or_default())
                .sum::<Decimal>()
        };

        self.chart_dates
            .iter()
            .filter(|date| **date >= start && **date <= self.end_date)
            .map(|date| {
                let net_performance = sum(date, |m| &m.net_performance_values);
                let net_performance_with_currency_effect =
                    sum(date, |m| &m.net_performance_values_with_currency_effect);
                let time_weighted_investment = sum(date, |m| &m.time_weighted_investment_values);
                let time_weighted_investment_with_currency_effect =
                    sum(date, |m| &m.time_weighted_investment_values_with_currency_effect);

                HistoricalDataItem {
                    date: *date,
                    investment_value_with_currency_effect: sum(date, |m| {
                        &m.investment_values_with_currency_effect
                    }),
                    net_performance,
                    net_performance_with_currency_effect,
                    net_performance_in_percentage: ratio(
                        net_performance,
                        time_weighted_investment,
                    ),
                    net_performance_in_percentage_with_currency_effect: ratio(
                        net_performance_with_currency_effect,
                        time_weighted_investment_with_currency_effect,
                    ),
                    total_investment: sum(date, |m| &m.investment_values_accumulated),
                    total_investment_value_with_currency_effect: sum(date, |m| {
                        &m.investment_values_accumulated_with_currency_effect
                    }),
                    time_weighted_investment,
                    time_weighted_investment_with_currency_effect,
                    value: sum(date, |m| &m.current_values),
                    value_with_currency_effect: sum(date, |m| {
                        &m.current_values_with_currency_effect
                    }),
                }
            })
            .collect()
    }
}

fn ratio(numerator: Decimal, denominator: Decimal) -> Decimal {
    if denominator.is_zero() {
        Decimal::ZERO
    } else {
        numerator / denominator
    }
}

fn build_position(
    item: &TransactionPointItem,
    metrics: &SymbolMetrics,
    current_rate: Decimal,
) -> TimelinePosition {
    let is_valued = !metrics.has_errors && !metrics.income_only;
    let valued = |value: Decimal| is_valued.then_some(value);
    let market_price = metrics.unit_price_at_end.unwrap_or(item.average_price);
    let market_price_in_base_currency = market_price * current_rate;
    let investment_with_currency_effect = metrics.total_investment_with_currency_effect;

    TimelinePosition {
        symbol: item.symbol.clone(),
        currency: item.currency.clone(),
        quantity: item.quantity,
        average_price: item.average_price,
        first_buy_date: item.first_buy_date,
        last_activity_date: item.last_activity_date,
        transaction_count: item.transaction_count,
        investment: metrics.total_investment,
        investment_with_currency_effect,
        fee: item.fee,
        fee_in_base_currency: metrics.fees_with_currency_effect,
        market_price,
        market_price_in_base_currency,
        value_in_base_currency: market_price_in_base_currency * item.quantity,
        dividend: metrics.total_dividend,
        dividend_in_base_currency: metrics.total_dividend_in_base_currency_with_currency_effect,
        trailing_dividend_in_base_currency: metrics.trailing_dividend_in_base_currency,
        dividend_yield_trailing_twelve_months: ratio(
            metrics.trailing_dividend_in_base_currency,
            investment_with_currency_effect,
        ),
        dividend_yield_annualized: ratio(
            metrics.total_dividend_in_base_currency_with_currency_effect,
            investment_with_currency_effect,
        ),
        interest_in_base_currency: metrics.total_interest_in_base_currency_with_currency_effect,
        liabilities_in_base_currency: metrics
            .total_liabilities_in_base_currency_with_currency_effect,
        gross_performance: valued(metrics.gross_performance),
        gross_performance_with_currency_effect: valued(
            metrics.gross_performance_with_currency_effect,
        ),
        gross_performance_percentage: valued(metrics.gross_performance_percentage),
        gross_performance_percentage_with_currency_effect: valued(
            metrics.gross_performance_percentage_with_currency_effect,
        ),
        net_performance: valued(metrics.net_performance),
        net_performance_with_currency_effect: valued(metrics.net_performance_with_currency_effect),
        net_performance_percentage: valued(metrics.net_performance_percentage),
        net_performance_percentage_with_currency_effect: valued(
            metrics.net_performance_percentage_with_currency_effect,
        ),
        net_performance_with_currency_effect_map: is_valued
            .then(|| metrics.net_performance_with_currency_effect_map.clone()),
        net_performance_percentage_with_currency_effect_map: is_valued
            .then(|| metrics.net_performance_percentage_with_currency_effect_map.clone()),
        time_weighted_investment: valued(metrics.time_weighted_investment),
        time_weighted_investment_with_currency_effect: valued(
            metrics.time_weighted_investment_with_currency_effect,
        ),
        has_errors: metrics.has_errors,
    }
}
