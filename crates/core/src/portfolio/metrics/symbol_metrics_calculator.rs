//! Valuation walk of a single symbol over the reporting window.

use chrono::NaiveDate;
use log::{debug, error, warn};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::str::FromStr;

use super::order_sequence::{boundary_index, build_order_sequence};
use super::symbol_metrics_model::{
    BoundaryMarker, EnrichedOrder, InvestmentBasis, SymbolMetrics, SymbolMetricsInput,
};
use crate::activities::ActivityType;
use crate::constants::SAME_DAY_INVESTMENT_WEIGHT;
use crate::errors::{CalculatorError, Result};
use crate::portfolio::performance::date_range_performance;
use crate::portfolio::portfolio_order::PortfolioOrder;
use crate::utils::time_utils::sub_days;

/// Income and fee totals of a symbol. Filled from real orders only.
#[derive(Debug, Default)]
struct IncomeTotals {
    dividend: Decimal,
    dividend_in_base: Decimal,
    dividend_in_base_with_effect: Decimal,
    trailing_dividend_in_base: Decimal,
    interest: Decimal,
    interest_in_base: Decimal,
    interest_in_base_with_effect: Decimal,
    liabilities: Decimal,
    liabilities_in_base: Decimal,
    liabilities_in_base_with_effect: Decimal,
}

impl IncomeTotals {
    fn record(
        &mut self,
        activity_type: ActivityType,
        amount: Decimal,
        date: NaiveDate,
        current_rate: Decimal,
        rate_at_date: Decimal,
        trailing_window: (NaiveDate, NaiveDate),
    ) {
        match activity_type {
            ActivityType::Dividend => {
                self.dividend += amount;
                self.dividend_in_base += amount * current_rate;
                self.dividend_in_base_with_effect += amount * rate_at_date;
                if date > trailing_window.0 && date <= trailing_window.1 {
                    self.trailing_dividend_in_base += amount * rate_at_date;
                }
            }
            ActivityType::Interest => {
                self.interest += amount;
                self.interest_in_base += amount * current_rate;
                self.interest_in_base_with_effect += amount * rate_at_date;
            }
            ActivityType::Liability => {
                self.liabilities += amount;
                self.liabilities_in_base += amount * current_rate;
                self.liabilities_in_base_with_effect += amount * rate_at_date;
            }
            _ => {}
        }
    }

    fn apply_to(&self, metrics: &mut SymbolMetrics) {
        metrics.total_dividend = self.dividend;
        metrics.total_dividend_in_base_currency = self.dividend_in_base;
        metrics.total_dividend_in_base_currency_with_currency_effect =
            self.dividend_in_base_with_effect;
        metrics.trailing_dividend_in_base_currency = self.trailing_dividend_in_base;
        metrics.total_interest = self.interest;
        metrics.total_interest_in_base_currency = self.interest_in_base;
        metrics.total_interest_in_base_currency_with_currency_effect =
            self.interest_in_base_with_effect;
        metrics.total_liabilities = self.liabilities;
        metrics.total_liabilities_in_base_currency = self.liabilities_in_base;
        metrics.total_liabilities_in_base_currency_with_currency_effect =
            self.liabilities_in_base_with_effect;
    }
}

/// Position of one order within the walk, shared by both valuation legs.
struct WalkStep {
    activity_type: ActivityType,
    quantity: Decimal,
    date: NaiveDate,
    is_start: bool,
    at_or_after_start: bool,
    after_start: bool,
    days_since_previous: Decimal,
}

/// Running state of one valuation variant (current rate, or rate at order date).
#[derive(Debug, Default)]
struct ValuationLeg {
    total_units: Decimal,
    total_investment: Decimal,
    investment_from_buys: Decimal,
    units_from_buys: Decimal,
    last_average_price: Decimal,
    gross_from_sells: Decimal,
    fees: Decimal,
    income: Decimal,
    last_unit_price: Decimal,

    initial_value: Option<Decimal>,
    investment_at_start: Option<Decimal>,
    value_at_start: Option<Decimal>,
    gross_performance: Decimal,
    gross_at_start: Decimal,
    fees_at_start: Decimal,

    time_weighted_sum: Decimal,
    investment_days: Decimal,
    buys_since_start: Decimal,

    current_values: BTreeMap<NaiveDate, Decimal>,
    net_performance_values: BTreeMap<NaiveDate, Decimal>,
    investment_values_accumulated: BTreeMap<NaiveDate, Decimal>,
    investment_values: BTreeMap<NaiveDate, Decimal>,
    time_weighted_investment_values: BTreeMap<NaiveDate, Decimal>,
    invested_capital_values: BTreeMap<NaiveDate, Decimal>,
}

impl ValuationLeg {
    fn apply(
        &mut self,
        step: &WalkStep,
        unit_price: Option<Decimal>,
        fee: Decimal,
        income: Decimal,
        same_day_weight: Decimal,
    ) {
        // Orders without any price are valued at the previous one
        let unit_price = match unit_price {
            Some(price) => {
                self.last_unit_price = price;
                price
            }
            None => self.last_unit_price,
        };

        let value_before = self.total_units * unit_price;
        if step.at_or_after_start && self.investment_at_start.is_none() {
            self.investment_at_start = Some(self.total_investment);
            self.value_at_start = Some(value_before);
        }

        let transaction_investment = match step.activity_type {
            ActivityType::Buy => step.quantity * unit_price,
            ActivityType::Sell if self.total_units > Decimal::ZERO => {
                -(self.total_investment / self.total_units * step.quantity)
            }
            _ => Decimal::ZERO,
        };

        let investment_before = self.total_investment;
        self.total_investment += transaction_investment;

        if step.at_or_after_start && self.initial_value.is_none() {
            if step.is_start && !value_before.is_zero() {
                self.initial_value = Some(value_before);
            } else if transaction_investment > Decimal::ZERO {
                self.initial_value = Some(transaction_investment);
            }
        }

        self.fees += fee;
        self.income += income;
        self.total_units += step.quantity * step.activity_type.factor();

        let value = self.total_units * unit_price;

        if step.activity_type == ActivityType::Sell {
            self.gross_from_sells += (unit_price - self.last_average_price) * step.quantity;
        }
        if step.activity_type == ActivityType::Buy {
            self.units_from_buys += step.quantity;
            self.investment_from_buys += transaction_investment;
            if step.after_start {
                self.buys_since_start += transaction_investment;
            }
        }
        self.last_average_price = if self.units_from_buys.is_zero() {
            Decimal::ZERO
        } else {
            self.investment_from_buys / self.units_from_buys
        };
        if self.total_units.is_zero() {
            self.investment_from_buys = Decimal::ZERO;
            self.units_from_buys = Decimal::ZERO;
        }

        self.gross_performance =
            value - self.total_investment + self.gross_from_sells + self.income;

        if step.is_start {
            self.fees_at_start = self.fees;
            self.gross_at_start = self.gross_performance;
        }

        if !step.after_start {
            return;
        }

        if value_before > Decimal::ZERO && step.activity_type.is_trade() {
            let days = if step.days_since_previous > Decimal::ZERO {
                step.days_since_previous
            } else {
                same_day_weight
            };
            let value_at_start = self.value_at_start.unwrap_or_default();
            let investment_at_start = self.investment_at_start.unwrap_or_default();
            self.investment_days += days;
            self.time_weighted_sum +=
                (value_at_start - investment_at_start + investment_before) * days;
        }

        self.current_values.insert(step.date, value);
        self.net_performance_values.insert(step.date, self.net_performance());
        self.investment_values_accumulated
            .insert(step.date, self.total_investment);
        *self
            .investment_values
            .entry(step.date)
            .or_insert(Decimal::ZERO) += transaction_investment;
        self.time_weighted_investment_values
            .insert(step.date, self.average_investment());
        self.invested_capital_values
            .insert(step.date, self.invested_capital());
    }

    fn gross_performance_since_start(&self) -> Decimal {
        self.gross_performance - self.gross_at_start
    }

    fn net_performance(&self) -> Decimal {
        self.gross_performance_since_start() - (self.fees - self.fees_at_start)
    }

    fn average_investment(&self) -> Decimal {
        if self.investment_days > Decimal::ZERO {
            self.time_weighted_sum / self.investment_days
        } else {
            Decimal::ZERO
        }
    }

    fn invested_capital(&self) -> Decimal {
        self.value_at_start.unwrap_or_default() + self.buys_since_start
    }

    fn basis(&self, basis: InvestmentBasis) -> Decimal {
        match basis {
            InvestmentBasis::TimeWeightedAverage => self.average_investment(),
            InvestmentBasis::InvestedCapital => self.invested_capital(),
        }
    }

    fn basis_values(&mut self, basis: InvestmentBasis) -> BTreeMap<NaiveDate, Decimal> {
        match basis {
            InvestmentBasis::TimeWeightedAverage => {
                std::mem::take(&mut self.time_weighted_investment_values)
            }
            InvestmentBasis::InvestedCapital => std::mem::take(&mut self.invested_capital_values),
        }
    }
}

fn ratio(numerator: Decimal, denominator: Decimal) -> Decimal {
    if denominator.is_zero() {
        Decimal::ZERO
    } else {
        numerator / denominator
    }
}

/// Computes the metrics of one symbol over `[input.start, input.end]`.
///
/// The holding is valued on every order and grid date. Performance earned before the
/// window start is subtracted, so only the window's own contribution remains. When a
/// required market price is missing the symbol is reported with `has_errors` and only
/// its income and fees.
pub fn compute_symbol_metrics(
    input: &SymbolMetricsInput<'_>,
    basis: InvestmentBasis,
) -> Result<SymbolMetrics> {
    let symbol = input.symbol;
    let mut metrics = SymbolMetrics::empty(symbol);

    let first_date = match input.orders.iter().map(|order| order.date).min() {
        Some(date) => date,
        None => return Ok(metrics),
    };
    if input.start > input.end {
        error!(
            "Window of {} starts after it ends ({} > {})",
            symbol, input.start, input.end
        );
        return Err(CalculatorError::InvariantViolation(format!(
            "window start {} is after window end {} for {}",
            input.start, input.end, symbol
        ))
        .into());
    }

    let current_rate = input.exchange_rates.rate_or_one(input.as_of);
    let trailing_window = (
        sub_days(input.as_of, u64::from(input.dividend_trailing_days)),
        input.as_of,
    );
    let unit_price_at_start = input.market_symbol_map.get(input.start, symbol);
    let unit_price_at_end = input.market_symbol_map.get(input.end, symbol);
    metrics.unit_price_at_end = unit_price_at_end;

    if unit_price_at_end.is_none() || (unit_price_at_start.is_none() && first_date < input.start)
    {
        warn!(
            "No market price for {} at {} (start: {}, end: {}); reporting income only",
            symbol,
            if unit_price_at_end.is_none() { input.end } else { input.start },
            input.start,
            input.end
        );
        return Ok(income_only_metrics(input, metrics, current_rate, trailing_window));
    }

    let same_day_weight = Decimal::from_str(SAME_DAY_INVESTMENT_WEIGHT)?;

    let mut sequence = build_order_sequence(
        symbol,
        input.orders,
        input.chart_dates,
        input.market_symbol_map,
        input.start,
        input.end,
        unit_price_at_start,
        unit_price_at_end,
    );
    let start_index = boundary_index(symbol, &sequence, BoundaryMarker::Start)?;
    let end_index = boundary_index(symbol, &sequence, BoundaryMarker::End)?;

    let mut plain = ValuationLeg::default();
    let mut with_effect = ValuationLeg::default();
    let mut income = IncomeTotals::default();

    for index in 0..sequence.len() {
        let previous_date = index
            .checked_sub(1)
            .map(|previous| sequence[previous].date);
        let order = &mut sequence[index];
        let rate_at_date = input.exchange_rates.rate_or_one(order.date);

        price_in_base_currency(order, current_rate, rate_at_date);

        let mut income_plain = Decimal::ZERO;
        let mut income_with_effect = Decimal::ZERO;
        if !order.synthetic {
            let amount = order.quantity * order.unit_price.unwrap_or_default();
            income.record(
                order.activity_type,
                amount,
                order.date,
                current_rate,
                rate_at_date,
                trailing_window,
            );
            if matches!(
                order.activity_type,
                ActivityType::Dividend | ActivityType::Interest
            ) {
                income_plain = amount * current_rate;
                income_with_effect = amount * rate_at_date;
            }
        }

        let step = WalkStep {
            activity_type: order.activity_type,
            quantity: order.quantity,
            date: order.date,
            is_start: order.boundary == Some(BoundaryMarker::Start),
            at_or_after_start: index >= start_index,
            after_start: index > start_index,
            days_since_previous: previous_date
                .map(|previous| Decimal::from((order.date - previous).num_days()))
                .unwrap_or_default(),
        };

        plain.apply(
            &step,
            order.unit_price_in_base_currency,
            order.fee_in_base_currency,
            income_plain,
            same_day_weight,
        );
        with_effect.apply(
            &step,
            order.unit_price_in_base_currency_with_currency_effect,
            order.fee_in_base_currency_with_currency_effect,
            income_with_effect,
            same_day_weight,
        );

        if index == end_index {
            break;
        }
    }

    income.apply_to(&mut metrics);

    metrics.total_units = plain.total_units;
    metrics.initial_value = plain.initial_value;
    metrics.initial_value_with_currency_effect = with_effect.initial_value;
    metrics.total_investment = plain.total_investment;
    metrics.total_investment_with_currency_effect = with_effect.total_investment;
    metrics.fees = plain.fees;
    metrics.fees_with_currency_effect = with_effect.fees;
    metrics.fees_per_unit = ratio(plain.fees, plain.total_units);
    metrics.fees_per_unit_with_currency_effect = ratio(with_effect.fees, plain.total_units);

    metrics.gross_performance = plain.gross_performance_since_start();
    metrics.gross_performance_with_currency_effect = with_effect.gross_performance_since_start();
    metrics.net_performance = plain.net_performance();
    metrics.net_performance_with_currency_effect = with_effect.net_performance();

    metrics.time_weighted_investment = plain.basis(basis);
    metrics.time_weighted_investment_with_currency_effect = with_effect.basis(basis);
    metrics.gross_performance_percentage =
        ratio(metrics.gross_performance, metrics.time_weighted_investment);
    metrics.gross_performance_percentage_with_currency_effect = ratio(
        metrics.gross_performance_with_currency_effect,
        metrics.time_weighted_investment_with_currency_effect,
    );
    metrics.net_performance_percentage =
        ratio(metrics.net_performance, metrics.time_weighted_investment);
    metrics.net_performance_percentage_with_currency_effect = ratio(
        metrics.net_performance_with_currency_effect,
        metrics.time_weighted_investment_with_currency_effect,
    );

    metrics.current_values = std::mem::take(&mut plain.current_values);
    metrics.current_values_with_currency_effect = std::mem::take(&mut with_effect.current_values);
    metrics.investment_values_accumulated =
        std::mem::take(&mut plain.investment_values_accumulated);
    metrics.investment_values_accumulated_with_currency_effect =
        std::mem::take(&mut with_effect.investment_values_accumulated);
    metrics.investment_values_with_currency_effect =
        std::mem::take(&mut with_effect.investment_values);
    metrics.net_performance_values = std::mem::take(&mut plain.net_performance_values);
    metrics.net_performance_values_with_currency_effect =
        std::mem::take(&mut with_effect.net_performance_values);
    metrics.time_weighted_investment_values = plain.basis_values(basis);
    metrics.time_weighted_investment_values_with_currency_effect =
        with_effect.basis_values(basis);

    for (range, performance) in date_range_performance(
        input.date_ranges,
        &metrics.net_performance_values_with_currency_effect,
        &metrics.time_weighted_investment_values_with_currency_effect,
        input.start,
        input.end,
    ) {
        metrics
            .net_performance_with_currency_effect_map
            .insert(range, performance.net_performance);
        metrics
            .net_performance_percentage_with_currency_effect_map
            .insert(range, performance.net_performance_percentage);
    }

    metrics.has_errors = metrics.total_units > Decimal::ZERO
        && (metrics.initial_value.is_none() || unit_price_at_end.is_none());

    debug!(
        "{}: units {}, investment {}, net performance {} ({} orders walked)",
        symbol,
        metrics.total_units,
        metrics.total_investment_with_currency_effect,
        metrics.net_performance_with_currency_effect,
        end_index + 1
    );

    Ok(metrics)
}

fn price_in_base_currency(order: &mut EnrichedOrder, current_rate: Decimal, rate_at_date: Decimal) {
    order.fee_in_base_currency = order.fee * current_rate;
    order.fee_in_base_currency_with_currency_effect = order.fee * rate_at_date;
    let unit_price = order.valuation_price();
    order.unit_price_in_base_currency = unit_price.map(|price| price * current_rate);
    order.unit_price_in_base_currency_with_currency_effect =
        unit_price.map(|price| price * rate_at_date);
}

/// Metrics of a symbol that cannot be valued: income and fees only.
fn income_only_metrics(
    input: &SymbolMetricsInput<'_>,
    mut metrics: SymbolMetrics,
    current_rate: Decimal,
    trailing_window: (NaiveDate, NaiveDate),
) -> SymbolMetrics {
    let mut income = IncomeTotals::default();
    let relevant = input
        .orders
        .iter()
        .filter(|order| order.date <= input.end);
    for order in relevant {
        let rate_at_date = input.exchange_rates.rate_or_one(order.date);
        let amount = order_amount(order);
        income.record(
            order.activity_type,
            amount,
            order.date,
            current_rate,
            rate_at_date,
            trailing_window,
        );
        metrics.fees += order.fee * current_rate;
        metrics.fees_with_currency_effect += order.fee * rate_at_date;

        // Cost basis without valuation, so the position still reports its investment
        match order.activity_type {
            ActivityType::Buy => {
                metrics.total_investment += amount * current_rate;
                metrics.total_investment_with_currency_effect += amount * rate_at_date;
            }
            ActivityType::Sell if metrics.total_units > Decimal::ZERO => {
                let share = order.quantity / metrics.total_units;
                metrics.total_investment -= metrics.total_investment * share;
                metrics.total_investment_with_currency_effect -=
                    metrics.total_investment_with_currency_effect * share;
            }
            ActivityType::Sell => {
                metrics.total_investment -= amount * current_rate;
                metrics.total_investment_with_currency_effect -= amount * rate_at_date;
            }
            _ => {}
        }
        metrics.total_units += order.quantity * order.activity_type.factor();
        if metrics.total_units.is_zero() {
            metrics.total_investment = Decimal::ZERO;
            metrics.total_investment_with_currency_effect = Decimal::ZERO;
        }
    }
    income.apply_to(&mut metrics);
    metrics.income_only = true;
    // A closed position needs no valuation
    metrics.has_errors = metrics.total_units > Decimal::ZERO;
    metrics
}

fn order_amount(order: &PortfolioOrder) -> Decimal {
    order.quantity * order.unit_price
}
