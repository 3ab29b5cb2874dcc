//! Sums valued positions into portfolio totals.

use log::warn;
use num_traits::Zero;
use rust_decimal::Decimal;

use super::performance_model::OverallPerformance;
use crate::portfolio::snapshot::TimelinePosition;

fn ratio(numerator: Decimal, denominator: Decimal) -> Decimal {
    if denominator.is_zero() {
        Decimal::zero()
    } else {
        numerator / denominator
    }
}

/// Adds `value` to `total`, or flags the totals as incomplete when a held position
/// has no value for it.
fn accumulate(
    total: &mut Decimal,
    value: Option<Decimal>,
    position: &TimelinePosition,
    has_errors: &mut bool,
) {
    match value {
        Some(value) => *total += value,
        None if !position.quantity.is_zero() => *has_errors = true,
        None => {}
    }
}

/// Portfolio totals shared by every calculation strategy.
///
/// Amounts are plain sums over the positions. Percentages divide by the summed
/// investment basis (`time_weighted_investment`), which each strategy defines per
/// symbol. Dividend yields divide summed dividends by summed investment.
pub fn aggregate_positions(positions: &[TimelinePosition]) -> OverallPerformance {
    let mut overall = OverallPerformance::default();

    for position in positions {
        overall.total_fees_with_currency_effect += position.fee_in_base_currency;
        overall.total_investment += position.investment;
        overall.total_investment_with_currency_effect += position.investment_with_currency_effect;
        overall.current_value_in_base_currency += position.value_in_base_currency;
        overall.total_interest_with_currency_effect += position.interest_in_base_currency;
        overall.total_liabilities_with_currency_effect += position.liabilities_in_base_currency;
        overall.total_dividend_in_base_currency += position.dividend_in_base_currency;
        overall.total_trailing_dividend_in_base_currency +=
            position.trailing_dividend_in_base_currency;

        let mut has_errors = position.has_errors;
        accumulate(
            &mut overall.gross_performance,
            position.gross_performance,
            position,
            &mut has_errors,
        );
        accumulate(
            &mut overall.gross_performance_with_currency_effect,
            position.gross_performance_with_currency_effect,
            position,
            &mut has_errors,
        );
        accumulate(
            &mut overall.net_performance,
            position.net_performance,
            position,
            &mut has_errors,
        );
        accumulate(
            &mut overall.net_performance_with_currency_effect,
            position.net_performance_with_currency_effect,
            position,
            &mut has_errors,
        );
        accumulate(
            &mut overall.total_time_weighted_investment,
            position.time_weighted_investment,
            position,
            &mut has_errors,
        );
        accumulate(
            &mut overall.total_time_weighted_investment_with_currency_effect,
            position.time_weighted_investment_with_currency_effect,
            position,
            &mut has_errors,
        );

        if has_errors && !position.quantity.is_zero() {
            warn!("Missing historical market data for {}", position.symbol);
            overall.has_errors = true;
        }
    }

    overall.gross_performance_percentage =
        ratio(overall.gross_performance, overall.total_time_weighted_investment);
    overall.gross_performance_percentage_with_currency_effect = ratio(
        overall.gross_performance_with_currency_effect,
        overall.total_time_weighted_investment_with_currency_effect,
    );
    overall.net_performance_percentage =
        ratio(overall.net_performance, overall.total_time_weighted_investment);
    overall.net_performance_percentage_with_currency_effect = ratio(
        overall.net_performance_with_currency_effect,
        overall.total_time_weighted_investment_with_currency_effect,
    );

    overall.dividend_yield_trailing_twelve_months = ratio(
        overall.total_trailing_dividend_in_base_currency,
        overall.total_investment_with_currency_effect,
    );
    overall.dividend_yield_annualized = ratio(
        overall.total_dividend_in_base_currency,
        overall.total_investment_with_currency_effect,
    );

    overall
}
