//! Net performance and percentage per reporting period, derived from date-keyed series.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

use super::performance_model::{DateRange, RangePerformance};

/// Value of `series` on `date`, or on the closest earlier date. Zero before the series
/// starts.
pub fn value_at_or_before(series: &BTreeMap<NaiveDate, Decimal>, date: NaiveDate) -> Decimal {
    series
        .range(..=date)
        .next_back()
        .map(|(_, value)| *value)
        .unwrap_or(Decimal::ZERO)
}

/// Performance of a single range.
///
/// Net performance is the series value at the range end minus its value at the range
/// start (`max` subtracts nothing). The percentage divides by the investment basis at
/// the range end and is zero when that basis is zero.
pub fn range_performance(
    range: DateRange,
    net_performance: &BTreeMap<NaiveDate, Decimal>,
    investment_basis: &BTreeMap<NaiveDate, Decimal>,
    portfolio_start: NaiveDate,
    today: NaiveDate,
) -> RangePerformance {
    let interval = range.interval(today, portfolio_start);

    let at_end = value_at_or_before(net_performance, interval.end_date);
    let at_start = if range == DateRange::Max {
        Decimal::ZERO
    } else {
        value_at_or_before(net_performance, interval.start_date)
    };
    let net = at_end - at_start;

    let basis = value_at_or_before(investment_basis, interval.end_date);
    let percentage = if basis.is_zero() {
        Decimal::ZERO
    } else {
        net / basis
    };

    RangePerformance {
        net_performance: net,
        net_performance_percentage: percentage,
    }
}

pub fn date_range_performance(
    ranges: &[DateRange],
    net_performance: &BTreeMap<NaiveDate, Decimal>,
    investment_basis: &BTreeMap<NaiveDate, Decimal>,
    portfolio_start: NaiveDate,
    today: NaiveDate,
) -> BTreeMap<DateRange, RangePerformance> {
    ranges
        .iter()
        .map(|range| {
            (
                *range,
                range_performance(
                    *range,
                    net_performance,
                    investment_basis,
                    portfolio_start,
                    today,
                ),
            )
        })
        .collect()
}
