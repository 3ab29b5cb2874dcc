//! Builds the order sequence walked for one symbol: real orders, the two boundary
//! markers and a zero-quantity order on every grid date without activity.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

use super::symbol_metrics_model::{BoundaryMarker, EnrichedOrder};
use crate::errors::{CalculatorError, Result};
use crate::market_data::MarketSymbolMap;
use crate::portfolio::portfolio_order::PortfolioOrder;

/// Assembles the sorted order sequence of `symbol` over `[start, end]`.
///
/// Every order on a grid date gets that date's market price, or the last known price
/// when the provider had none. The start marker takes the unit price of the following
/// order when it is the first element, and `unit_price_at_start` otherwise.
#[allow(clippy::too_many_arguments)]
pub fn build_order_sequence(
    symbol: &str,
    orders: &[PortfolioOrder],
    chart_dates: &[NaiveDate],
    market_symbol_map: &MarketSymbolMap,
    start: NaiveDate,
    end: NaiveDate,
    unit_price_at_start: Option<Decimal>,
    unit_price_at_end: Option<Decimal>,
) -> Vec<EnrichedOrder> {
    let mut sequence: Vec<EnrichedOrder> = orders.iter().map(EnrichedOrder::from_order).collect();
    sequence.push(EnrichedOrder::synthetic(
        start,
        unit_price_at_start,
        Some(BoundaryMarker::Start),
    ));
    sequence.push(EnrichedOrder::synthetic(
        end,
        unit_price_at_end,
        Some(BoundaryMarker::End),
    ));

    let mut by_date: BTreeMap<NaiveDate, Vec<usize>> = BTreeMap::new();
    for (index, order) in sequence.iter().enumerate() {
        by_date.entry(order.date).or_default().push(index);
    }

    let mut last_unit_price: Option<Decimal> = None;
    let mut gap_fills = Vec::new();
    for date in chart_dates
        .iter()
        .copied()
        .filter(|date| *date >= start && *date <= end)
    {
        let market_price = market_symbol_map.get(date, symbol).or(last_unit_price);
        match by_date.get(&date) {
            Some(indices) => {
                for index in indices {
                    sequence[*index].unit_price_from_market_data = market_price;
                }
                if let Some(last) = indices.last().map(|index| &sequence[*index]) {
                    last_unit_price = last.unit_price_from_market_data.or(last.unit_price);
                }
            }
            None => {
                gap_fills.push(EnrichedOrder::synthetic(date, market_price, None));
                last_unit_price = market_price;
            }
        }
    }
    sequence.extend(gap_fills);

    sequence.sort_by_key(|order| (order.date, order.intraday_rank()));

    if let Ok(start_index) = boundary_index(symbol, &sequence, BoundaryMarker::Start) {
        sequence[start_index].unit_price = if start_index == 0 {
            sequence.get(1).and_then(|next| next.unit_price)
        } else {
            unit_price_at_start
        };
    }

    sequence
}

/// Position of a boundary marker in a sequence built by [`build_order_sequence`].
pub fn boundary_index(
    symbol: &str,
    sequence: &[EnrichedOrder],
    marker: BoundaryMarker,
) -> Result<usize> {
    sequence
        .iter()
        .position(|order| order.boundary == Some(marker))
        .ok_or_else(|| {
            CalculatorError::MissingBoundaryOrder {
                symbol: symbol.to_string(),
                marker: marker.as_str().to_string(),
            }
            .into()
        })
}
