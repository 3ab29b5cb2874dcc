use log::debug;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashSet};

use super::transaction_point_model::{TransactionPoint, TransactionPointItem};
use crate::activities::ActivityType;
use crate::portfolio::portfolio_order::PortfolioOrder;

#[derive(Debug, Default)]
struct RunningTotals {
    fees: Decimal,
    dividends: Decimal,
    interest: Decimal,
    liabilities: Decimal,
    valuables: Decimal,
}

/// Folds the ledger into one [`TransactionPoint`] per distinct activity date.
///
/// Orders are processed by date; same-day orders keep their input order and end up in
/// a single point. Only buys and sells move the cost basis. A sell removes the
/// proportional share of the current basis, and a position that reaches zero units
/// has no basis left.
pub fn build_transaction_points(orders: &[PortfolioOrder]) -> Vec<TransactionPoint> {
    let mut sorted: Vec<&PortfolioOrder> = orders.iter().collect();
    sorted.sort_by_key(|order| order.date);

    let mut holdings: BTreeMap<String, TransactionPointItem> = BTreeMap::new();
    let mut totals = RunningTotals::default();
    let mut bought: HashSet<String> = HashSet::new();
    let mut points: Vec<TransactionPoint> = Vec::new();

    let mut iter = sorted.into_iter().peekable();
    while let Some(order) = iter.next() {
        apply_order(&mut holdings, &mut totals, &mut bought, order);

        let closes_date = iter
            .peek()
            .map_or(true, |next| next.date != order.date);
        if closes_date {
            points.push(TransactionPoint {
                date: order.date,
                items: holdings.values().cloned().collect(),
                fees: totals.fees,
                dividends: totals.dividends,
                interest: totals.interest,
                liabilities: totals.liabilities,
                valuables: totals.valuables,
            });
        }
    }

    debug!(
        "Built {} transaction points from {} orders",
        points.len(),
        orders.len()
    );
    points
}

fn apply_order(
    holdings: &mut BTreeMap<String, TransactionPointItem>,
    totals: &mut RunningTotals,
    bought: &mut HashSet<String>,
    order: &PortfolioOrder,
) {
    let item = holdings
        .entry(order.symbol.clone())
        .or_insert_with(|| TransactionPointItem {
            symbol: order.symbol.clone(),
            currency: order.currency.clone(),
            quantity: Decimal::ZERO,
            investment: Decimal::ZERO,
            average_price: Decimal::ZERO,
            fee: Decimal::ZERO,
            dividend: Decimal::ZERO,
            first_buy_date: order.date,
            last_activity_date: order.date,
            transaction_count: 0,
        });

    let value = order.quantity * order.unit_price;
    match order.activity_type {
        ActivityType::Buy => {
            item.investment += value;
            if bought.insert(order.symbol.clone()) {
                item.first_buy_date = order.date;
            }
        }
        ActivityType::Sell => {
            if item.quantity > Decimal::ZERO {
                item.investment -= item.investment / item.quantity * order.quantity;
            } else {
                item.investment -= value;
            }
        }
        ActivityType::Dividend => {
            item.dividend += value;
            totals.dividends += value;
        }
        ActivityType::Interest => totals.interest += value,
        ActivityType::Liability => totals.liabilities += value,
        ActivityType::Item => totals.valuables += value,
        ActivityType::Fee | ActivityType::Stake => {}
    }

    item.quantity += order.quantity * order.activity_type.factor();
    if item.quantity.is_zero() {
        item.investment = Decimal::ZERO;
    }
    item.average_price = if item.quantity > Decimal::ZERO {
        item.investment / item.quantity
    } else {
        Decimal::ZERO
    };

    item.fee += order.fee;
    item.transaction_count += 1;
    item.last_activity_date = order.date;
    totals.fees += order.fee;
}
