use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Holding of one symbol as of a transaction point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPointItem {
    pub symbol: String,
    /// Listing currency; `investment` and `average_price` are expressed in it
    pub currency: String,
    pub quantity: Decimal,
    /// Cost basis of the units still held
    pub investment: Decimal,
    pub average_price: Decimal,
    /// Fees paid on this symbol so far
    pub fee: Decimal,
    /// Dividends received on this symbol so far
    pub dividend: Decimal,
    /// Date of the first buy, or of the first activity while nothing was bought
    pub first_buy_date: NaiveDate,
    pub last_activity_date: NaiveDate,
    pub transaction_count: u32,
}

/// Portfolio-wide state after all activities of `date` have been applied.
///
/// `items` are ordered by symbol. The income and liability fields are running totals
/// in the instruments' currencies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPoint {
    pub date: NaiveDate,
    pub items: Vec<TransactionPointItem>,
    pub fees: Decimal,
    pub dividends: Decimal,
    pub interest: Decimal,
    pub liabilities: Decimal,
    pub valuables: Decimal,
}

impl TransactionPoint {
    pub fn item(&self, symbol: &str) -> Option<&TransactionPointItem> {
        self.items
            .binary_search_by(|item| item.symbol.as_str().cmp(symbol))
            .ok()
            .map(|index| &self.items[index])
    }
}
