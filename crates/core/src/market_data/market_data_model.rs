//! Market data domain models.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Closing unit price of a symbol on a date, in the symbol's listing currency
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MarketPrice {
    pub symbol: String,
    pub date: NaiveDate,
    pub unit_price: Decimal,
}

impl MarketPrice {
    pub fn new(symbol: &str, date: NaiveDate, unit_price: Decimal) -> Self {
        MarketPrice {
            symbol: symbol.to_string(),
            date,
            unit_price,
        }
    }
}

/// Pre-fetched unit prices: date -> symbol -> price.
///
/// Only dates the provider answered for are present; the engine carries the last
/// known price forward itself.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarketSymbolMap {
    prices: HashMap<NaiveDate, HashMap<String, Decimal>>,
}

impl MarketSymbolMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, symbol: &str, date: NaiveDate, unit_price: Decimal) {
        self.prices
            .entry(date)
            .or_default()
            .insert(symbol.to_string(), unit_price);
    }

    pub fn get(&self, date: NaiveDate, symbol: &str) -> Option<Decimal> {
        self.prices.get(&date)?.get(symbol).copied()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    /// Number of (date, symbol) prices held.
    pub fn len(&self) -> usize {
        self.prices.values().map(HashMap::len).sum()
    }
}
