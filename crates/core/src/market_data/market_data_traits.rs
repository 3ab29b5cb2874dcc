use async_trait::async_trait;
use chrono::NaiveDate;
use log::warn;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::errors::Result;

/// Source of historical unit prices consumed by the engine.
///
/// `get_unit_price` returns the last known unit price of `symbol` on `date`
/// (a trading-day gap yields the previous close), or `None` when nothing is known.
#[async_trait]
pub trait MarketPriceProviderTrait: Send + Sync {
    async fn get_unit_price(&self, symbol: &str, date: NaiveDate) -> Result<Option<Decimal>>;

    /// Batched lookup. Failed and unknown dates are left out of the result.
    async fn get_unit_prices(
        &self,
        symbol: &str,
        dates: &[NaiveDate],
    ) -> BTreeMap<NaiveDate, Decimal> {
        let mut values = BTreeMap::new();
        for date in dates {
            match self.get_unit_price(symbol, *date).await {
                Ok(Some(price)) => {
                    values.insert(*date, price);
                }
                Ok(None) => {}
                Err(e) => {
                    warn!("Failed to get unit price of {} on {}: {}", symbol, date, e);
                }
            }
        }
        values
    }
}
