use crate::errors::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use log::warn;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Source of FX factors consumed by the engine.
///
/// `get_value` returns the multiplicative factor converting one unit of
/// `from_currency` into `to_currency` on `date`.
#[async_trait]
pub trait ExchangeRateProviderTrait: Send + Sync {
    async fn get_value(
        &self,
        date: NaiveDate,
        from_currency: &str,
        to_currency: &str,
    ) -> Result<Decimal>;

    /// Batched lookup. Dates without a rate are logged and left out of the result.
    async fn get_values(
        &self,
        dates: &[NaiveDate],
        from_currency: &str,
        to_currency: &str,
    ) -> BTreeMap<NaiveDate, Decimal> {
        let mut values = BTreeMap::new();
        for date in dates {
            match self.get_value(*date, from_currency, to_currency).await {
                Ok(rate) => {
                    values.insert(*date, rate);
                }
                Err(e) => {
                    warn!(
                        "No exchange rate {}->{} on {}: {}",
                        from_currency, to_currency, date, e
                    );
                }
            }
        }
        values
    }
}
