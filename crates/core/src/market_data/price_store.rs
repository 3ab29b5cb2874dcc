use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap};

use super::market_data_model::MarketPrice;
use super::market_data_traits::MarketPriceProviderTrait;
use crate::errors::Result;

/// In-memory price history implementing [`MarketPriceProviderTrait`].
///
/// Answers with the close on the requested date or the latest earlier close. Dates
/// before the first known close yield `None`.
#[derive(Debug, Default, Clone)]
pub struct HistoricalPriceStore {
    history: HashMap<String, BTreeMap<NaiveDate, Decimal>>,
}

impl HistoricalPriceStore {
    pub fn new(prices: Vec<MarketPrice>) -> Self {
        let mut store = HistoricalPriceStore::default();
        for price in prices {
            store.insert(&price.symbol, price.date, price.unit_price);
        }
        store
    }

    pub fn insert(&mut self, symbol: &str, date: NaiveDate, unit_price: Decimal) {
        self.history
            .entry(symbol.to_string())
            .or_default()
            .insert(date, unit_price);
    }

    pub fn last_known_price(&self, symbol: &str, date: NaiveDate) -> Option<Decimal> {
        self.history
            .get(symbol)?
            .range(..=date)
            .next_back()
            .map(|(_, price)| *price)
    }
}

#[async_trait]
impl MarketPriceProviderTrait for HistoricalPriceStore {
    async fn get_unit_price(&self, symbol: &str, date: NaiveDate) -> Result<Option<Decimal>> {
        Ok(self.last_known_price(symbol, date))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_last_known_price_carries_forward_over_gaps() {
        let store = HistoricalPriceStore::new(vec![
            MarketPrice::new("VTI", d(2019, 2, 1), dec!(144.38)),
            MarketPrice::new("VTI", d(2019, 2, 4), dec!(145.01)),
        ]);

        assert_eq!(store.last_known_price("VTI", d(2019, 1, 31)), None);
        assert_eq!(store.last_known_price("VTI", d(2019, 2, 2)), Some(dec!(144.38)));
        assert_eq!(store.last_known_price("VTI", d(2019, 2, 4)), Some(dec!(145.01)));
        assert_eq!(store.last_known_price("AMZN", d(2019, 2, 4)), None);
    }

    #[tokio::test]
    async fn test_batch_lookup_omits_unknown_dates() {
        let store =
            HistoricalPriceStore::new(vec![MarketPrice::new("VTI", d(2019, 2, 1), dec!(144.38))]);
        let prices = store
            .get_unit_prices("VTI", &[d(2019, 1, 31), d(2019, 2, 1), d(2019, 2, 2)])
            .await;

        assert_eq!(prices.len(), 2);
        assert_eq!(prices.get(&d(2019, 2, 2)), Some(&dec!(144.38)));
    }
}
