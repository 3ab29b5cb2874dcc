use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// A single observed FX rate: `1 from_currency = rate to_currency` on `date`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeRate {
    pub from_currency: String,
    pub to_currency: String,
    pub rate: Decimal,
    pub date: NaiveDate,
}

impl ExchangeRate {
    pub fn new(from: &str, to: &str, rate: Decimal, date: NaiveDate) -> Self {
        ExchangeRate {
            from_currency: from.to_string(),
            to_currency: to.to_string(),
            rate,
            date,
        }
    }
}

/// Pre-loaded rates of one currency pair, keyed by date.
///
/// Lookups fall back to the latest earlier rate so that weekends and holidays reuse
/// the last published fixing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DailyExchangeRates {
    rates: BTreeMap<NaiveDate, Decimal>,
    identity: bool,
}

static IDENTITY_RATES: DailyExchangeRates = DailyExchangeRates {
    rates: BTreeMap::new(),
    identity: true,
};

impl DailyExchangeRates {
    /// Rates of a currency converted into itself.
    pub fn identity() -> &'static DailyExchangeRates {
        &IDENTITY_RATES
    }

    pub fn from_rates(rates: BTreeMap<NaiveDate, Decimal>) -> Self {
        DailyExchangeRates {
            rates,
            identity: false,
        }
    }

    pub fn is_identity(&self) -> bool {
        self.identity
    }

    pub fn insert(&mut self, date: NaiveDate, rate: Decimal) {
        self.rates.insert(date, rate);
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }

    /// Rate on `date`, or the latest earlier one.
    pub fn rate_on(&self, date: NaiveDate) -> Option<Decimal> {
        if self.identity {
            return Some(Decimal::ONE);
        }
        self.rates.range(..=date).next_back().map(|(_, rate)| *rate)
    }

    /// Rate on `date`, or `1` when nothing was loaded on or before it.
    pub fn rate_or_one(&self, date: NaiveDate) -> Decimal {
        self.rate_on(date).unwrap_or(Decimal::ONE)
    }
}

/// Rates from every asset currency of a portfolio into its base currency.
#[derive(Debug, Clone, Default)]
pub struct ExchangeRatesByCurrency {
    base_currency: String,
    by_currency: HashMap<String, DailyExchangeRates>,
}

impl ExchangeRatesByCurrency {
    pub fn new(base_currency: &str) -> Self {
        ExchangeRatesByCurrency {
            base_currency: base_currency.to_string(),
            by_currency: HashMap::new(),
        }
    }

    pub fn base_currency(&self) -> &str {
        &self.base_currency
    }

    pub fn insert(&mut self, from_currency: &str, rates: DailyExchangeRates) {
        self.by_currency.insert(from_currency.to_string(), rates);
    }

    /// Rates for converting `from_currency` into the base currency.
    /// Unknown currencies yield an empty series, which converts at `1`.
    pub fn for_currency(&self, from_currency: &str) -> &DailyExchangeRates {
        if from_currency == self.base_currency {
            return DailyExchangeRates::identity();
        }
        static EMPTY: DailyExchangeRates = DailyExchangeRates {
            rates: BTreeMap::new(),
            identity: false,
        };
        self.by_currency.get(from_currency).unwrap_or(&EMPTY)
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
    fn test_rate_on_falls_back_to_previous_fixing() {
        let mut rates = DailyExchangeRates::default();
        rates.insert(d(2023, 1, 6), dec!(0.92));
        rates.insert(d(2023, 1, 9), dec!(0.93));

        assert_eq!(rates.rate_on(d(2023, 1, 8)), Some(dec!(0.92)));
        assert_eq!(rates.rate_on(d(2023, 1, 9)), Some(dec!(0.93)));
        assert_eq!(rates.rate_on(d(2023, 1, 5)), None);
        assert_eq!(rates.rate_or_one(d(2023, 1, 5)), dec!(1));
    }

    #[test]
    fn test_base_currency_is_identity() {
        let by_currency = ExchangeRatesByCurrency::new("CHF");
        let rates = by_currency.for_currency("CHF");
        assert!(rates.is_identity());
        assert_eq!(rates.rate_on(d(1990, 1, 1)), Some(Decimal::ONE));
    }

    #[test]
    fn test_unknown_currency_converts_at_one() {
        let by_currency = ExchangeRatesByCurrency::new("CHF");
        let rates = by_currency.for_currency("JPY");
        assert!(!rates.is_identity());
        assert_eq!(rates.rate_or_one(d(2023, 1, 1)), Decimal::ONE);
    }
}
