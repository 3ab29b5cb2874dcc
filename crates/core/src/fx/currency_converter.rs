use crate::errors::Result;
use crate::fx::fx_errors::FxError;
use crate::fx::fx_model::ExchangeRate;
use crate::fx::fx_traits::ExchangeRateProviderTrait;
use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

/// In-memory exchange rate provider backed by a currency graph.
///
/// Rates are stored as independent time series per pair; conversions between
/// currencies without a direct quote walk the graph (e.g. CHF -> USD -> EUR).
/// Each hop uses the nearest observed rate, past or future.
#[derive(Debug, Default)]
pub struct CurrencyConverter {
    /// Currency -> directly quoted counter currencies
    adj: HashMap<String, HashSet<String>>,

    /// (from, to) -> date -> rate
    rates: HashMap<(String, String), BTreeMap<NaiveDate, Decimal>>,
}

impl CurrencyConverter {
    pub fn new(exchange_rates: Vec<ExchangeRate>) -> Self {
        let mut converter = CurrencyConverter::default();
        converter.add_rates(exchange_rates);
        converter
    }

    /// Adds observed rates together with their inverses.
    pub fn add_rates(&mut self, rates: Vec<ExchangeRate>) {
        for rate in rates {
            self.add_rate(rate);
        }
    }

    pub fn add_rate(&mut self, rate: ExchangeRate) {
        if rate.from_currency == rate.to_currency {
            return;
        }

        self.rates
            .entry((rate.from_currency.clone(), rate.to_currency.clone()))
            .or_default()
            .insert(rate.date, rate.rate);
        self.adj
            .entry(rate.from_currency.clone())
            .or_default()
            .insert(rate.to_currency.clone());

        if !rate.rate.is_zero() {
            self.rates
                .entry((rate.to_currency.clone(), rate.from_currency.clone()))
                .or_default()
                .insert(rate.date, Decimal::ONE / rate.rate);
            self.adj
                .entry(rate.to_currency)
                .or_default()
                .insert(rate.from_currency);
        }
    }

    /// Nearest direct rate. Ties between a past and a future fixing go to the past one.
    fn get_direct_rate(&self, from: &str, to: &str, date: NaiveDate) -> Option<Decimal> {
        let history = self.rates.get(&(from.to_string(), to.to_string()))?;

        let prev = history.range(..=date).next_back();
        let next = history.range(date..).next();

        match (prev, next) {
            (Some((d1, r1)), Some((d2, r2))) => {
                if d1 == d2 {
                    return Some(*r1);
                }
                let dist_prev = (date - *d1).num_days().abs();
                let dist_next = (*d2 - date).num_days().abs();
                if dist_prev <= dist_next {
                    Some(*r1)
                } else {
                    Some(*r2)
                }
            }
            (Some((_, r)), None) | (None, Some((_, r))) => Some(*r),
            (None, None) => None,
        }
    }

    /// Factor converting one unit of `from_currency` into `to_currency`, found by a
    /// breadth-first search for the shortest quoted path.
    pub fn get_rate(
        &self,
        from_currency: &str,
        to_currency: &str,
        date: NaiveDate,
    ) -> std::result::Result<Decimal, FxError> {
        if from_currency == to_currency {
            return Ok(Decimal::ONE);
        }

        let mut queue: VecDeque<(String, Decimal)> = VecDeque::new();
        let mut visited: HashSet<String> = HashSet::new();

        queue.push_back((from_currency.to_string(), Decimal::ONE));
        visited.insert(from_currency.to_string());

        while let Some((current, accumulated)) = queue.pop_front() {
            if current == to_currency {
                return Ok(accumulated);
            }

            if let Some(neighbors) = self.adj.get(&current) {
                for neighbor in neighbors {
                    if visited.contains(neighbor) {
                        continue;
                    }
                    if let Some(rate) = self.get_direct_rate(&current, neighbor, date) {
                        visited.insert(neighbor.clone());
                        queue.push_back((neighbor.clone(), accumulated * rate));
                    }
                }
            }
        }

        Err(FxError::RateNotFound(format!(
            "No conversion path found for {} -> {} on or near {}",
            from_currency, to_currency, date
        )))
    }
}

#[async_trait]
impl ExchangeRateProviderTrait for CurrencyConverter {
    async fn get_value(
        &self,
        date: NaiveDate,
        from_currency: &str,
        to_currency: &str,
    ) -> Result<Decimal> {
        Ok(self.get_rate(from_currency, to_currency, date)?)
    }
}
