//! Fetches every price and exchange rate a snapshot needs before the synchronous fold.

use chrono::NaiveDate;
use futures::future::join_all;
use log::{debug, warn};
use std::sync::Arc;

use crate::fx::{DailyExchangeRates, ExchangeRateProviderTrait, ExchangeRatesByCurrency};
use crate::market_data::{MarketPriceProviderTrait, MarketSymbolMap};

/// What a snapshot needs from the collaborators.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MarketDataRequest {
    pub base_currency: String,
    pub symbols: Vec<String>,
    /// Asset currencies to convert into the base currency
    pub currencies: Vec<String>,
    /// Dates prices are needed for (the reporting grid)
    pub price_dates: Vec<NaiveDate>,
    /// Dates exchange rates are needed for (grid, activity dates and as-of date)
    pub rate_dates: Vec<NaiveDate>,
}

/// Prices and rates pre-loaded for one snapshot.
#[derive(Debug, Clone, Default)]
pub struct PortfolioMarketData {
    pub market_symbol_map: MarketSymbolMap,
    pub exchange_rates: ExchangeRatesByCurrency,
}

pub struct MarketDataLoader {
    price_provider: Arc<dyn MarketPriceProviderTrait>,
    fx_provider: Arc<dyn ExchangeRateProviderTrait>,
}

impl MarketDataLoader {
    pub fn new(
        price_provider: Arc<dyn MarketPriceProviderTrait>,
        fx_provider: Arc<dyn ExchangeRateProviderTrait>,
    ) -> Self {
        Self {
            price_provider,
            fx_provider,
        }
    }

    pub fn fx_provider(&self) -> &dyn ExchangeRateProviderTrait {
        self.fx_provider.as_ref()
    }

    /// Issues one batched request per symbol and per foreign currency, all
    /// concurrently. Missing data is left out; the fold reports it.
    pub async fn load(&self, request: &MarketDataRequest) -> PortfolioMarketData {
        let price_requests = request.symbols.iter().map(|symbol| async move {
            let prices = self
                .price_provider
                .get_unit_prices(symbol, &request.price_dates)
                .await;
            (symbol, prices)
        });

        let rate_requests = request
            .currencies
            .iter()
            .filter(|currency| **currency != request.base_currency)
            .map(|currency| async move {
                let rates = self
                    .fx_provider
                    .get_values(&request.rate_dates, currency, &request.base_currency)
                    .await;
                (currency, rates)
            });

        let (prices, rates) = futures::join!(join_all(price_requests), join_all(rate_requests));

        let mut market_symbol_map = MarketSymbolMap::new();
        for (symbol, prices) in prices {
            if prices.is_empty() {
                warn!("No market prices loaded for {}", symbol);
            }
            for (date, price) in prices {
                market_symbol_map.insert(symbol, date, price);
            }
        }

        let mut exchange_rates = ExchangeRatesByCurrency::new(&request.base_currency);
        for (currency, rates) in rates {
            if rates.is_empty() {
                warn!(
                    "No exchange rates loaded for {}->{}; amounts convert at 1",
                    currency, request.base_currency
                );
            }
            exchange_rates.insert(currency, DailyExchangeRates::from_rates(rates));
        }

        debug!(
            "Loaded {} prices for {} symbols and rates for {} currencies",
            market_symbol_map.len(),
            request.symbols.len(),
            request.currencies.len()
        );

        PortfolioMarketData {
            market_symbol_map,
            exchange_rates,
        }
    }
}
