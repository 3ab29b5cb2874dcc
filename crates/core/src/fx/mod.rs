//! FX (Foreign Exchange) module - rate models, provider trait and in-memory converter.

pub mod currency_converter;
mod fx_errors;
mod fx_model;
mod fx_traits;

pub use currency_converter::CurrencyConverter;
pub use fx_errors::FxError;
pub use fx_model::{DailyExchangeRates, ExchangeRate, ExchangeRatesByCurrency};
pub use fx_traits::ExchangeRateProviderTrait;
