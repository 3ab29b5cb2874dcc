//! Market data module - unit price lookups consumed by the performance engine.

mod market_data_model;
mod market_data_traits;
mod price_store;

pub use market_data_model::{MarketPrice, MarketSymbolMap};
pub use market_data_traits::MarketPriceProviderTrait;
pub use price_store::HistoricalPriceStore;
