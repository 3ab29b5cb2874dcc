use async_trait::async_trait;
use chrono::NaiveDate;
use log::{debug, error, info};
use std::sync::Arc;

use super::market_data_loader::MarketDataLoader;
use super::portfolio_calculator::PortfolioCalculator;
use super::snapshot_cache::SnapshotCache;
use super::snapshot_traits::PortfolioSnapshotServiceTrait;
use super::PortfolioSnapshot;
use crate::activities::{sort_activities, Activity};
use crate::errors::{Error, Result};
use crate::fx::ExchangeRateProviderTrait;
use crate::market_data::MarketPriceProviderTrait;
use crate::portfolio::performance::PerformanceCalculationType;
use crate::portfolio::portfolio_order::normalize_activities;
use crate::settings::CalculationSettings;

pub struct PortfolioSnapshotService {
    loader: MarketDataLoader,
    settings: CalculationSettings,
    cache: Arc<SnapshotCache>,
}

impl PortfolioSnapshotService {
    pub fn new(
        price_provider: Arc<dyn MarketPriceProviderTrait>,
        fx_provider: Arc<dyn ExchangeRateProviderTrait>,
        settings: CalculationSettings,
    ) -> Self {
        Self::with_cache(
            price_provider,
            fx_provider,
            settings,
            Arc::new(SnapshotCache::new()),
        )
    }

    /// Service sharing `cache` with other instances.
    pub fn with_cache(
        price_provider: Arc<dyn MarketPriceProviderTrait>,
        fx_provider: Arc<dyn ExchangeRateProviderTrait>,
        settings: CalculationSettings,
        cache: Arc<SnapshotCache>,
    ) -> Self {
        Self {
            loader: MarketDataLoader::new(price_provider, fx_provider),
            settings,
            cache,
        }
    }

    pub fn settings(&self) -> &CalculationSettings {
        &self.settings
    }

    pub fn cache(&self) -> &SnapshotCache {
        &self.cache
    }

    /// Computes a snapshot with the service's default calculation type and base
    /// currency.
    pub async fn compute_default_snapshot(
        &self,
        activities: &[Activity],
        as_of: Option<NaiveDate>,
    ) -> Result<Arc<PortfolioSnapshot>> {
        self.compute_snapshot(
            activities,
            self.settings.calculation_type,
            &self.settings.base_currency,
            as_of,
        )
        .await
    }

    async fn compute_uncached(
        &self,
        activities: &[Activity],
        calculation_type: PerformanceCalculationType,
        base_currency: &str,
        as_of: NaiveDate,
    ) -> Result<PortfolioSnapshot> {
        let mut activities = activities.to_vec();
        sort_activities(&mut activities);

        let orders = normalize_activities(&activities, self.loader.fx_provider()).await;
        let calculator = PortfolioCalculator::new(
            orders,
            calculation_type,
            base_currency,
            as_of,
            &self.settings,
        );

        let request = calculator.market_data_request();
        debug!(
            "Loading market data for {} symbols over {} grid dates",
            request.symbols.len(),
            request.price_dates.len()
        );
        let market_data = self.loader.load(&request).await;

        calculator.compute_snapshot(&market_data)
    }
}

#[async_trait]
impl PortfolioSnapshotServiceTrait for PortfolioSnapshotService {
    async fn compute_snapshot(
        &self,
        activities: &[Activity],
        calculation_type: PerformanceCalculationType,
        base_currency: &str,
        as_of: Option<NaiveDate>,
    ) -> Result<Arc<PortfolioSnapshot>> {
        for activity in activities {
            activity.validate()?;
        }
        if base_currency.trim().is_empty() {
            return Err(Error::MissingConfigKey("baseCurrency".to_string()));
        }
        let as_of = match as_of {
            Some(date) => date,
            None => self.settings.today()?,
        };

        let key = SnapshotCache::cache_key(
            activities,
            calculation_type,
            base_currency,
            as_of,
            &self.settings,
        );
        let snapshot = self
            .cache
            .get_or_compute(&key, || {
                self.compute_uncached(activities, calculation_type, base_currency, as_of)
            })
            .await;

        match &snapshot {
            Ok(snapshot) => info!(
                "{} snapshot as of {}: {} positions, net performance {}",
                calculation_type,
                as_of,
                snapshot.positions.len(),
                snapshot.net_performance_with_currency_effect
            ),
            Err(e) => error!("Failed to compute snapshot as of {}: {}", as_of, e),
        }
        snapshot
    }

    fn invalidate_cache(&self) {
        self.cache.invalidate_all();
    }
}
