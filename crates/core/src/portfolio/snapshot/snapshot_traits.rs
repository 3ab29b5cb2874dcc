use async_trait::async_trait;
use chrono::NaiveDate;
use std::sync::Arc;

use super::PortfolioSnapshot;
use crate::activities::Activity;
use crate::errors::Result;
use crate::portfolio::performance::PerformanceCalculationType;

#[async_trait]
pub trait PortfolioSnapshotServiceTrait: Send + Sync {
    /// Computes the performance snapshot of `activities` in `base_currency`.
    ///
    /// `as_of` defaults to today in the configured valuation timezone. Identical
    /// requests are answered from the cache.
    async fn compute_snapshot(
        &self,
        activities: &[Activity],
        calculation_type: PerformanceCalculationType,
        base_currency: &str,
        as_of: Option<NaiveDate>,
    ) -> Result<Arc<PortfolioSnapshot>>;

    /// Drops every cached snapshot, e.g. after market data changed.
    fn invalidate_cache(&self);
}
