//! Memoization of computed snapshots, keyed by a digest of their inputs.

use chrono::NaiveDate;
use dashmap::DashMap;
use log::debug;
use sha2::{Digest, Sha256};
use std::fmt::Write;
use std::future::Future;
use std::sync::Arc;
use tokio::sync::OnceCell;

use super::PortfolioSnapshot;
use crate::activities::Activity;
use crate::constants::DATE_FORMAT;
use crate::errors::Result;
use crate::portfolio::performance::PerformanceCalculationType;
use crate::settings::CalculationSettings;

type CacheSlot = Arc<OnceCell<Arc<PortfolioSnapshot>>>;

/// Snapshot cache shared by concurrent callers.
///
/// Requests for the same key while a computation is running wait for it instead of
/// starting another one. Failed computations are not cached.
#[derive(Default)]
pub struct SnapshotCache {
    entries: DashMap<String, CacheSlot>,
}

impl SnapshotCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hex SHA-256 of a canonical text form of the inputs. Decimals are normalized so
    /// `1.50` and `1.5` hash alike.
    pub fn cache_key(
        activities: &[Activity],
        calculation_type: PerformanceCalculationType,
        base_currency: &str,
        as_of: NaiveDate,
        settings: &CalculationSettings,
    ) -> String {
        let mut canonical = String::new();
        let _ = writeln!(
            canonical,
            "{}|{}|{}|{}|{}",
            calculation_type,
            base_currency,
            as_of.format(DATE_FORMAT),
            settings.max_chart_items,
            settings.dividend_trailing_days
        );
        for activity in activities {
            let _ = writeln!(
                canonical,
                "{}|{}|{}|{}|{}|{}|{}|{}|{}",
                activity.id,
                activity.date.format(DATE_FORMAT),
                activity.symbol,
                activity.activity_type,
                activity.quantity.normalize(),
                activity.unit_price.normalize(),
                activity.fee.normalize(),
                activity.currency,
                activity.asset_currency
            );
        }

        let mut hasher = Sha256::new();
        hasher.update(canonical.as_bytes());
        hex::encode(hasher.finalize())
    }

    pub fn get(&self, key: &str) -> Option<Arc<PortfolioSnapshot>> {
        self.entries
            .get(key)
            .and_then(|slot| slot.get().cloned())
    }

    /// Returns the cached snapshot for `key`, computing it at most once at a time.
    pub async fn get_or_compute<F, Fut>(&self, key: &str, compute: F) -> Result<Arc<PortfolioSnapshot>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<PortfolioSnapshot>>,
    {
        let slot: CacheSlot = self
            .entries
            .entry(key.to_string())
            .or_insert_with(|| Arc::new(OnceCell::new()))
            .clone();

        let result = slot
            .get_or_try_init(|| async {
                debug!("Snapshot cache miss for {}", key);
                compute().await.map(Arc::new)
            })
            .await
            .cloned();

        if result.is_err() {
            self.entries
                .remove_if(key, |_, slot| !slot.initialized());
        }
        result
    }

    pub fn invalidate_all(&self) {
        debug!("Invalidating {} cached snapshots", self.entries.len());
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
