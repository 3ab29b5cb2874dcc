//! Calculation settings.

use chrono::NaiveDate;
use chrono_tz::Tz;
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

use crate::constants::{
    DEFAULT_BASE_CURRENCY, DEFAULT_DIVIDEND_TRAILING_DAYS, DEFAULT_MAX_CHART_ITEMS,
};
use crate::errors::{Error, Result};
use crate::portfolio::performance::PerformanceCalculationType;
use crate::utils::time_utils::{valuation_date_today, DEFAULT_VALUATION_TZ};

fn default_base_currency() -> String {
    DEFAULT_BASE_CURRENCY.to_string()
}

fn default_max_chart_items() -> u32 {
    DEFAULT_MAX_CHART_ITEMS
}

fn default_dividend_trailing_days() -> u32 {
    DEFAULT_DIVIDEND_TRAILING_DAYS
}

fn default_valuation_timezone() -> String {
    DEFAULT_VALUATION_TZ.name().to_string()
}

/// Parameters of a snapshot computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationSettings {
    #[serde(default = "default_base_currency")]
    pub base_currency: String,
    #[serde(default)]
    pub calculation_type: PerformanceCalculationType,
    /// Upper bound of reporting-grid dates; longer histories are sampled.
    #[serde(default = "default_max_chart_items")]
    pub max_chart_items: u32,
    /// Look-back window of the trailing dividend yield.
    #[serde(default = "default_dividend_trailing_days")]
    pub dividend_trailing_days: u32,
    /// IANA timezone deciding which calendar day "today" is.
    #[serde(default = "default_valuation_timezone")]
    pub valuation_timezone: String,
}

impl Default for CalculationSettings {
    fn default() -> Self {
        CalculationSettings {
            base_currency: default_base_currency(),
            calculation_type: PerformanceCalculationType::default(),
            max_chart_items: default_max_chart_items(),
            dividend_trailing_days: default_dividend_trailing_days(),
            valuation_timezone: default_valuation_timezone(),
        }
    }
}

impl CalculationSettings {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let settings: CalculationSettings = serde_json::from_str(json)
            .map_err(|e| Error::InvalidConfigValue(format!("Malformed settings: {}", e)))?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading calculation settings from {}", path.display());
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::ConfigIO(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&content)
    }

    pub fn validate(&self) -> Result<()> {
        let currency = self.base_currency.trim();
        if currency.is_empty() {
            return Err(Error::MissingConfigKey("baseCurrency".to_string()));
        }
        if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(Error::InvalidConfigValue(format!(
                "baseCurrency must be an ISO 4217 code, got '{}'",
                self.base_currency
            )));
        }
        if self.max_chart_items == 0 {
            return Err(Error::InvalidConfigValue(
                "maxChartItems must be greater than zero".to_string(),
            ));
        }
        if self.dividend_trailing_days == 0 {
            return Err(Error::InvalidConfigValue(
                "dividendTrailingDays must be greater than zero".to_string(),
            ));
        }
        self.timezone()?;
        Ok(())
    }

    pub fn timezone(&self) -> Result<Tz> {
        Tz::from_str(&self.valuation_timezone).map_err(|_| {
            Error::InvalidConfigValue(format!(
                "Unknown valuation timezone '{}'",
                self.valuation_timezone
            ))
        })
    }

    /// Calendar day considered "today" in the configured timezone.
    pub fn today(&self) -> Result<NaiveDate> {
        Ok(valuation_date_today(self.timezone()?))
    }
}
