use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::errors::{Error, ValidationError};

/// Return methodology of a snapshot.
///
/// `Roai` (return on average investment) divides performance by the day-weighted
/// average capital at risk. `Roi` divides by the capital put in: the value held at
/// the window start plus every later purchase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PerformanceCalculationType {
    #[default]
    #[serde(rename = "ROAI")]
    Roai,
    #[serde(rename = "ROI")]
    Roi,
}

impl PerformanceCalculationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PerformanceCalculationType::Roai => "ROAI",
            PerformanceCalculationType::Roi => "ROI",
        }
    }
}

impl fmt::Display for PerformanceCalculationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PerformanceCalculationType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ROAI" => Ok(PerformanceCalculationType::Roai),
            "ROI" => Ok(PerformanceCalculationType::Roi),
            _ => Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Unknown calculation type: {}",
                s
            )))),
        }
    }
}

/// Named reporting period.
///
/// Serialized with its short key (`1d`, `wtd`, `mtd`, `ytd`, `1y`, `5y`, `max`) or
/// the four-digit year for calendar years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DateRange {
    OneDay,
    WeekToDate,
    MonthToDate,
    YearToDate,
    OneYear,
    FiveYears,
    Max,
    Year(i32),
}

impl DateRange {
    /// Ranges reported for every window, calendar years excluded.
    pub const STANDARD: [DateRange; 7] = [
        DateRange::OneDay,
        DateRange::OneYear,
        DateRange::FiveYears,
        DateRange::Max,
        DateRange::MonthToDate,
        DateRange::WeekToDate,
        DateRange::YearToDate,
    ];

    pub fn key(&self) -> String {
        match self {
            DateRange::OneDay => "1d".to_string(),
            DateRange::WeekToDate => "wtd".to_string(),
            DateRange::MonthToDate => "mtd".to_string(),
            DateRange::YearToDate => "ytd".to_string(),
            DateRange::OneYear => "1y".to_string(),
            DateRange::FiveYears => "5y".to_string(),
            DateRange::Max => "max".to_string(),
            DateRange::Year(year) => year.to_string(),
        }
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

impl FromStr for DateRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1d" => Ok(DateRange::OneDay),
            "wtd" => Ok(DateRange::WeekToDate),
            "mtd" => Ok(DateRange::MonthToDate),
            "ytd" => Ok(DateRange::YearToDate),
            "1y" => Ok(DateRange::OneYear),
            "5y" => Ok(DateRange::FiveYears),
            "max" => Ok(DateRange::Max),
            _ if s.len() == 4 && s.chars().all(|c| c.is_ascii_digit()) => s
                .parse::<i32>()
                .map(DateRange::Year)
                .map_err(|e| Error::Validation(ValidationError::InvalidInput(e.to_string()))),
            _ => Err(Error::Validation(ValidationError::InvalidInput(format!(
                "Unknown date range: {}",
                s
            )))),
        }
    }
}

impl Serialize for DateRange {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.key())
    }
}

impl<'de> Deserialize<'de> for DateRange {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let key = String::deserialize(deserializer)?;
        DateRange::from_str(&key).map_err(de::Error::custom)
    }
}

/// Inclusive date interval a [`DateRange`] resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateInterval {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Net performance of one date range.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangePerformance {
    pub net_performance: Decimal,
    pub net_performance_percentage: Decimal,
}

/// Portfolio-level totals derived from the valued positions.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallPerformance {
    pub current_value_in_base_currency: Decimal,
    pub total_investment: Decimal,
    pub total_investment_with_currency_effect: Decimal,
    pub total_fees_with_currency_effect: Decimal,
    pub total_interest_with_currency_effect: Decimal,
    pub total_liabilities_with_currency_effect: Decimal,
    pub total_dividend_in_base_currency: Decimal,
    pub total_trailing_dividend_in_base_currency: Decimal,
    pub gross_performance: Decimal,
    pub gross_performance_with_currency_effect: Decimal,
    pub gross_performance_percentage: Decimal,
    pub gross_performance_percentage_with_currency_effect: Decimal,
    pub net_performance: Decimal,
    pub net_performance_with_currency_effect: Decimal,
    pub net_performance_percentage: Decimal,
    pub net_performance_percentage_with_currency_effect: Decimal,
    pub total_time_weighted_investment: Decimal,
    pub total_time_weighted_investment_with_currency_effect: Decimal,
    pub dividend_yield_trailing_twelve_months: Decimal,
    pub dividend_yield_annualized: Decimal,
    pub has_errors: bool,
}
