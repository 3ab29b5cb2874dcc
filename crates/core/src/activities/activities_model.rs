//! Activity domain models.

use crate::activities::activities_errors::ActivityError;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Enum representing the ledger event types the engine understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActivityType {
    Buy,
    Sell,
    Dividend,
    Interest,
    Fee,
    Item,
    Liability,
    Stake,
}

impl ActivityType {
    pub fn as_str(&self) -> &'static str {
        use crate::activities::activities_constants::*;
        match self {
            ActivityType::Buy => ACTIVITY_TYPE_BUY,
            ActivityType::Sell => ACTIVITY_TYPE_SELL,
            ActivityType::Dividend => ACTIVITY_TYPE_DIVIDEND,
            ActivityType::Interest => ACTIVITY_TYPE_INTEREST,
            ActivityType::Fee => ACTIVITY_TYPE_FEE,
            ActivityType::Item => ACTIVITY_TYPE_ITEM,
            ActivityType::Liability => ACTIVITY_TYPE_LIABILITY,
            ActivityType::Stake => ACTIVITY_TYPE_STAKE,
        }
    }

    /// Sign applied to the activity quantity when updating the running unit count.
    pub fn factor(&self) -> Decimal {
        match self {
            ActivityType::Buy | ActivityType::Item => Decimal::ONE,
            ActivityType::Sell | ActivityType::Liability => Decimal::NEGATIVE_ONE,
            ActivityType::Dividend
            | ActivityType::Interest
            | ActivityType::Fee
            | ActivityType::Stake => Decimal::ZERO,
        }
    }

    /// BUY and SELL are the only types that move cost basis.
    pub fn is_trade(&self) -> bool {
        matches!(self, ActivityType::Buy | ActivityType::Sell)
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivityType {
    type Err = ActivityError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        use crate::activities::activities_constants::*;
        match s {
            s if s == ACTIVITY_TYPE_BUY => Ok(ActivityType::Buy),
            s if s == ACTIVITY_TYPE_SELL => Ok(ActivityType::Sell),
            s if s == ACTIVITY_TYPE_DIVIDEND => Ok(ActivityType::Dividend),
            s if s == ACTIVITY_TYPE_INTEREST => Ok(ActivityType::Interest),
            s if s == ACTIVITY_TYPE_FEE => Ok(ActivityType::Fee),
            s if s == ACTIVITY_TYPE_ITEM => Ok(ActivityType::Item),
            s if s == ACTIVITY_TYPE_LIABILITY => Ok(ActivityType::Liability),
            s if s == ACTIVITY_TYPE_STAKE => Ok(ActivityType::Stake),
            _ => Err(ActivityError::UnsupportedType(s.to_string())),
        }
    }
}

/// Immutable ledger event. Owned by the caller; the engine works on copies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: String,
    pub date: NaiveDate,
    pub symbol: String,
    pub activity_type: ActivityType,
    pub quantity: Decimal,
    /// Price per unit in `currency`
    pub unit_price: Decimal,
    #[serde(default)]
    pub fee: Decimal,
    /// Currency the activity was booked in
    pub currency: String,
    /// Listing currency of the instrument (asset profile)
    pub asset_currency: String,
}

impl Activity {
    /// Creates an activity booked in the instrument's own currency.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: impl Into<String>,
        date: NaiveDate,
        symbol: impl Into<String>,
        activity_type: ActivityType,
        quantity: Decimal,
        unit_price: Decimal,
        fee: Decimal,
        currency: impl Into<String>,
    ) -> Self {
        let currency = currency.into();
        Activity {
            id: id.into(),
            date,
            symbol: symbol.into(),
            activity_type,
            quantity,
            unit_price,
            fee,
            asset_currency: currency.clone(),
            currency,
        }
    }

    /// Overrides the asset-profile currency (activity booked in a foreign currency).
    pub fn with_asset_currency(mut self, asset_currency: impl Into<String>) -> Self {
        self.asset_currency = asset_currency.into();
        self
    }

    /// Gross value of the activity (quantity x unit price).
    pub fn value(&self) -> Decimal {
        self.quantity * self.unit_price
    }

    /// True when unit price and fee must be converted into the asset currency.
    pub fn needs_currency_normalization(&self) -> bool {
        !self.currency.is_empty()
            && !self.asset_currency.is_empty()
            && self.currency != self.asset_currency
    }

    /// Rejects activities the engine cannot fold meaningfully.
    pub fn validate(&self) -> std::result::Result<(), ActivityError> {
        if self.symbol.trim().is_empty() {
            return Err(ActivityError::InvalidData(format!(
                "Activity {} has no symbol",
                self.id
            )));
        }
        if self.quantity.is_sign_negative() {
            return Err(ActivityError::InvalidData(format!(
                "Activity {} has a negative quantity ({})",
                self.id, self.quantity
            )));
        }
        if self.unit_price.is_sign_negative() {
            return Err(ActivityError::InvalidData(format!(
                "Activity {} has a negative unit price ({})",
                self.id, self.unit_price
            )));
        }
        if self.asset_currency.trim().is_empty() {
            return Err(ActivityError::InvalidData(format!(
                "Activity {} has no asset currency",
                self.id
            )));
        }
        Ok(())
    }
}

/// Sorts activities ascending by date. The sort is stable, so same-day activities
/// keep their input order.
pub fn sort_activities(activities: &mut [Activity]) {
    activities.sort_by_key(|activity| activity.date);
}
