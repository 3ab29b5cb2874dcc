//! Activities expressed in their instrument's currency, the form the engine folds.

use chrono::NaiveDate;
use futures::future::join_all;
use log::{debug, warn};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::activities::{Activity, ActivityType};
use crate::fx::ExchangeRateProviderTrait;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioOrder {
    pub id: String,
    pub date: NaiveDate,
    pub symbol: String,
    pub activity_type: ActivityType,
    pub quantity: Decimal,
    /// Price per unit in `currency`
    pub unit_price: Decimal,
    pub fee: Decimal,
    /// Listing currency of the instrument
    pub currency: String,
}

impl PortfolioOrder {
    /// Takes the activity as-is, without any currency conversion.
    pub fn from_activity(activity: &Activity) -> Self {
        PortfolioOrder {
            id: activity.id.clone(),
            date: activity.date,
            symbol: activity.symbol.clone(),
            activity_type: activity.activity_type,
            quantity: activity.quantity,
            unit_price: activity.unit_price,
            fee: activity.fee,
            currency: activity.asset_currency.clone(),
        }
    }

    fn converted(activity: &Activity, rate: Decimal) -> Self {
        PortfolioOrder {
            unit_price: activity.unit_price * rate,
            fee: activity.fee * rate,
            ..Self::from_activity(activity)
        }
    }
}

/// Converts unit price and fee of foreign-currency activities into the asset currency
/// using the rate of the activity date. Input order is preserved.
///
/// An activity whose rate cannot be resolved is kept unconverted and logged.
pub async fn normalize_activities(
    activities: &[Activity],
    fx_provider: &dyn ExchangeRateProviderTrait,
) -> Vec<PortfolioOrder> {
    let conversions = activities.iter().map(|activity| async move {
        if !activity.needs_currency_normalization() {
            return PortfolioOrder::from_activity(activity);
        }
        match fx_provider
            .get_value(activity.date, &activity.currency, &activity.asset_currency)
            .await
        {
            Ok(rate) => {
                debug!(
                    "Normalized activity {} from {} to {} at {}",
                    activity.id, activity.currency, activity.asset_currency, rate
                );
                PortfolioOrder::converted(activity, rate)
            }
            Err(e) => {
                warn!(
                    "Keeping activity {} in {}: no rate to {} on {} ({})",
                    activity.id, activity.currency, activity.asset_currency, activity.date, e
                );
                PortfolioOrder::from_activity(activity)
            }
        }
    });

    join_all(conversions).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fx::{CurrencyConverter, ExchangeRate};
    use rust_decimal_macros::dec;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[tokio::test]
    async fn test_foreign_activity_is_converted_to_asset_currency() {
        let converter =
            CurrencyConverter::new(vec![ExchangeRate::new("EUR", "USD", dec!(1.1), d(2023, 1, 2))]);
        let activities = vec![
            Activity::new("1", d(2023, 1, 2), "AAPL", ActivityType::Buy, dec!(2), dec!(100), dec!(5), "EUR")
                .with_asset_currency("USD"),
            Activity::new("2", d(2023, 1, 3), "AAPL", ActivityType::Buy, dec!(1), dec!(120), dec!(0), "USD"),
        ];

        let orders = normalize_activities(&activities, &converter).await;

        assert_eq!(orders[0].unit_price, dec!(110.0));
        assert_eq!(orders[0].fee, dec!(5.5));
        assert_eq!(orders[0].currency, "USD");
        assert_eq!(orders[1].unit_price, dec!(120));
        assert_eq!(orders[1].id, "2");
    }

    #[tokio::test]
    async fn test_missing_rate_keeps_activity_unconverted() {
        let converter = CurrencyConverter::default();
        let activities = vec![Activity::new(
            "1",
            d(2023, 1, 2),
            "SAP",
            ActivityType::Buy,
            dec!(1),
            dec!(100),
            dec!(1),
            "GBP",
        )
        .with_asset_currency("EUR")];

        let orders = normalize_activities(&activities, &converter).await;
        assert_eq!(orders[0].unit_price, dec!(100));
        assert_eq!(orders[0].currency, "EUR");
    }
}
