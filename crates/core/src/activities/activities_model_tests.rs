#[cfg(test)]
mod tests {
    use crate::activities::{sort_activities, Activity, ActivityError, ActivityType};
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::str::FromStr;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn buy(id: &str, d: &str) -> Activity {
        Activity::new(
            id,
            date(d),
            "VTI",
            ActivityType::Buy,
            dec!(1),
            dec!(100),
            Decimal::ZERO,
            "USD",
        )
    }

    #[test]
    fn test_factor_per_activity_type() {
        assert_eq!(ActivityType::Buy.factor(), dec!(1));
        assert_eq!(ActivityType::Item.factor(), dec!(1));
        assert_eq!(ActivityType::Sell.factor(), dec!(-1));
        assert_eq!(ActivityType::Liability.factor(), dec!(-1));
        assert_eq!(ActivityType::Dividend.factor(), dec!(0));
        assert_eq!(ActivityType::Interest.factor(), dec!(0));
        assert_eq!(ActivityType::Fee.factor(), dec!(0));
        assert_eq!(ActivityType::Stake.factor(), dec!(0));
    }

    #[test]
    fn test_activity_type_round_trips_through_str() {
        for t in [
            ActivityType::Buy,
            ActivityType::Sell,
            ActivityType::Dividend,
            ActivityType::Interest,
            ActivityType::Fee,
            ActivityType::Item,
            ActivityType::Liability,
            ActivityType::Stake,
        ] {
            assert_eq!(ActivityType::from_str(t.as_str()).unwrap(), t);
        }
    }

    #[test]
    fn test_unknown_activity_type_is_rejected() {
        let err = ActivityType::from_str("SPLIT").unwrap_err();
        assert!(matches!(err, ActivityError::UnsupportedType(ref s) if s == "SPLIT"));
    }

    #[test]
    fn test_activity_type_serializes_screaming_case() {
        let json = serde_json::to_string(&ActivityType::Liability).unwrap();
        assert_eq!(json, "\"LIABILITY\"");
    }

    #[test]
    fn test_sort_is_stable_for_same_day_activities() {
        let mut activities = vec![
            buy("c", "2021-03-01"),
            buy("a", "2021-01-01"),
            buy("b1", "2021-02-01"),
            buy("b2", "2021-02-01"),
        ];
        sort_activities(&mut activities);
        let ids: Vec<&str> = activities.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b1", "b2", "c"]);
    }

    #[test]
    fn test_validate_rejects_negative_quantity() {
        let mut activity = buy("x", "2021-01-01");
        activity.quantity = dec!(-1);
        assert!(activity.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_missing_symbol() {
        let mut activity = buy("x", "2021-01-01");
        activity.symbol = " ".to_string();
        assert!(activity.validate().is_err());
    }

    #[test]
    fn test_currency_normalization_flag() {
        let same = buy("x", "2021-01-01");
        assert!(!same.needs_currency_normalization());

        let foreign = buy("y", "2021-01-01").with_asset_currency("CHF");
        assert!(foreign.needs_currency_normalization());
        assert_eq!(foreign.value(), dec!(100));
    }
}
