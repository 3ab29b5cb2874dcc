#[cfg(test)]
mod tests {
    use crate::errors::Error;
    use crate::portfolio::performance::PerformanceCalculationType;
    use crate::settings::CalculationSettings;
    use std::io::Write;

    #[test]
    fn test_defaults_when_keys_are_missing() {
        let settings = CalculationSettings::from_json_str("{}").unwrap();
        assert_eq!(settings, CalculationSettings::default());
        assert_eq!(settings.base_currency, "USD");
        assert_eq!(settings.calculation_type, PerformanceCalculationType::Roai);
        assert_eq!(settings.max_chart_items, 365);
        assert_eq!(settings.dividend_trailing_days, 365);
    }

    #[test]
    fn test_parses_camel_case_keys() {
        let settings = CalculationSettings::from_json_str(
            r#"{"baseCurrency":"CHF","calculationType":"ROI","maxChartItems":100,"valuationTimezone":"Europe/Zurich"}"#,
        )
        .unwrap();
        assert_eq!(settings.base_currency, "CHF");
        assert_eq!(settings.calculation_type, PerformanceCalculationType::Roi);
        assert_eq!(settings.max_chart_items, 100);
        assert_eq!(settings.timezone().unwrap(), chrono_tz::Europe::Zurich);
    }

    #[test]
    fn test_rejects_invalid_currency() {
        let err = CalculationSettings::from_json_str(r#"{"baseCurrency":"usd"}"#).unwrap_err();
        assert!(matches!(err, Error::InvalidConfigValue(_)));

        let err = CalculationSettings::from_json_str(r#"{"baseCurrency":""}"#).unwrap_err();
        assert!(matches!(err, Error::MissingConfigKey(_)));
    }

    #[test]
    fn test_rejects_unknown_timezone_and_zero_chart_items() {
        let err = CalculationSettings::from_json_str(r#"{"valuationTimezone":"Mars/Olympus"}"#)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidConfigValue(_)));

        let err = CalculationSettings::from_json_str(r#"{"maxChartItems":0}"#).unwrap_err();
        assert!(matches!(err, Error::InvalidConfigValue(_)));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"baseCurrency":"EUR"}}"#).unwrap();

        let settings = CalculationSettings::from_file(file.path()).unwrap();
        assert_eq!(settings.base_currency, "EUR");
    }

    #[test]
    fn test_from_missing_file_is_config_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = CalculationSettings::from_file(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, Error::ConfigIO(_)));
    }
}
