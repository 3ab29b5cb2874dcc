#[cfg(test)]
mod tests {
    use crate::activities::ActivityType;
    use crate::fx::{DailyExchangeRates, ExchangeRatesByCurrency};
    use crate::market_data::MarketSymbolMap;
    use crate::portfolio::performance::{DateRange, PerformanceCalculationType};
    use crate::portfolio::portfolio_order::PortfolioOrder;
    use crate::portfolio::snapshot::{PortfolioCalculator, PortfolioMarketData, PortfolioSnapshot};
    use crate::settings::CalculationSettings;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::collections::BTreeMap;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn order(
        date: NaiveDate,
        symbol: &str,
        activity_type: ActivityType,
        quantity: Decimal,
        unit_price: Decimal,
        fee: Decimal,
    ) -> PortfolioOrder {
        PortfolioOrder {
            id: format!("{}-{}-{}", symbol, date, activity_type),
            date,
            symbol: symbol.to_string(),
            activity_type,
            quantity,
            unit_price,
            fee,
            currency: "USD".to_string(),
        }
    }

    fn vti_orders() -> Vec<PortfolioOrder> {
        vec![
            order(d(2019, 2, 1), "VTI", ActivityType::Buy, dec!(10), dec!(144.38), dec!(0)),
            order(d(2019, 8, 3), "VTI", ActivityType::Buy, dec!(10), dec!(147.99), dec!(0)),
            order(d(2020, 2, 2), "VTI", ActivityType::Sell, dec!(15), dec!(151.41), dec!(0)),
        ]
    }

    fn amzn_orders() -> Vec<PortfolioOrder> {
        vec![
            order(d(2019, 5, 10), "AMZN", ActivityType::Buy, dec!(1), dec!(1889.98), dec!(1.5)),
            order(d(2019, 11, 3), "AMZN", ActivityType::Sell, dec!(1), dec!(1779.99), dec!(1.5)),
        ]
    }

    /// Flat prices on every grid date for the given symbols.
    fn flat_market(
        calculator: &PortfolioCalculator,
        prices: &[(&str, Decimal)],
    ) -> PortfolioMarketData {
        let mut market_symbol_map = MarketSymbolMap::new();
        for date in calculator.chart_dates() {
            for (symbol, price) in prices {
                market_symbol_map.insert(symbol, *date, *price);
            }
        }
        PortfolioMarketData {
            market_symbol_map,
            exchange_rates: ExchangeRatesByCurrency::new("USD"),
        }
    }

    fn compute(
        orders: Vec<PortfolioOrder>,
        calculation_type: PerformanceCalculationType,
        prices: &[(&str, Decimal)],
    ) -> PortfolioSnapshot {
        let calculator = PortfolioCalculator::new(
            orders,
            calculation_type,
            "USD",
            d(2020, 3, 1),
            &CalculationSettings::default(),
        );
        let market = flat_market(&calculator, prices);
        calculator.compute_snapshot(&market).unwrap()
    }

    #[test]
    fn test_buy_buy_sell_position() {
        let snapshot = compute(
            vti_orders(),
            PerformanceCalculationType::Roai,
            &[("VTI", dec!(150))],
        );

        assert!(!snapshot.has_errors);
        assert_eq!(snapshot.start_date, Some(d(2019, 1, 31)));
        assert_eq!(snapshot.activities_count, 3);

        let vti = snapshot.position("VTI").unwrap();
        assert_eq!(vti.quantity, dec!(5));
        assert_eq!(vti.investment, dec!(730.925));
        assert_eq!(vti.average_price, dec!(146.185));
        assert_eq!(vti.market_price, dec!(150));
        assert_eq!(vti.value_in_base_currency, dec!(750));
        assert_eq!(vti.transaction_count, 3);
        // 750 held + 2271.15 received - 2923.70 paid
        assert_eq!(vti.net_performance, Some(dec!(97.45)));
        assert_eq!(vti.net_performance_with_currency_effect, Some(dec!(97.45)));

        assert_eq!(snapshot.current_value_in_base_currency, dec!(750));
        assert_eq!(snapshot.total_investment, dec!(730.925));
        assert_eq!(snapshot.net_performance_with_currency_effect, dec!(97.45));
    }

    #[test]
    fn test_historical_data_ends_on_as_of_date_and_matches_totals() {
        let snapshot = compute(
            vti_orders(),
            PerformanceCalculationType::Roai,
            &[("VTI", dec!(150))],
        );

        let dates: Vec<NaiveDate> = snapshot.historical_data.iter().map(|item| item.date).collect();
        assert!(dates.windows(2).all(|pair| pair[0] < pair[1]));
        assert_eq!(dates.first(), Some(&d(2019, 1, 31)));
        assert_eq!(dates.last(), Some(&d(2020, 3, 1)));

        let last = snapshot.historical_data.last().unwrap();
        assert_eq!(last.value, dec!(750));
        assert_eq!(last.total_investment, dec!(730.925));
        assert_eq!(
            last.net_performance_with_currency_effect,
            snapshot.net_performance_with_currency_effect
        );

        let max = snapshot.performance_by_date_range.get(&DateRange::Max).unwrap();
        assert_eq!(max.net_performance, snapshot.net_performance_with_currency_effect);
        assert!(snapshot
            .performance_by_date_range
            .contains_key(&DateRange::Year(2019)));
        assert!(!snapshot
            .performance_by_date_range
            .contains_key(&DateRange::Year(2020)));
    }

    #[test]
    fn test_unrelated_symbol_does_not_change_position() {
        let alone = compute(
            vti_orders(),
            PerformanceCalculationType::Roai,
            &[("VTI", dec!(150))],
        );
        let mut orders = vti_orders();
        orders.extend(amzn_orders());
        let together = compute(
            orders,
            PerformanceCalculationType::Roai,
            &[("VTI", dec!(150)), ("AMZN", dec!(1800))],
        );

        let vti_alone = alone.position("VTI").unwrap();
        let vti_together = together.position("VTI").unwrap();
        assert_eq!(vti_alone.investment, vti_together.investment);
        assert_eq!(vti_alone.net_performance, vti_together.net_performance);
        assert_eq!(
            vti_alone.time_weighted_investment,
            vti_together.time_weighted_investment
        );
        assert_eq!(together.positions.len(), 2);
        assert_eq!(together.activities_count, 5);

        let amzn = together.position("AMZN").unwrap();
        assert_eq!(amzn.quantity, Decimal::ZERO);
        assert_eq!(amzn.investment, Decimal::ZERO);
        // 1779.99 - 1889.98 - 3 fees
        assert_eq!(amzn.net_performance, Some(dec!(-112.99)));
    }

    #[test]
    fn test_missing_prices_flag_symbol_and_portfolio() {
        let mut orders = vti_orders();
        orders.push(order(d(2019, 3, 1), "XYZ", ActivityType::Buy, dec!(2), dec!(50), dec!(1)));
        let snapshot = compute(orders, PerformanceCalculationType::Roai, &[("VTI", dec!(150))]);

        assert!(snapshot.has_errors);
        assert_eq!(snapshot.errors.len(), 1);
        assert_eq!(snapshot.errors[0].symbol, "XYZ");

        let xyz = snapshot.position("XYZ").unwrap();
        assert!(xyz.has_errors);
        assert_eq!(xyz.net_performance, None);
        assert_eq!(xyz.investment, dec!(100));
        assert_eq!(xyz.market_price, dec!(50));

        let vti = snapshot.position("VTI").unwrap();
        assert!(!vti.has_errors);
        assert_eq!(vti.net_performance, Some(dec!(97.45)));
    }

    #[test]
    fn test_closed_position_without_prices_does_not_flag_portfolio() {
        let mut orders = vti_orders();
        orders.push(order(d(2019, 3, 1), "XYZ", ActivityType::Buy, dec!(2), dec!(50), dec!(0)));
        orders.push(order(d(2019, 4, 1), "XYZ", ActivityType::Sell, dec!(2), dec!(60), dec!(0)));
        let snapshot = compute(orders, PerformanceCalculationType::Roai, &[("VTI", dec!(150))]);

        assert!(!snapshot.has_errors);
        assert!(snapshot.errors.is_empty());

        let xyz = snapshot.position("XYZ").unwrap();
        assert_eq!(xyz.quantity, Decimal::ZERO);
        assert!(!xyz.has_errors);
        assert_eq!(xyz.net_performance, None);

        let vti = snapshot.position("VTI").unwrap();
        assert_eq!(vti.net_performance, Some(dec!(97.45)));
        assert_eq!(snapshot.net_performance, dec!(97.45));
    }

    #[test]
    fn test_strategies_agree_on_amounts_but_not_percentages() {
        let orders = vec![
            order(d(2020, 1, 2), "VTI", ActivityType::Buy, dec!(1), dec!(100), dec!(0)),
            order(d(2020, 2, 3), "VTI", ActivityType::Buy, dec!(1), dec!(140), dec!(0)),
        ];
        let roai = compute(orders.clone(), PerformanceCalculationType::Roai, &[("VTI", dec!(150))]);
        let roi = compute(orders, PerformanceCalculationType::Roi, &[("VTI", dec!(150))]);

        assert_eq!(roai.calculation_type, PerformanceCalculationType::Roai);
        assert_eq!(roi.calculation_type, PerformanceCalculationType::Roi);
        assert_eq!(roai.net_performance, roi.net_performance);
        assert_eq!(roai.total_investment, roi.total_investment);
        // invested capital is the sum of both purchases
        assert_eq!(roi.total_time_weighted_investment, dec!(240));
        assert_ne!(roai.net_performance_percentage, roi.net_performance_percentage);
    }

    #[test]
    fn test_dividends_are_not_counted_as_activities() {
        let mut orders = vti_orders();
        orders.push(order(d(2019, 12, 20), "VTI", ActivityType::Dividend, dec!(20), dec!(0.5), dec!(0)));
        let snapshot = compute(orders, PerformanceCalculationType::Roai, &[("VTI", dec!(150))]);

        assert_eq!(snapshot.activities_count, 3);
        let vti = snapshot.position("VTI").unwrap();
        assert_eq!(vti.dividend, dec!(10));
        assert_eq!(vti.dividend_in_base_currency, dec!(10));
        assert_eq!(vti.net_performance, Some(dec!(107.45)));
    }

    #[test]
    fn test_empty_ledger_yields_empty_snapshot() {
        let snapshot = compute(vec![], PerformanceCalculationType::Roai, &[]);
        assert!(snapshot.positions.is_empty());
        assert!(snapshot.historical_data.is_empty());
        assert_eq!(snapshot.start_date, None);
        assert_eq!(snapshot.current_value_in_base_currency, Decimal::ZERO);
        assert!(!snapshot.has_errors);
    }

    #[test]
    fn test_activities_after_as_of_are_ignored() {
        let mut orders = vti_orders();
        orders.push(order(d(2021, 1, 4), "VTI", ActivityType::Buy, dec!(100), dec!(190), dec!(0)));
        let snapshot = compute(orders, PerformanceCalculationType::Roai, &[("VTI", dec!(150))]);

        let vti = snapshot.position("VTI").unwrap();
        assert_eq!(vti.quantity, dec!(5));
        assert_eq!(snapshot.activities_count, 3);
    }

    #[test]
    fn test_positions_convert_at_current_rate() {
        let orders = vec![PortfolioOrder {
            currency: "EUR".to_string(),
            ..order(d(2020, 1, 2), "SAP", ActivityType::Buy, dec!(2), dec!(100), dec!(0))
        }];
        let calculator = PortfolioCalculator::new(
            orders,
            PerformanceCalculationType::Roai,
            "USD",
            d(2020, 3, 1),
            &CalculationSettings::default(),
        );
        let mut market = flat_market(&calculator, &[("SAP", dec!(110))]);
        let mut rates = BTreeMap::new();
        rates.insert(d(2020, 1, 1), dec!(1.1));
        rates.insert(d(2020, 2, 1), dec!(1.2));
        market
            .exchange_rates
            .insert("EUR", DailyExchangeRates::from_rates(rates));

        let snapshot = calculator.compute_snapshot(&market).unwrap();
        let sap = snapshot.position("SAP").unwrap();

        assert_eq!(sap.market_price, dec!(110));
        assert_eq!(sap.market_price_in_base_currency, dec!(132));
        assert_eq!(sap.value_in_base_currency, dec!(264));
        assert_eq!(sap.investment, dec!(240));
        assert_eq!(sap.investment_with_currency_effect, dec!(220));
        assert_eq!(sap.net_performance, Some(dec!(24)));
        assert_eq!(sap.net_performance_with_currency_effect, Some(dec!(44)));
    }
}
