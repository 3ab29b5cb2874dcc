//! End-to-end snapshot computations over in-memory market data.

use chrono::NaiveDate;
use perfolio_core::fx::{CurrencyConverter, ExchangeRate};
use perfolio_core::market_data::{HistoricalPriceStore, MarketPrice};
use perfolio_core::{
    Activity, ActivityType, CalculationSettings, DateRange, PerformanceCalculationType,
    PortfolioSnapshotService, PortfolioSnapshotServiceTrait,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn activity(
    id: &str,
    date: NaiveDate,
    symbol: &str,
    activity_type: ActivityType,
    quantity: Decimal,
    unit_price: Decimal,
) -> Activity {
    Activity::new(id, date, symbol, activity_type, quantity, unit_price, Decimal::ZERO, "USD")
}

fn service(prices: Vec<MarketPrice>, rates: Vec<ExchangeRate>) -> PortfolioSnapshotService {
    PortfolioSnapshotService::new(
        Arc::new(HistoricalPriceStore::new(prices)),
        Arc::new(CurrencyConverter::new(rates)),
        CalculationSettings::default(),
    )
}

fn dividend_dates() -> [NaiveDate; 4] {
    [d(2021, 11, 18), d(2022, 2, 17), d(2022, 5, 19), d(2022, 8, 18)]
}

fn dividend_portfolio() -> Vec<Activity> {
    let mut activities = vec![
        activity("msft-buy", d(2021, 9, 16), "MSFT", ActivityType::Buy, dec!(1), dec!(300)),
        activity("ibm-buy", d(2021, 9, 16), "IBM", ActivityType::Buy, dec!(1), dec!(200)),
    ];
    for (index, date) in dividend_dates().into_iter().enumerate() {
        activities.push(activity(
            &format!("msft-div-{}", index),
            date,
            "MSFT",
            ActivityType::Dividend,
            dec!(1),
            dec!(0.65),
        ));
        activities.push(activity(
            &format!("ibm-div-{}", index),
            date,
            "IBM",
            ActivityType::Dividend,
            dec!(1),
            dec!(1.65),
        ));
    }
    activities
}

#[tokio::test]
async fn dividend_yield_is_weighted_by_investment() {
    let service = service(
        vec![
            MarketPrice::new("MSFT", d(2021, 1, 4), dec!(300)),
            MarketPrice::new("IBM", d(2021, 1, 4), dec!(200)),
        ],
        vec![],
    );

    let snapshot = service
        .compute_snapshot(
            &dividend_portfolio(),
            PerformanceCalculationType::Roai,
            "USD",
            Some(d(2022, 9, 30)),
        )
        .await
        .unwrap();

    assert!(!snapshot.has_errors);
    assert_eq!(snapshot.activities_count, 2);

    let msft = snapshot.position("MSFT").unwrap();
    assert_eq!(msft.dividend_in_base_currency, dec!(2.60));
    assert_eq!(msft.investment_with_currency_effect, dec!(300));
    assert_eq!(msft.dividend_yield_trailing_twelve_months, dec!(2.60) / dec!(300));

    let ibm = snapshot.position("IBM").unwrap();
    assert_eq!(ibm.dividend_in_base_currency, dec!(6.60));
    assert_eq!(ibm.dividend_yield_trailing_twelve_months, dec!(0.033));

    assert_eq!(snapshot.total_dividend_in_base_currency, dec!(9.20));
    assert_eq!(snapshot.dividend_yield_trailing_twelve_months, dec!(0.0184));
    assert_eq!(snapshot.dividend_yield_annualized, dec!(0.0184));
    // flat prices: dividends are the whole performance
    assert_eq!(snapshot.net_performance_with_currency_effect, dec!(9.20));
}

#[tokio::test]
async fn trailing_yield_excludes_old_dividends() {
    let service = service(vec![MarketPrice::new("MSFT", d(2020, 11, 2), dec!(300))], vec![]);
    let activities = vec![
        activity("buy", d(2020, 12, 1), "MSFT", ActivityType::Buy, dec!(1), dec!(300)),
        activity("old", d(2021, 1, 10), "MSFT", ActivityType::Dividend, dec!(1), dec!(0.65)),
        activity("new", d(2022, 2, 17), "MSFT", ActivityType::Dividend, dec!(1), dec!(0.65)),
    ];

    let snapshot = service
        .compute_snapshot(
            &activities,
            PerformanceCalculationType::Roai,
            "USD",
            Some(d(2022, 9, 30)),
        )
        .await
        .unwrap();

    let msft = snapshot.position("MSFT").unwrap();
    assert_eq!(msft.dividend, dec!(1.30));
    assert_eq!(msft.dividend_in_base_currency, dec!(1.30));
    assert_eq!(msft.trailing_dividend_in_base_currency, dec!(0.65));
    assert_eq!(msft.dividend_yield_trailing_twelve_months, dec!(0.65) / dec!(300));
    assert_eq!(msft.dividend_yield_annualized, dec!(1.30) / dec!(300));
}

#[tokio::test]
async fn missing_market_data_flags_only_the_affected_symbol() {
    let prices = vec![MarketPrice::new("VTI", d(2019, 1, 2), dec!(150))];
    let vti = vec![
        activity("1", d(2019, 2, 1), "VTI", ActivityType::Buy, dec!(10), dec!(144.38)),
        activity("2", d(2019, 8, 3), "VTI", ActivityType::Buy, dec!(10), dec!(147.99)),
    ];
    let mut with_unpriced = vti.clone();
    with_unpriced.push(activity(
        "3",
        d(2019, 3, 1),
        "UNPRICED",
        ActivityType::Buy,
        dec!(5),
        dec!(20),
    ));

    let as_of = Some(d(2019, 12, 31));
    let clean = service(prices.clone(), vec![])
        .compute_snapshot(&vti, PerformanceCalculationType::Roai, "USD", as_of)
        .await
        .unwrap();
    let flagged = service(prices, vec![])
        .compute_snapshot(&with_unpriced, PerformanceCalculationType::Roai, "USD", as_of)
        .await
        .unwrap();

    assert!(!clean.has_errors);
    assert!(flagged.has_errors);
    assert_eq!(flagged.errors.len(), 1);
    assert_eq!(flagged.errors[0].symbol, "UNPRICED");
    assert!(flagged.position("UNPRICED").unwrap().has_errors);
    assert_eq!(flagged.position("UNPRICED").unwrap().net_performance, None);

    let vti_clean = clean.position("VTI").unwrap();
    let vti_flagged = flagged.position("VTI").unwrap();
    assert!(!vti_flagged.has_errors);
    assert_eq!(vti_clean.net_performance, vti_flagged.net_performance);
    assert_eq!(vti_clean.investment, vti_flagged.investment);
    assert_eq!(vti_clean.investment, dec!(2923.70));
}

#[tokio::test]
async fn repeated_computation_is_identical() {
    let prices = vec![
        MarketPrice::new("VTI", d(2019, 1, 2), dec!(141.13)),
        MarketPrice::new("VTI", d(2019, 5, 2), dec!(152.91)),
        MarketPrice::new("VTI", d(2019, 10, 1), dec!(146.47)),
        MarketPrice::new("VTI", d(2020, 1, 2), dec!(166.19)),
    ];
    let activities = vec![
        activity("1", d(2019, 2, 1), "VTI", ActivityType::Buy, dec!(10), dec!(144.38)),
        activity("2", d(2019, 8, 3), "VTI", ActivityType::Buy, dec!(10), dec!(147.99)),
        activity("3", d(2020, 2, 2), "VTI", ActivityType::Sell, dec!(15), dec!(151.41)),
    ];

    let mut snapshots = Vec::new();
    for _ in 0..2 {
        let snapshot = service(prices.clone(), vec![])
            .compute_snapshot(
                &activities,
                PerformanceCalculationType::Roai,
                "USD",
                Some(d(2020, 6, 30)),
            )
            .await
            .unwrap();
        snapshots.push(snapshot);
    }

    let (first, second) = (&snapshots[0], &snapshots[1]);
    assert_eq!(first.positions, second.positions);
    assert_eq!(first.historical_data, second.historical_data);
    assert_eq!(first.performance_by_date_range, second.performance_by_date_range);
    assert_eq!(first.net_performance_percentage, second.net_performance_percentage);

    let vti = first.position("VTI").unwrap();
    assert_eq!(vti.quantity, dec!(5));
    assert_eq!(vti.investment, dec!(730.925));
    assert_eq!(vti.market_price, dec!(166.19));
}

#[tokio::test]
async fn foreign_currency_positions_convert_into_base() {
    let service = service(
        vec![
            MarketPrice::new("NESN", d(2022, 1, 3), dec!(110)),
            MarketPrice::new("AAPL", d(2022, 1, 3), dec!(125)),
        ],
        vec![
            ExchangeRate::new("CHF", "USD", dec!(1.1), d(2022, 1, 1)),
            ExchangeRate::new("EUR", "USD", dec!(1.2), d(2022, 1, 1)),
        ],
    );
    let activities = vec![
        Activity::new(
            "1",
            d(2022, 1, 10),
            "NESN",
            ActivityType::Buy,
            dec!(10),
            dec!(100),
            dec!(0),
            "CHF",
        ),
        Activity::new(
            "2",
            d(2022, 1, 10),
            "AAPL",
            ActivityType::Buy,
            dec!(1),
            dec!(100),
            dec!(1),
            "EUR",
        )
        .with_asset_currency("USD"),
    ];

    let snapshot = service
        .compute_snapshot(
            &activities,
            PerformanceCalculationType::Roai,
            "USD",
            Some(d(2022, 6, 30)),
        )
        .await
        .unwrap();

    let nesn = snapshot.position("NESN").unwrap();
    assert_eq!(nesn.currency, "CHF");
    assert_eq!(nesn.investment, dec!(1100));
    assert_eq!(nesn.value_in_base_currency, dec!(1210));
    assert_eq!(nesn.net_performance, Some(dec!(110)));

    let aapl = snapshot.position("AAPL").unwrap();
    assert_eq!(aapl.currency, "USD");
    assert_eq!(aapl.average_price, dec!(120));
    assert_eq!(aapl.fee, dec!(1.2));
    assert_eq!(aapl.net_performance, Some(dec!(3.8)));

    assert_eq!(snapshot.current_value_in_base_currency, dec!(1335));
}

#[tokio::test]
async fn date_range_performance_covers_calendar_years() {
    let service = service(
        vec![
            MarketPrice::new("VTI", d(2020, 12, 1), dec!(100)),
            MarketPrice::new("VTI", d(2021, 12, 31), dec!(120)),
            MarketPrice::new("VTI", d(2022, 12, 30), dec!(90)),
        ],
        vec![],
    );
    let activities =
        vec![activity("1", d(2020, 12, 1), "VTI", ActivityType::Buy, dec!(1), dec!(100))];

    let snapshot = service
        .compute_snapshot(
            &activities,
            PerformanceCalculationType::Roai,
            "USD",
            Some(d(2023, 3, 31)),
        )
        .await
        .unwrap();

    let ranges = &snapshot.performance_by_date_range;
    assert_eq!(ranges[&DateRange::Year(2021)].net_performance, dec!(20));
    assert_eq!(ranges[&DateRange::Year(2022)].net_performance, dec!(-30));
    assert_eq!(ranges[&DateRange::Max].net_performance, dec!(-10));
    assert_eq!(ranges[&DateRange::YearToDate].net_performance, Decimal::ZERO);
    assert!(!ranges.contains_key(&DateRange::Year(2023)));
}
