//! Reporting grid: the dates every symbol is valued on.

use chrono::NaiveDate;
use std::collections::BTreeSet;

use crate::portfolio::performance::DateRange;
use crate::utils::time_utils::{
    end_of_year, get_days_between_with_step, start_of_year, sub_days, years_between,
};

/// Sampled dates of `[start, end]`, ascending.
///
/// Long windows are thinned to roughly `max_chart_items` evenly spaced dates, with a
/// denser tail (every third day over the last 90, daily over the last 30). Activity
/// dates, `end`, the bounds of every standard range and every calendar year are
/// always part of the grid.
pub fn build_chart_dates(
    start: NaiveDate,
    end: NaiveDate,
    activity_dates: impl IntoIterator<Item = NaiveDate>,
    max_chart_items: u32,
) -> Vec<NaiveDate> {
    if start >= end {
        return vec![end];
    }

    let mut dates = BTreeSet::new();
    let in_window = |date: &NaiveDate| *date >= start && *date <= end;

    let days = u64::try_from((end - start).num_days()).unwrap_or(0);
    let items = days.min(u64::from(max_chart_items.max(1)));
    let step = ((days * 2 + items) / (2 * items)).max(1);
    let step = u32::try_from(step).unwrap_or(u32::MAX);

    dates.extend(get_days_between_with_step(start, end, step));
    if step > 1 {
        dates.extend(get_days_between_with_step(sub_days(end, 90).max(start), end, 3));
        dates.extend(get_days_between_with_step(sub_days(end, 30).max(start), end, 1));
    }
    dates.insert(end);

    dates.extend(activity_dates.into_iter().filter(in_window));

    for range in DateRange::STANDARD {
        let interval = range.interval(end, start);
        dates.extend([interval.start_date, interval.end_date].into_iter().filter(in_window));
    }
    for year in years_between(start, end) {
        dates.extend(
            [start_of_year(year), end_of_year(year)]
                .into_iter()
                .flatten()
                .filter(in_window),
        );
    }

    dates.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_short_window_is_daily() {
        let dates = build_chart_dates(d(2023, 1, 1), d(2023, 1, 10), vec![], 365);
        assert_eq!(dates.len(), 10);
        assert_eq!(dates.first(), Some(&d(2023, 1, 1)));
        assert_eq!(dates.last(), Some(&d(2023, 1, 10)));
    }

    #[test]
    fn test_long_window_is_sampled_with_dense_tail() {
        let start = d(2015, 1, 1);
        let end = d(2023, 7, 13);
        let activity = d(2017, 3, 14);
        let dates = build_chart_dates(start, end, vec![activity], 365);

        assert!(dates.len() < 800);
        assert!(dates.contains(&activity));
        assert!(dates.contains(&end));
        // daily over the last 30 days
        for offset in 0..=30 {
            assert!(dates.contains(&sub_days(end, offset)));
        }
        // calendar year bounds and range starts
        assert!(dates.contains(&d(2019, 12, 31)));
        assert!(dates.contains(&d(2020, 1, 1)));
        assert!(dates.contains(&d(2022, 7, 13)));
        assert!(dates.windows(2).all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn test_dates_outside_window_are_ignored() {
        let dates = build_chart_dates(d(2023, 1, 1), d(2023, 1, 5), vec![d(2022, 6, 1)], 365);
        assert!(!dates.contains(&d(2022, 6, 1)));
        assert!(dates.iter().all(|date| *date >= d(2023, 1, 1)));
    }

    #[test]
    fn test_degenerate_window() {
        assert_eq!(build_chart_dates(d(2023, 1, 1), d(2023, 1, 1), vec![], 365), vec![d(2023, 1, 1)]);
    }
}
