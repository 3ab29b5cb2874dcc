//! Resolution of named reporting periods into concrete date intervals.

use chrono::{Datelike, NaiveDate};

use super::performance_model::{DateInterval, DateRange};
use crate::utils::time_utils::{
    end_of_year, start_of_month, start_of_week, start_of_year, sub_days, sub_years, years_between,
};

impl DateRange {
    /// Resolves the range relative to `today`.
    ///
    /// Period starts are the last day *before* the period (e.g. Dec 31 for `ytd`) so
    /// that differences against the start capture the first day's move. The start is
    /// never earlier than `portfolio_start`.
    pub fn interval(&self, today: NaiveDate, portfolio_start: NaiveDate) -> DateInterval {
        let (natural_start, end_date) = match self {
            DateRange::OneDay => (sub_days(today, 1), today),
            DateRange::WeekToDate => (sub_days(start_of_week(today), 1), today),
            DateRange::MonthToDate => (sub_days(start_of_month(today), 1), today),
            DateRange::YearToDate => (day_before_year(today.year()).unwrap_or(portfolio_start), today),
            DateRange::OneYear => (sub_years(today, 1), today),
            DateRange::FiveYears => (sub_years(today, 5), today),
            DateRange::Max => (portfolio_start, today),
            DateRange::Year(year) => {
                let start = day_before_year(*year).unwrap_or(portfolio_start);
                let end = end_of_year(*year).map_or(today, |end| end.min(today));
                (start, end)
            }
        };

        let start_date = natural_start.max(portfolio_start).min(end_date);
        DateInterval {
            start_date,
            end_date,
        }
    }

    /// Every range reported for a window: the standard ranges followed by each calendar
    /// year the window touches, except the year of `end`.
    pub fn ranges_for_window(start: NaiveDate, end: NaiveDate) -> Vec<DateRange> {
        let mut ranges = DateRange::STANDARD.to_vec();
        ranges.extend(
            years_between(start, end)
                .into_iter()
                .filter(|year| *year != end.year())
                .map(DateRange::Year),
        );
        ranges
    }
}

fn day_before_year(year: i32) -> Option<NaiveDate> {
    start_of_year(year).map(|first| sub_days(first, 1))
}
