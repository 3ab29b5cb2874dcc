use chrono::{DateTime, Datelike, Days, Months, NaiveDate, Utc, Weekday};
use chrono_tz::Tz;

/// Default timezone for valuation dates.
pub const DEFAULT_VALUATION_TZ: Tz = chrono_tz::America::New_York;

/// Converts a UTC instant to a valuation date in the given timezone.
pub fn valuation_date_from_utc(instant: DateTime<Utc>, tz: Tz) -> NaiveDate {
    instant.with_timezone(&tz).date_naive()
}

/// Today's date in the given timezone.
pub fn valuation_date_today(tz: Tz) -> NaiveDate {
    valuation_date_from_utc(Utc::now(), tz)
}

pub fn get_days_between(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    get_days_between_with_step(start, end, 1)
}

/// Every `step`-th day from `start` up to and including `end`.
pub fn get_days_between_with_step(start: NaiveDate, end: NaiveDate, step: u32) -> Vec<NaiveDate> {
    if start > end {
        return Vec::new();
    }
    let step = Days::new(u64::from(step.max(1)));
    let mut days = Vec::new();
    let mut current = start;
    while current <= end {
        days.push(current);
        match current.checked_add_days(step) {
            Some(next) => current = next,
            None => break,
        }
    }
    days
}

pub fn sub_days(date: NaiveDate, days: u64) -> NaiveDate {
    date.checked_sub_days(Days::new(days)).unwrap_or(NaiveDate::MIN)
}

/// Same calendar day `years` earlier; Feb 29 maps to Feb 28.
pub fn sub_years(date: NaiveDate, years: u32) -> NaiveDate {
    date.checked_sub_months(Months::new(years * 12))
        .unwrap_or(NaiveDate::MIN)
}

/// Monday of the week containing `date`.
pub fn start_of_week(date: NaiveDate) -> NaiveDate {
    date.week(Weekday::Mon).first_day()
}

pub fn start_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub fn start_of_year(year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, 1, 1)
}

pub fn end_of_year(year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, 12, 31)
}

/// Calendar years touched by `[start, end]`, ascending.
pub fn years_between(start: NaiveDate, end: NaiveDate) -> Vec<i32> {
    if start > end {
        return Vec::new();
    }
    (start.year()..=end.year()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_days_between_inclusive() {
        let days = get_days_between(d(2024, 2, 27), d(2024, 3, 1));
        assert_eq!(
            days,
            vec![d(2024, 2, 27), d(2024, 2, 28), d(2024, 2, 29), d(2024, 3, 1)]
        );
        assert!(get_days_between(d(2024, 3, 1), d(2024, 2, 1)).is_empty());
    }

    #[test]
    fn test_days_between_with_step() {
        let days = get_days_between_with_step(d(2024, 1, 1), d(2024, 1, 10), 4);
        assert_eq!(days, vec![d(2024, 1, 1), d(2024, 1, 5), d(2024, 1, 9)]);
    }

    #[test]
    fn test_calendar_helpers() {
        // 2024-05-16 is a Thursday
        assert_eq!(start_of_week(d(2024, 5, 16)), d(2024, 5, 13));
        assert_eq!(start_of_week(d(2024, 5, 13)), d(2024, 5, 13));
        assert_eq!(start_of_month(d(2024, 5, 16)), d(2024, 5, 1));
        assert_eq!(sub_years(d(2024, 2, 29), 1), d(2023, 2, 28));
        assert_eq!(sub_days(d(2024, 1, 1), 1), d(2023, 12, 31));
        assert_eq!(years_between(d(2021, 12, 31), d(2023, 1, 1)), vec![2021, 2022, 2023]);
    }
}
