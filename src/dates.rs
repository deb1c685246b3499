use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    Monday,
    #[default]
    Sunday,
}

impl WeekStart {
    fn offset(self, weekday: Weekday) -> i64 {
        match self {
            WeekStart::Monday => i64::from(weekday.num_days_from_monday()),
            WeekStart::Sunday => i64::from(weekday.num_days_from_sunday()),
        }
    }
}

/// First day of the month containing `date`.
pub fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

/// Shifts a month start by `delta` months. The result is always a month start.
pub fn add_months(month: NaiveDate, delta: i32) -> NaiveDate {
    let total = month.year() * 12 + month.month0() as i32 + delta;
    let year = total.div_euclid(12);
    let month0 = total.rem_euclid(12) as u32;
    NaiveDate::from_ymd_opt(year, month0 + 1, 1).unwrap_or(month)
}

pub fn month_end(month: NaiveDate) -> NaiveDate {
    let first = month_start(month);
    if first.month() == 12 {
        return NaiveDate::from_ymd_opt(first.year(), 12, 31).unwrap_or(first);
    }
    add_months(first, 1).pred_opt().unwrap_or(first)
}

pub fn same_month(a: NaiveDate, b: NaiveDate) -> bool {
    a.year() == b.year() && a.month() == b.month()
}

pub fn month_of(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// Every day shown by a month panel: full weeks from the week containing the
/// first of the month through the week containing its last day.
pub fn month_grid(month: NaiveDate, week_start: WeekStart) -> Vec<NaiveDate> {
    let first = month_start(month);
    let last = month_end(first);
    let lead = week_start.offset(first.weekday());
    let trail = 6 - week_start.offset(last.weekday());

    let mut current = first.checked_sub_signed(Duration::days(lead)).unwrap_or(first);
    let stop = last.checked_add_signed(Duration::days(trail)).unwrap_or(last);
    let mut days = Vec::with_capacity(42);
    while current <= stop {
        days.push(current);
        match current.succ_opt() {
            Some(next) => current = next,
            None => break,
        }
    }
    days
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn month_start_truncates() {
        assert_eq!(month_start(day(2024, 2, 29)), day(2024, 2, 1));
    }

    #[test]
    fn add_months_wraps_years() {
        assert_eq!(add_months(day(2024, 12, 1), 1), day(2025, 1, 1));
        assert_eq!(add_months(day(2024, 1, 1), -1), day(2023, 12, 1));
        assert_eq!(add_months(day(2024, 6, 1), -18), day(2022, 12, 1));
    }

    #[test]
    fn month_end_handles_leap_years() {
        assert_eq!(month_end(day(2024, 2, 1)), day(2024, 2, 29));
        assert_eq!(month_end(day(2023, 2, 1)), day(2023, 2, 28));
        assert_eq!(month_end(day(2023, 12, 1)), day(2023, 12, 31));
    }

    #[test]
    fn month_grid_spans_full_weeks() {
        // March 2024 starts on a Friday and ends on a Sunday.
        let grid = month_grid(day(2024, 3, 1), WeekStart::Sunday);
        assert_eq!(grid.len(), 42);
        assert_eq!(grid[0], day(2024, 2, 25));
        assert_eq!(grid.last().copied(), Some(day(2024, 4, 6)));

        let grid = month_grid(day(2024, 3, 1), WeekStart::Monday);
        assert_eq!(grid.len(), 35);
        assert_eq!(grid[0], day(2024, 2, 26));
        assert_eq!(grid.last().copied(), Some(day(2024, 3, 31)));
    }

    #[test]
    fn month_grid_length_is_whole_weeks() {
        for month in 1..=12 {
            let grid = month_grid(day(2025, month, 1), WeekStart::Sunday);
            assert_eq!(grid.len() % 7, 0);
            assert!(grid.len() >= 28 && grid.len() <= 42);
        }
    }

    #[test]
    fn month_grid_survives_calendar_limits() {
        for month in [NaiveDate::MIN, NaiveDate::MAX] {
            let grid = month_grid(month, WeekStart::Sunday);
            assert!(grid.contains(&month_start(month)));
            assert!(grid.contains(&month_end(month)));
            assert!(grid.windows(2).all(|pair| pair[0] < pair[1]));
        }
    }
}
