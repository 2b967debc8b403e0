//! Calendar-day helpers shared by the filter and agenda code.
//!
//! All comparisons happen on local calendar days in the zone of the
//! reference instant, so a deadline at 23:30 UTC may land on "tomorrow"
//! for a viewer east of Greenwich.

use chrono::{DateTime, NaiveDate, TimeZone, Utc, Weekday};

/// Weeks start on Sunday.
pub const WEEK_START: Weekday = Weekday::Sun;

/// The calendar day `t` falls on in `tz`.
pub fn day_in<Tz: TimeZone>(t: &DateTime<Utc>, tz: &Tz) -> NaiveDate {
    t.with_timezone(tz).date_naive()
}

/// First day of the week containing `day`.
pub fn week_start(day: NaiveDate) -> NaiveDate {
    day.week(WEEK_START).first_day()
}

pub fn same_week(a: NaiveDate, b: NaiveDate) -> bool {
    week_start(a) == week_start(b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn week_starts_on_sunday() {
        // 2024-01-03 is a Wednesday.
        assert_eq!(week_start(date(2024, 1, 3)), date(2023, 12, 31));
        assert_eq!(week_start(date(2023, 12, 31)), date(2023, 12, 31));
        assert_eq!(week_start(date(2024, 1, 6)), date(2023, 12, 31));
        assert_eq!(week_start(date(2024, 1, 7)), date(2024, 1, 7));
    }

    #[test]
    fn same_week_spans_saturday_not_next_sunday() {
        assert!(same_week(date(2024, 1, 3), date(2024, 1, 6)));
        assert!(!same_week(date(2024, 1, 6), date(2024, 1, 7)));
    }

    #[test]
    fn day_depends_on_zone() {
        let t = Utc.with_ymd_and_hms(2024, 1, 1, 23, 30, 0).unwrap();
        assert_eq!(day_in(&t, &Utc), date(2024, 1, 1));
        let east = FixedOffset::east_opt(2 * 3600).unwrap();
        assert_eq!(day_in(&t, &east), date(2024, 1, 2));
    }
}
