//! Resolve "Nth weekday of month" to a concrete date.

use chrono::{Datelike, NaiveDate, Weekday};

use crate::error::{MeetcalError, MeetcalResult};

/// Return the `index`-th (0-based) `weekday` of `year`-`month`.
///
/// Fails with [`MeetcalError::DateOutOfRange`] when the month has fewer
/// matching days, e.g. asking for a fifth Tuesday in a month with four.
pub fn resolve(year: i32, month: u32, weekday: Weekday, index: u8) -> MeetcalResult<NaiveDate> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or(MeetcalError::InvalidMonth { year, month })?;

    let offset = (7 + weekday.num_days_from_monday() - first.weekday().num_days_from_monday()) % 7;
    let day = 1 + offset + 7 * u32::from(index);

    NaiveDate::from_ymd_opt(year, month, day).ok_or(MeetcalError::DateOutOfRange {
        year,
        month,
        weekday: weekday.num_days_from_monday() as u8,
        index,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_third_tuesday() {
        // March 2025 starts on a Saturday
        let date = resolve(2025, 3, Weekday::Tue, 2).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 3, 18).unwrap());
    }

    #[test]
    fn test_first_day_of_month_matches() {
        // June 2025 starts on a Sunday
        let date = resolve(2025, 6, Weekday::Sun, 0).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 6, 1).unwrap());
    }

    #[test]
    fn test_fifth_occurrence_when_present() {
        // December 2024 has five Tuesdays (3, 10, 17, 24, 31)
        let date = resolve(2024, 12, Weekday::Tue, 4).unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 12, 31).unwrap());
    }

    #[test]
    fn test_fifth_occurrence_out_of_range() {
        // February 2025 has exactly four Tuesdays
        let err = resolve(2025, 2, Weekday::Tue, 4).unwrap_err();
        assert!(matches!(
            err,
            MeetcalError::DateOutOfRange {
                year: 2025,
                month: 2,
                weekday: 1,
                index: 4
            }
        ));
    }

    #[test]
    fn test_invalid_month() {
        let err = resolve(2025, 13, Weekday::Mon, 0).unwrap_err();
        assert!(matches!(err, MeetcalError::InvalidMonth { month: 13, .. }));
    }

    #[test]
    fn test_every_resolved_date_is_nth_weekday_in_month() {
        let weekdays = [
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
            Weekday::Sun,
        ];
        for year in [2023, 2024, 2025, 2028] {
            for month in 1..=12 {
                for weekday in weekdays {
                    // Walk the month and collect matching days to compare against
                    let matching: Vec<NaiveDate> = NaiveDate::from_ymd_opt(year, month, 1)
                        .unwrap()
                        .iter_days()
                        .take_while(|d| d.month() == month)
                        .filter(|d| d.weekday() == weekday)
                        .collect();

                    for index in 0..5u8 {
                        match matching.get(usize::from(index)) {
                            Some(expected) => {
                                assert_eq!(resolve(year, month, weekday, index).unwrap(), *expected)
                            }
                            None => assert!(resolve(year, month, weekday, index).is_err()),
                        }
                    }
                }
            }
        }
    }
}
