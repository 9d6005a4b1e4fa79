use chrono::{DateTime, NaiveDate, Utc};

/// All streak continuity decisions use UTC calendar dates, never elapsed
/// hours, so outcomes near midnight do not depend on server locale.
pub fn day_of(ts: DateTime<Utc>) -> NaiveDate {
    ts.date_naive()
}

pub fn days_between(earlier: NaiveDate, later: NaiveDate) -> i64 {
    later.signed_duration_since(earlier).num_days()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_day_of_truncates_to_utc_date() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 15, 23, 59, 59).unwrap();
        assert_eq!(day_of(ts), NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());

        let ts = Utc.with_ymd_and_hms(2024, 3, 16, 0, 0, 0).unwrap();
        assert_eq!(day_of(ts), NaiveDate::from_ymd_opt(2024, 3, 16).unwrap());
    }

    #[test]
    fn test_days_between_adjacent_dates() {
        let a = NaiveDate::from_ymd_opt(2024, 2, 28).unwrap();
        let b = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(days_between(a, b), 1);
    }

    #[test]
    fn test_days_between_across_month_boundary() {
        let a = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        let b = NaiveDate::from_ymd_opt(2024, 2, 2).unwrap();
        assert_eq!(days_between(a, b), 2);
        assert_eq!(days_between(b, a), -2);
    }
}
