//! Timestamp value generators.
//!
//! All timestamps are whole seconds, matching ClickHouse `DateTime`.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rand::Rng;

/// Generate a timestamp uniformly within `window` before `now`.
///
/// The result is never later than `now` (truncated to the second) and never
/// earlier than `now - window`.
pub fn recent_timestamp<R: Rng>(rng: &mut R, now: DateTime<Utc>, window: Duration) -> DateTime<Utc> {
    let back = rng.random_range(0..=window.num_seconds().max(0));
    from_secs(now.timestamp() - back, now)
}

/// Generate a random timestamp within the calendar day `date`.
pub fn timestamp_on<R: Rng>(rng: &mut R, date: NaiveDate) -> DateTime<Utc> {
    let midnight = date.and_time(chrono::NaiveTime::MIN).and_utc();
    let secs = rng.random_range(0..86_400);
    midnight + Duration::seconds(secs)
}

/// Generate a random date within `window` before `today` (inclusive).
pub fn date_within<R: Rng>(rng: &mut R, today: NaiveDate, window: Duration) -> NaiveDate {
    let back = rng.random_range(0..=window.num_days().max(0));
    today - Duration::days(back)
}

fn from_secs(secs: i64, fallback: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap_or(fallback)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_recent_timestamp_within_window() {
        let mut rng = StdRng::seed_from_u64(42);
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let window = Duration::seconds(300);

        for _ in 0..200 {
            let ts = recent_timestamp(&mut rng, now, window);
            assert!(ts <= now);
            assert!(ts >= now - window);
            assert_eq!(ts.nanosecond(), 0);
        }
    }

    #[test]
    fn test_timestamp_on_same_day() {
        let mut rng = StdRng::seed_from_u64(3);
        let date = NaiveDate::from_ymd_opt(2023, 3, 14).unwrap();

        for _ in 0..50 {
            assert_eq!(timestamp_on(&mut rng, date).date_naive(), date);
        }
    }

    #[test]
    fn test_date_within() {
        let mut rng = StdRng::seed_from_u64(3);
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();

        for _ in 0..50 {
            let d = date_within(&mut rng, today, Duration::days(365));
            assert!(d <= today);
            assert!(d >= today - Duration::days(365));
        }
    }
}
