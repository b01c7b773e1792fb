//! Deadline arithmetic for the daily login loop

use chrono::{DateTime, Days, Duration, NaiveDate, TimeZone};

/// Compute the next daily login instant strictly after `now`
///
/// Today at `hour:00` local time if that is still ahead, otherwise the next
/// calendar day at the same hour. Returns `None` only for an invalid hour or
/// a date at the end of the calendar range.
pub fn next_daily_deadline<Tz: TimeZone>(now: &DateTime<Tz>, hour: u32) -> Option<DateTime<Tz>> {
    let tz = now.timezone();
    let mut day = now.date_naive();

    // Two days always suffice; the third covers a skipped local hour
    for _ in 0..3 {
        if let Some(deadline) = local_at_hour(&tz, day, hour) {
            if deadline > *now {
                return Some(deadline);
            }
        }
        day = day.checked_add_days(Days::new(1))?;
    }
    None
}

/// Next daily login instant strictly after both `now` and `previous`
///
/// A wall clock lagging behind the sleep timer never yields `previous` again.
pub fn next_deadline_after<Tz: TimeZone>(
    now: &DateTime<Tz>,
    previous: Option<&DateTime<Tz>>,
    hour: u32,
) -> Option<DateTime<Tz>> {
    match previous {
        Some(previous) if previous >= now => next_daily_deadline(previous, hour),
        _ => next_daily_deadline(now, hour),
    }
}

/// Time left until `deadline`, zero if it already passed
pub fn duration_until<Tz: TimeZone>(now: &DateTime<Tz>, deadline: &DateTime<Tz>) -> std::time::Duration {
    deadline
        .clone()
        .signed_duration_since(now.clone())
        .to_std()
        .unwrap_or_default()
}

/// Resolve `day` at `hour:00` in `tz`
///
/// An ambiguous local time (clocks going back) resolves to the earlier
/// instant; a skipped one (clocks going forward) resolves to the first valid
/// minute after it.
fn local_at_hour<Tz: TimeZone>(tz: &Tz, day: NaiveDate, hour: u32) -> Option<DateTime<Tz>> {
    let naive = day.and_hms_opt(hour, 0, 0)?;
    (0..=180)
        .map(|minutes| naive + Duration::minutes(minutes))
        .find_map(|candidate| tz.from_local_datetime(&candidate).earliest())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    fn cst() -> FixedOffset {
        FixedOffset::east_opt(8 * 3600).expect("valid offset")
    }

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<FixedOffset> {
        cst().with_ymd_and_hms(y, m, d, h, min, s).single().expect("valid time")
    }

    #[test]
    fn test_before_deadline_uses_today() {
        let now = at(2024, 3, 10, 6, 59, 59);
        assert_eq!(next_daily_deadline(&now, 7), Some(at(2024, 3, 10, 7, 0, 0)));
    }

    #[test]
    fn test_exactly_at_deadline_rolls_to_tomorrow() {
        let now = at(2024, 3, 10, 7, 0, 0);
        assert_eq!(next_daily_deadline(&now, 7), Some(at(2024, 3, 11, 7, 0, 0)));
    }

    #[test]
    fn test_after_deadline_rolls_to_tomorrow() {
        let now = at(2024, 3, 10, 23, 30, 0);
        assert_eq!(next_daily_deadline(&now, 7), Some(at(2024, 3, 11, 7, 0, 0)));
    }

    #[test]
    fn test_rolls_over_month_and_year() {
        let now = at(2024, 12, 31, 8, 0, 0);
        assert_eq!(next_daily_deadline(&now, 7), Some(at(2025, 1, 1, 7, 0, 0)));

        let now = at(2024, 2, 28, 12, 0, 0);
        assert_eq!(next_daily_deadline(&now, 7), Some(at(2024, 2, 29, 7, 0, 0)));
    }

    #[test]
    fn test_deadline_is_always_in_the_future() {
        let mut now = at(2024, 6, 1, 0, 0, 0);
        for _ in 0..(48 * 4) {
            let deadline = next_daily_deadline(&now, 7).expect("deadline");
            assert!(deadline > now);
            assert!(deadline - now <= Duration::hours(24));
            now = now + Duration::minutes(15);
        }
    }

    #[test]
    fn test_lagging_clock_does_not_repeat_deadline() {
        let previous = at(2024, 3, 10, 7, 0, 0);
        let now = previous - Duration::milliseconds(5);
        assert_eq!(
            next_deadline_after(&now, Some(&previous), 7),
            Some(at(2024, 3, 11, 7, 0, 0))
        );
    }

    #[test]
    fn test_previous_deadline_in_the_past_is_ignored() {
        let previous = at(2024, 3, 8, 7, 0, 0);
        let now = at(2024, 3, 10, 6, 0, 0);
        assert_eq!(
            next_deadline_after(&now, Some(&previous), 7),
            Some(at(2024, 3, 10, 7, 0, 0))
        );
        assert_eq!(next_deadline_after(&now, None, 7), Some(at(2024, 3, 10, 7, 0, 0)));
    }

    #[test]
    fn test_invalid_hour() {
        let now = at(2024, 6, 1, 0, 0, 0);
        assert_eq!(next_daily_deadline(&now, 24), None);
    }

    #[test]
    fn test_duration_until() {
        let now = at(2024, 6, 1, 6, 0, 0);
        let deadline = at(2024, 6, 1, 7, 0, 0);
        assert_eq!(duration_until(&now, &deadline), std::time::Duration::from_secs(3600));
        assert_eq!(duration_until(&deadline, &now), std::time::Duration::ZERO);
    }
}
