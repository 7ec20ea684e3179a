//! Elapsed-days and countdown calculations.
//!
//! # Responsibility
//! - Compute whole days elapsed since the start date.
//! - Decompose the time remaining until a quit target for live display.
//!
//! # Invariants
//! - `days_since_start` uses the magnitude of the difference: a future
//!   start yields a positive count, not a negative one. Intent in the
//!   original data is ambiguous, so the behavior is kept as-is.
//! - `countdown_between` fields never overlap: hours in 0..=23, minutes
//!   and seconds in 0..=59, days unbounded.

use chrono::{DateTime, Utc};

const MS_PER_SECOND: i64 = 1_000;
const MS_PER_MINUTE: i64 = 60 * MS_PER_SECOND;
const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;
const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;

/// Remaining time until a quit target, broken down for display.
///
/// Recomputable at one-second granularity; holds no internal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Countdown {
    pub days: u64,
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
    /// True when the target is at or before `now`; all numeric fields are
    /// zero in that case.
    pub is_expired: bool,
}

impl Countdown {
    fn expired() -> Self {
        Self {
            days: 0,
            hours: 0,
            minutes: 0,
            seconds: 0,
            is_expired: true,
        }
    }
}

/// Whole days between `start` and `now`, floored, by magnitude.
pub fn days_since_start(start: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
    let diff_ms = (now - start).num_milliseconds().unsigned_abs();
    diff_ms / MS_PER_DAY as u64
}

/// Decomposes the time remaining until `quit` as seen from `now`.
pub fn countdown_between(quit: DateTime<Utc>, now: DateTime<Utc>) -> Countdown {
    let remaining_ms = (quit - now).num_milliseconds();
    if remaining_ms <= 0 {
        return Countdown::expired();
    }

    Countdown {
        days: (remaining_ms / MS_PER_DAY) as u64,
        hours: ((remaining_ms % MS_PER_DAY) / MS_PER_HOUR) as u32,
        minutes: ((remaining_ms % MS_PER_HOUR) / MS_PER_MINUTE) as u32,
        seconds: ((remaining_ms % MS_PER_MINUTE) / MS_PER_SECOND) as u32,
        is_expired: false,
    }
}

#[cfg(test)]
mod tests {
    use super::{countdown_between, days_since_start, Countdown};
    use chrono::{Duration, TimeZone, Utc};

    fn now() -> chrono::DateTime<chrono::Utc> {
        Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap()
    }

    fn total_seconds(countdown: &Countdown) -> u64 {
        countdown.days * 86_400
            + u64::from(countdown.hours) * 3_600
            + u64::from(countdown.minutes) * 60
            + u64::from(countdown.seconds)
    }

    #[test]
    fn elapsed_days_floors_partial_days() {
        let start = now() - Duration::days(9) - Duration::hours(23);
        assert_eq!(days_since_start(start, now()), 9);
    }

    #[test]
    fn elapsed_days_for_start_exactly_now_is_zero() {
        assert_eq!(days_since_start(now(), now()), 0);
    }

    #[test]
    fn future_start_counts_by_magnitude() {
        // Tomorrow yields 1, not -1 and not an error.
        let tomorrow = now() + Duration::days(1);
        assert_eq!(days_since_start(tomorrow, now()), 1);
    }

    #[test]
    fn countdown_decomposes_without_field_overlap() {
        let quit = now() + Duration::days(2) + Duration::hours(3) + Duration::minutes(4)
            + Duration::seconds(5);
        let countdown = countdown_between(quit, now());
        assert_eq!(
            countdown,
            Countdown {
                days: 2,
                hours: 3,
                minutes: 4,
                seconds: 5,
                is_expired: false,
            }
        );
    }

    #[test]
    fn countdown_at_target_instant_is_expired_and_zeroed() {
        let countdown = countdown_between(now(), now());
        assert!(countdown.is_expired);
        assert_eq!(total_seconds(&countdown), 0);
    }

    #[test]
    fn countdown_past_target_is_expired() {
        let countdown = countdown_between(now() - Duration::minutes(5), now());
        assert!(countdown.is_expired);
        assert_eq!(total_seconds(&countdown), 0);
    }

    #[test]
    fn countdown_is_idempotent_for_fixed_inputs() {
        let quit = now() + Duration::hours(30);
        assert_eq!(countdown_between(quit, now()), countdown_between(quit, now()));
    }

    #[test]
    fn remaining_seconds_decrease_as_now_advances() {
        let quit = now() + Duration::hours(1);
        let mut previous = total_seconds(&countdown_between(quit, now()));
        for advance in 1..=5 {
            let later = now() + Duration::seconds(advance * 13);
            let current = total_seconds(&countdown_between(quit, later));
            assert!(current < previous);
            previous = current;
        }
    }

    #[test]
    fn countdown_fields_stay_in_range_near_boundaries() {
        let quit = now() + Duration::days(1) - Duration::seconds(1);
        let countdown = countdown_between(quit, now());
        assert_eq!(countdown.days, 0);
        assert_eq!(countdown.hours, 23);
        assert_eq!(countdown.minutes, 59);
        assert_eq!(countdown.seconds, 59);
    }
}
