//! Weekly bucketing of journal notes.
//!
//! # Responsibility
//! - Partition the journal into 7-day windows anchored at the start date.
//!
//! # Invariants
//! - Window k covers `[start + 7k days, start + 7k + 6 days]` inclusive on
//!   both ends; notes are counted against the unclamped end.
//! - The reported `ends_at` of the final window is clamped to `now`.
//! - The loop terminates: the window start strictly advances by 7 days and
//!   the condition compares against `now`.

use crate::model::progress::{Mood, Note};
use chrono::{DateTime, Duration, Utc};

/// Aggregate view of one 7-day window since the start date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekSummary {
    /// 1-based week index.
    pub week_number: u32,
    pub starts_at: DateTime<Utc>,
    /// Clamped to `now` for the in-progress final window.
    pub ends_at: DateTime<Utc>,
    pub note_count: u32,
    pub good_count: u32,
    pub difficult_count: u32,
}

/// Buckets `notes` into week summaries from `start` up to `now`.
///
/// A future `start` yields an empty list.
pub fn weekly_summaries(
    start: DateTime<Utc>,
    now: DateTime<Utc>,
    notes: &[Note],
) -> Vec<WeekSummary> {
    let mut weeks = Vec::new();
    let mut window_start = start;
    let mut week_number: u32 = 1;

    while window_start <= now {
        let window_end = window_start + Duration::days(6);

        let in_window: Vec<&Note> = notes
            .iter()
            .filter(|note| note.date >= window_start && note.date <= window_end)
            .collect();

        weeks.push(WeekSummary {
            week_number,
            starts_at: window_start,
            ends_at: window_end.min(now),
            note_count: in_window.len() as u32,
            good_count: count_mood(&in_window, Mood::Good),
            difficult_count: count_mood(&in_window, Mood::Difficult),
        });

        window_start += Duration::days(7);
        week_number += 1;
    }

    weeks
}

fn count_mood(notes: &[&Note], mood: Mood) -> u32 {
    notes.iter().filter(|note| note.mood == Some(mood)).count() as u32
}

#[cfg(test)]
mod tests {
    use super::weekly_summaries;
    use crate::model::progress::{Mood, Note};
    use chrono::{Duration, TimeZone, Utc};

    fn now() -> chrono::DateTime<chrono::Utc> {
        Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap()
    }

    fn note_at(text: &str, at: chrono::DateTime<chrono::Utc>, mood: Option<Mood>) -> Note {
        Note::new(text, mood, at).unwrap()
    }

    #[test]
    fn ten_day_old_start_produces_two_buckets_with_clamped_end() {
        let start = now() - Duration::days(10);
        let weeks = weekly_summaries(start, now(), &[]);

        assert_eq!(weeks.len(), 2);
        assert_eq!(weeks[0].week_number, 1);
        assert_eq!(weeks[0].starts_at, start);
        assert_eq!(weeks[0].ends_at, start + Duration::days(6));
        assert_eq!(weeks[1].week_number, 2);
        assert_eq!(weeks[1].starts_at, start + Duration::days(7));
        // In-progress window reports now, not start + 13 days.
        assert_eq!(weeks[1].ends_at, now());
    }

    #[test]
    fn future_start_yields_empty_list() {
        let start = now() + Duration::hours(1);
        assert!(weekly_summaries(start, now(), &[]).is_empty());
    }

    #[test]
    fn notes_are_counted_per_window_with_mood_subcounts() {
        let start = now() - Duration::days(10);
        let notes = vec![
            note_at("w1 good", start + Duration::days(1), Some(Mood::Good)),
            note_at("w1 hard", start + Duration::days(5), Some(Mood::Difficult)),
            note_at("w1 plain", start + Duration::days(6), None),
            note_at("w2 good", start + Duration::days(8), Some(Mood::Good)),
        ];

        let weeks = weekly_summaries(start, now(), &notes);
        assert_eq!(weeks[0].note_count, 3);
        assert_eq!(weeks[0].good_count, 1);
        assert_eq!(weeks[0].difficult_count, 1);
        assert_eq!(weeks[1].note_count, 1);
        assert_eq!(weeks[1].good_count, 1);
        assert_eq!(weeks[1].difficult_count, 0);
    }

    #[test]
    fn counting_uses_unclamped_window_end() {
        // Note sits after now but inside the final window's nominal span;
        // the clamp applies to the reported end only, not to counting.
        let start = now() - Duration::days(8);
        let ahead = now() + Duration::hours(6);
        let notes = vec![note_at("logged ahead", ahead, None)];

        let weeks = weekly_summaries(start, now(), &notes);
        assert_eq!(weeks.len(), 2);
        assert_eq!(weeks[1].ends_at, now());
        assert_eq!(weeks[1].note_count, 1);
    }

    #[test]
    fn window_boundaries_are_inclusive() {
        let start = now() - Duration::days(10);
        let notes = vec![
            note_at("at window start", start, None),
            note_at("at window end", start + Duration::days(6), None),
        ];

        let weeks = weekly_summaries(start, now(), &notes);
        assert_eq!(weeks[0].note_count, 2);
    }
}
