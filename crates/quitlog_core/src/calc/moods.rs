//! Mood aggregation over the journal.
//!
//! # Responsibility
//! - Compute per-mood integer percentages over all notes.
//!
//! # Invariants
//! - Percentages are rounded half-up independently per category and are
//!   not normalized; they need not sum to exactly 100.
//! - Neutral is derived as `total - good - difficult`, so notes with an
//!   absent or unrecognized mood tag count as neutral.

use crate::model::progress::{Mood, Note};

/// Per-mood share of the journal, in integer percent 0..=100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MoodDistribution {
    pub good: u8,
    pub neutral: u8,
    pub difficult: u8,
}

/// Computes the mood distribution over `notes`.
///
/// Zero notes yields all-zero percentages rather than a division fault.
pub fn mood_distribution(notes: &[Note]) -> MoodDistribution {
    let total = notes.len() as u64;
    if total == 0 {
        return MoodDistribution::default();
    }

    let good = notes
        .iter()
        .filter(|note| note.mood == Some(Mood::Good))
        .count() as u64;
    let difficult = notes
        .iter()
        .filter(|note| note.mood == Some(Mood::Difficult))
        .count() as u64;
    let neutral = total - good - difficult;

    MoodDistribution {
        good: percent_rounded(good, total),
        neutral: percent_rounded(neutral, total),
        difficult: percent_rounded(difficult, total),
    }
}

/// Integer `round(count / total * 100)`, half-up.
fn percent_rounded(count: u64, total: u64) -> u8 {
    ((count * 200 + total) / (total * 2)) as u8
}

#[cfg(test)]
mod tests {
    use super::{mood_distribution, percent_rounded, MoodDistribution};
    use crate::model::progress::{Mood, Note};
    use chrono::{TimeZone, Utc};

    fn note_with_mood(text: &str, mood: Option<Mood>) -> Note {
        let at = Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap();
        Note::new(text, mood, at).unwrap()
    }

    #[test]
    fn zero_notes_yields_all_zero_without_fault() {
        assert_eq!(mood_distribution(&[]), MoodDistribution::default());
    }

    #[test]
    fn two_good_one_difficult_rounds_independently() {
        let notes = vec![
            note_with_mood("a", Some(Mood::Good)),
            note_with_mood("b", Some(Mood::Good)),
            note_with_mood("c", Some(Mood::Difficult)),
        ];
        let stats = mood_distribution(&notes);
        // 67 + 0 + 33 = 100 here, but independent rounding is the contract.
        assert_eq!(stats.good, 67);
        assert_eq!(stats.neutral, 0);
        assert_eq!(stats.difficult, 33);
    }

    #[test]
    fn untagged_notes_fold_into_neutral() {
        let notes = vec![
            note_with_mood("a", Some(Mood::Good)),
            note_with_mood("b", None),
            note_with_mood("c", None),
        ];
        let stats = mood_distribution(&notes);
        assert_eq!(stats.good, 33);
        assert_eq!(stats.neutral, 67);
        assert_eq!(stats.difficult, 0);
    }

    #[test]
    fn categories_may_sum_above_one_hundred() {
        // 1/3 each rounds to 33+33+33; 1/6,1/6,4/6 rounds to 17+17+67 = 101.
        let notes = vec![
            note_with_mood("a", Some(Mood::Good)),
            note_with_mood("b", Some(Mood::Difficult)),
            note_with_mood("c", None),
            note_with_mood("d", None),
            note_with_mood("e", None),
            note_with_mood("f", None),
        ];
        let stats = mood_distribution(&notes);
        assert_eq!(stats.good, 17);
        assert_eq!(stats.difficult, 17);
        assert_eq!(stats.neutral, 67);
    }

    #[test]
    fn percent_rounding_is_half_up() {
        assert_eq!(percent_rounded(1, 200), 1); // 0.5% -> 1
        assert_eq!(percent_rounded(1, 3), 33);
        assert_eq!(percent_rounded(2, 3), 67);
        assert_eq!(percent_rounded(0, 7), 0);
        assert_eq!(percent_rounded(7, 7), 100);
    }
}
