//! Progress record and journal note model.
//!
//! # Responsibility
//! - Define `ProgressData` and `Note` as persisted in the progress slot.
//! - Provide seeding, note construction and derived read-only note views.
//!
//! # Invariants
//! - `id` is stable and never reused for another note.
//! - `start_date` changes only via reset or an explicit restart.
//! - `quit_date` carries no ordering requirement against `start_date`; a
//!   past target is expired, never invalid.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a journal note.
///
/// UUID v7 keeps ids time-ordered, matching the insertion-ordered journal.
pub type NoteId = Uuid;

/// Coarse self-reported mood tag on a note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Good,
    Neutral,
    Difficult,
}

/// A timestamped, optionally mood-tagged journal entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Stable note id, generated at creation.
    pub id: NoteId,
    /// Free-form user text, trimmed and non-empty.
    pub text: String,
    /// Creation timestamp, immutable.
    pub date: DateTime<Utc>,
    /// Unrecognized or absent tags decode as `None` rather than failing
    /// the whole record; the mood calculation folds `None` into neutral.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_mood"
    )]
    pub mood: Option<Mood>,
}

impl Note {
    /// Creates a note with a time-ordered id derived from `now`.
    ///
    /// # Errors
    /// - `NoteValidationError::EmptyText` when `text` trims to nothing.
    pub fn new(
        text: &str,
        mood: Option<Mood>,
        now: DateTime<Utc>,
    ) -> Result<Self, NoteValidationError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(NoteValidationError::EmptyText);
        }
        Ok(Self {
            id: new_note_id(now),
            text: trimmed.to_string(),
            date: now,
            mood,
        })
    }

    /// Validates an already-constructed note, used on full-record writes.
    pub fn validate(&self) -> Result<(), NoteValidationError> {
        if self.text.trim().is_empty() {
            return Err(NoteValidationError::EmptyText);
        }
        Ok(())
    }
}

/// Validation failure for note content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteValidationError {
    /// Note text is empty or whitespace-only.
    EmptyText,
}

impl Display for NoteValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyText => write!(f, "note text cannot be empty"),
        }
    }
}

impl Error for NoteValidationError {}

/// The single persisted progress record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressData {
    /// When tracking began. Rewound by restart, discarded by reset.
    pub start_date: DateTime<Utc>,
    /// Optional planned cessation target; omitted from JSON when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quit_date: Option<DateTime<Utc>>,
    /// Journal in insertion order; append-only in normal operation.
    #[serde(default)]
    pub notes: Vec<Note>,
}

impl ProgressData {
    /// Seeds a fresh record: tracking starts now, no target, empty journal.
    pub fn seeded(now: DateTime<Utc>) -> Self {
        Self {
            start_date: now,
            quit_date: None,
            notes: Vec::new(),
        }
    }

    /// Returns the last `n` notes, newest first. Borrows; stored order is
    /// untouched.
    pub fn recent_notes(&self, n: usize) -> Vec<&Note> {
        self.notes.iter().rev().take(n).collect()
    }

    /// Returns all notes newest first. Borrows; stored order is untouched.
    pub fn notes_newest_first(&self) -> Vec<&Note> {
        self.notes.iter().rev().collect()
    }
}

/// Generates a time-ordered note id anchored at `now`.
///
/// Anchoring at the caller-provided instant keeps note construction a pure
/// function of its inputs.
fn new_note_id(now: DateTime<Utc>) -> NoteId {
    let seconds = now.timestamp().max(0) as u64;
    let nanos = now.timestamp_subsec_nanos();
    Uuid::new_v7(uuid::Timestamp::from_unix(uuid::NoContext, seconds, nanos))
}

fn lenient_mood<'de, D>(deserializer: D) -> Result<Option<Mood>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_mood))
}

/// Parses a wire-format mood label, returning `None` for unknown values.
pub fn parse_mood(value: &str) -> Option<Mood> {
    match value {
        "good" => Some(Mood::Good),
        "neutral" => Some(Mood::Neutral),
        "difficult" => Some(Mood::Difficult),
        _ => None,
    }
}

/// Wire-format label for a mood tag.
pub fn mood_label(mood: Mood) -> &'static str {
    match mood {
        Mood::Good => "good",
        Mood::Neutral => "neutral",
        Mood::Difficult => "difficult",
    }
}
