//! Progress record use-case service.
//!
//! # Responsibility
//! - Implement lazy seeding, journal appends, quit-target updates and the
//!   two reset flavors on top of the progress repository.
//! - Recover from a corrupt slot by reseeding, logging a warning.
//!
//! # Invariants
//! - A corrupt slot and an absent slot both read as "no data yet": the
//!   caller always receives a usable record.
//! - Empty or whitespace-only note text is rejected before the store.
//! - Storage failures are typed results, never swallowed.
//! - Note text never appears in log output.

use crate::logging::sanitize_for_log;
use crate::model::progress::{Mood, Note, NoteId, ProgressData};
use crate::repo::progress_repo::ProgressRepository;
use crate::repo::slot::{RepoError, SlotState};
use chrono::{DateTime, Utc};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ProgressServiceResult<T> = Result<T, ProgressServiceError>;

/// Use-case errors surfaced to boundary layers.
#[derive(Debug)]
pub enum ProgressServiceError {
    /// Note text was empty after trimming.
    InvalidNote,
    Repo(RepoError),
}

impl Display for ProgressServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidNote => write!(f, "note text cannot be empty"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ProgressServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidNote => None,
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RepoError> for ProgressServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(_) => Self::InvalidNote,
            other => Self::Repo(other),
        }
    }
}

/// Use-case service for the progress record.
pub struct ProgressService<R: ProgressRepository> {
    repo: R,
}

impl<R: ProgressRepository> ProgressService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Reads the progress record, seeding one when nothing usable is
    /// stored.
    ///
    /// # Contract
    /// - Absent slot: seeds `start_date = now`, empty journal, no target.
    /// - Corrupt slot: logs a warning with the decode detail, clears the
    ///   slot, then seeds.
    pub fn load_or_seed(&mut self, now: DateTime<Utc>) -> ProgressServiceResult<ProgressData> {
        match self.repo.load()? {
            SlotState::Present(data) => Ok(data),
            SlotState::Absent => self.seed(now),
            SlotState::Corrupt { detail } => {
                warn!(
                    "event=progress_recover module=service status=corrupt detail={}",
                    sanitize_for_log(&detail)
                );
                self.repo.clear()?;
                self.seed(now)
            }
        }
    }

    /// Appends a journal note, seeding the record first when needed.
    ///
    /// Returns the updated record and the new note id.
    pub fn add_note(
        &mut self,
        text: &str,
        mood: Option<Mood>,
        now: DateTime<Utc>,
    ) -> ProgressServiceResult<(ProgressData, NoteId)> {
        let note = Note::new(text, mood, now).map_err(|_| ProgressServiceError::InvalidNote)?;
        self.load_or_seed(now)?;

        let updated = self.repo.append_note(&note)?;
        info!(
            "event=note_append module=service status=ok note_id={} mood_tagged={}",
            note.id,
            note.mood.is_some()
        );
        Ok((updated, note.id))
    }

    /// Sets the quit target, seeding the record first when needed.
    ///
    /// No ordering against `start_date` or `now` is enforced; a past
    /// target reads as an expired countdown.
    pub fn set_quit_date(
        &mut self,
        quit: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> ProgressServiceResult<ProgressData> {
        self.load_or_seed(now)?;
        let updated = self.repo.set_quit_date(Some(quit))?;
        info!("event=quit_date_set module=service status=ok");
        Ok(updated)
    }

    /// Clears the quit target, seeding the record first when needed.
    pub fn clear_quit_date(&mut self, now: DateTime<Utc>) -> ProgressServiceResult<ProgressData> {
        self.load_or_seed(now)?;
        let updated = self.repo.set_quit_date(None)?;
        info!("event=quit_date_clear module=service status=ok");
        Ok(updated)
    }

    /// Replaces the whole record after validating every note.
    pub fn replace(&mut self, data: &ProgressData) -> ProgressServiceResult<()> {
        for note in &data.notes {
            note.validate()
                .map_err(|_| ProgressServiceError::InvalidNote)?;
        }
        self.repo.save(data)?;
        info!(
            "event=progress_replace module=service status=ok note_count={}",
            data.notes.len()
        );
        Ok(())
    }

    /// Softer reset: rewinds `start_date` to `now`, preserving the journal
    /// and the quit target. Seeds when nothing usable is stored.
    pub fn restart_tracking(&mut self, now: DateTime<Utc>) -> ProgressServiceResult<ProgressData> {
        match self.repo.load()? {
            SlotState::Present(_) => {
                let updated = self.repo.rewind_start_date(now)?;
                info!("event=progress_restart module=service status=ok");
                Ok(updated)
            }
            SlotState::Absent => self.seed(now),
            SlotState::Corrupt { detail } => {
                warn!(
                    "event=progress_recover module=service status=corrupt detail={}",
                    sanitize_for_log(&detail)
                );
                self.repo.clear()?;
                self.seed(now)
            }
        }
    }

    /// Full reset: removes the record entirely, journal and target
    /// included.
    pub fn reset(&mut self) -> ProgressServiceResult<()> {
        self.repo.clear()?;
        info!("event=progress_reset module=service status=ok");
        Ok(())
    }

    fn seed(&mut self, now: DateTime<Utc>) -> ProgressServiceResult<ProgressData> {
        let data = ProgressData::seeded(now);
        self.repo.save(&data)?;
        info!("event=progress_seed module=service status=ok");
        Ok(data)
    }
}
