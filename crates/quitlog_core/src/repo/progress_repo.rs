//! Progress record repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist the single progress record in its named slot.
//! - Own the read-modify-write helpers (append note, set target, rewind
//!   start) with atomic semantics.
//!
//! # Invariants
//! - Every read-modify-write runs read, decode, modify, encode, write
//!   inside one immediate transaction, so concurrent writers cannot lose
//!   updates.
//! - Read-modify-write on an absent slot is `RepoError::NoRecord`; callers
//!   seed first.

use crate::model::progress::{Note, ProgressData};
use crate::repo::slot::{
    delete_slot, ensure_slots_ready, read_slot, write_slot, RepoError, RepoResult, SlotState,
    PROGRESS_SLOT,
};
use chrono::{DateTime, Utc};
use rusqlite::{Connection, Transaction, TransactionBehavior};

/// Repository interface for the progress record.
pub trait ProgressRepository {
    /// Reads the progress slot, distinguishing present/absent/corrupt.
    fn load(&self) -> RepoResult<SlotState<ProgressData>>;
    /// Overwrites the whole record.
    fn save(&self, data: &ProgressData) -> RepoResult<()>;
    /// Removes the record. Idempotent.
    fn clear(&self) -> RepoResult<()>;
    /// Appends a note atomically; returns the updated record.
    fn append_note(&mut self, note: &Note) -> RepoResult<ProgressData>;
    /// Sets or clears the quit target atomically; returns the updated
    /// record.
    fn set_quit_date(&mut self, quit: Option<DateTime<Utc>>) -> RepoResult<ProgressData>;
    /// Rewinds the start date atomically, preserving notes and the quit
    /// target; returns the updated record.
    fn rewind_start_date(&mut self, now: DateTime<Utc>) -> RepoResult<ProgressData>;
}

/// SQLite-backed progress repository over the `slots` table.
#[derive(Debug)]
pub struct SqliteProgressRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteProgressRepository<'conn> {
    /// Wraps a connection after verifying the slot schema is present.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_slots_ready(conn)?;
        Ok(Self { conn })
    }

    fn modify(
        &mut self,
        apply: impl FnOnce(&mut ProgressData),
    ) -> RepoResult<ProgressData> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let mut data = load_present_in_tx(&tx)?;
        apply(&mut data);
        write_slot(&tx, PROGRESS_SLOT, &data)?;

        tx.commit()?;
        Ok(data)
    }
}

impl ProgressRepository for SqliteProgressRepository<'_> {
    fn load(&self) -> RepoResult<SlotState<ProgressData>> {
        read_slot(self.conn, PROGRESS_SLOT)
    }

    fn save(&self, data: &ProgressData) -> RepoResult<()> {
        for note in &data.notes {
            note.validate()?;
        }
        write_slot(self.conn, PROGRESS_SLOT, data)
    }

    fn clear(&self) -> RepoResult<()> {
        delete_slot(self.conn, PROGRESS_SLOT)
    }

    fn append_note(&mut self, note: &Note) -> RepoResult<ProgressData> {
        note.validate()?;
        let note = note.clone();
        self.modify(move |data| data.notes.push(note))
    }

    fn set_quit_date(&mut self, quit: Option<DateTime<Utc>>) -> RepoResult<ProgressData> {
        self.modify(move |data| data.quit_date = quit)
    }

    fn rewind_start_date(&mut self, now: DateTime<Utc>) -> RepoResult<ProgressData> {
        self.modify(move |data| data.start_date = now)
    }
}

fn load_present_in_tx(tx: &Transaction<'_>) -> RepoResult<ProgressData> {
    match read_slot::<ProgressData>(tx, PROGRESS_SLOT)? {
        SlotState::Present(data) => Ok(data),
        SlotState::Absent => Err(RepoError::NoRecord),
        SlotState::Corrupt { detail } => Err(RepoError::CorruptRecord { detail }),
    }
}
