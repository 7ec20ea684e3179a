//! Named single-record JSON slot primitives.
//!
//! # Responsibility
//! - Provide get/set/clear over one named slot holding one JSON document.
//! - Distinguish absent, corrupt and present slot states for callers.
//!
//! # Invariants
//! - `write_slot` overwrites the entire document.
//! - `read_slot` never fails on a malformed document; it reports
//!   `SlotState::Corrupt` with a decode detail instead.

use crate::db::DbError;
use crate::model::progress::NoteValidationError;
use rusqlite::{params, Connection, OptionalExtension};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Slot name for the progress record.
pub const PROGRESS_SLOT: &str = "progress_data";
/// Slot name for the theme preference.
pub const THEME_SLOT: &str = "app_theme";

pub type RepoResult<T> = Result<T, RepoError>;

/// Decoded state of a named slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotState<T> {
    Present(T),
    Absent,
    /// The slot exists but its document does not decode; callers decide
    /// whether to reseed, retry or alert.
    Corrupt { detail: String },
}

/// Repository error for slot persistence operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    /// Read-modify-write was attempted on an absent slot.
    NoRecord,
    /// Read-modify-write found a document that does not decode.
    CorruptRecord { detail: String },
    /// A record failed domain validation before persistence.
    Validation(NoteValidationError),
    Encode(serde_json::Error),
    /// The connection lacks the slot schema (migrations not applied).
    MissingRequiredTable(&'static str),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NoRecord => write!(f, "no record stored in slot"),
            Self::CorruptRecord { detail } => {
                write!(f, "stored record does not decode: {detail}")
            }
            Self::Validation(err) => write!(f, "{err}"),
            Self::Encode(err) => write!(f, "record failed to encode: {err}"),
            Self::MissingRequiredTable(table) => {
                write!(f, "required table `{table}` is missing; migrations not applied")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Validation(err) => Some(err),
            Self::Encode(err) => Some(err),
            Self::NoRecord | Self::CorruptRecord { .. } | Self::MissingRequiredTable(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

impl From<NoteValidationError> for RepoError {
    fn from(value: NoteValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Reads and decodes the named slot.
pub fn read_slot<T: DeserializeOwned>(
    conn: &Connection,
    name: &str,
) -> RepoResult<SlotState<T>> {
    let raw: Option<String> = conn
        .query_row("SELECT value FROM slots WHERE name = ?1;", [name], |row| {
            row.get(0)
        })
        .optional()?;

    match raw {
        None => Ok(SlotState::Absent),
        Some(value) => match serde_json::from_str(&value) {
            Ok(decoded) => Ok(SlotState::Present(decoded)),
            Err(err) => Ok(SlotState::Corrupt {
                detail: err.to_string(),
            }),
        },
    }
}

/// Encodes and writes the named slot, replacing any existing document.
pub fn write_slot<T: Serialize>(conn: &Connection, name: &str, value: &T) -> RepoResult<()> {
    let encoded = serde_json::to_string(value).map_err(RepoError::Encode)?;
    conn.execute(
        "INSERT INTO slots (name, value, updated_at)
         VALUES (?1, ?2, strftime('%s', 'now') * 1000)
         ON CONFLICT(name) DO UPDATE SET
            value = excluded.value,
            updated_at = excluded.updated_at;",
        params![name, encoded],
    )?;
    Ok(())
}

/// Removes the named slot. Idempotent: clearing an absent slot succeeds.
pub fn delete_slot(conn: &Connection, name: &str) -> RepoResult<()> {
    conn.execute("DELETE FROM slots WHERE name = ?1;", [name])?;
    Ok(())
}

/// Verifies the connection has the slot schema applied.
pub fn ensure_slots_ready(conn: &Connection) -> RepoResult<()> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = 'slots'
        );",
        [],
        |row| row.get(0),
    )?;
    if exists != 1 {
        return Err(RepoError::MissingRequiredTable("slots"));
    }
    Ok(())
}
