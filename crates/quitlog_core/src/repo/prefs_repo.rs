//! Preference slot repository.
//!
//! # Responsibility
//! - Persist the theme preference in its own named slot.
//!
//! # Invariants
//! - Preferences are whole-value overwrites; no read-modify-write helpers
//!   are needed at this layer.

use crate::model::prefs::ThemePreference;
use crate::repo::slot::{
    delete_slot, ensure_slots_ready, read_slot, write_slot, RepoResult, SlotState, THEME_SLOT,
};
use rusqlite::Connection;

/// Repository interface for app preferences.
pub trait PreferenceRepository {
    fn load_theme(&self) -> RepoResult<SlotState<ThemePreference>>;
    fn save_theme(&self, theme: ThemePreference) -> RepoResult<()>;
    /// Removes the preference slot. Idempotent.
    fn clear(&self) -> RepoResult<()>;
}

/// SQLite-backed preference repository over the `slots` table.
pub struct SqlitePreferenceRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqlitePreferenceRepository<'conn> {
    /// Wraps a connection after verifying the slot schema is present.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_slots_ready(conn)?;
        Ok(Self { conn })
    }
}

impl PreferenceRepository for SqlitePreferenceRepository<'_> {
    fn load_theme(&self) -> RepoResult<SlotState<ThemePreference>> {
        read_slot(self.conn, THEME_SLOT)
    }

    fn save_theme(&self, theme: ThemePreference) -> RepoResult<()> {
        write_slot(self.conn, THEME_SLOT, &theme)
    }

    fn clear(&self) -> RepoResult<()> {
        delete_slot(self.conn, THEME_SLOT)
    }
}
