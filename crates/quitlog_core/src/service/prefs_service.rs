//! Preference use-case service.
//!
//! # Responsibility
//! - Resolve the theme preference with a safe fallback.
//!
//! # Invariants
//! - Absent and corrupt preference slots both resolve to
//!   `ThemePreference::System`; a corrupt slot is cleared and logged.

use crate::logging::sanitize_for_log;
use crate::model::prefs::ThemePreference;
use crate::repo::prefs_repo::PreferenceRepository;
use crate::repo::slot::{RepoResult, SlotState};
use log::{info, warn};

/// Use-case service for app preferences.
pub struct PreferenceService<R: PreferenceRepository> {
    repo: R,
}

impl<R: PreferenceRepository> PreferenceService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Resolves the stored theme, falling back to `System`.
    pub fn theme(&self) -> RepoResult<ThemePreference> {
        match self.repo.load_theme()? {
            SlotState::Present(theme) => Ok(theme),
            SlotState::Absent => Ok(ThemePreference::System),
            SlotState::Corrupt { detail } => {
                warn!(
                    "event=theme_recover module=service status=corrupt detail={}",
                    sanitize_for_log(&detail)
                );
                self.repo.clear()?;
                Ok(ThemePreference::System)
            }
        }
    }

    /// Stores the theme preference.
    pub fn set_theme(&self, theme: ThemePreference) -> RepoResult<()> {
        self.repo.save_theme(theme)?;
        info!("event=theme_set module=service status=ok");
        Ok(())
    }

    /// Removes the preference slot. Idempotent.
    pub fn clear(&self) -> RepoResult<()> {
        self.repo.clear()?;
        info!("event=theme_clear module=service status=ok");
        Ok(())
    }
}
