//! Core domain logic for Quitlog, a habit-cessation tracker.
//! This crate is the single source of truth for business invariants.

pub mod calc;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use calc::achievements::{achievements_for, encouragement, Achievement, ColorTag};
pub use calc::moods::{mood_distribution, MoodDistribution};
pub use calc::timeline::{countdown_between, days_since_start, Countdown};
pub use calc::weeks::{weekly_summaries, WeekSummary};
pub use logging::{default_level, init_logging, logging_status, parse_level, LogConfig, LogLevel};
pub use model::prefs::{parse_theme, theme_label, ThemePreference};
pub use model::progress::{
    mood_label, parse_mood, Mood, Note, NoteId, NoteValidationError, ProgressData,
};
pub use repo::prefs_repo::{PreferenceRepository, SqlitePreferenceRepository};
pub use repo::progress_repo::{ProgressRepository, SqliteProgressRepository};
pub use repo::slot::{RepoError, RepoResult, SlotState};
pub use service::prefs_service::PreferenceService;
pub use service::progress_service::{
    ProgressService, ProgressServiceError, ProgressServiceResult,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
