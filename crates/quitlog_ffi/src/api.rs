//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose the progress, calculation and preference operations to Dart
//!   via FRB, one function per screen-level use case.
//! - Convert between epoch-millisecond wire timestamps and core types.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Timestamps cross the boundary as epoch milliseconds plus RFC3339
//!   display strings.
//! - Storage failures surface as `ok = false` envelopes, never silently.

use chrono::{DateTime, TimeZone, Utc};
use quitlog_core::db::open_db;
use quitlog_core::{
    achievements_for, countdown_between, days_since_start, encouragement, mood_distribution,
    mood_label, parse_mood, parse_theme, theme_label, weekly_summaries, Note, PreferenceService,
    ProgressData, ProgressService, SqlitePreferenceRepository, SqliteProgressRepository,
};
use std::path::PathBuf;
use std::sync::OnceLock;

const DB_FILE_NAME: &str = "quitlog.sqlite3";
static DB_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Liveness check used by Dart-side bridge smoke tests.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    quitlog_core::ping().to_string()
}

/// Core crate version, shown on the settings/about screen.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    quitlog_core::core_version().to_string()
}

/// Starts rolling file logging for this process.
///
/// `level` is one of `trace|debug|info|warn|error` (case-insensitive);
/// `log_dir` an absolute directory, created when missing. Repeat calls
/// with the same arguments are a no-op; different arguments are rejected
/// with `ok = false`, as is any malformed input. Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> ActionResponse {
    match quitlog_core::init_logging(&level, &log_dir) {
        Ok(()) => ActionResponse::success("Logging active."),
        Err(err) => ActionResponse::failure(err),
    }
}

/// One journal note as rendered by screens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteView {
    /// Stable note id in string form.
    pub id: String,
    pub text: String,
    pub date_epoch_ms: i64,
    pub date_rfc3339: String,
    /// `good|neutral|difficult`, absent when untagged.
    pub mood: Option<String>,
}

/// Full progress record as rendered by screens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressView {
    pub start_epoch_ms: i64,
    pub start_rfc3339: String,
    pub quit_epoch_ms: Option<i64>,
    pub quit_rfc3339: Option<String>,
    /// Whole days since start, magnitude-based.
    pub elapsed_days: u64,
    /// Milestone message for the home screen, absent before day one.
    pub encouragement: Option<String>,
    /// Insertion order, oldest first.
    pub notes: Vec<NoteView>,
}

/// Envelope for operations returning the progress record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressResponse {
    pub ok: bool,
    pub message: String,
    pub progress: Option<ProgressView>,
}

impl ProgressResponse {
    fn success(data: &ProgressData, now: DateTime<Utc>) -> Self {
        Self {
            ok: true,
            message: String::new(),
            progress: Some(to_progress_view(data, now)),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
            progress: None,
        }
    }
}

/// Generic action response envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    pub ok: bool,
    pub message: String,
}

impl ActionResponse {
    fn success(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
        }
    }
}

/// Reads the progress record, seeding a fresh one on first use.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
/// - Absent and corrupt storage both yield a freshly seeded record.
#[flutter_rust_bridge::frb(sync)]
pub fn progress_load() -> ProgressResponse {
    let now = Utc::now();
    match with_progress_service(|service| service.load_or_seed(now)) {
        Ok(data) => ProgressResponse::success(&data, now),
        Err(err) => ProgressResponse::failure(format!("progress_load failed: {err}")),
    }
}

/// Input shape for a full-record replace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteWrite {
    /// Existing note id; a fresh id is generated when absent or invalid.
    pub id: Option<String>,
    pub text: String,
    pub date_epoch_ms: i64,
    pub mood: Option<String>,
}

/// Replaces the whole progress record.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
/// - Rejects the write when any note text is empty after trimming.
#[flutter_rust_bridge::frb(sync)]
pub fn progress_replace(
    start_epoch_ms: i64,
    quit_epoch_ms: Option<i64>,
    notes: Vec<NoteWrite>,
) -> ProgressResponse {
    let now = Utc::now();
    let start = match from_epoch_ms(start_epoch_ms) {
        Some(value) => value,
        None => return ProgressResponse::failure("invalid start timestamp"),
    };
    let quit = match quit_epoch_ms.map(from_epoch_ms) {
        Some(None) => return ProgressResponse::failure("invalid quit timestamp"),
        Some(Some(value)) => Some(value),
        None => None,
    };

    let mut decoded_notes = Vec::with_capacity(notes.len());
    for note in &notes {
        match decode_note_write(note) {
            Some(decoded) => decoded_notes.push(decoded),
            None => {
                return ProgressResponse::failure("invalid note in replacement record");
            }
        }
    }

    let data = ProgressData {
        start_date: start,
        quit_date: quit,
        notes: decoded_notes,
    };

    match with_progress_service(|service| service.replace(&data).map(|()| data.clone())) {
        Ok(saved) => ProgressResponse::success(&saved, now),
        Err(err) => ProgressResponse::failure(format!("progress_replace failed: {err}")),
    }
}

/// Clears the progress record entirely.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics. Idempotent.
#[flutter_rust_bridge::frb(sync)]
pub fn progress_reset() -> ActionResponse {
    match with_progress_service(|service| service.reset()) {
        Ok(()) => ActionResponse::success("Progress reset."),
        Err(err) => ActionResponse::failure(format!("progress_reset failed: {err}")),
    }
}

/// Response for note creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteAddResponse {
    pub ok: bool,
    pub note_id: Option<String>,
    pub message: String,
    pub progress: Option<ProgressView>,
}

/// Appends a journal note, seeding the record first when needed.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
/// - Empty or whitespace-only text is rejected before the store.
#[flutter_rust_bridge::frb(sync)]
pub fn note_add(text: String, mood: Option<String>) -> NoteAddResponse {
    let now = Utc::now();
    let mood = mood.as_deref().and_then(parse_mood);
    match with_progress_service(|service| service.add_note(&text, mood, now)) {
        Ok((data, note_id)) => NoteAddResponse {
            ok: true,
            note_id: Some(note_id.to_string()),
            message: "Note added.".to_string(),
            progress: Some(to_progress_view(&data, now)),
        },
        Err(err) => NoteAddResponse {
            ok: false,
            note_id: None,
            message: format!("note_add failed: {err}"),
            progress: None,
        },
    }
}

/// Sets the quit target date.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
/// - A past target is accepted; it reads back as an expired countdown.
#[flutter_rust_bridge::frb(sync)]
pub fn quit_date_set(quit_epoch_ms: i64) -> ProgressResponse {
    let now = Utc::now();
    let quit = match from_epoch_ms(quit_epoch_ms) {
        Some(value) => value,
        None => return ProgressResponse::failure("invalid quit timestamp"),
    };
    match with_progress_service(|service| service.set_quit_date(quit, now)) {
        Ok(data) => ProgressResponse::success(&data, now),
        Err(err) => ProgressResponse::failure(format!("quit_date_set failed: {err}")),
    }
}

/// Clears the quit target date.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics. The rest of the record is untouched.
#[flutter_rust_bridge::frb(sync)]
pub fn quit_date_clear() -> ProgressResponse {
    let now = Utc::now();
    match with_progress_service(|service| service.clear_quit_date(now)) {
        Ok(data) => ProgressResponse::success(&data, now),
        Err(err) => ProgressResponse::failure(format!("quit_date_clear failed: {err}")),
    }
}

/// Softer reset: rewinds the start date, keeping notes and the target.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn restart_tracking() -> ProgressResponse {
    let now = Utc::now();
    match with_progress_service(|service| service.restart_tracking(now)) {
        Ok(data) => ProgressResponse::success(&data, now),
        Err(err) => ProgressResponse::failure(format!("restart_tracking failed: {err}")),
    }
}

/// Elapsed whole days since the start date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElapsedDaysResponse {
    pub ok: bool,
    pub message: String,
    pub days: u64,
    pub encouragement: Option<String>,
}

/// Computes elapsed days for the stored record.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics.
/// - A future start date yields a positive magnitude-based count.
#[flutter_rust_bridge::frb(sync)]
pub fn elapsed_days() -> ElapsedDaysResponse {
    let now = Utc::now();
    match with_progress_service(|service| service.load_or_seed(now)) {
        Ok(data) => {
            let days = days_since_start(data.start_date, now);
            ElapsedDaysResponse {
                ok: true,
                message: String::new(),
                days,
                encouragement: encouragement(days).map(str::to_string),
            }
        }
        Err(err) => ElapsedDaysResponse {
            ok: false,
            message: format!("elapsed_days failed: {err}"),
            days: 0,
            encouragement: None,
        },
    }
}

/// Countdown fields for the live target display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountdownView {
    pub days: u64,
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
    pub is_expired: bool,
}

/// Countdown envelope; `countdown` is absent when no target is set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountdownResponse {
    pub ok: bool,
    pub message: String,
    pub countdown: Option<CountdownView>,
}

/// Computes the countdown to the stored quit target.
///
/// # FFI contract
/// - Sync call, DB-backed execution; designed for once-per-second polling
///   by a screen-scoped timer the UI owns and cancels.
/// - Never panics.
/// - No stored target yields `ok = true` with an absent countdown.
#[flutter_rust_bridge::frb(sync)]
pub fn countdown_now() -> CountdownResponse {
    let now = Utc::now();
    match with_progress_service(|service| service.load_or_seed(now)) {
        Ok(data) => match data.quit_date {
            Some(quit) => {
                let countdown = countdown_between(quit, now);
                CountdownResponse {
                    ok: true,
                    message: String::new(),
                    countdown: Some(CountdownView {
                        days: countdown.days,
                        hours: countdown.hours,
                        minutes: countdown.minutes,
                        seconds: countdown.seconds,
                        is_expired: countdown.is_expired,
                    }),
                }
            }
            None => CountdownResponse {
                ok: true,
                message: "No quit date set.".to_string(),
                countdown: None,
            },
        },
        Err(err) => CountdownResponse {
            ok: false,
            message: format!("countdown_now failed: {err}"),
            countdown: None,
        },
    }
}

/// Per-mood integer percentages over the journal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoodStatsResponse {
    pub ok: bool,
    pub message: String,
    pub good: u8,
    pub neutral: u8,
    pub difficult: u8,
}

/// Computes the mood distribution over stored notes.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics; zero notes yields all-zero percentages.
#[flutter_rust_bridge::frb(sync)]
pub fn mood_stats() -> MoodStatsResponse {
    let now = Utc::now();
    match with_progress_service(|service| service.load_or_seed(now)) {
        Ok(data) => {
            let stats = mood_distribution(&data.notes);
            MoodStatsResponse {
                ok: true,
                message: String::new(),
                good: stats.good,
                neutral: stats.neutral,
                difficult: stats.difficult,
            }
        }
        Err(err) => MoodStatsResponse {
            ok: false,
            message: format!("mood_stats failed: {err}"),
            good: 0,
            neutral: 0,
            difficult: 0,
        },
    }
}

/// One 7-day window summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekView {
    pub week_number: u32,
    pub starts_at_epoch_ms: i64,
    pub ends_at_epoch_ms: i64,
    pub note_count: u32,
    pub good_count: u32,
    pub difficult_count: u32,
}

/// Weekly bucket envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeeklyStatsResponse {
    pub ok: bool,
    pub message: String,
    pub weeks: Vec<WeekView>,
}

/// Buckets stored notes into week summaries since the start date.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics; the final window's end is clamped to now.
#[flutter_rust_bridge::frb(sync)]
pub fn weekly_stats() -> WeeklyStatsResponse {
    let now = Utc::now();
    match with_progress_service(|service| service.load_or_seed(now)) {
        Ok(data) => {
            let weeks = weekly_summaries(data.start_date, now, &data.notes)
                .into_iter()
                .map(|week| WeekView {
                    week_number: week.week_number,
                    starts_at_epoch_ms: week.starts_at.timestamp_millis(),
                    ends_at_epoch_ms: week.ends_at.timestamp_millis(),
                    note_count: week.note_count,
                    good_count: week.good_count,
                    difficult_count: week.difficult_count,
                })
                .collect();
            WeeklyStatsResponse {
                ok: true,
                message: String::new(),
                weeks,
            }
        }
        Err(err) => WeeklyStatsResponse {
            ok: false,
            message: format!("weekly_stats failed: {err}"),
            weeks: Vec::new(),
        },
    }
}

/// One earned milestone badge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AchievementView {
    pub threshold_days: u64,
    pub label: String,
    pub icon: String,
    /// Palette role: `primary|secondary|accent|success|warning`.
    pub color: String,
}

/// Achievements envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AchievementsResponse {
    pub ok: bool,
    pub message: String,
    pub achievements: Vec<AchievementView>,
}

/// Evaluates the milestone ladder for the stored record.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics; earned milestones are a prefix of the fixed ladder.
#[flutter_rust_bridge::frb(sync)]
pub fn achievements_list() -> AchievementsResponse {
    let now = Utc::now();
    match with_progress_service(|service| service.load_or_seed(now)) {
        Ok(data) => {
            let days = days_since_start(data.start_date, now);
            let achievements = achievements_for(days)
                .into_iter()
                .map(|a| AchievementView {
                    threshold_days: a.threshold_days,
                    label: a.label.to_string(),
                    icon: a.icon.to_string(),
                    color: a.color.label().to_string(),
                })
                .collect();
            AchievementsResponse {
                ok: true,
                message: String::new(),
                achievements,
            }
        }
        Err(err) => AchievementsResponse {
            ok: false,
            message: format!("achievements_list failed: {err}"),
            achievements: Vec::new(),
        },
    }
}

/// Theme envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeResponse {
    pub ok: bool,
    pub message: String,
    /// `light|dark|system`.
    pub theme: String,
}

/// Resolves the stored theme preference, defaulting to `system`.
///
/// The value is intended to be read once at startup and passed explicitly
/// through the rendering layer.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics; absent and corrupt slots both resolve to `system`.
#[flutter_rust_bridge::frb(sync)]
pub fn theme_get() -> ThemeResponse {
    match with_preference_service(|service| service.theme()) {
        Ok(theme) => ThemeResponse {
            ok: true,
            message: String::new(),
            theme: theme_label(theme).to_string(),
        },
        Err(err) => ThemeResponse {
            ok: false,
            message: format!("theme_get failed: {err}"),
            theme: "system".to_string(),
        },
    }
}

/// Stores the theme preference.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics; unknown labels are rejected.
#[flutter_rust_bridge::frb(sync)]
pub fn theme_set(theme: String) -> ActionResponse {
    let Some(parsed) = parse_theme(theme.as_str()) else {
        return ActionResponse::failure(format!(
            "unsupported theme `{theme}`; expected light|dark|system"
        ));
    };
    match with_preference_service(|service| service.set_theme(parsed)) {
        Ok(()) => ActionResponse::success("Theme saved."),
        Err(err) => ActionResponse::failure(format!("theme_set failed: {err}")),
    }
}

/// Deletes all app data: the progress record and the preference slot.
///
/// # FFI contract
/// - Sync call, DB-backed execution.
/// - Never panics. Idempotent.
#[flutter_rust_bridge::frb(sync)]
pub fn wipe_all_data() -> ActionResponse {
    if let Err(err) = with_progress_service(|service| service.reset()) {
        return ActionResponse::failure(format!("wipe_all_data failed: {err}"));
    }
    match with_preference_service(|service| service.clear()) {
        Ok(()) => ActionResponse::success("All data deleted."),
        Err(err) => ActionResponse::failure(format!("wipe_all_data failed: {err}")),
    }
}

fn to_progress_view(data: &ProgressData, now: DateTime<Utc>) -> ProgressView {
    let days = days_since_start(data.start_date, now);
    ProgressView {
        start_epoch_ms: data.start_date.timestamp_millis(),
        start_rfc3339: data.start_date.to_rfc3339(),
        quit_epoch_ms: data.quit_date.map(|quit| quit.timestamp_millis()),
        quit_rfc3339: data.quit_date.map(|quit| quit.to_rfc3339()),
        elapsed_days: days,
        encouragement: encouragement(days).map(str::to_string),
        notes: data.notes.iter().map(to_note_view).collect(),
    }
}

fn to_note_view(note: &Note) -> NoteView {
    NoteView {
        id: note.id.to_string(),
        text: note.text.clone(),
        date_epoch_ms: note.date.timestamp_millis(),
        date_rfc3339: note.date.to_rfc3339(),
        mood: note.mood.map(|mood| mood_label(mood).to_string()),
    }
}

fn decode_note_write(note: &NoteWrite) -> Option<Note> {
    let date = from_epoch_ms(note.date_epoch_ms)?;
    let mood = note.mood.as_deref().and_then(parse_mood);
    let mut decoded = Note::new(note.text.as_str(), mood, date).ok()?;
    if let Some(id) = note.id.as_deref() {
        if let Ok(existing) = id.parse() {
            decoded.id = existing;
        }
    }
    Some(decoded)
}

fn from_epoch_ms(epoch_ms: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_millis_opt(epoch_ms).single()
}

fn resolve_db_path() -> PathBuf {
    DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var("QUITLOG_DB_PATH") {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(DB_FILE_NAME)
        })
        .clone()
}

fn with_progress_service<T>(
    f: impl FnOnce(
        &mut ProgressService<SqliteProgressRepository<'_>>,
    ) -> quitlog_core::ProgressServiceResult<T>,
) -> Result<T, String> {
    let db_path = resolve_db_path();
    let mut conn = open_db(&db_path).map_err(|err| format!("db open failed: {err}"))?;
    let repo = SqliteProgressRepository::try_new(&mut conn)
        .map_err(|err| format!("repo init failed: {err}"))?;
    let mut service = ProgressService::new(repo);
    f(&mut service).map_err(|err| err.to_string())
}

fn with_preference_service<T>(
    f: impl FnOnce(
        &PreferenceService<SqlitePreferenceRepository<'_>>,
    ) -> quitlog_core::RepoResult<T>,
) -> Result<T, String> {
    let db_path = resolve_db_path();
    let conn = open_db(&db_path).map_err(|err| format!("db open failed: {err}"))?;
    let repo = SqlitePreferenceRepository::try_new(&conn)
        .map_err(|err| format!("repo init failed: {err}"))?;
    let service = PreferenceService::new(repo);
    f(&service).map_err(|err| err.to_string())
}
