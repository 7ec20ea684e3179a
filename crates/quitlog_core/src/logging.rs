//! Logging bootstrap and log-hygiene policy.
//!
//! # Responsibility
//! - Start rolling file logs at most once per process.
//! - Keep journal content out of diagnostics: anything that may carry
//!   user-derived text goes through `sanitize_for_log` first.
//!
//! # Invariants
//! - One logger configuration per process: a repeat call with the same
//!   configuration is a no-op, a different one is an error.
//! - Initialization never panics.

use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::{error, info};
use once_cell::sync::OnceCell;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

const LOG_FILE_BASENAME: &str = "quitlog";
// A journal tracker writes a handful of events per session; small files
// and a short rotation tail are plenty.
const ROTATE_AT_BYTES: u64 = 2 * 1024 * 1024;
const KEEP_ROTATED_FILES: usize = 3;
const SANITIZE_CAP_CHARS: usize = 160;

static ACTIVE: OnceCell<ActiveLogger> = OnceCell::new();
static PANIC_HOOK: OnceCell<()> = OnceCell::new();

struct ActiveLogger {
    config: LogConfig,
    _handle: LoggerHandle,
}

/// Verbosity for the rolling file log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Wire label; also the spec string handed to the logger backend.
    pub fn label(self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Parses a level label, case-insensitively. `warning` is accepted as an
/// alias for `warn`.
pub fn parse_level(value: &str) -> Option<LogLevel> {
    match value.trim().to_ascii_lowercase().as_str() {
        "trace" => Some(LogLevel::Trace),
        "debug" => Some(LogLevel::Debug),
        "info" => Some(LogLevel::Info),
        "warn" | "warning" => Some(LogLevel::Warn),
        "error" => Some(LogLevel::Error),
        _ => None,
    }
}

/// Level used when the caller does not pick one: `debug` in debug builds,
/// `info` in release builds.
pub fn default_level() -> LogLevel {
    if cfg!(debug_assertions) {
        LogLevel::Debug
    } else {
        LogLevel::Info
    }
}

/// Validated logging configuration: a level plus an absolute log
/// directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub level: LogLevel,
    pub dir: PathBuf,
}

impl LogConfig {
    /// Builds a configuration from boundary-layer strings.
    ///
    /// # Errors
    /// - Unsupported `level` label.
    /// - Empty or non-absolute `log_dir`.
    pub fn from_args(level: &str, log_dir: &str) -> Result<Self, String> {
        let level = parse_level(level).ok_or_else(|| {
            format!(
                "unsupported log level `{}`; expected trace|debug|info|warn|error",
                level.trim()
            )
        })?;

        let trimmed = log_dir.trim();
        if trimmed.is_empty() {
            return Err("log_dir cannot be empty".to_string());
        }
        let dir = Path::new(trimmed);
        if !dir.is_absolute() {
            return Err(format!("log_dir must be an absolute path, got `{trimmed}`"));
        }

        Ok(Self {
            level,
            dir: dir.to_path_buf(),
        })
    }
}

impl Display for LogConfig {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "level={} dir={}", self.level.label(), self.dir.display())
    }
}

/// Initializes rolling file logging for this process.
///
/// # Invariants
/// - Idempotent for an identical `level + log_dir` pair.
/// - A different configuration after the first successful call is
///   rejected; the active configuration stays in force.
/// - Never panics; failures come back as human-readable strings.
pub fn init_logging(level: &str, log_dir: &str) -> Result<(), String> {
    let wanted = LogConfig::from_args(level, log_dir)?;

    let active = ACTIVE.get_or_try_init(|| start_logger(wanted.clone()))?;
    if active.config != wanted {
        return Err(format!(
            "logging already initialized ({}); refusing to switch to ({})",
            active.config, wanted
        ));
    }
    Ok(())
}

/// Returns the active configuration, or `None` before initialization.
pub fn logging_status() -> Option<LogConfig> {
    ACTIVE.get().map(|active| active.config.clone())
}

fn start_logger(config: LogConfig) -> Result<ActiveLogger, String> {
    std::fs::create_dir_all(&config.dir).map_err(|err| {
        format!(
            "failed to create log directory `{}`: {err}",
            config.dir.display()
        )
    })?;

    let handle = Logger::try_with_str(config.level.label())
        .map_err(|err| format!("invalid log level `{}`: {err}", config.level.label()))?
        .log_to_file(
            FileSpec::default()
                .directory(config.dir.as_path())
                .basename(LOG_FILE_BASENAME),
        )
        .rotate(
            Criterion::Size(ROTATE_AT_BYTES),
            Naming::Numbers,
            Cleanup::KeepLogFiles(KEEP_ROTATED_FILES),
        )
        .write_mode(WriteMode::BufferAndFlush)
        .append()
        .format_for_files(flexi_logger::detailed_format)
        .start()
        .map_err(|err| format!("failed to start logger: {err}"))?;

    install_panic_hook();

    info!(
        "event=log_init module=logging status=ok {} version={} build={} platform={}",
        config,
        env!("CARGO_PKG_VERSION"),
        build_profile(),
        std::env::consts::OS
    );

    Ok(ActiveLogger {
        config,
        _handle: handle,
    })
}

fn build_profile() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "release"
    }
}

fn install_panic_hook() {
    if PANIC_HOOK.set(()).is_err() {
        return;
    }

    let previous = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let location = panic_info
            .location()
            .map(|loc| format!("{}:{}", loc.file(), loc.line()))
            .unwrap_or_else(|| "unknown".to_string());
        let payload = panic_info
            .payload()
            .downcast_ref::<&str>()
            .map(|message| (*message).to_string())
            .or_else(|| panic_info.payload().downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "non-string panic payload".to_string());
        error!(
            "event=panic module=logging status=error location={} payload={}",
            location,
            sanitize_for_log(&payload)
        );
        previous(panic_info);
    }));
}

/// Collapses a possibly multi-line, possibly user-derived string into one
/// bounded token safe for the one-event-per-line log format.
pub(crate) fn sanitize_for_log(value: &str) -> String {
    let flat = value.replace(['\n', '\r'], " ");
    let mut bounded = flat.chars().take(SANITIZE_CAP_CHARS).collect::<String>();
    if flat.chars().count() > SANITIZE_CAP_CHARS {
        bounded.push_str("...");
    }
    bounded
}
