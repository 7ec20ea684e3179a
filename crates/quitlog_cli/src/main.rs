//! Command-line probe for the quitlog core.
//!
//! # Responsibility
//! - Exercise every core operation against a local database without the
//!   Flutter runtime.
//! - Host the live countdown watch loop, the one recurring operation in
//!   the system.
//!
//! # Invariants
//! - The watch loop reloads the stored record each tick, so it never
//!   renders a stale or cleared target.

use chrono::{DateTime, Local, Utc};
use clap::{Args, Parser, Subcommand};
use quitlog_core::db::open_db;
use quitlog_core::{
    achievements_for, countdown_between, days_since_start, encouragement, mood_distribution,
    mood_label, parse_mood, weekly_summaries, Mood, Note, ProgressService,
    SqliteProgressRepository,
};
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use std::thread;
use std::time::Duration;

#[derive(Debug, Parser)]
#[command(name = "quitlog", about = "Habit-cessation tracker probe", version)]
struct Cli {
    /// Database file; falls back to QUITLOG_DB_PATH, then the platform
    /// data directory.
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show elapsed days, quit target and recent notes.
    Status,
    /// Append a journal note.
    Note(NoteArgs),
    /// List journal notes, newest first.
    Notes {
        /// Maximum notes to print.
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// Show mood distribution, weekly buckets and achievements.
    Stats,
    /// Manage the planned quit date.
    #[command(subcommand)]
    QuitDate(QuitDateCommand),
    /// Re-render the countdown once per second until it expires.
    Watch,
    /// Rewind the start date to now, keeping notes and the quit date.
    Restart,
    /// Delete the progress record entirely.
    Reset,
}

#[derive(Debug, Args)]
struct NoteArgs {
    /// Note text; empty or whitespace-only input is rejected.
    text: String,
    /// Mood tag: good, neutral or difficult.
    #[arg(long)]
    mood: Option<String>,
}

#[derive(Debug, Subcommand)]
enum QuitDateCommand {
    /// Set the target, e.g. `2025-01-01T09:00:00Z`.
    Set { when: String },
    /// Remove the target.
    Clear,
    /// Print the target and the current countdown.
    Show,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let db_path = resolve_db_path(cli.db)?;
    let mut conn = open_db(&db_path)?;
    let repo = SqliteProgressRepository::try_new(&mut conn)?;
    let mut service = ProgressService::new(repo);

    match cli.command {
        Command::Status => status(&mut service),
        Command::Note(args) => add_note(&mut service, &args),
        Command::Notes { limit } => list_notes(&mut service, limit),
        Command::Stats => stats(&mut service),
        Command::QuitDate(command) => quit_date(&mut service, command),
        Command::Watch => watch(&mut service),
        Command::Restart => {
            let data = service.restart_tracking(Utc::now())?;
            println!("Tracking restarted at {}.", format_local(data.start_date));
            Ok(())
        }
        Command::Reset => {
            service.reset()?;
            println!("Progress record deleted.");
            Ok(())
        }
    }
}

fn status(
    service: &mut ProgressService<SqliteProgressRepository<'_>>,
) -> Result<(), Box<dyn Error>> {
    let now = Utc::now();
    let data = service.load_or_seed(now)?;
    let days = days_since_start(data.start_date, now);

    println!("Tracking since: {}", format_local(data.start_date));
    println!("Days without it: {days}");
    if let Some(message) = encouragement(days) {
        println!("{message}");
    }

    match data.quit_date {
        Some(quit) => {
            let countdown = countdown_between(quit, now);
            if countdown.is_expired {
                println!("Quit target {} has passed.", format_local(quit));
            } else {
                println!(
                    "Quit target {}: {} left.",
                    format_local(quit),
                    format_countdown(&countdown)
                );
            }
        }
        None => println!("No quit target set."),
    }

    println!("{} note(s) in the journal.", data.notes.len());
    for note in data.recent_notes(3) {
        print_note(note);
    }
    Ok(())
}

fn add_note(
    service: &mut ProgressService<SqliteProgressRepository<'_>>,
    args: &NoteArgs,
) -> Result<(), Box<dyn Error>> {
    let mood = match args.mood.as_deref() {
        Some(label) => Some(
            parse_mood(label)
                .ok_or_else(|| format!("unknown mood `{label}`; expected good|neutral|difficult"))?,
        ),
        None => None,
    };

    let (data, note_id) = service.add_note(&args.text, mood, Utc::now())?;
    println!("Note {note_id} added ({} total).", data.notes.len());
    Ok(())
}

fn list_notes(
    service: &mut ProgressService<SqliteProgressRepository<'_>>,
    limit: usize,
) -> Result<(), Box<dyn Error>> {
    let data = service.load_or_seed(Utc::now())?;
    if data.notes.is_empty() {
        println!("Journal is empty.");
        return Ok(());
    }
    for note in data.notes_newest_first().into_iter().take(limit) {
        print_note(note);
    }
    Ok(())
}

fn stats(
    service: &mut ProgressService<SqliteProgressRepository<'_>>,
) -> Result<(), Box<dyn Error>> {
    let now = Utc::now();
    let data = service.load_or_seed(now)?;
    let days = days_since_start(data.start_date, now);

    println!("Days without it: {days}");
    println!("Notes: {}", data.notes.len());

    let moods = mood_distribution(&data.notes);
    println!(
        "Mood: good {}%, neutral {}%, difficult {}%",
        moods.good, moods.neutral, moods.difficult
    );

    println!("Weekly journal:");
    for week in weekly_summaries(data.start_date, now, &data.notes) {
        println!(
            "  week {} ({} - {}): {} note(s), {} good, {} difficult",
            week.week_number,
            format_local(week.starts_at),
            format_local(week.ends_at),
            week.note_count,
            week.good_count,
            week.difficult_count
        );
    }

    let achievements = achievements_for(days);
    if achievements.is_empty() {
        println!("No milestones yet.");
    } else {
        println!("Milestones:");
        for achievement in achievements {
            println!(
                "  {} ({}+ days)",
                achievement.label, achievement.threshold_days
            );
        }
    }
    Ok(())
}

fn quit_date(
    service: &mut ProgressService<SqliteProgressRepository<'_>>,
    command: QuitDateCommand,
) -> Result<(), Box<dyn Error>> {
    let now = Utc::now();
    match command {
        QuitDateCommand::Set { when } => {
            let quit = parse_timestamp(&when)?;
            service.set_quit_date(quit, now)?;
            println!("Quit target set to {}.", format_local(quit));
        }
        QuitDateCommand::Clear => {
            service.clear_quit_date(now)?;
            println!("Quit target cleared.");
        }
        QuitDateCommand::Show => {
            let data = service.load_or_seed(now)?;
            match data.quit_date {
                Some(quit) => {
                    let countdown = countdown_between(quit, now);
                    if countdown.is_expired {
                        println!("Quit target {} has passed.", format_local(quit));
                    } else {
                        println!(
                            "Quit target {}: {} left.",
                            format_local(quit),
                            format_countdown(&countdown)
                        );
                    }
                }
                None => println!("No quit target set."),
            }
        }
    }
    Ok(())
}

/// Re-renders the countdown once per second.
///
/// The stored record is reloaded every tick: clearing or moving the target
/// from another process is picked up on the next render, and the loop ends
/// when the target expires or disappears.
fn watch(
    service: &mut ProgressService<SqliteProgressRepository<'_>>,
) -> Result<(), Box<dyn Error>> {
    loop {
        let now = Utc::now();
        let data = service.load_or_seed(now)?;
        let Some(quit) = data.quit_date else {
            println!("No quit target set; nothing to watch.");
            return Ok(());
        };

        let countdown = countdown_between(quit, now);
        if countdown.is_expired {
            println!("Quit target {} reached.", format_local(quit));
            return Ok(());
        }

        println!(
            "{} until {}",
            format_countdown(&countdown),
            format_local(quit)
        );
        thread::sleep(Duration::from_secs(1));
    }
}

fn print_note(note: &Note) {
    let tag = note
        .mood
        .map(|mood: Mood| format!(" [{}]", mood_label(mood)))
        .unwrap_or_default();
    println!("  {}{}: {}", format_local(note.date), tag, note.text);
}

fn format_countdown(countdown: &quitlog_core::Countdown) -> String {
    format!(
        "{}d {:02}h {:02}m {:02}s",
        countdown.days, countdown.hours, countdown.minutes, countdown.seconds
    )
}

fn format_local(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, Box<dyn Error>> {
    let parsed = DateTime::parse_from_rfc3339(raw)
        .map_err(|err| format!("invalid timestamp `{raw}`: {err} (expected RFC3339)"))?;
    Ok(parsed.with_timezone(&Utc))
}

fn resolve_db_path(flag: Option<PathBuf>) -> Result<PathBuf, Box<dyn Error>> {
    if let Some(path) = flag {
        return Ok(path);
    }
    if let Ok(raw) = std::env::var("QUITLOG_DB_PATH") {
        let trimmed = raw.trim();
        if !trimmed.is_empty() {
            return Ok(PathBuf::from(trimmed));
        }
    }
    let base = dirs::data_dir().ok_or("no platform data directory; pass --db")?;
    let dir = base.join("quitlog");
    std::fs::create_dir_all(&dir)?;
    Ok(dir.join("quitlog.sqlite3"))
}
