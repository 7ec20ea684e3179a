use chrono::{Duration, TimeZone, Utc};
use quitlog_core::db::open_db_in_memory;
use quitlog_core::{
    Mood, ProgressService, ProgressServiceError, ProgressRepository, SlotState,
    SqliteProgressRepository,
};
use rusqlite::Connection;

fn fixed_now() -> chrono::DateTime<chrono::Utc> {
    Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap()
}

#[test]
fn load_or_seed_creates_fresh_record_on_first_read() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteProgressRepository::try_new(&mut conn).unwrap();
    let mut service = ProgressService::new(repo);

    let data = service.load_or_seed(fixed_now()).unwrap();
    assert_eq!(data.start_date, fixed_now());
    assert_eq!(data.quit_date, None);
    assert!(data.notes.is_empty());
}

#[test]
fn load_or_seed_returns_existing_record_untouched() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteProgressRepository::try_new(&mut conn).unwrap();
    let mut service = ProgressService::new(repo);

    let original_now = fixed_now() - Duration::days(5);
    service.load_or_seed(original_now).unwrap();

    let data = service.load_or_seed(fixed_now()).unwrap();
    assert_eq!(data.start_date, original_now);
}

#[test]
fn load_or_seed_recovers_from_corrupt_slot_by_reseeding() {
    let mut conn = open_db_in_memory().unwrap();
    write_raw_progress_slot(&conn, "{\"startDate\": 42}");

    let repo = SqliteProgressRepository::try_new(&mut conn).unwrap();
    let mut service = ProgressService::new(repo);

    let data = service.load_or_seed(fixed_now()).unwrap();
    assert_eq!(data.start_date, fixed_now());
    assert!(data.notes.is_empty());
}

#[test]
fn add_note_trims_text_and_returns_updated_record() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteProgressRepository::try_new(&mut conn).unwrap();
    let mut service = ProgressService::new(repo);

    let (data, note_id) = service
        .add_note("  feeling strong today  ", Some(Mood::Good), fixed_now())
        .unwrap();

    assert_eq!(data.notes.len(), 1);
    assert_eq!(data.notes[0].id, note_id);
    assert_eq!(data.notes[0].text, "feeling strong today");
    assert_eq!(data.notes[0].mood, Some(Mood::Good));
}

#[test]
fn add_note_seeds_record_when_store_is_empty() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteProgressRepository::try_new(&mut conn).unwrap();
    let mut service = ProgressService::new(repo);

    let (data, _) = service.add_note("first entry", None, fixed_now()).unwrap();
    assert_eq!(data.start_date, fixed_now());
    assert_eq!(data.notes.len(), 1);
}

#[test]
fn add_note_rejects_whitespace_only_text() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteProgressRepository::try_new(&mut conn).unwrap();
    let mut service = ProgressService::new(repo);

    let err = service.add_note("   \n ", None, fixed_now()).unwrap_err();
    assert!(matches!(err, ProgressServiceError::InvalidNote));
}

#[test]
fn set_quit_date_accepts_past_target() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteProgressRepository::try_new(&mut conn).unwrap();
    let mut service = ProgressService::new(repo);

    let past = fixed_now() - Duration::days(1);
    let data = service.set_quit_date(past, fixed_now()).unwrap();
    assert_eq!(data.quit_date, Some(past));
}

#[test]
fn clear_quit_date_leaves_rest_of_record_intact() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteProgressRepository::try_new(&mut conn).unwrap();
    let mut service = ProgressService::new(repo);

    service.add_note("note stays", None, fixed_now()).unwrap();
    service
        .set_quit_date(fixed_now() + Duration::days(7), fixed_now())
        .unwrap();

    let data = service.clear_quit_date(fixed_now()).unwrap();
    assert_eq!(data.quit_date, None);
    assert_eq!(data.notes.len(), 1);
}

#[test]
fn restart_tracking_rewinds_start_but_preserves_journal_and_target() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteProgressRepository::try_new(&mut conn).unwrap();
    let mut service = ProgressService::new(repo);

    let original_now = fixed_now() - Duration::days(20);
    service.load_or_seed(original_now).unwrap();
    service.add_note("keep me", None, original_now).unwrap();
    let target = fixed_now() + Duration::days(10);
    service.set_quit_date(target, original_now).unwrap();

    let data = service.restart_tracking(fixed_now()).unwrap();
    assert_eq!(data.start_date, fixed_now());
    assert_eq!(data.quit_date, Some(target));
    assert_eq!(data.notes.len(), 1);
}

#[test]
fn restart_tracking_seeds_when_nothing_is_stored() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteProgressRepository::try_new(&mut conn).unwrap();
    let mut service = ProgressService::new(repo);

    let data = service.restart_tracking(fixed_now()).unwrap();
    assert_eq!(data.start_date, fixed_now());
    assert!(data.notes.is_empty());
}

#[test]
fn reset_discards_journal_and_target() {
    let mut conn = open_db_in_memory().unwrap();
    {
        let repo = SqliteProgressRepository::try_new(&mut conn).unwrap();
        let mut service = ProgressService::new(repo);
        service.add_note("gone after reset", None, fixed_now()).unwrap();
        service
            .set_quit_date(fixed_now() + Duration::days(3), fixed_now())
            .unwrap();
        service.reset().unwrap();
    }

    let repo = SqliteProgressRepository::try_new(&mut conn).unwrap();
    assert!(matches!(repo.load().unwrap(), SlotState::Absent));
}

#[test]
fn replace_persists_full_record_and_validates_notes() {
    let mut conn = open_db_in_memory().unwrap();
    let repo = SqliteProgressRepository::try_new(&mut conn).unwrap();
    let mut service = ProgressService::new(repo);

    let mut data = service.load_or_seed(fixed_now()).unwrap();
    data.quit_date = Some(fixed_now() + Duration::days(60));
    service.replace(&data).unwrap();

    let reloaded = service.load_or_seed(fixed_now()).unwrap();
    assert_eq!(reloaded, data);

    data.notes.push(
        quitlog_core::Note::new("valid", None, fixed_now()).unwrap(),
    );
    data.notes[0].text = " ".to_string();
    let err = service.replace(&data).unwrap_err();
    assert!(matches!(err, ProgressServiceError::InvalidNote));
}

fn write_raw_progress_slot(conn: &Connection, raw: &str) {
    conn.execute(
        "INSERT INTO slots (name, value) VALUES ('progress_data', ?1)
         ON CONFLICT(name) DO UPDATE SET value = excluded.value;",
        [raw],
    )
    .unwrap();
}
