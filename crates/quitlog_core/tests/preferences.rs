use quitlog_core::db::open_db_in_memory;
use quitlog_core::{
    PreferenceRepository, PreferenceService, SlotState, SqlitePreferenceRepository,
    ThemePreference,
};
use rusqlite::Connection;

#[test]
fn theme_defaults_to_system_when_nothing_is_stored() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePreferenceRepository::try_new(&conn).unwrap();
    let service = PreferenceService::new(repo);

    assert_eq!(service.theme().unwrap(), ThemePreference::System);
}

#[test]
fn set_theme_round_trips() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePreferenceRepository::try_new(&conn).unwrap();
    let service = PreferenceService::new(repo);

    service.set_theme(ThemePreference::Dark).unwrap();
    assert_eq!(service.theme().unwrap(), ThemePreference::Dark);

    service.set_theme(ThemePreference::Light).unwrap();
    assert_eq!(service.theme().unwrap(), ThemePreference::Light);
}

#[test]
fn corrupt_theme_slot_falls_back_to_system_and_is_cleared() {
    let conn = open_db_in_memory().unwrap();
    // Multi-line garbage: recovery must survive decode details that span
    // several lines.
    conn.execute(
        "INSERT INTO slots (name, value) VALUES ('app_theme', '\"midnight\"' || char(10) || '{broken');",
        [],
    )
    .unwrap();

    let repo = SqlitePreferenceRepository::try_new(&conn).unwrap();
    let service = PreferenceService::new(repo);
    assert_eq!(service.theme().unwrap(), ThemePreference::System);

    // The unreadable slot was removed during recovery.
    let repo = SqlitePreferenceRepository::try_new(&conn).unwrap();
    assert!(matches!(repo.load_theme().unwrap(), SlotState::Absent));
}

#[test]
fn clear_removes_preference_slot() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePreferenceRepository::try_new(&conn).unwrap();
    let service = PreferenceService::new(repo);

    service.set_theme(ThemePreference::Dark).unwrap();
    service.clear().unwrap();
    assert_eq!(service.theme().unwrap(), ThemePreference::System);
}

#[test]
fn progress_and_theme_slots_are_independent() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqlitePreferenceRepository::try_new(&conn).unwrap();
    let service = PreferenceService::new(repo);
    service.set_theme(ThemePreference::Dark).unwrap();

    assert_eq!(slot_names(&conn), vec!["app_theme".to_string()]);
}

fn slot_names(conn: &Connection) -> Vec<String> {
    let mut stmt = conn.prepare("SELECT name FROM slots ORDER BY name;").unwrap();
    let rows = stmt.query_map([], |row| row.get::<_, String>(0)).unwrap();
    rows.map(|row| row.unwrap()).collect()
}
