use allstars_core::db::migrations::{latest_version, step_names, BUNDLED_TEAM_FIXTURE};
use allstars_core::db::{open_db, open_db_in_memory};
use allstars_core::{
    decode_roster, Category, DbError, MigrationCause, Migrator, PersistenceError, Position,
    SqliteCardRepository, Store,
};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory(&Migrator::all_stars()).unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    assert_eq!(Migrator::applied(&conn).unwrap(), step_names());
    for table in ["teamMember", "identity", "attribute", "pitch", "schema_migrations"] {
        assert_table_exists(&conn, table);
    }
}

#[test]
fn seed_migration_creates_one_legend_starting_pitcher() {
    let conn = open_db_in_memory(&Migrator::all_stars()).unwrap();

    let identities: Vec<(i64, i64, i64)> = conn
        .prepare("SELECT \"teamMemberId\", \"category\", \"position\" FROM \"identity\";")
        .unwrap()
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(
        identities,
        vec![(
            179,
            Category::AllTimeLegend.code(),
            Position::StartingPitcher.code()
        )]
    );

    let attributes: Vec<(String, i64)> = conn
        .prepare("SELECT \"name\", \"value\" FROM \"attribute\" ORDER BY \"id\";")
        .unwrap()
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(
        attributes,
        vec![
            ("Stuff".to_string(), 74),
            ("Movement".to_string(), 84),
            ("Control".to_string(), 69),
            ("Stamina".to_string(), 93),
            ("Hold Runners".to_string(), 99),
        ]
    );
}

#[test]
fn roster_fixture_is_loaded_in_full() {
    let conn = open_db_in_memory(&Migrator::all_stars()).unwrap();
    let expected = decode_roster(BUNDLED_TEAM_FIXTURE).unwrap().len() as i64;
    assert_eq!(count(&conn, "teamMember"), expected);
}

#[test]
fn migrating_twice_applies_nothing_the_second_time() {
    let mut conn = Connection::open_in_memory().unwrap();
    conn.execute_batch("PRAGMA foreign_keys = ON;").unwrap();
    let migrator = Migrator::all_stars();

    let first = migrator.migrate(&mut conn).unwrap();
    assert_eq!(first, step_names());

    let second = migrator.migrate(&mut conn).unwrap();
    assert!(second.is_empty());
    assert_eq!(count(&conn, "identity"), 1);
    assert_eq!(count(&conn, "schema_migrations"), latest_version() as i64);
}

#[test]
fn opening_same_database_twice_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("allstars.sqlite");

    let conn_first = open_db(&path, &Migrator::all_stars()).unwrap();
    let members = count(&conn_first, "teamMember");
    drop(conn_first);

    let conn_second = open_db(&path, &Migrator::all_stars()).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    assert_eq!(count(&conn_second, "teamMember"), members);
    assert_eq!(count(&conn_second, "identity"), 1);
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path, &Migrator::all_stars()).unwrap_err();
    match err {
        DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        } => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn ledger_entry_from_newer_build_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("newer.sqlite");

    let conn = open_db(&path, &Migrator::all_stars()).unwrap();
    conn.execute(
        "INSERT INTO schema_migrations (identifier, applied_at) VALUES ('create_trade', 0);",
        [],
    )
    .unwrap();
    drop(conn);

    let err = open_db(&path, &Migrator::all_stars()).unwrap_err();
    assert!(matches!(err, DbError::UnknownMigration(name) if name == "create_trade"));
}

#[test]
fn listing_applied_steps_does_not_create_the_ledger() {
    let conn = Connection::open_in_memory().unwrap();

    assert!(Migrator::applied(&conn).unwrap().is_empty());
    let tables: i64 = conn
        .query_row("SELECT COUNT(*) FROM sqlite_master WHERE type = 'table';", [], |row| {
            row.get(0)
        })
        .unwrap();
    assert_eq!(tables, 0);
}

#[test]
fn malformed_roster_fails_only_its_own_step() {
    let mut conn = Connection::open_in_memory().unwrap();
    conn.execute_batch("PRAGMA foreign_keys = ON;").unwrap();

    let err = Migrator::with_team_fixture("[{\"id\": 1, \"name\": ")
        .migrate(&mut conn)
        .unwrap_err();
    match err {
        DbError::Migration(err) => {
            assert_eq!(err.step, "team_member_fixtures");
            assert!(matches!(err.cause, MigrationCause::Decoding(_)));
        }
        other => panic!("unexpected error: {other}"),
    }

    assert_eq!(
        Migrator::applied(&conn).unwrap(),
        vec!["create_team_member", "create_identity", "create_attribute", "create_pitch"]
    );
    assert_eq!(schema_version(&conn), 4);
    assert_eq!(count(&conn, "teamMember"), 0);

    let resumed = Migrator::all_stars().migrate(&mut conn).unwrap();
    assert_eq!(resumed, vec!["team_member_fixtures", "card_fixtures"]);
    assert_eq!(count(&conn, "identity"), 1);
}

#[test]
fn roster_without_seed_member_fails_card_fixtures() {
    let mut conn = Connection::open_in_memory().unwrap();
    conn.execute_batch("PRAGMA foreign_keys = ON;").unwrap();

    let err = Migrator::with_team_fixture(r#"[{"id": 1, "name": "Solo Player", "sortKey": "P"}]"#)
        .migrate(&mut conn)
        .unwrap_err();
    match err {
        DbError::Migration(err) => {
            assert_eq!(err.step, "card_fixtures");
            assert!(matches!(err.cause, MigrationCause::Sql(_)));
        }
        other => panic!("unexpected error: {other}"),
    }

    assert_eq!(count(&conn, "teamMember"), 1);
    assert_eq!(count(&conn, "identity"), 0);
    assert_eq!(count(&conn, "attribute"), 0);
}

#[test]
fn failed_migration_aborts_store_open() {
    let err = Store::open_in_memory_with(&Migrator::with_team_fixture("not json")).unwrap_err();
    assert!(err.to_string().contains("team_member_fixtures"), "unexpected: {err}");
}

#[test]
fn pitch_table_mirrors_attribute_shape() {
    let conn = open_db_in_memory(&Migrator::all_stars()).unwrap();
    assert_eq!(column_names(&conn, "pitch"), column_names(&conn, "attribute"));
    assert_eq!(count(&conn, "pitch"), 0);
}

#[test]
fn deleting_team_member_cascades_to_cards() {
    let conn = open_db_in_memory(&Migrator::all_stars()).unwrap();
    conn.execute("DELETE FROM \"teamMember\" WHERE \"id\" = 179;", [])
        .unwrap();

    assert_eq!(count(&conn, "identity"), 0);
    assert_eq!(count(&conn, "attribute"), 0);
}

#[test]
fn repository_rejects_unmigrated_connection() {
    let conn = Connection::open_in_memory().unwrap();
    let err = SqliteCardRepository::try_new(&conn).err().unwrap();
    assert!(matches!(
        err,
        PersistenceError::UninitializedConnection {
            expected_version: 6,
            actual_version: 0,
        }
    ));
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
}

fn count(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM \"{table}\";"), [], |row| {
        row.get(0)
    })
    .unwrap()
}

fn column_names(conn: &Connection, table: &str) -> Vec<String> {
    conn.prepare(&format!("PRAGMA table_info(\"{table}\");"))
        .unwrap()
        .query_map([], |row| row.get::<_, String>("name"))
        .unwrap()
        .collect::<Result<_, _>>()
        .unwrap()
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
