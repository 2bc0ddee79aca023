//! Named schema migrations and the ledger that tracks them.
//!
//! # Responsibility
//! - Register schema and fixture steps in a fixed, append-only order.
//! - Apply each pending step exactly once, in its own transaction.
//!
//! # Invariants
//! - Step names are permanent; steps are only ever appended.
//! - A step's ledger row and its effects commit together or not at all.
//! - The number of applied steps is mirrored to `PRAGMA user_version`.

use crate::db::{DbError, DbResult};
use crate::model::attribute::PITCHER_ATTRIBUTE_NAMES;
use crate::model::identity::{Category, Position};
use crate::model::team_member::{decode_roster, DecodingError, TeamMemberId};
use log::{error, info};
use rusqlite::{params, Connection, Transaction, TransactionBehavior};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Roster bundled with the binary.
pub const BUNDLED_TEAM_FIXTURE: &str = include_str!("../../../fixtures/team.json");

/// Team member the hand-authored seed card belongs to.
pub const SEED_TEAM_MEMBER_ID: TeamMemberId = 179;

/// Seed card ratings, matched positionally to `PITCHER_ATTRIBUTE_NAMES`.
pub const SEED_ATTRIBUTE_VALUES: [i64; 5] = [74, 84, 69, 93, 99];

const LEDGER_SQL: &str = "CREATE TABLE IF NOT EXISTS schema_migrations (
    identifier TEXT PRIMARY KEY NOT NULL,
    applied_at INTEGER NOT NULL
);";

#[derive(Debug, Clone, Copy)]
enum Step {
    Sql(&'static str),
    TeamFixtures,
    CardFixtures,
}

#[derive(Debug, Clone, Copy)]
struct Migration {
    name: &'static str,
    step: Step,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        name: "create_team_member",
        step: Step::Sql(include_str!("0001_create_team_member.sql")),
    },
    Migration {
        name: "create_identity",
        step: Step::Sql(include_str!("0002_create_identity.sql")),
    },
    Migration {
        name: "create_attribute",
        step: Step::Sql(include_str!("0003_create_attribute.sql")),
    },
    Migration {
        name: "create_pitch",
        step: Step::Sql(include_str!("0004_create_pitch.sql")),
    },
    Migration {
        name: "team_member_fixtures",
        step: Step::TeamFixtures,
    },
    Migration {
        name: "card_fixtures",
        step: Step::CardFixtures,
    },
];

/// Why a single migration step failed.
#[derive(Debug)]
pub enum MigrationCause {
    Sql(rusqlite::Error),
    Decoding(DecodingError),
}

/// A migration step failed; its transaction was rolled back.
#[derive(Debug)]
pub struct MigrationError {
    pub step: &'static str,
    pub cause: MigrationCause,
}

impl Display for MigrationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.cause {
            MigrationCause::Sql(err) => write!(f, "migration `{}` failed: {err}", self.step),
            MigrationCause::Decoding(err) => {
                write!(f, "migration `{}` failed: {err}", self.step)
            }
        }
    }
}

impl Error for MigrationError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.cause {
            MigrationCause::Sql(err) => Some(err),
            MigrationCause::Decoding(err) => Some(err),
        }
    }
}

impl From<rusqlite::Error> for MigrationCause {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sql(value)
    }
}

impl From<DecodingError> for MigrationCause {
    fn from(value: DecodingError) -> Self {
        Self::Decoding(value)
    }
}

/// Returns the number of steps known by this binary.
pub fn latest_version() -> u32 {
    MIGRATIONS.len() as u32
}

/// Returns every step identifier in application order.
pub fn step_names() -> Vec<&'static str> {
    MIGRATIONS.iter().map(|migration| migration.name).collect()
}

/// Ordered migration runner.
///
/// The roster document is injectable so alternate bundles (and tests) can
/// drive `team_member_fixtures` without touching the step list.
#[derive(Debug, Clone)]
pub struct Migrator {
    team_fixture: String,
}

impl Migrator {
    /// Production migrator using the bundled roster.
    pub fn all_stars() -> Self {
        Self::with_team_fixture(BUNDLED_TEAM_FIXTURE)
    }

    pub fn with_team_fixture(json: impl Into<String>) -> Self {
        Self {
            team_fixture: json.into(),
        }
    }

    /// Returns ledger identifiers in the order they were applied.
    ///
    /// Read-only: a store that has never been migrated has no ledger and
    /// yields an empty list.
    pub fn applied(conn: &Connection) -> DbResult<Vec<String>> {
        let has_ledger: bool = conn.query_row(
            "SELECT EXISTS(
                SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'schema_migrations'
             );",
            [],
            |row| row.get(0),
        )?;
        if !has_ledger {
            return Ok(Vec::new());
        }

        let mut stmt =
            conn.prepare("SELECT identifier FROM schema_migrations ORDER BY rowid ASC;")?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(names)
    }

    /// Applies all pending steps and returns the names applied by this call.
    ///
    /// # Errors
    /// - `UnsupportedSchemaVersion` when the store was written by a newer build.
    /// - `UnknownMigration` when the ledger names a step this build lacks.
    /// - `Migration` when a step fails. Earlier steps stay committed.
    pub fn migrate(&self, conn: &mut Connection) -> DbResult<Vec<&'static str>> {
        conn.execute_batch(LEDGER_SQL)?;

        let db_version = current_user_version(conn)?;
        let latest = latest_version();
        if db_version > latest {
            return Err(DbError::UnsupportedSchemaVersion {
                db_version,
                latest_supported: latest,
            });
        }

        let applied: HashSet<String> = Self::applied(conn)?.into_iter().collect();
        let known: HashSet<&str> = MIGRATIONS.iter().map(|migration| migration.name).collect();
        if let Some(unknown) = applied.iter().find(|name| !known.contains(name.as_str())) {
            return Err(DbError::UnknownMigration(unknown.clone()));
        }

        let mut newly_applied = Vec::new();
        for (index, migration) in MIGRATIONS.iter().enumerate() {
            if applied.contains(migration.name) {
                continue;
            }

            let started_at = Instant::now();
            match self.apply_one(conn, migration, index as u32 + 1) {
                Ok(()) => {
                    info!(
                        "event=migration_apply module=db status=ok step={} duration_ms={}",
                        migration.name,
                        started_at.elapsed().as_millis()
                    );
                    newly_applied.push(migration.name);
                }
                Err(cause) => {
                    let err = MigrationError {
                        step: migration.name,
                        cause,
                    };
                    error!(
                        "event=migration_apply module=db status=error step={} duration_ms={} error={}",
                        migration.name,
                        started_at.elapsed().as_millis(),
                        err
                    );
                    return Err(DbError::Migration(err));
                }
            }
        }

        Ok(newly_applied)
    }

    fn apply_one(
        &self,
        conn: &mut Connection,
        migration: &Migration,
        version: u32,
    ) -> Result<(), MigrationCause> {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        match migration.step {
            Step::Sql(sql) => tx.execute_batch(sql)?,
            Step::TeamFixtures => self.insert_team_fixtures(&tx)?,
            Step::CardFixtures => insert_card_fixtures(&tx)?,
        }
        tx.execute(
            "INSERT INTO schema_migrations (identifier, applied_at)
             VALUES (?1, (strftime('%s', 'now') * 1000));",
            [migration.name],
        )?;
        tx.execute_batch(&format!("PRAGMA user_version = {version};"))?;
        tx.commit()?;
        Ok(())
    }

    fn insert_team_fixtures(&self, tx: &Transaction<'_>) -> Result<(), MigrationCause> {
        let team = decode_roster(&self.team_fixture)?;
        let mut stmt = tx.prepare(
            "INSERT INTO \"teamMember\" (\"id\", \"name\", \"sortKey\") VALUES (?1, ?2, ?3);",
        )?;
        for member in &team {
            stmt.execute(params![member.id, member.name, member.sort_key])?;
        }
        Ok(())
    }
}

impl Default for Migrator {
    fn default() -> Self {
        Self::all_stars()
    }
}

fn insert_card_fixtures(tx: &Transaction<'_>) -> rusqlite::Result<()> {
    tx.execute(
        "INSERT INTO \"identity\" (\"teamMemberId\", \"category\", \"position\")
         VALUES (?1, ?2, ?3);",
        params![
            SEED_TEAM_MEMBER_ID,
            Category::AllTimeLegend.code(),
            Position::StartingPitcher.code(),
        ],
    )?;
    let identity_id = tx.last_insert_rowid();

    let mut stmt = tx.prepare(
        "INSERT INTO \"attribute\" (\"identityId\", \"name\", \"value\") VALUES (?1, ?2, ?3);",
    )?;
    for (name, value) in PITCHER_ATTRIBUTE_NAMES.iter().zip(SEED_ATTRIBUTE_VALUES) {
        stmt.execute(params![identity_id, *name, value])?;
    }
    Ok(())
}

fn current_user_version(conn: &Connection) -> DbResult<u32> {
    let version = conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
    Ok(version)
}
