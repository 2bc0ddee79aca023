//! SQLite storage bootstrap, schema migration and store lifecycle.
//!
//! # Responsibility
//! - Open and configure SQLite connections for the card collection.
//! - Apply named schema migrations in deterministic order.
//! - Own the single write-serialization point (`Store`).
//!
//! # Invariants
//! - Applied steps are recorded in the `schema_migrations` ledger.
//! - Application data is never read or written before migrations succeed.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;
mod store;

pub use migrations::{MigrationCause, MigrationError, Migrator};
pub use open::{open_db, open_db_in_memory};
pub use store::Store;

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    Io(std::io::Error),
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    /// Ledger names a step this build does not know.
    UnknownMigration(String),
    Migration(MigrationError),
    LockPoisoned,
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "store io error: {err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "database schema version {db_version} is newer than supported {latest_supported}"
            ),
            Self::UnknownMigration(name) => {
                write!(f, "database was migrated by a newer build (unknown step `{name}`)")
            }
            Self::Migration(err) => write!(f, "{err}"),
            Self::LockPoisoned => write!(f, "store connection lock poisoned"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::Io(err) => Some(err),
            Self::Migration(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } | Self::UnknownMigration(_) | Self::LockPoisoned => {
                None
            }
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

impl From<std::io::Error> for DbError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<MigrationError> for DbError {
    fn from(value: MigrationError) -> Self {
        Self::Migration(value)
    }
}
