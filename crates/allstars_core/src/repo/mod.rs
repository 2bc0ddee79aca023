//! Repository layer: SQL mapping for team members and cards.
//!
//! # Responsibility
//! - Map rows to entity records and back.
//! - Surface constraint failures as semantic `PersistenceError`s.
//!
//! # Invariants
//! - Repositories only accept connections migrated to the latest step.
//! - Read paths reject undecodable persisted values instead of masking them.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::card::CardId;
use crate::model::team_member::TeamMemberId;
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod card_repo;
pub mod team_repo;

pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Failure of a card or roster operation.
#[derive(Debug)]
pub enum PersistenceError {
    Db(DbError),
    /// Card creation referenced a team member that is not in the roster.
    UnknownTeamMember(TeamMemberId),
    NotFound(CardId),
    InvalidRating { name: String, value: i64 },
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
}

impl Display for PersistenceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::UnknownTeamMember(id) => write!(f, "team member not found: {id}"),
            Self::NotFound(id) => write!(f, "card not found: {id}"),
            Self::InvalidRating { name, value } => {
                write!(f, "attribute `{name}` rating {value} is outside 1..=100")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted card data: {message}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection is at schema version {actual_version}, expected {expected_version}"
            ),
        }
    }
}

impl Error for PersistenceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for PersistenceError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for PersistenceError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

pub(crate) fn ensure_connection_ready(conn: &Connection) -> PersistenceResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(PersistenceError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }
    Ok(())
}
