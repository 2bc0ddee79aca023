//! Explicitly constructed store handle.
//!
//! # Responsibility
//! - Own the migrated connection for its whole lifetime.
//! - Serialize every write through one lock and one transaction.
//!
//! # Invariants
//! - `write` commits only when the closure returns `Ok`; otherwise every
//!   statement it ran is rolled back.
//! - There is no global store; callers pass `&Store` to whoever needs it.

use super::migrations::Migrator;
use super::open::{open_db, open_db_in_memory};
use super::{DbError, DbResult};
use log::{error, info};
use rusqlite::{Connection, Transaction, TransactionBehavior};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

/// Shared handle to the card database.
#[derive(Debug)]
pub struct Store {
    conn: Mutex<Connection>,
    path: Option<PathBuf>,
}

impl Store {
    /// Opens (creating when absent) the store file and applies the bundled
    /// migrations.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        Self::open_with(path, &Migrator::all_stars())
    }

    /// Opens the store file with a caller-supplied migrator.
    pub fn open_with(path: impl AsRef<Path>, migrator: &Migrator) -> DbResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let conn = open_db(path, migrator)?;
        Ok(Self {
            conn: Mutex::new(conn),
            path: Some(path.to_path_buf()),
        })
    }

    /// Opens a private in-memory store with the bundled migrations.
    pub fn open_in_memory() -> DbResult<Self> {
        Self::open_in_memory_with(&Migrator::all_stars())
    }

    pub fn open_in_memory_with(migrator: &Migrator) -> DbResult<Self> {
        let conn = open_db_in_memory(migrator)?;
        Ok(Self {
            conn: Mutex::new(conn),
            path: None,
        })
    }

    /// Backing file, `None` for in-memory stores.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Runs a read-only closure against the connection.
    pub fn read<T, E>(&self, f: impl FnOnce(&Connection) -> Result<T, E>) -> Result<T, E>
    where
        E: From<DbError>,
    {
        let guard = self.lock()?;
        f(&guard)
    }

    /// Runs `f` inside one `IMMEDIATE` transaction.
    pub fn write<T, E>(&self, f: impl FnOnce(&Transaction<'_>) -> Result<T, E>) -> Result<T, E>
    where
        E: From<DbError>,
    {
        let mut guard = self.lock()?;
        let tx = guard
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(DbError::from)?;
        let value = f(&tx)?;
        tx.commit().map_err(DbError::from)?;
        Ok(value)
    }

    /// Ledger identifiers in application order.
    pub fn applied_migrations(&self) -> DbResult<Vec<String>> {
        self.read(Migrator::applied)
    }

    /// Closes the connection, surfacing any close error.
    pub fn close(self) -> DbResult<()> {
        let conn = self.conn.into_inner().map_err(|_| DbError::LockPoisoned)?;
        match conn.close() {
            Ok(()) => {
                info!("event=db_close module=db status=ok");
                Ok(())
            }
            Err((_, err)) => {
                error!("event=db_close module=db status=error error={err}");
                Err(err.into())
            }
        }
    }

    fn lock(&self) -> DbResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| DbError::LockPoisoned)
    }
}
