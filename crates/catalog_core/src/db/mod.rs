//! SQLite storage bootstrap, schema migration and transaction entry points.
//!
//! # Responsibility
//! - Open and configure SQLite connections for the catalog core.
//! - Apply schema migrations in deterministic order.
//! - Provide the immediate-transaction wrapper used for multi-step writes.
//!
//! # Invariants
//! - Migration version is tracked via `PRAGMA user_version`.
//! - Core code must not read/write catalog data before migrations succeed.
//! - Multi-step writes take the SQLite write lock up front (`BEGIN IMMEDIATE`).

use rusqlite::{Connection, Transaction, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "database schema version {db_version} is newer than supported {latest_supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// Runs `work` inside one `BEGIN IMMEDIATE` transaction on `conn`.
///
/// When the connection is already inside a transaction, `work` joins it and
/// the outermost caller owns commit/rollback. Any error returned by `work`
/// rolls the transaction back when the guard is dropped.
pub fn with_immediate_transaction<T, E, F>(conn: &Connection, work: F) -> Result<T, E>
where
    F: FnOnce() -> Result<T, E>,
    E: From<DbError>,
{
    if !conn.is_autocommit() {
        return work();
    }

    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)
        .map_err(|err| E::from(DbError::from(err)))?;
    let value = work()?;
    tx.commit().map_err(|err| E::from(DbError::from(err)))?;
    Ok(value)
}
