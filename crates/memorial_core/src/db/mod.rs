//! SQLite file behind the memorial key/value store.
//!
//! # Responsibility
//! - Open the store file, run pending migrations, then confirm the
//!   `kv_entries` table is usable.
//!
//! # Invariants
//! - Schema version lives in `PRAGMA user_version`.
//! - A connection handed out always has `kv_entries` with the columns
//!   `key`, `value` and `updated_at`.

use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Table holding one row per stored slot.
pub const KV_TABLE: &str = "kv_entries";
const KV_COLUMNS: [&str; 3] = ["key", "value", "updated_at"];

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// File was written by a newer build.
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
    /// Version is current but the store table is missing or reshaped.
    StoreTableMismatch { found_columns: Vec<String> },
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
                "memorial store version {db_version} is newer than supported {latest_supported}"
            ),
            Self::StoreTableMismatch { found_columns } if found_columns.is_empty() => {
                write!(f, "table {KV_TABLE} is missing")
            }
            Self::StoreTableMismatch { found_columns } => write!(
                f,
                "table {KV_TABLE} has columns [{}], expected [{}]",
                found_columns.join(", "),
                KV_COLUMNS.join(", ")
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } | Self::StoreTableMismatch { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// Fails unless `kv_entries` exists with exactly the expected columns.
pub(crate) fn check_kv_table(conn: &Connection) -> DbResult<()> {
    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1) ORDER BY cid;")?;
    let found_columns = stmt
        .query_map([KV_TABLE], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    if found_columns != KV_COLUMNS {
        return Err(DbError::StoreTableMismatch { found_columns });
    }
    Ok(())
}
