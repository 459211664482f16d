//! String-keyed text store contract and SQLite implementation.
//!
//! # Invariants
//! - `set` overwrites any previous value for the key.
//! - `set_many` applies every write or none of them.
//! - Reading an absent key is not an error.

use crate::db::DbError;
use rusqlite::{params, Connection, OptionalExtension};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type KvResult<T> = Result<T, KvError>;

/// Storage failure from the key/value backend.
#[derive(Debug)]
pub enum KvError {
    Db(DbError),
}

impl Display for KvError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
        }
    }
}

impl Error for KvError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
        }
    }
}

impl From<DbError> for KvError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for KvError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Opaque read/write text store.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> KvResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> KvResult<()>;
    fn remove(&self, key: &str) -> KvResult<()>;

    /// Writes several entries. Implementations that can should make this
    /// atomic; the default applies them one by one.
    fn set_many(&self, entries: &[(&str, String)]) -> KvResult<()> {
        for (key, value) in entries {
            self.set(key, value)?;
        }
        Ok(())
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get(&self, key: &str) -> KvResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> KvResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> KvResult<()> {
        (**self).remove(key)
    }

    fn set_many(&self, entries: &[(&str, String)]) -> KvResult<()> {
        (**self).set_many(entries)
    }
}

/// SQLite-backed store over the `kv_entries` table.
///
/// The connection must come from `db::open_db*` so the table exists.
pub struct SqliteKeyValueStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteKeyValueStore<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Lists stored keys in ascending order. Diagnostics only.
    pub fn keys(&self) -> KvResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT key FROM kv_entries ORDER BY key ASC;")?;
        let keys = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(keys)
    }
}

const UPSERT_SQL: &str = "INSERT INTO kv_entries (key, value, updated_at)
     VALUES (?1, ?2, strftime('%s', 'now') * 1000)
     ON CONFLICT(key) DO UPDATE SET
        value = excluded.value,
        updated_at = excluded.updated_at;";

impl KeyValueStore for SqliteKeyValueStore<'_> {
    fn get(&self, key: &str) -> KvResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> KvResult<()> {
        self.conn.execute(UPSERT_SQL, params![key, value])?;
        Ok(())
    }

    fn remove(&self, key: &str) -> KvResult<()> {
        self.conn
            .execute("DELETE FROM kv_entries WHERE key = ?1;", [key])?;
        Ok(())
    }

    fn set_many(&self, entries: &[(&str, String)]) -> KvResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(UPSERT_SQL)?;
            for (key, value) in entries {
                stmt.execute(params![key, value])?;
            }
        }
        tx.commit()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{KeyValueStore, SqliteKeyValueStore};
    use crate::db::open_db_in_memory;

    #[test]
    fn set_get_overwrite_and_remove() {
        let conn = open_db_in_memory().unwrap();
        let store = SqliteKeyValueStore::new(&conn);

        assert_eq!(store.get("k").unwrap(), None);
        store.set("k", "one").unwrap();
        store.set("k", "two").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("two"));

        store.remove("k").unwrap();
        store.remove("k").unwrap();
        assert_eq!(store.get("k").unwrap(), None);
    }

    #[test]
    fn set_many_writes_all_entries() {
        let conn = open_db_in_memory().unwrap();
        let store = SqliteKeyValueStore::new(&conn);

        store
            .set_many(&[("b", "2".to_string()), ("a", "1".to_string())])
            .unwrap();
        assert_eq!(store.keys().unwrap(), vec!["a", "b"]);
        assert_eq!(store.get("a").unwrap().as_deref(), Some("1"));
    }
}
