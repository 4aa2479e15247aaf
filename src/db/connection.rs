use std::fs;
use std::path::{Path, PathBuf};

use rusqlite::functions::FunctionFlags;
use rusqlite::Connection;
use tracing::{debug, info};

use crate::error::StoreError;

/// Hands out ready-to-use connections. Every data-access call asks for a fresh
/// handle, runs a single statement, and drops it before returning.
pub trait ConnectionFactory {
    fn connect(&self) -> Result<Connection, StoreError>;
}

/// Opens the on-disk SQLite database. The schema is bootstrapped once when the
/// connector is created; individual connections are opened per operation.
#[derive(Debug, Clone)]
pub struct SqliteConnector {
    path: PathBuf,
}

impl SqliteConnector {
    /// Make sure the database file and the `books` table exist, then return a
    /// connector pointing at it.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(StoreError::DataDir)?;
        }

        let connector = Self { path };
        let conn = connector.connect()?;
        ensure_schema(&conn)?;
        info!(path = %connector.path.display(), "library database ready");
        Ok(connector)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConnectionFactory for SqliteConnector {
    fn connect(&self) -> Result<Connection, StoreError> {
        debug!(path = %self.path.display(), "opening connection");
        let conn = Connection::open(&self.path)?;
        register_unicode_lower(&conn)?;
        Ok(conn)
    }
}

/// Replace SQLite's ASCII-only `LOWER()` with Rust's Unicode lowercasing so
/// searches fold "Ü" and "É" the same way the query text is folded.
pub fn register_unicode_lower(conn: &Connection) -> Result<(), StoreError> {
    conn.create_scalar_function(
        "lower",
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| Ok(ctx.get::<Option<String>>(0)?.map(|text| text.to_lowercase())),
    )?;
    Ok(())
}

/// Create the `books` table when it is missing. Existing tables are left
/// untouched.
pub fn ensure_schema(conn: &Connection) -> Result<(), StoreError> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS books (
            book_id INTEGER PRIMARY KEY AUTOINCREMENT,
            title TEXT NOT NULL,
            author TEXT NOT NULL,
            is_borrowed BOOLEAN NOT NULL DEFAULT 0
        )",
        [],
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn open_creates_missing_directories_and_table() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("nested").join("library.sqlite");

        let connector = SqliteConnector::open(&db_path).unwrap();
        assert!(db_path.exists());
        assert_eq!(connector.path(), db_path.as_path());

        let conn = connector.connect().unwrap();
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'books'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn lower_folds_non_ascii_letters() {
        let dir = tempdir().unwrap();
        let connector = SqliteConnector::open(dir.path().join("library.sqlite")).unwrap();
        let lowered: String = connector
            .connect()
            .unwrap()
            .query_row("SELECT LOWER('Über ÉMILE')", [], |row| row.get(0))
            .unwrap();
        assert_eq!(lowered, "über émile");
    }

    #[test]
    fn reopening_keeps_existing_rows() {
        let dir = tempdir().unwrap();
        let db_path = dir.path().join("library.sqlite");

        let connector = SqliteConnector::open(&db_path).unwrap();
        connector
            .connect()
            .unwrap()
            .execute(
                "INSERT INTO books (title, author) VALUES ('Dune', 'Herbert')",
                [],
            )
            .unwrap();

        let reopened = SqliteConnector::open(&db_path).unwrap();
        let count: i64 = reopened
            .connect()
            .unwrap()
            .query_row("SELECT COUNT(*) FROM books", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }
}
