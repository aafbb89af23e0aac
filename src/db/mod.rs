use anyhow::Result;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

mod birthdays;
mod friends;
mod schema;
mod settings;

pub use schema::SCHEMA_VERSION;

pub struct Database {
    conn: Connection,
    path: Option<PathBuf>,
}

impl Database {
    /// Open database at the configured location, creating if needed, running migrations
    pub fn open() -> Result<Self> {
        let path = crate::config::resolve_db_path(None)?;
        Self::open_at(path)
    }

    pub fn open_at(path: PathBuf) -> Result<Self> {
        // Create parent directories
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(&path)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        debug!(path = %path.display(), "opened database");

        let db = Self {
            conn,
            path: Some(path),
        };
        db.migrate()?;
        Ok(db)
    }

    /// Open in-memory database for testing
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;

        let db = Self { conn, path: None };
        db.migrate()?;
        Ok(db)
    }

    /// On-disk location, `None` for in-memory databases.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Run `f` inside a single transaction. Commits on `Ok`, rolls back on `Err`.
    pub fn in_transaction<T>(
        &self,
        f: impl FnOnce(&Self) -> crate::Result<T>,
    ) -> crate::Result<T> {
        let tx = self.conn.unchecked_transaction()?;
        let value = f(self)?;
        tx.commit()?;
        Ok(value)
    }

    fn migrate(&self) -> Result<()> {
        let version = self.schema_version()?;

        if version == 0 {
            // Tables and the version row land together or not at all
            let tx = self.conn.unchecked_transaction()?;
            tx.execute_batch(schema::SCHEMA_V1)?;
            self.set_schema_version(1)?;
            tx.commit()?;
            info!(version = 1, "applied schema migration");
        }

        Ok(())
    }

    pub fn schema_version(&self) -> crate::Result<i32> {
        let result: Result<i32, _> =
            self.conn
                .query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
                    row.get(0)
                });

        match result {
            Ok(v) => Ok(v),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(0),
            Err(rusqlite::Error::SqliteFailure(err, msg)) => {
                // "no such table" is error code 1 (SQLITE_ERROR)
                if err.code == rusqlite::ErrorCode::Unknown
                    && msg.as_ref().is_some_and(|m| m.contains("no such table"))
                {
                    Ok(0)
                } else {
                    Err(rusqlite::Error::SqliteFailure(err, msg).into())
                }
            }
            Err(e) => Err(e.into()),
        }
    }

    fn set_schema_version(&self, version: i32) -> Result<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO schema_version (id, version) VALUES (1, ?)",
            [version],
        )?;
        Ok(())
    }
}

// ==================== COLUMN CONVERSIONS ====================

fn conversion_error(
    idx: usize,
    err: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(err))
}

pub(crate) fn parse_timestamp(idx: usize, s: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| conversion_error(idx, e))
}

pub(crate) fn parse_date(idx: usize, s: &str) -> rusqlite::Result<NaiveDate> {
    NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|e| conversion_error(idx, e))
}

pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

pub(crate) fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// A mutation timestamp strictly after `previous`, even if the clock has not
/// moved since the last write.
pub(crate) fn next_timestamp(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = Utc::now();
    if now > previous {
        now
    } else {
        previous + Duration::microseconds(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_memory() {
        let db = Database::open_memory().unwrap();
        assert_eq!(db.schema_version().unwrap(), SCHEMA_VERSION);
        assert!(db.path().is_none());
    }

    #[test]
    fn test_tables_exist() {
        let db = Database::open_memory().unwrap();

        let tables: Vec<String> = db
            .conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .filter_map(|r| r.ok())
            .collect();

        assert!(tables.contains(&"friends".to_string()));
        assert!(tables.contains(&"birthdays".to_string()));
        assert!(tables.contains(&"app_settings".to_string()));
        assert!(tables.contains(&"schema_version".to_string()));
    }

    #[test]
    fn test_reopen_file_keeps_data() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("birthdays.db");

        {
            let db = Database::open_at(path.clone()).unwrap();
            db.set_setting("week_start", "sunday").unwrap();
        }

        let db = Database::open_at(path.clone()).unwrap();
        assert_eq!(db.schema_version().unwrap(), SCHEMA_VERSION);
        assert_eq!(db.path(), Some(path.as_path()));
        assert_eq!(
            db.get_setting("week_start").unwrap().as_deref(),
            Some("sunday")
        );
    }

    #[test]
    fn test_failed_migration_leaves_nothing_behind() {
        let conn = Connection::open_in_memory().unwrap();
        // A leftover table without `friend_id` makes the index creation fail
        conn.execute_batch("CREATE TABLE birthdays (id INTEGER PRIMARY KEY);")
            .unwrap();
        let db = Database { conn, path: None };

        assert!(db.migrate().is_err());
        assert_eq!(db.schema_version().unwrap(), 0);

        let friends: i64 = db
            .conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'friends'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(friends, 0);
    }

    #[test]
    fn test_transaction_rolls_back_on_error() {
        let db = Database::open_memory().unwrap();

        let result: crate::Result<()> = db.in_transaction(|db| {
            db.set_setting("week_start", "sunday")?;
            Err(crate::Error::validation("abort"))
        });
        assert!(result.is_err());
        assert_eq!(db.get_setting("week_start").unwrap(), None);
    }

    #[test]
    fn test_next_timestamp_strictly_forward() {
        let future = Utc::now() + Duration::seconds(60);
        assert!(next_timestamp(future) > future);

        let past = Utc::now() - Duration::seconds(60);
        assert!(next_timestamp(past) > past);
    }

    #[test]
    fn test_date_roundtrip_format() {
        let date = NaiveDate::from_ymd_opt(1990, 3, 5).unwrap();
        assert_eq!(format_date(date), "1990-03-05");
        assert_eq!(parse_date(0, "1990-03-05").unwrap(), date);
        assert!(parse_date(0, "not a date").is_err());
    }
}
