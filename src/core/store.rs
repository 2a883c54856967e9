//! SQLite-backed report store with whole-record upsert
//!
//! Two collections live side by side in one database file. A document's
//! identity for upsert purposes is its entire field set: an incoming
//! report replaces a stored row only when every field matches, and any
//! single-field difference produces a new row instead. Re-uploading a
//! file is therefore idempotent, while edits always accumulate. This is
//! deliberate; do not narrow the match to a subset of fields.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use miette::Diagnostic;
use rusqlite::{params, Connection, OptionalExtension};
use thiserror::Error;

use crate::core::report::{Report, StoredReport};

/// The two named report collections. There is no default: the operator
/// must pick one explicitly on every invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    Local,
    Mega,
}

impl Destination {
    fn table(&self) -> &'static str {
        match self {
            Destination::Local => "eg_local",
            Destination::Mega => "eg_mega",
        }
    }
}

impl std::fmt::Display for Destination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.table())
    }
}

#[derive(Debug, Error, Diagnostic)]
pub enum StoreError {
    #[error("cannot reach the report store at {path:?}")]
    #[diagnostic(
        code(reckoning::store::connect),
        help("check that the database path exists and is writable, or pass --db")
    )]
    Connect {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error("there was a problem uploading to the store")]
    #[diagnostic(code(reckoning::store::upload))]
    Upload(#[source] rusqlite::Error),

    #[error("store query failed")]
    #[diagnostic(code(reckoning::store::query))]
    Query(#[source] rusqlite::Error),
}

const FIELD_LIST: &str = "test_num, build_date, category, test_case, expected_result, \
                          actual_result, repeatable, blocker, test_owner";

#[derive(Debug)]
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open the store, creating the database and both collection tables
    /// if needed. Any failure here is the connectivity diagnostic and
    /// happens before any read or write is attempted.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                // Best effort; if this fails the open below reports it.
                let _ = fs::create_dir_all(parent);
            }
        }

        let conn = Connection::open(path).map_err(|source| StoreError::Connect {
            path: path.to_path_buf(),
            source,
        })?;

        conn.execute_batch(
            r#"
            PRAGMA journal_mode=WAL;
            CREATE TABLE IF NOT EXISTS eg_local (
                test_num        INTEGER,
                build_date      TEXT,
                category        TEXT,
                test_case       TEXT,
                expected_result TEXT,
                actual_result   TEXT,
                repeatable      TEXT,
                blocker         TEXT,
                test_owner      TEXT
            );
            CREATE TABLE IF NOT EXISTS eg_mega (
                test_num        INTEGER,
                build_date      TEXT,
                category        TEXT,
                test_case       TEXT,
                expected_result TEXT,
                actual_result   TEXT,
                repeatable      TEXT,
                blocker         TEXT,
                test_owner      TEXT
            );
            "#,
        )
        .map_err(|source| StoreError::Connect {
            path: path.to_path_buf(),
            source,
        })?;

        Ok(Self { conn })
    }

    /// Upsert every report sequentially. The first error abandons the
    /// remaining rows and surfaces as one coarse failure; rows already
    /// written stay written (no transaction, no rollback).
    pub fn upsert_all(
        &mut self,
        reports: &[Report],
        dest: Destination,
    ) -> Result<usize, StoreError> {
        for report in reports {
            self.upsert_one(report, dest).map_err(StoreError::Upload)?;
        }
        Ok(reports.len())
    }

    fn upsert_one(&mut self, report: &Report, dest: Destination) -> rusqlite::Result<()> {
        let table = dest.table();
        let date = report.build_date.format("%Y-%m-%d").to_string();

        // Match on the entire field set, then replace-or-insert.
        let existing: Option<i64> = self
            .conn
            .query_row(
                &format!(
                    "SELECT rowid FROM {table} \
                     WHERE test_num = ?1 AND build_date = ?2 AND category = ?3 \
                       AND test_case = ?4 AND expected_result = ?5 AND actual_result = ?6 \
                       AND repeatable = ?7 AND blocker = ?8 AND test_owner = ?9 \
                     LIMIT 1"
                ),
                params![
                    report.test_num,
                    date,
                    report.category,
                    report.test_case,
                    report.expected,
                    report.actual,
                    report.repeatable,
                    report.blocker,
                    report.owner,
                ],
                |row| row.get(0),
            )
            .optional()?;

        match existing {
            Some(rowid) => {
                // Overwrite the match with itself. A no-op for truly
                // identical rows, kept so replace-or-insert stays one
                // uniform operation.
                self.conn.execute(
                    &format!(
                        "UPDATE {table} SET test_num = ?1, build_date = ?2, category = ?3, \
                         test_case = ?4, expected_result = ?5, actual_result = ?6, \
                         repeatable = ?7, blocker = ?8, test_owner = ?9 WHERE rowid = ?10"
                    ),
                    params![
                        report.test_num,
                        date,
                        report.category,
                        report.test_case,
                        report.expected,
                        report.actual,
                        report.repeatable,
                        report.blocker,
                        report.owner,
                        rowid,
                    ],
                )?;
            }
            None => {
                self.conn.execute(
                    &format!(
                        "INSERT INTO {table} ({FIELD_LIST}) \
                         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)"
                    ),
                    params![
                        report.test_num,
                        date,
                        report.category,
                        report.test_case,
                        report.expected,
                        report.actual,
                        report.repeatable,
                        report.blocker,
                        report.owner,
                    ],
                )?;
            }
        }
        Ok(())
    }

    /// Fetch every document in store iteration order (rowid order, i.e.
    /// insertion order), projected onto the canonical columns.
    pub fn fetch_all(&self, dest: Destination) -> Result<Vec<StoredReport>, StoreError> {
        let mut stmt = self
            .conn
            .prepare(&format!(
                "SELECT {FIELD_LIST} FROM {} ORDER BY rowid",
                dest.table()
            ))
            .map_err(StoreError::Query)?;

        let rows = stmt
            .query_map([], |row| {
                let date_str: Option<String> = row.get(1)?;
                Ok(StoredReport {
                    test_num: row.get(0)?,
                    build_date: date_str
                        .and_then(|s| NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()),
                    category: row.get(2)?,
                    test_case: row.get(3)?,
                    expected: row.get(4)?,
                    actual: row.get(5)?,
                    repeatable: row.get(6)?,
                    blocker: row.get(7)?,
                    owner: row.get(8)?,
                })
            })
            .map_err(StoreError::Query)?;

        rows.collect::<rusqlite::Result<Vec<_>>>()
            .map_err(StoreError::Query)
    }

    /// Number of documents in a collection.
    pub fn count(&self, dest: Destination) -> Result<usize, StoreError> {
        self.conn
            .query_row(
                &format!("SELECT COUNT(*) FROM {}", dest.table()),
                [],
                |row| row.get::<_, i64>(0),
            )
            .map(|n| n as usize)
            .map_err(StoreError::Query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn report(test_num: i64, category: &str) -> Report {
        Report {
            test_num,
            build_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            category: category.to_string(),
            test_case: "Login".to_string(),
            expected: "Works".to_string(),
            actual: "Broken".to_string(),
            repeatable: "Yes".to_string(),
            blocker: "No".to_string(),
            owner: "sam".to_string(),
        }
    }

    fn open_temp() -> (TempDir, Store) {
        let dir = TempDir::new().unwrap();
        let store = Store::open(&dir.path().join("reckoning.db")).unwrap();
        (dir, store)
    }

    #[test]
    fn test_reupload_is_idempotent() {
        let (_dir, mut store) = open_temp();
        let reports = vec![report(1, "UI"), report(2, "API")];

        store.upsert_all(&reports, Destination::Local).unwrap();
        store.upsert_all(&reports, Destination::Local).unwrap();

        assert_eq!(store.count(Destination::Local).unwrap(), 2);
    }

    #[test]
    fn test_single_field_change_creates_new_document() {
        let (_dir, mut store) = open_temp();
        store
            .upsert_all(&[report(1, "UI")], Destination::Local)
            .unwrap();

        let mut edited = report(1, "UI");
        edited.actual = "Fixed".to_string();
        store.upsert_all(&[edited], Destination::Local).unwrap();

        assert_eq!(store.count(Destination::Local).unwrap(), 2);
    }

    #[test]
    fn test_collections_are_independent() {
        let (_dir, mut store) = open_temp();
        store
            .upsert_all(&[report(1, "UI")], Destination::Local)
            .unwrap();
        store
            .upsert_all(&[report(2, "API")], Destination::Mega)
            .unwrap();

        assert_eq!(store.count(Destination::Local).unwrap(), 1);
        assert_eq!(store.count(Destination::Mega).unwrap(), 1);
        let mega = store.fetch_all(Destination::Mega).unwrap();
        assert_eq!(mega[0].test_num, Some(2));
    }

    #[test]
    fn test_fetch_preserves_insertion_order() {
        let (_dir, mut store) = open_temp();
        // Insert out of Test # order to prove iteration order wins.
        let reports = vec![report(9, "a"), report(1, "b"), report(5, "c")];
        store.upsert_all(&reports, Destination::Local).unwrap();

        let fetched = store.fetch_all(Destination::Local).unwrap();
        let nums: Vec<i64> = fetched.iter().filter_map(|r| r.test_num).collect();
        assert_eq!(nums, vec![9, 1, 5]);
    }

    #[test]
    fn test_fetch_roundtrips_fields() {
        let (_dir, mut store) = open_temp();
        let r = report(4, "Perf");
        store.upsert_all(&[r.clone()], Destination::Local).unwrap();

        let fetched = store.fetch_all(Destination::Local).unwrap();
        assert_eq!(fetched.len(), 1);
        assert_eq!(fetched[0], StoredReport::from(&r));
    }

    #[test]
    fn test_open_bad_path_is_connect_error() {
        // A plain file where the parent directory should be makes the
        // path uncreatable on every platform.
        let dir = TempDir::new().unwrap();
        let occupied = dir.path().join("not-a-dir");
        fs::write(&occupied, "").unwrap();

        let err = Store::open(&occupied.join("reckoning.db")).unwrap_err();
        assert!(matches!(err, StoreError::Connect { .. }));
    }
}
