//! SQLite database store implementation.

use chrono::{DateTime, Utc};
use rusqlite::{params, params_from_iter, Connection, Result as SqlResult, Row};
use std::path::Path;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use super::models::*;

/// Database error types.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Migration error: {0}")]
    Migration(String),
    #[error("Not found")]
    NotFound,
}

/// Thread-safe database store.
#[derive(Clone)]
pub struct Store {
    conn: Arc<Mutex<Connection>>,
}

impl Store {
    /// Create a new store with the given database path.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;
        let store = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        store.init()?;
        Ok(store)
    }

    /// Initialize the database with migrations.
    fn init(&self) -> Result<(), DbError> {
        let conn = self.conn.lock().unwrap();

        conn.execute_batch(include_str!("../../migrations/000001_init.up.sql"))
            .map_err(|e| DbError::Migration(format!("Migration 1 failed: {}", e)))?;

        Ok(())
    }

    // --- Target CRUD ---

    /// Add a new target and return it with its assigned id.
    pub fn add_target(&self, new: NewTarget) -> Result<Target, DbError> {
        let interval_minutes = new.interval_minutes.max(1);
        let created_at = Utc::now();

        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO targets (name, url, interval_minutes, status, history, created_at)
             VALUES (?1, ?2, ?3, ?4, '[]', ?5)",
            params![
                new.name,
                new.url,
                interval_minutes,
                new.status.as_str(),
                created_at.to_rfc3339(),
            ],
        )?;
        let id = conn.last_insert_rowid();

        Ok(Target {
            id,
            name: new.name,
            url: new.url,
            interval_minutes,
            status: new.status,
            last_probe_at: None,
            last_outcome_kind: None,
            last_outcome: None,
            history: Vec::new(),
            created_at,
        })
    }

    /// Get all targets, most recently created first.
    pub fn get_targets(&self) -> Result<Vec<Target>, DbError> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM targets ORDER BY created_at DESC, id DESC",
            TARGET_COLUMNS
        ))?;

        let targets = stmt
            .query_map([], row_to_target)?
            .collect::<SqlResult<Vec<_>>>()?;

        Ok(targets)
    }

    /// Get a target by id.
    pub fn get_target(&self, id: i64) -> Result<Target, DbError> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            &format!("SELECT {} FROM targets WHERE id = ?1", TARGET_COLUMNS),
            params![id],
            row_to_target,
        )
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => DbError::NotFound,
            other => DbError::Sqlite(other),
        })
    }

    /// Apply a partial update; only fields present in the patch are written.
    pub fn update_target(&self, id: i64, patch: &TargetPatch) -> Result<(), DbError> {
        let mut set_parts: Vec<&str> = Vec::new();
        let mut args: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(name) = &patch.name {
            set_parts.push("name = ?");
            args.push(Box::new(name.clone()));
        }
        if let Some(url) = &patch.url {
            set_parts.push("url = ?");
            args.push(Box::new(url.clone()));
        }
        if let Some(interval) = patch.interval_minutes {
            set_parts.push("interval_minutes = ?");
            args.push(Box::new(interval.max(1)));
        }
        if let Some(status) = patch.status {
            set_parts.push("status = ?");
            args.push(Box::new(status.as_str()));
        }
        if let Some(last_probe_at) = patch.last_probe_at {
            set_parts.push("last_probe_at = ?");
            args.push(Box::new(last_probe_at.to_rfc3339()));
        }
        if let Some(kind) = patch.last_outcome_kind {
            set_parts.push("last_outcome_kind = ?");
            args.push(Box::new(kind.as_str()));
        }
        if let Some(outcome) = &patch.last_outcome {
            set_parts.push("last_outcome = ?");
            args.push(Box::new(encode_json(outcome)));
        }
        if let Some(history) = &patch.history {
            set_parts.push("history = ?");
            args.push(Box::new(encode_json(history)));
        }

        if set_parts.is_empty() {
            return Ok(());
        }

        args.push(Box::new(id));
        let sql = format!(
            "UPDATE targets SET {} WHERE id = ?{}",
            numbered_set_clause(&set_parts),
            args.len()
        );

        let conn = self.conn.lock().unwrap();
        let changed = conn.execute(&sql, params_from_iter(args.iter().map(|a| a.as_ref())))?;
        if changed == 0 {
            return Err(DbError::NotFound);
        }
        Ok(())
    }

    /// Delete a target and its embedded history.
    pub fn delete_target(&self, id: i64) -> Result<(), DbError> {
        let conn = self.conn.lock().unwrap();
        conn.execute("DELETE FROM targets WHERE id = ?1", params![id])?;
        Ok(())
    }

    /// Flip a target between active and paused, returning the updated record.
    pub fn toggle_status(&self, id: i64) -> Result<Target, DbError> {
        let target = self.get_target(id)?;
        let patch = TargetPatch {
            status: Some(target.status.toggled()),
            ..Default::default()
        };
        self.update_target(id, &patch)?;
        self.get_target(id)
    }
}

const TARGET_COLUMNS: &str = "id, name, url, interval_minutes, status, \
     last_probe_at, last_outcome_kind, last_outcome, history, created_at";

/// Render `name = ?` parts into `name = ?1, url = ?2, ...`.
fn numbered_set_clause(parts: &[&str]) -> String {
    parts
        .iter()
        .enumerate()
        .map(|(i, p)| p.replace('?', &format!("?{}", i + 1)))
        .collect::<Vec<_>>()
        .join(", ")
}

fn row_to_target(row: &Row<'_>) -> SqlResult<Target> {
    let id: i64 = row.get(0)?;
    let status: String = row.get(4)?;
    let last_probe_at: Option<String> = row.get(5)?;
    let last_outcome_kind: Option<String> = row.get(6)?;
    let last_outcome: Option<String> = row.get(7)?;
    let history: String = row.get(8)?;
    let created_at: String = row.get(9)?;

    Ok(Target {
        id,
        name: row.get(1)?,
        url: row.get(2)?,
        interval_minutes: row.get(3)?,
        status: TargetStatus::from_db(&status),
        last_probe_at: last_probe_at.as_deref().and_then(parse_db_time),
        last_outcome_kind: last_outcome_kind.as_deref().and_then(OutcomeKind::from_db),
        last_outcome: last_outcome.as_deref().and_then(|s| decode_outcome(id, s)),
        history: decode_history(id, &history),
        created_at: parse_db_time(&created_at).unwrap_or_else(Utc::now),
    })
}

fn encode_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "null".to_string())
}

/// Decode a stored last-outcome blob. Corrupt text degrades to absent.
fn decode_outcome(target_id: i64, s: &str) -> Option<Outcome> {
    match serde_json::from_str(s) {
        Ok(outcome) => Some(outcome),
        Err(e) => {
            tracing::warn!("Corrupt last_outcome for target {}: {}", target_id, e);
            None
        }
    }
}

/// Decode a stored history blob. Corrupt text degrades to an empty history.
fn decode_history(target_id: i64, s: &str) -> Vec<Outcome> {
    match serde_json::from_str(s) {
        Ok(history) => history,
        Err(e) => {
            tracing::warn!("Corrupt history for target {}: {}", target_id, e);
            Vec::new()
        }
    }
}

/// Parse a timestamp string from the database.
fn parse_db_time(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
