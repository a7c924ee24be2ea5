use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use crate::engine::Suggestion;
use crate::error::Result;

/// Append-only audit log of suggestion outcomes. Written by the engine on
/// terminal status changes, never read back by the core; each append is one
/// SQLite transaction so a process kill can't corrupt it.
pub struct SuggestionStore {
    conn: Mutex<Connection>,
}

/// One audit row
#[derive(Debug, Clone)]
pub struct SuggestionRecord {
    pub id: String,
    pub description: String,
    pub confidence: f64,
    pub state: String,
    pub created_at: DateTime<Utc>,
    pub action_count: i64,
}

impl SuggestionStore {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        run_migrations(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        run_migrations(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn append(&self, suggestion: &Suggestion) -> Result<()> {
        let conn = self.conn.lock().map_err(|_| rusqlite::Error::InvalidQuery)?;
        conn.execute(
            "INSERT INTO suggestions (id, description, confidence, state, created_at, action_count)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                suggestion.id.to_string(),
                suggestion.description,
                suggestion.confidence,
                suggestion.status.to_string(),
                suggestion.created_at,
                suggestion.plan.len() as i64,
            ],
        )?;
        Ok(())
    }

    /// Latest audit rows, newest first. For tooling and tests; the engine
    /// never reads the log.
    pub fn recent(&self, limit: usize) -> Result<Vec<SuggestionRecord>> {
        let conn = self.conn.lock().map_err(|_| rusqlite::Error::InvalidQuery)?;
        let mut stmt = conn.prepare(
            "SELECT id, description, confidence, state, created_at, action_count
             FROM suggestions ORDER BY created_at DESC LIMIT ?1",
        )?;

        let rows = stmt.query_map(params![limit as i64], |row| {
            Ok(SuggestionRecord {
                id: row.get(0)?,
                description: row.get(1)?,
                confidence: row.get(2)?,
                state: row.get(3)?,
                created_at: row.get(4)?,
                action_count: row.get(5)?,
            })
        })?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }
}

const CURRENT_VERSION: i32 = 1;

fn run_migrations(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )?;

    let current_version: i32 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_version",
            [],
            |row| row.get(0),
        )
        .unwrap_or(0);

    if current_version >= CURRENT_VERSION {
        return Ok(());
    }

    if current_version < 1 {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS suggestions (
                id TEXT PRIMARY KEY,
                description TEXT NOT NULL,
                confidence REAL NOT NULL,
                state TEXT NOT NULL,
                created_at TEXT NOT NULL,
                action_count INTEGER NOT NULL
            )",
            [],
        )?;
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_suggestions_created_at
             ON suggestions (created_at)",
            [],
        )?;
        conn.execute("INSERT INTO schema_version (version) VALUES (?1)", [1])?;
    }

    Ok(())
}
