//! Storage layer for the life planner.
//!
//! Persists task proposals with `rusqlite` so they survive across planning
//! sessions and can be listed or re-prioritized later.
//!
//! # Thread Safety
//!
//! [`TaskStore`] wraps a `rusqlite::Connection`, which is `Send` but not
//! `Sync`. A store can be moved between threads but shared access needs
//! external synchronization (e.g. a `Mutex<TaskStore>`).
//!
//! # Schema
//!
//! Timestamps are stored as TEXT in ISO 8601 format (e.g.
//! `2024-01-15T10:30:00.000Z`), so lexicographic ordering matches
//! chronological ordering. Every column is populated on insert; `status`
//! starts at `pending` and only changes through [`TaskStore::update_status`].

use std::path::Path;

use chrono::{DateTime, SecondsFormat, Utc};
use lp_core::TaskProposal;
use rusqlite::types::Value;
use rusqlite::{Connection, params, params_from_iter};
use serde::Serialize;
use thiserror::Error;

/// Fallback row cap when a query passes a non-positive limit.
const DEFAULT_QUERY_LIMIT: i64 = 100;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An error from the underlying database.
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// SQLite-backed store for task proposals.
///
/// See the [module documentation](self) for thread safety considerations.
pub struct TaskStore {
    conn: Connection,
}

/// A stored task row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskRecord {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub duration_minutes: i64,
    pub priority: String,
    pub preferred_time_block: String,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}

impl TaskStore {
    /// Opens a store at the given path, creating the database if necessary.
    ///
    /// The schema is automatically initialized on first open.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.init()?;
        Ok(store)
    }

    /// Opens an in-memory store.
    ///
    /// Useful for testing. The data is destroyed when the connection closes.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.init()?;
        Ok(store)
    }

    /// Initializes the schema.
    ///
    /// This is idempotent - safe to call on an already-initialized database.
    fn init(&self) -> Result<(), StoreError> {
        self.conn.execute_batch(
            "
            -- Tasks table: proposals produced by planning runs
            -- created_at/updated_at: ISO 8601 text (e.g. '2024-01-15T10:30:00.000Z')
            CREATE TABLE IF NOT EXISTS tasks (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                description TEXT,
                duration_minutes INTEGER,
                priority TEXT,
                preferred_time_block TEXT,
                status TEXT DEFAULT 'pending',
                created_at TEXT,
                updated_at TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_tasks_status ON tasks(status);
            ",
        )?;
        Ok(())
    }

    /// Inserts a batch of proposals in one transaction.
    ///
    /// Returns the assigned row IDs in input order.
    pub fn add_tasks(&mut self, tasks: &[TaskProposal]) -> Result<Vec<i64>, StoreError> {
        self.add_tasks_at(tasks, Utc::now())
    }

    fn add_tasks_at(
        &mut self,
        tasks: &[TaskProposal],
        now: DateTime<Utc>,
    ) -> Result<Vec<i64>, StoreError> {
        if tasks.is_empty() {
            return Ok(Vec::new());
        }
        let now = format_timestamp(now);
        let tx = self.conn.transaction()?;
        let mut ids = Vec::with_capacity(tasks.len());
        {
            let mut stmt = tx.prepare(
                "
                INSERT INTO tasks
                (title, description, duration_minutes, priority, preferred_time_block, created_at, updated_at)
                VALUES (?, ?, ?, ?, ?, ?, ?)
                ",
            )?;
            for task in tasks {
                stmt.execute(params![
                    task.title,
                    task.description,
                    task.duration_minutes,
                    task.priority,
                    task.preferred_time_block,
                    now,
                    now,
                ])?;
                ids.push(tx.last_insert_rowid());
            }
        }
        tx.commit()?;
        tracing::debug!(inserted = ids.len(), "stored task proposals");
        Ok(ids)
    }

    /// Lists tasks, newest first.
    ///
    /// `status` and `priority` filter exactly when present. A non-positive
    /// `limit` falls back to [`DEFAULT_QUERY_LIMIT`].
    pub fn query_tasks(
        &self,
        status: Option<&str>,
        priority: Option<&str>,
        limit: i64,
    ) -> Result<Vec<TaskRecord>, StoreError> {
        let mut sql = String::from(
            "
            SELECT id, title, description, duration_minutes, priority,
                   preferred_time_block, status, created_at, updated_at
            FROM tasks
            WHERE 1=1
            ",
        );
        let mut args: Vec<Value> = Vec::new();
        if let Some(status) = status {
            sql.push_str(" AND status = ?");
            args.push(Value::from(status.to_string()));
        }
        if let Some(priority) = priority {
            sql.push_str(" AND priority = ?");
            args.push(Value::from(priority.to_string()));
        }
        sql.push_str(" ORDER BY created_at DESC, id DESC LIMIT ?");
        let limit = if limit > 0 { limit } else { DEFAULT_QUERY_LIMIT };
        args.push(Value::from(limit));

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(args), read_task)?;
        let mut tasks = Vec::new();
        for row in rows {
            tasks.push(row?);
        }
        Ok(tasks)
    }

    /// Fetches a single task by ID.
    pub fn get_task(&self, task_id: i64) -> Result<Option<TaskRecord>, StoreError> {
        let mut stmt = self.conn.prepare(
            "
            SELECT id, title, description, duration_minutes, priority,
                   preferred_time_block, status, created_at, updated_at
            FROM tasks
            WHERE id = ?
            ",
        )?;
        let mut rows = stmt.query_map(params![task_id], read_task)?;
        Ok(rows.next().transpose()?)
    }

    /// Sets a task's status, bumping `updated_at`.
    ///
    /// Returns whether a row was actually changed.
    pub fn update_status(&mut self, task_id: i64, status: &str) -> Result<bool, StoreError> {
        self.update_status_at(task_id, status, Utc::now())
    }

    fn update_status_at(
        &mut self,
        task_id: i64,
        status: &str,
        now: DateTime<Utc>,
    ) -> Result<bool, StoreError> {
        let changed = self.conn.execute(
            "UPDATE tasks SET status = ?, updated_at = ? WHERE id = ?",
            params![status, format_timestamp(now), task_id],
        )?;
        Ok(changed > 0)
    }
}

fn read_task(row: &rusqlite::Row<'_>) -> Result<TaskRecord, rusqlite::Error> {
    Ok(TaskRecord {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        duration_minutes: row.get(3)?,
        priority: row.get(4)?,
        preferred_time_block: row.get(5)?,
        status: row.get(6)?,
        created_at: row.get(7)?,
        updated_at: row.get(8)?,
    })
}

fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}
