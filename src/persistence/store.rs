use super::error::StoreResult;
use crate::domain::Task;
use parking_lot::Mutex;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use tokio::sync::watch;
use uuid::Uuid;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS tasks (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    total_seconds INTEGER NOT NULL,
    remaining_seconds INTEGER NOT NULL,
    is_running INTEGER NOT NULL DEFAULT 0,
    is_completed INTEGER NOT NULL DEFAULT 0,
    sort_order INTEGER NOT NULL DEFAULT 0
);

CREATE INDEX IF NOT EXISTS idx_tasks_sort_order ON tasks(sort_order);
"#;

const SELECT_COLUMNS: &str =
    "SELECT id, name, total_seconds, remaining_seconds, is_running, is_completed, sort_order FROM tasks";

/// Durable task table with a live, ordered snapshot feed
///
/// All access goes through one connection behind a mutex, which is the
/// store's only write serialization. Every successful mutation republishes
/// the full list ordered by `sort_order` to subscribers.
pub struct TaskStore {
    conn: Mutex<Connection>,
    snapshots: watch::Sender<Vec<Task>>,
}

impl TaskStore {
    /// Open (or create) the task table at `path`
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        Self::bootstrap(Connection::open(path)?)
    }

    /// A throwaway store, used by tests
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::bootstrap(Connection::open_in_memory()?)
    }

    fn bootstrap(conn: Connection) -> StoreResult<Self> {
        conn.execute_batch(SCHEMA)?;
        let initial = query_all(&conn)?;
        let (snapshots, _) = watch::channel(initial);
        Ok(Self {
            conn: Mutex::new(conn),
            snapshots,
        })
    }

    /// Subscribe to full-list snapshots; the receiver starts at the latest one
    pub fn subscribe(&self) -> watch::Receiver<Vec<Task>> {
        self.snapshots.subscribe()
    }

    /// All tasks ordered by `sort_order` ascending
    pub fn all(&self) -> StoreResult<Vec<Task>> {
        query_all(&self.conn.lock())
    }

    /// Point lookup by id
    pub fn get(&self, id: Uuid) -> StoreResult<Option<Task>> {
        let conn = self.conn.lock();
        let task = conn
            .query_row(
                &format!("{} WHERE id = ?1", SELECT_COLUMNS),
                params![id.to_string()],
                map_task,
            )
            .optional()?;
        Ok(task)
    }

    /// Sort key that places a new task after every existing one
    pub fn next_sort_order(&self) -> StoreResult<i64> {
        let conn = self.conn.lock();
        let max: Option<i64> =
            conn.query_row("SELECT MAX(sort_order) FROM tasks", [], |row| row.get(0))?;
        Ok(max.map_or(0, |m| m + 1))
    }

    /// Ids of every row currently flagged as running
    pub fn running_ids(&self) -> StoreResult<Vec<Uuid>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare("SELECT id FROM tasks WHERE is_running = 1")?;
        let ids = stmt
            .query_map([], |row| parse_id(row, 0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ids)
    }

    /// Insert a task, replacing any row with the same id
    pub fn insert(&self, task: &Task) -> StoreResult<()> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO tasks (id, name, total_seconds, remaining_seconds, is_running, is_completed, sort_order)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
             ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                total_seconds = excluded.total_seconds,
                remaining_seconds = excluded.remaining_seconds,
                is_running = excluded.is_running,
                is_completed = excluded.is_completed,
                sort_order = excluded.sort_order",
            params![
                task.id.to_string(),
                task.name,
                task.total_seconds,
                task.remaining_seconds,
                task.is_running,
                task.is_completed,
                task.sort_order,
            ],
        )?;
        self.publish(&conn)
    }

    /// Overwrite an existing row; returns false if the task no longer exists
    pub fn update(&self, task: &Task) -> StoreResult<bool> {
        let conn = self.conn.lock();
        let changed = update_row(&conn, task)?;
        if changed {
            self.publish(&conn)?;
        }
        Ok(changed)
    }

    /// Rewrite the sort key of several tasks in one transaction
    ///
    /// Only `sort_order` is touched, so a remaining-time write landing
    /// between a caller's read and this batch survives. Readers see the
    /// new order as a unit.
    pub fn set_sort_orders(&self, orders: &[(Uuid, i64)]) -> StoreResult<()> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare("UPDATE tasks SET sort_order = ?2 WHERE id = ?1")?;
            for (id, sort_order) in orders {
                stmt.execute(params![id.to_string(), sort_order])?;
            }
        }
        tx.commit()?;
        self.publish(&conn)
    }

    /// Remove a task; returns false if it was already gone
    pub fn delete(&self, id: Uuid) -> StoreResult<bool> {
        let conn = self.conn.lock();
        let removed = conn.execute("DELETE FROM tasks WHERE id = ?1", params![id.to_string()])? > 0;
        if removed {
            self.publish(&conn)?;
        }
        Ok(removed)
    }

    /// Rewrite only the remaining time of one task
    pub fn set_remaining(&self, id: Uuid, remaining_seconds: i64) -> StoreResult<bool> {
        let conn = self.conn.lock();
        let changed = conn.execute(
            "UPDATE tasks SET remaining_seconds = ?2 WHERE id = ?1",
            params![id.to_string(), remaining_seconds],
        )? > 0;
        if changed {
            self.publish(&conn)?;
        }
        Ok(changed)
    }

    /// Rewrite only the running flag of one task; no write if it already matches
    pub fn set_running(&self, id: Uuid, is_running: bool) -> StoreResult<bool> {
        let conn = self.conn.lock();
        let changed = conn.execute(
            "UPDATE tasks SET is_running = ?2 WHERE id = ?1 AND is_running != ?2",
            params![id.to_string(), is_running],
        )? > 0;
        if changed {
            self.publish(&conn)?;
        }
        Ok(changed)
    }

    fn publish(&self, conn: &Connection) -> StoreResult<()> {
        let tasks = query_all(conn)?;
        self.snapshots.send_replace(tasks);
        Ok(())
    }
}

fn query_all(conn: &Connection) -> StoreResult<Vec<Task>> {
    let mut stmt = conn.prepare(&format!("{} ORDER BY sort_order ASC, rowid ASC", SELECT_COLUMNS))?;
    let tasks = stmt
        .query_map([], map_task)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(tasks)
}

fn update_row(conn: &Connection, task: &Task) -> StoreResult<bool> {
    let changed = conn.execute(
        "UPDATE tasks SET name = ?2, total_seconds = ?3, remaining_seconds = ?4,
             is_running = ?5, is_completed = ?6, sort_order = ?7
         WHERE id = ?1",
        params![
            task.id.to_string(),
            task.name,
            task.total_seconds,
            task.remaining_seconds,
            task.is_running,
            task.is_completed,
            task.sort_order,
        ],
    )?;
    Ok(changed > 0)
}

fn parse_id(row: &Row<'_>, idx: usize) -> rusqlite::Result<Uuid> {
    let raw: String = row.get(idx)?;
    Uuid::parse_str(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn map_task(row: &Row<'_>) -> rusqlite::Result<Task> {
    Ok(Task {
        id: parse_id(row, 0)?,
        name: row.get(1)?,
        total_seconds: row.get(2)?,
        remaining_seconds: row.get(3)?,
        is_running: row.get(4)?,
        is_completed: row.get(5)?,
        sort_order: row.get(6)?,
    })
}
