//! SQLite-backed store for user-created tasks.
//!
//! Stored tasks are ad-hoc rows entered by the farmer, persisted
//! indefinitely and never touched by the recurring generator. The store
//! trusts its callers' validation, per the planner contract.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use rusqlite::{Connection, params};
use tracing::info;

use super::schema::{apply_schema, read_schema_version};
use super::types::{Task, TaskCategory, TaskPriority, now_epoch_secs};

/// Database filename within the store root directory.
const DB_FILENAME: &str = "farmplan.db";

// ---------------------------------------------------------------------------
// Capability trait
// ---------------------------------------------------------------------------

/// Repository capability over stored ad-hoc tasks.
///
/// The planner takes this interface by parameter instead of resolving a
/// concrete store from ambient context, so tests can substitute failing or
/// in-memory implementations.
pub trait TaskStore {
    /// Insert a new task and return its row id.
    fn add(
        &self,
        title: &str,
        due_ts: i64,
        category: TaskCategory,
        priority: TaskPriority,
    ) -> Result<i64, TaskStoreError>;

    /// Load tasks with `due_ts` in the inclusive range, ascending by due
    /// time. Task ids are the bare row ids; prefixing is the planner's job.
    fn load_between(&self, start_ts: i64, end_ts: i64) -> Result<Vec<Task>, TaskStoreError>;
}

// ---------------------------------------------------------------------------
// SQLite implementation
// ---------------------------------------------------------------------------

/// SQLite-backed task store.
///
/// Thread-safe via an internal `Mutex<Connection>`. All access is
/// serialized; the planner performs a single blocking read per query.
pub struct SqliteTaskStore {
    root: PathBuf,
    conn: Mutex<Connection>,
}

impl SqliteTaskStore {
    /// Open (or create) the database at `{root_dir}/farmplan.db`.
    ///
    /// Applies the schema if the database is new.
    pub fn new(root_dir: &Path) -> Result<Self, TaskStoreError> {
        std::fs::create_dir_all(root_dir).map_err(|e| TaskStoreError::Io(e.to_string()))?;
        let db_path = root_dir.join(DB_FILENAME);
        let conn = Connection::open(&db_path).map_err(TaskStoreError::Sqlite)?;
        apply_schema(&conn).map_err(TaskStoreError::Sqlite)?;
        Ok(Self {
            root: root_dir.to_path_buf(),
            conn: Mutex::new(conn),
        })
    }

    /// Returns the store root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Read the current schema version from the database.
    pub fn schema_version(&self) -> Result<Option<u32>, TaskStoreError> {
        let conn = self.lock()?;
        read_schema_version(&conn).map_err(TaskStoreError::Sqlite)
    }

    /// Acquire the connection mutex.
    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, TaskStoreError> {
        self.conn
            .lock()
            .map_err(|e| TaskStoreError::Lock(e.to_string()))
    }
}

impl TaskStore for SqliteTaskStore {
    fn add(
        &self,
        title: &str,
        due_ts: i64,
        category: TaskCategory,
        priority: TaskPriority,
    ) -> Result<i64, TaskStoreError> {
        let conn = self.lock()?;
        let now = now_epoch_secs();

        conn.execute(
            "INSERT INTO farm_tasks (title, due_ts, category, priority, created, changed) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![title, due_ts, category.as_str(), priority.as_str(), now, now],
        )
        .map_err(TaskStoreError::Sqlite)?;

        let id = conn.last_insert_rowid();
        info!(id, title, due_ts, "added stored task");
        Ok(id)
    }

    fn load_between(&self, start_ts: i64, end_ts: i64) -> Result<Vec<Task>, TaskStoreError> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(
                "SELECT id, title, due_ts, category, priority FROM farm_tasks \
                 WHERE due_ts BETWEEN ?1 AND ?2 ORDER BY due_ts ASC",
            )
            .map_err(TaskStoreError::Sqlite)?;
        let rows = stmt
            .query_map(params![start_ts, end_ts], row_to_task)
            .map_err(TaskStoreError::Sqlite)?;

        let mut tasks = Vec::new();
        for r in rows {
            tasks.push(r.map_err(TaskStoreError::Sqlite)?);
        }
        Ok(tasks)
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors from the SQLite task store.
#[derive(Debug, thiserror::Error)]
pub enum TaskStoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("lock poisoned: {0}")]
    Lock(String),
}

// ---------------------------------------------------------------------------
// Row conversion helpers
// ---------------------------------------------------------------------------

fn row_to_task(row: &rusqlite::Row<'_>) -> rusqlite::Result<Task> {
    let id: i64 = row.get(0)?;
    let category_str: String = row.get(3)?;
    let priority_str: String = row.get(4)?;

    Ok(Task {
        id: id.to_string(),
        title: row.get(1)?,
        due_ts: row.get(2)?,
        category: str_to_category(&category_str),
        priority: str_to_priority(&priority_str),
    })
}

// ---------------------------------------------------------------------------
// Enum ↔ string conversions
// ---------------------------------------------------------------------------

fn str_to_category(s: &str) -> TaskCategory {
    match s {
        "cleaning" => TaskCategory::Cleaning,
        "vaccination" => TaskCategory::Vaccination,
        "maintenance" => TaskCategory::Maintenance,
        "inspection" => TaskCategory::Inspection,
        "health" => TaskCategory::Health,
        _ => TaskCategory::Other, // safe fallback
    }
}

fn str_to_priority(s: &str) -> TaskPriority {
    match s {
        "low" => TaskPriority::Low,
        "high" => TaskPriority::High,
        _ => TaskPriority::Normal, // safe fallback
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
