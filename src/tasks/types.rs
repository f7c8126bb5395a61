//! Shared types, constants, and helpers for the task subsystem.
//!
//! Everything in this module is backend-agnostic — used by the recurring
//! generator, the SQLite store, and the planner.

use chrono::{NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Prefix the planner applies to stored-task ids before merging, so a row id
/// can never collide with a generated id.
pub const STORED_ID_PREFIX: &str = "db:";

/// Days of history scanned by the overdue counter.
pub(crate) const OVERDUE_LOOKBACK_DAYS: u64 = 14;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Operational category of a task.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TaskCategory {
    Cleaning,
    Vaccination,
    Maintenance,
    Inspection,
    Health,
    Other,
}

impl TaskCategory {
    /// Snake_case string form, as stored in SQLite and used in generated ids.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cleaning => "cleaning",
            Self::Vaccination => "vaccination",
            Self::Maintenance => "maintenance",
            Self::Inspection => "inspection",
            Self::Health => "health",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for TaskCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TaskCategory {
    type Err = String;

    /// Strict parse for caller-facing input; the store's row mapping stays
    /// lenient separately.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "cleaning" => Ok(Self::Cleaning),
            "vaccination" => Ok(Self::Vaccination),
            "maintenance" => Ok(Self::Maintenance),
            "inspection" => Ok(Self::Inspection),
            "health" => Ok(Self::Health),
            "other" => Ok(Self::Other),
            _ => Err(format!("unknown task category: {s}")),
        }
    }
}

/// Urgency of a task.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    Normal,
    High,
}

impl TaskPriority {
    /// Snake_case string form, as stored in SQLite.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Normal => "normal",
            Self::High => "high",
        }
    }
}

impl std::fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TaskPriority {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "normal" => Ok(Self::Normal),
            "high" => Ok(Self::High),
            _ => Err(format!("unknown task priority: {s}")),
        }
    }
}

// ---------------------------------------------------------------------------
// Core struct
// ---------------------------------------------------------------------------

/// A single operational task, either synthesized from a recurring routine or
/// loaded from the store.
///
/// Generated tasks carry a content-derived id and are never persisted;
/// stored tasks carry their row id (prefixed by the planner at merge time).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub category: TaskCategory,
    pub priority: TaskPriority,
    /// Due time in epoch seconds.
    pub due_ts: i64,
}

// ---------------------------------------------------------------------------
// Helper functions
// ---------------------------------------------------------------------------

/// Deterministic id for a generated task.
///
/// Pure function of content: recomputing the same occurrence always yields
/// the same id, which also dedups identical (title, due_ts) pairs.
#[must_use]
pub fn generated_task_id(category: TaskCategory, title: &str, due_ts: i64) -> String {
    let digest = md5::compute(format!("{title}|{due_ts}"));
    format!("{}:{digest:x}", category.as_str())
}

/// Current time in epoch seconds.
pub(crate) fn now_epoch_secs() -> i64 {
    Utc::now().timestamp()
}

/// Absolute timestamp of a local wall-clock time, earliest interpretation.
/// Midnight DST gaps fall back to the UTC reading of the same wall clock.
pub(crate) fn local_ts<Tz: TimeZone>(tz: &Tz, day: NaiveDate, hour: u32, min: u32, sec: u32) -> i64 {
    let naive = day
        .and_hms_opt(hour, min, sec)
        .unwrap_or_else(|| day.and_hms_opt(0, 0, 0).unwrap_or_default());
    tz.from_local_datetime(&naive)
        .earliest()
        .map_or_else(|| Utc.from_utc_datetime(&naive).timestamp(), |dt| dt.timestamp())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
