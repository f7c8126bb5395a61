//! Read-time merge of generated and stored tasks, plus dashboard counters.
//!
//! The planner owns the one contract the dashboard relies on: a merge that
//! never fails. A store outage degrades to the generated set alone, reported
//! through [`StoreHealth`] so callers can tell "no stored tasks" apart from
//! "store unreachable".

use chrono::{DateTime, Days, NaiveDate, TimeZone};
use tracing::warn;

use super::recurring::generate_recurring;
use super::store::TaskStore;
use super::types::{OVERDUE_LOOKBACK_DAYS, STORED_ID_PREFIX, Task, local_ts};

// ---------------------------------------------------------------------------
// Merge result
// ---------------------------------------------------------------------------

/// Whether the store answered during a merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreHealth {
    Available,
    /// The store failed; the merge carries generated tasks only.
    Unavailable,
}

/// A merged window of tasks.
///
/// No ordering is guaranteed; callers that need one sort by `due_ts`
/// explicitly (as [`TaskPlanner::upcoming`] does).
#[derive(Debug, Clone)]
pub struct MergedTasks {
    pub tasks: Vec<Task>,
    pub store: StoreHealth,
}

impl MergedTasks {
    /// Discard the health marker and keep the task list.
    #[must_use]
    pub fn into_tasks(self) -> Vec<Task> {
        self.tasks
    }
}

// ---------------------------------------------------------------------------
// Planner
// ---------------------------------------------------------------------------

/// Combines the recurring generator with an injected [`TaskStore`].
pub struct TaskPlanner<S: TaskStore> {
    store: S,
}

impl<S: TaskStore> TaskPlanner<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Generated plus stored tasks for `[start_ts, end_ts]`.
    ///
    /// Stored ids are rewritten with the `db:` prefix before merging so they
    /// can never collide with generated ids. A store failure is logged and
    /// degrades to the generated set alone — this call never fails.
    pub fn merged_tasks<Tz: TimeZone>(&self, tz: &Tz, start_ts: i64, end_ts: i64) -> MergedTasks {
        let mut tasks = generate_recurring(tz, start_ts, end_ts);

        let store = match self.store.load_between(start_ts, end_ts) {
            Ok(stored) => {
                tasks.extend(stored.into_iter().map(|mut t| {
                    t.id = format!("{STORED_ID_PREFIX}{}", t.id);
                    t
                }));
                StoreHealth::Available
            }
            Err(e) => {
                warn!(error = %e, "task store unavailable; merging generated tasks only");
                StoreHealth::Unavailable
            }
        };

        MergedTasks { tasks, store }
    }

    /// Number of tasks due today (local day bounds of `now_ts` in `tz`).
    pub fn count_today<Tz: TimeZone>(&self, tz: &Tz, now_ts: i64) -> usize {
        let (start, end) = day_bounds(tz, now_ts);
        self.merged_tasks(tz, start, end).tasks.len()
    }

    /// Number of tasks due from today's start through end-of-day `days`
    /// days after today.
    pub fn count_next_days<Tz: TimeZone>(&self, tz: &Tz, now_ts: i64, days: u64) -> usize {
        let (start, _) = day_bounds(tz, now_ts);
        let Some(target) = local_date(tz, now_ts).and_then(|d| d.checked_add_days(Days::new(days)))
        else {
            return 0;
        };
        let end = end_of_day(tz, target);
        self.merged_tasks(tz, start, end).tasks.len()
    }

    /// Number of tasks that fell due in the 14 local days before today,
    /// ending one second before today's start.
    pub fn count_overdue<Tz: TimeZone>(&self, tz: &Tz, now_ts: i64) -> usize {
        let (today_start, _) = day_bounds(tz, now_ts);
        let Some(past) = local_date(tz, now_ts)
            .and_then(|d| d.checked_sub_days(Days::new(OVERDUE_LOOKBACK_DAYS)))
        else {
            return 0;
        };
        let start = start_of_day(tz, past);
        self.merged_tasks(tz, start, today_start - 1).tasks.len()
    }

    /// The next tasks on the board: merged over `[today, today + window_days]`,
    /// sorted ascending by due time and truncated to `limit`.
    pub fn upcoming<Tz: TimeZone>(
        &self,
        tz: &Tz,
        now_ts: i64,
        window_days: u64,
        limit: usize,
    ) -> MergedTasks {
        let (start, _) = day_bounds(tz, now_ts);
        let Some(target) =
            local_date(tz, now_ts).and_then(|d| d.checked_add_days(Days::new(window_days)))
        else {
            return MergedTasks {
                tasks: Vec::new(),
                store: StoreHealth::Available,
            };
        };

        let mut merged = self.merged_tasks(tz, start, end_of_day(tz, target));
        merged.tasks.sort_by_key(|t| t.due_ts);
        merged.tasks.truncate(limit);
        merged
    }
}

// ---------------------------------------------------------------------------
// Window helpers
// ---------------------------------------------------------------------------

/// Local calendar date containing `now_ts` in `tz`.
fn local_date<Tz: TimeZone>(tz: &Tz, now_ts: i64) -> Option<NaiveDate> {
    DateTime::from_timestamp(now_ts, 0).map(|dt| dt.with_timezone(tz).date_naive())
}

/// `[00:00:00, 23:59:59]` bounds of the local day containing `now_ts`.
pub(crate) fn day_bounds<Tz: TimeZone>(tz: &Tz, now_ts: i64) -> (i64, i64) {
    match local_date(tz, now_ts) {
        Some(day) => (start_of_day(tz, day), end_of_day(tz, day)),
        None => (now_ts, now_ts),
    }
}

fn start_of_day<Tz: TimeZone>(tz: &Tz, day: NaiveDate) -> i64 {
    local_ts(tz, day, 0, 0, 0)
}

fn end_of_day<Tz: TimeZone>(tz: &Tz, day: NaiveDate) -> i64 {
    local_ts(tz, day, 23, 59, 59)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
