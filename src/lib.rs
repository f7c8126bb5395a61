//! farmplan: Operational task planning for small dairy farms.
//!
//! Combines two task sources into one calendar view:
//! - **Recurring routines** — a fixed table of daily, weekly, and monthly
//!   chores, expanded on demand into a queried time window and never
//!   persisted.
//! - **Stored tasks** — ad-hoc entries kept in a SQLite database.
//!
//! The [`tasks::TaskPlanner`] merges both per window and derives the
//! dashboard counters (due today, next N days, overdue). A store outage
//! degrades to the generated set alone and is reported through
//! [`tasks::StoreHealth`] rather than failing the merge.

pub mod config;
pub mod error;
pub mod farm_dirs;
pub mod tasks;

pub use config::PlannerConfig;
pub use error::{PlanError, Result};
pub use tasks::{MergedTasks, SqliteTaskStore, StoreHealth, Task, TaskPlanner, TaskStore};
