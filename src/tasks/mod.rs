//! Operational task planning.
//!
//! Sub-modules:
//! - `types`: Shared types, constants, and helpers (backend-agnostic).
//! - `recurring`: Fixed routine table and the window generator.
//! - `schema`: SQLite DDL definitions.
//! - `store`: `TaskStore` capability trait and the SQLite implementation.
//! - `planner`: Read-time merge plus dashboard counters.
//! - `seeder`: Weekly bulk seeding of stored tasks.

pub mod planner;
pub mod recurring;
pub(crate) mod schema;
pub mod seeder;
pub mod store;
pub mod types;

// Re-export everything the rest of the codebase imports from `crate::tasks::*`.

// Types
pub use types::{STORED_ID_PREFIX, Task, TaskCategory, TaskPriority, generated_task_id};

// Generator
pub use recurring::{BUILTIN_ROUTINES, Cadence, Routine, generate_recurring};

// Store
pub use store::{SqliteTaskStore, TaskStore, TaskStoreError};

// Planner
pub use planner::{MergedTasks, StoreHealth, TaskPlanner};

// Seeder
pub use seeder::{SeedTime, WeeklySeedPlan, seed_weekly};
