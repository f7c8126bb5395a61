//! Weekly bulk seeding of stored tasks.
//!
//! Creates the standing per-animal weekly chores — body-condition scoring
//! and milk-quality sampling — as ordinary stored tasks, N weeks ahead.
//! Seeded rows are indistinguishable from hand-entered tasks afterwards.

use chrono::{DateTime, Datelike, Days, TimeZone, Weekday};

use super::store::{TaskStore, TaskStoreError};
use super::types::{TaskCategory, TaskPriority, local_ts};

/// Seconds in a seeding week. Weeks step by absolute time, so a run that
/// crosses a DST change keeps the same instant-of-week rather than the same
/// wall clock.
const WEEK_SECS: i64 = 7 * 86_400;

/// Local wall-clock time for a seeded routine.
#[derive(Debug, Clone, Copy)]
pub struct SeedTime {
    pub hour: u32,
    pub min: u32,
}

/// What `seed_weekly` creates per animal per week.
#[derive(Debug, Clone, Copy)]
pub struct WeeklySeedPlan {
    /// How many weeks ahead to create.
    pub weeks_ahead: u32,
    /// Explicit first-week timestamp; when `None`, the next Monday at the
    /// body-condition time.
    pub start_ts: Option<i64>,
    /// Body-condition scoring time; `None` disables the routine.
    pub bcs: Option<SeedTime>,
    /// Milk-quality sampling time; `None` disables the routine.
    pub quality: Option<SeedTime>,
}

impl Default for WeeklySeedPlan {
    fn default() -> Self {
        Self {
            weeks_ahead: 8,
            start_ts: None,
            bcs: Some(SeedTime { hour: 8, min: 0 }),
            quality: Some(SeedTime { hour: 10, min: 0 }),
        }
    }
}

/// Seed weekly stored tasks for each named animal.
///
/// Returns the number of rows created. An empty subject list is a no-op.
/// The first storage failure aborts the run and propagates; rows already
/// inserted stay.
pub fn seed_weekly<Tz: TimeZone, S: TaskStore>(
    store: &S,
    tz: &Tz,
    now_ts: i64,
    subjects: &[String],
    plan: &WeeklySeedPlan,
) -> Result<usize, TaskStoreError> {
    if subjects.is_empty() {
        return Ok(0);
    }

    let anchor = plan.bcs.or(plan.quality).unwrap_or(SeedTime { hour: 8, min: 0 });
    let start_ts = match plan.start_ts {
        Some(ts) => ts,
        None => next_monday_ts(tz, now_ts, anchor),
    };

    let mut created = 0;
    for subject in subjects {
        for week in 0..plan.weeks_ahead {
            let week_base = start_ts + i64::from(week) * WEEK_SECS;

            if plan.bcs.is_some() {
                store.add(
                    &format!("Record BCS: {subject}"),
                    week_base,
                    TaskCategory::Health,
                    TaskPriority::Normal,
                )?;
                created += 1;
            }

            if let Some(quality) = plan.quality {
                // Same local day as the week anchor, at the sampling time.
                let due = match DateTime::from_timestamp(week_base, 0) {
                    Some(dt) => local_ts(
                        tz,
                        dt.with_timezone(tz).date_naive(),
                        quality.hour,
                        quality.min,
                        0,
                    ),
                    None => week_base,
                };
                store.add(
                    &format!("Milk quality sample: {subject}"),
                    due,
                    TaskCategory::Inspection,
                    TaskPriority::Normal,
                )?;
                created += 1;
            }
        }
    }

    Ok(created)
}

/// Timestamp of the Monday strictly after the local day of `now_ts`, at the
/// given wall-clock time.
fn next_monday_ts<Tz: TimeZone>(tz: &Tz, now_ts: i64, time: SeedTime) -> i64 {
    let today = DateTime::from_timestamp(now_ts, 0)
        .map(|dt| dt.with_timezone(tz).date_naive())
        .unwrap_or_default();

    let mut ahead = u64::from(
        (Weekday::Mon.num_days_from_monday() + 7 - today.weekday().num_days_from_monday()) % 7,
    );
    if ahead == 0 {
        ahead = 7;
    }
    let monday = today.checked_add_days(Days::new(ahead)).unwrap_or(today);
    local_ts(tz, monday, time.hour, time.min, 0)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use chrono::{NaiveDateTime, Utc};

    use super::*;
    use crate::tasks::store::SqliteTaskStore;

    fn ts(s: &str) -> i64 {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
            .expect("parse test timestamp")
            .and_utc()
            .timestamp()
    }

    fn subjects(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| (*s).to_owned()).collect()
    }

    #[test]
    fn seeds_both_routines_per_subject_per_week() {
        let dir = tempfile::TempDir::new().expect("temp dir");
        let store = SqliteTaskStore::new(dir.path()).expect("store");

        let plan = WeeklySeedPlan {
            weeks_ahead: 3,
            ..WeeklySeedPlan::default()
        };
        let created = seed_weekly(
            &store,
            &Utc,
            ts("2024-06-01 12:00:00"),
            &subjects(&["Bella", "Clover"]),
            &plan,
        )
        .expect("seed");

        // 2 subjects x 3 weeks x 2 routines.
        assert_eq!(created, 12);
    }

    #[test]
    fn default_start_is_next_monday_at_bcs_time() {
        let dir = tempfile::TempDir::new().expect("temp dir");
        let store = SqliteTaskStore::new(dir.path()).expect("store");

        // Saturday 2024-06-01; next Monday is 2024-06-03.
        let plan = WeeklySeedPlan {
            weeks_ahead: 1,
            quality: None,
            ..WeeklySeedPlan::default()
        };
        seed_weekly(&store, &Utc, ts("2024-06-01 12:00:00"), &subjects(&["Bella"]), &plan)
            .expect("seed");

        let rows = store
            .load_between(ts("2024-06-03 00:00:00"), ts("2024-06-03 23:59:59"))
            .expect("load");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].due_ts, ts("2024-06-03 08:00:00"));
        assert_eq!(rows[0].title, "Record BCS: Bella");
        assert_eq!(rows[0].category, TaskCategory::Health);
    }

    #[test]
    fn monday_start_rolls_to_the_following_week() {
        let dir = tempfile::TempDir::new().expect("temp dir");
        let store = SqliteTaskStore::new(dir.path()).expect("store");

        let plan = WeeklySeedPlan {
            weeks_ahead: 1,
            quality: None,
            ..WeeklySeedPlan::default()
        };
        // Already a Monday: seeding starts the NEXT Monday.
        seed_weekly(&store, &Utc, ts("2024-06-03 12:00:00"), &subjects(&["Bella"]), &plan)
            .expect("seed");

        let rows = store.load_between(0, i64::MAX).expect("load");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].due_ts, ts("2024-06-10 08:00:00"));
    }

    #[test]
    fn quality_samples_land_on_the_anchor_day() {
        let dir = tempfile::TempDir::new().expect("temp dir");
        let store = SqliteTaskStore::new(dir.path()).expect("store");

        let plan = WeeklySeedPlan {
            weeks_ahead: 2,
            start_ts: Some(ts("2024-06-03 08:00:00")),
            ..WeeklySeedPlan::default()
        };
        seed_weekly(&store, &Utc, ts("2024-06-01 00:00:00"), &subjects(&["Clover"]), &plan)
            .expect("seed");

        let rows = store.load_between(0, i64::MAX).expect("load");
        let samples: Vec<_> = rows
            .iter()
            .filter(|t| t.title == "Milk quality sample: Clover")
            .collect();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].due_ts, ts("2024-06-03 10:00:00"));
        assert_eq!(samples[1].due_ts, ts("2024-06-10 10:00:00"));
        assert!(samples.iter().all(|t| t.category == TaskCategory::Inspection));
    }

    #[test]
    fn empty_subject_list_is_a_noop() {
        let dir = tempfile::TempDir::new().expect("temp dir");
        let store = SqliteTaskStore::new(dir.path()).expect("store");

        let created = seed_weekly(
            &store,
            &Utc,
            ts("2024-06-01 00:00:00"),
            &[],
            &WeeklySeedPlan::default(),
        )
        .expect("seed");
        assert_eq!(created, 0);
        assert!(store.load_between(0, i64::MAX).expect("load").is_empty());
    }
}
