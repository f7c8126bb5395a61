//! Recurring routine generation.
//!
//! Defines the fixed chore table ([`BUILTIN_ROUTINES`]) and the window
//! generator that synthesizes one [`Task`] per occurrence. Generated tasks
//! are ephemeral: recomputed on every query, never persisted.

use chrono::{DateTime, Datelike, Days, Months, NaiveDate, TimeZone, Weekday};

use super::types::{Task, TaskCategory, TaskPriority, generated_task_id};

// ---------------------------------------------------------------------------
// Routine table
// ---------------------------------------------------------------------------

/// Cadence of a built-in routine. Times are local to the queried zone.
#[derive(Debug, Clone, Copy)]
pub enum Cadence {
    /// Every calendar day at a fixed hour:minute.
    Daily { hour: u32, min: u32 },
    /// A fixed weekday at a fixed hour:minute.
    Weekly {
        weekday: Weekday,
        hour: u32,
        min: u32,
    },
    /// A fixed day-of-month, clamped to the last day of shorter months.
    MonthlyOnDay { day: u32, hour: u32, min: u32 },
}

/// A built-in recurring chore.
#[derive(Debug, Clone, Copy)]
pub struct Routine {
    pub title: &'static str,
    pub category: TaskCategory,
    pub priority: TaskPriority,
    pub cadence: Cadence,
}

/// The fixed chore table. Not user-configurable.
pub const BUILTIN_ROUTINES: &[Routine] = &[
    Routine {
        title: "Parlor cleaning",
        category: TaskCategory::Cleaning,
        priority: TaskPriority::Normal,
        cadence: Cadence::Daily { hour: 18, min: 0 },
    },
    Routine {
        title: "Milk tank sanitation",
        category: TaskCategory::Cleaning,
        priority: TaskPriority::High,
        cadence: Cadence::Daily { hour: 20, min: 0 },
    },
    Routine {
        title: "Morning herd inspection",
        category: TaskCategory::Inspection,
        priority: TaskPriority::Normal,
        cadence: Cadence::Daily { hour: 6, min: 0 },
    },
    Routine {
        title: "Barn deep clean",
        category: TaskCategory::Cleaning,
        priority: TaskPriority::High,
        cadence: Cadence::Weekly {
            weekday: Weekday::Mon,
            hour: 9,
            min: 0,
        },
    },
    Routine {
        title: "Filter replacement check",
        category: TaskCategory::Maintenance,
        priority: TaskPriority::Normal,
        cadence: Cadence::Weekly {
            weekday: Weekday::Fri,
            hour: 11,
            min: 0,
        },
    },
    Routine {
        title: "Vaccination clinic",
        category: TaskCategory::Vaccination,
        priority: TaskPriority::High,
        cadence: Cadence::MonthlyOnDay {
            day: 15,
            hour: 10,
            min: 0,
        },
    },
    Routine {
        title: "Hoof care review",
        category: TaskCategory::Health,
        priority: TaskPriority::Normal,
        cadence: Cadence::MonthlyOnDay {
            day: 1,
            hour: 14,
            min: 0,
        },
    },
];

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

/// Generate every occurrence of the built-in routines whose due time falls
/// within `[start_ts, end_ts]` (epoch seconds, inclusive).
///
/// Local times are computed in `tz`, then converted to absolute timestamps.
/// The expansion loops walk whole local calendar days and may visit boundary
/// days outside the window; the final filter below is the authoritative
/// contract. Windows outside chrono's representable range yield no
/// occurrences.
pub fn generate_recurring<Tz: TimeZone>(tz: &Tz, start_ts: i64, end_ts: i64) -> Vec<Task> {
    let Some(start) = DateTime::from_timestamp(start_ts, 0) else {
        return Vec::new();
    };
    let Some(end) = DateTime::from_timestamp(end_ts, 0) else {
        return Vec::new();
    };
    let start_day = start.with_timezone(tz).date_naive();
    let end_day = end.with_timezone(tz).date_naive();

    let mut out = Vec::new();
    for routine in BUILTIN_ROUTINES {
        expand_routine(routine, tz, start_day, end_day, &mut out);
    }

    out.retain(|t| t.due_ts >= start_ts && t.due_ts <= end_ts);
    out
}

/// Expand one routine over whole local days `[start_day, end_day]`.
///
/// Emits without window filtering; the caller applies the timestamp filter.
pub(crate) fn expand_routine<Tz: TimeZone>(
    routine: &Routine,
    tz: &Tz,
    start_day: NaiveDate,
    end_day: NaiveDate,
    out: &mut Vec<Task>,
) {
    match routine.cadence {
        Cadence::Daily { hour, min } => {
            for day in start_day.iter_days().take_while(|d| *d <= end_day) {
                push_occurrence(out, routine, tz, day, hour, min);
            }
        }
        Cadence::Weekly { weekday, hour, min } => {
            // Advance to the first matching weekday on or after the start.
            let offset = u64::from(
                (weekday.num_days_from_monday() + 7 - start_day.weekday().num_days_from_monday())
                    % 7,
            );
            let Some(first) = start_day.checked_add_days(Days::new(offset)) else {
                return;
            };
            let mut day = first;
            while day <= end_day {
                push_occurrence(out, routine, tz, day, hour, min);
                match day.checked_add_days(Days::new(7)) {
                    Some(next) => day = next,
                    None => break,
                }
            }
        }
        Cadence::MonthlyOnDay { day, hour, min } => {
            let Some(mut month_start) = start_day.with_day(1) else {
                return;
            };
            while month_start <= end_day {
                let dom = day.min(days_in_month(month_start));
                if let Some(date) = month_start.with_day(dom) {
                    push_occurrence(out, routine, tz, date, hour, min);
                }
                match month_start.checked_add_months(Months::new(1)) {
                    Some(next) => month_start = next,
                    None => break,
                }
            }
        }
    }
}

/// Resolve a local wall-clock time on `day` and emit the occurrence.
///
/// Times falling in a DST gap resolve to the earliest valid interpretation;
/// a time the zone cannot represent at all is skipped.
fn push_occurrence<Tz: TimeZone>(
    out: &mut Vec<Task>,
    routine: &Routine,
    tz: &Tz,
    day: NaiveDate,
    hour: u32,
    min: u32,
) {
    let Some(naive) = day.and_hms_opt(hour, min, 0) else {
        return;
    };
    let Some(due_ts) = tz
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.timestamp())
    else {
        return;
    };
    out.push(Task {
        id: generated_task_id(routine.category, routine.title, due_ts),
        title: routine.title.to_owned(),
        category: routine.category,
        priority: routine.priority,
        due_ts,
    });
}

/// Number of days in the month containing `day`.
fn days_in_month(day: NaiveDate) -> u32 {
    let first = day.with_day(1).unwrap_or(day);
    match first.checked_add_months(Months::new(1)) {
        Some(next) => next.signed_duration_since(first).num_days() as u32,
        None => 31,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use chrono::{FixedOffset, NaiveDateTime, Timelike, Utc};

    fn ts(s: &str) -> i64 {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
            .expect("parse test timestamp")
            .and_utc()
            .timestamp()
    }

    /// Monday 2024-06-03 through Sunday 2024-06-09, whole days, UTC.
    fn monday_week() -> (i64, i64) {
        (ts("2024-06-03 00:00:00"), ts("2024-06-09 23:59:59"))
    }

    #[test]
    fn daily_rule_emits_one_per_day_in_monday_week() {
        let (start, end) = monday_week();
        let tasks = generate_recurring(&Utc, start, end);

        let parlor: Vec<_> = tasks.iter().filter(|t| t.title == "Parlor cleaning").collect();
        assert_eq!(parlor.len(), 7);
        for t in &parlor {
            let local = DateTime::from_timestamp(t.due_ts, 0).unwrap();
            assert_eq!(local.hour(), 18);
            assert_eq!(local.minute(), 0);
        }
    }

    #[test]
    fn weekly_rule_first_occurrence_advances_to_target_weekday() {
        let (start, end) = monday_week();
        let tasks = generate_recurring(&Utc, start, end);

        let filters: Vec<_> = tasks
            .iter()
            .filter(|t| t.title == "Filter replacement check")
            .collect();
        assert_eq!(filters.len(), 1);
        assert_eq!(filters[0].due_ts, ts("2024-06-07 11:00:00"));
    }

    #[test]
    fn weekly_rule_keeps_start_day_when_it_matches() {
        let (start, end) = monday_week();
        let tasks = generate_recurring(&Utc, start, end);

        let barn: Vec<_> = tasks.iter().filter(|t| t.title == "Barn deep clean").collect();
        assert_eq!(barn.len(), 1);
        assert_eq!(barn[0].due_ts, ts("2024-06-03 09:00:00"));
    }

    #[test]
    fn monthly_rule_clamps_day_to_shorter_month() {
        // Day 31 does not exist in April; the occurrence lands on April 30.
        let audit = Routine {
            title: "Loft audit",
            category: TaskCategory::Maintenance,
            priority: TaskPriority::Low,
            cadence: Cadence::MonthlyOnDay {
                day: 31,
                hour: 8,
                min: 0,
            },
        };
        let mut out = Vec::new();
        expand_routine(
            &audit,
            &Utc,
            NaiveDate::from_ymd_opt(2024, 4, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 4, 30).unwrap(),
            &mut out,
        );
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].due_ts, ts("2024-04-30 08:00:00"));
    }

    #[test]
    fn monthly_rule_clamps_to_leap_february() {
        let audit = Routine {
            title: "Loft audit",
            category: TaskCategory::Maintenance,
            priority: TaskPriority::Low,
            cadence: Cadence::MonthlyOnDay {
                day: 31,
                hour: 8,
                min: 0,
            },
        };
        let mut out = Vec::new();
        expand_routine(
            &audit,
            &Utc,
            NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap(),
            &mut out,
        );
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].due_ts, ts("2024-02-29 08:00:00"));
    }

    #[test]
    fn monthly_builtin_occurrences_in_june() {
        let tasks = generate_recurring(&Utc, ts("2024-06-01 00:00:00"), ts("2024-06-30 23:59:59"));

        let clinic: Vec<_> = tasks
            .iter()
            .filter(|t| t.title == "Vaccination clinic")
            .collect();
        assert_eq!(clinic.len(), 1);
        assert_eq!(clinic[0].due_ts, ts("2024-06-15 10:00:00"));

        let hoof: Vec<_> = tasks.iter().filter(|t| t.title == "Hoof care review").collect();
        assert_eq!(hoof.len(), 1);
        assert_eq!(hoof[0].due_ts, ts("2024-06-01 14:00:00"));
    }

    #[test]
    fn every_due_ts_falls_within_window() {
        // Window deliberately not aligned to day bounds: starts at noon.
        let start = ts("2024-06-03 12:00:00");
        let end = ts("2024-06-05 12:00:00");
        let tasks = generate_recurring(&Utc, start, end);

        assert!(!tasks.is_empty());
        for t in &tasks {
            assert!(t.due_ts >= start && t.due_ts <= end, "{} out of window", t.title);
        }
        // The 06:00 inspection on the start day is before the window opens.
        assert!(
            !tasks
                .iter()
                .any(|t| t.title == "Morning herd inspection" && t.due_ts < start)
        );
    }

    #[test]
    fn generation_is_deterministic() {
        let (start, end) = monday_week();
        let a: Vec<_> = generate_recurring(&Utc, start, end)
            .into_iter()
            .map(|t| (t.id, t.due_ts))
            .collect();
        let b: Vec<_> = generate_recurring(&Utc, start, end)
            .into_iter()
            .map(|t| (t.id, t.due_ts))
            .collect();
        assert_eq!(a, b);
    }

    #[test]
    fn local_times_respect_the_queried_zone() {
        // UTC+3: 18:00 local is 15:00 UTC.
        let tz = FixedOffset::east_opt(3 * 3600).unwrap();
        let start = tz
            .with_ymd_and_hms(2024, 6, 3, 0, 0, 0)
            .unwrap()
            .timestamp();
        let end = tz
            .with_ymd_and_hms(2024, 6, 3, 23, 59, 59)
            .unwrap()
            .timestamp();

        let tasks = generate_recurring(&tz, start, end);
        let parlor = tasks
            .iter()
            .find(|t| t.title == "Parlor cleaning")
            .expect("parlor task");
        let utc = DateTime::from_timestamp(parlor.due_ts, 0).unwrap();
        assert_eq!(utc.hour(), 15);
    }

    #[test]
    fn empty_window_yields_nothing() {
        // End before start.
        let tasks = generate_recurring(&Utc, ts("2024-06-09 00:00:00"), ts("2024-06-03 00:00:00"));
        assert!(tasks.is_empty());
    }
}
