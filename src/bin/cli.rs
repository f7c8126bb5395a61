//! CLI binary for farmplan.

use anyhow::Context;
use chrono::{Local, NaiveDate, NaiveTime, TimeZone, Utc};
use clap::{Parser, Subcommand};
use farmplan::tasks::{SeedTime, SqliteTaskStore, StoreHealth, TaskPlanner, WeeklySeedPlan};
use farmplan::{PlannerConfig, TaskStore};
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// farmplan: Operational task planning for small dairy farms.
#[derive(Parser)]
#[command(name = "farmplan", version, about)]
struct Cli {
    /// Path to TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Command,
}

/// Available commands.
#[derive(Subcommand)]
enum Command {
    /// Print the dashboard summary: counters and the upcoming task list.
    Report {
        /// Emit the summary as JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Add a stored task.
    Add {
        /// Task title.
        #[arg(long)]
        title: String,

        /// Due date (Y-m-d), local time zone.
        #[arg(long)]
        date: String,

        /// Due time (HH:MM, 24h).
        #[arg(long, default_value = "09:00")]
        time: String,

        /// Task category.
        #[arg(long, default_value = "other")]
        category: String,

        /// Task priority.
        #[arg(long, default_value = "normal")]
        priority: String,
    },

    /// Seed weekly chores (BCS, milk quality sampling) for each animal.
    Seed {
        /// Animal names; one pair of weekly tasks is created per name.
        #[arg(long = "subject", required = true)]
        subjects: Vec<String>,

        /// How many weeks ahead to create.
        #[arg(long, default_value_t = 8)]
        weeks: u32,

        /// Skip the body-condition scoring tasks.
        #[arg(long)]
        skip_bcs: bool,

        /// Skip the milk-quality sampling tasks.
        #[arg(long)]
        skip_quality: bool,
    },
}

/// JSON payload for `report --json`.
#[derive(Serialize)]
struct ReportPayload {
    tasks_today: usize,
    tasks_next_days: usize,
    tasks_overdue: usize,
    store_available: bool,
    upcoming: Vec<farmplan::Task>,
}

fn main() -> anyhow::Result<()> {
    // Initialize tracing. Users can override with RUST_LOG=debug.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("farmplan=info")),
        )
        .init();

    let cli = Cli::parse();
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(PlannerConfig::default_path);
    let config = PlannerConfig::load(&config_path)?;
    let store = SqliteTaskStore::new(&config.store.effective_root())
        .map_err(|e| anyhow::anyhow!("failed to open task store: {e}"))?;

    match cli.command {
        Command::Report { json } => report(&config, store, json),
        Command::Add {
            title,
            date,
            time,
            category,
            priority,
        } => add(&store, &title, &date, &time, &category, &priority),
        Command::Seed {
            subjects,
            weeks,
            skip_bcs,
            skip_quality,
        } => seed(&store, &subjects, weeks, skip_bcs, skip_quality),
    }
}

fn report(config: &PlannerConfig, store: SqliteTaskStore, json: bool) -> anyhow::Result<()> {
    let planner = TaskPlanner::new(store);
    let now_ts = Utc::now().timestamp();
    let dash = &config.dashboard;

    let upcoming = planner.upcoming(&Local, now_ts, dash.upcoming_window_days, dash.upcoming_limit);
    let payload = ReportPayload {
        tasks_today: planner.count_today(&Local, now_ts),
        tasks_next_days: planner.count_next_days(&Local, now_ts, dash.next_days),
        tasks_overdue: planner.count_overdue(&Local, now_ts),
        store_available: upcoming.store == StoreHealth::Available,
        upcoming: upcoming.tasks,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    println!("Tasks today:        {}", payload.tasks_today);
    println!(
        "Next {} days:        {}",
        dash.next_days, payload.tasks_next_days
    );
    println!("Overdue (14 days):  {}", payload.tasks_overdue);
    if !payload.store_available {
        println!("(stored tasks unavailable; showing recurring routines only)");
    }
    println!();
    for task in &payload.upcoming {
        let due = Local
            .timestamp_opt(task.due_ts, 0)
            .earliest()
            .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| task.due_ts.to_string());
        println!(
            "{due}  [{}] {} ({})",
            task.priority, task.title, task.category
        );
    }
    Ok(())
}

fn add(
    store: &SqliteTaskStore,
    title: &str,
    date: &str,
    time: &str,
    category: &str,
    priority: &str,
) -> anyhow::Result<()> {
    anyhow::ensure!(!title.trim().is_empty(), "task title cannot be empty");

    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").context("due date must be Y-m-d")?;
    let time = NaiveTime::parse_from_str(time, "%H:%M").context("due time must be HH:MM (24h)")?;
    let category = category.parse().map_err(anyhow::Error::msg)?;
    let priority = priority.parse().map_err(anyhow::Error::msg)?;

    let due_ts = Local
        .from_local_datetime(&date.and_time(time))
        .earliest()
        .context("due time does not exist in the local time zone")?
        .timestamp();

    let id = store
        .add(title.trim(), due_ts, category, priority)
        .map_err(|e| anyhow::anyhow!("failed to add task: {e}"))?;
    println!("added task db:{id}");
    Ok(())
}

fn seed(
    store: &SqliteTaskStore,
    subjects: &[String],
    weeks: u32,
    skip_bcs: bool,
    skip_quality: bool,
) -> anyhow::Result<()> {
    let plan = WeeklySeedPlan {
        weeks_ahead: weeks,
        bcs: (!skip_bcs).then_some(SeedTime { hour: 8, min: 0 }),
        quality: (!skip_quality).then_some(SeedTime { hour: 10, min: 0 }),
        ..WeeklySeedPlan::default()
    };

    let created = farmplan::tasks::seed_weekly(store, &Local, Utc::now().timestamp(), subjects, &plan)
        .map_err(|e| anyhow::anyhow!("seeding failed: {e}"))?;
    println!("created {created} task(s)");
    Ok(())
}
