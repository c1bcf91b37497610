//! Command-line driver for a SQLite-backed board.
//!
//! # Responsibility
//! - Map subcommands onto `BoardService` operations.
//! - Resolve the board file from flags and `kanban.toml`.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use kanban_core::db::open_db;
use kanban_core::logging::init_logging_from_config;
use kanban_core::{
    BoardConfig, BoardService, MoveOutcome, PriorityFilter, SqliteSlotStorage, Task, TaskDraft,
    TaskId, TaskPriority, TaskStatus, TaskStore,
};
use log::info;
use mockable::DefaultClock;
use std::path::PathBuf;

const DEFAULT_CONFIG_FILE: &str = "kanban.toml";
const DEFAULT_DATABASE_FILE: &str = "kanban.sqlite3";

#[derive(Parser)]
#[command(name = "kanban")]
#[command(version, about = "Local kanban board")]
struct Cli {
    /// Config file; missing files fall back to defaults
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Board database file, overriding `[storage] database_path`
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print visible tasks grouped by column
    List {
        /// Case-insensitive text matched against title, description and tags
        #[arg(short, long, default_value = "")]
        search: String,
        /// `all`, `low`, `medium` or `high`
        #[arg(short, long, default_value = "all")]
        priority: PriorityFilter,
    },
    /// Create a task at the end of its column
    Add {
        title: String,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(short, long, default_value = "medium")]
        priority: TaskPriority,
        /// Comma-separated tags
        #[arg(short, long, default_value = "")]
        tags: String,
        /// Due date as YYYY-MM-DD
        #[arg(long)]
        due: Option<chrono::NaiveDate>,
        #[arg(long, default_value = "todo")]
        status: TaskStatus,
    },
    /// Move a task to another column
    Move { id: String, status: TaskStatus },
    /// Soft-delete a task
    Delete { id: String },
    /// Print the number of tasks per column
    Counts,
    /// Prune deleted tasks older than the retention window
    Cleanup {
        /// Overrides `[retention] deleted_task_max_age_days`
        #[arg(long)]
        days: Option<u32>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = BoardConfig::load(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    init_logging_from_config(&config.logging).context("failed to initialize logging")?;

    let db_path = cli
        .db
        .clone()
        .or_else(|| config.storage.database_path.clone())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE_FILE));
    let conn = open_db(&db_path)
        .with_context(|| format!("failed to open board {}", db_path.display()))?;
    let storage = SqliteSlotStorage::try_new(&conn)?;
    let mut board = BoardService::new(TaskStore::new(storage, DefaultClock));

    if config.seed_sample_data && board.initialize_with_sample_data()? {
        info!("event=cli_seed module=cli status=ok");
    }

    run(&mut board, &config, cli.command)
}

fn run(
    board: &mut BoardService<SqliteSlotStorage<'_>, DefaultClock>,
    config: &BoardConfig,
    command: Commands,
) -> Result<()> {
    match command {
        Commands::List { search, priority } => {
            let visible = board.list_visible_tasks(&search, priority);
            for status in TaskStatus::ALL {
                println!("== {status} ==");
                for task in visible.iter().filter(|task| task.status == status) {
                    println!("{}", format_task(task));
                }
            }
        }
        Commands::Add {
            title,
            description,
            priority,
            tags,
            due,
            status,
        } => {
            let mut draft = TaskDraft::new(title)
                .with_priority(priority)
                .with_tags_text(&tags)
                .with_status(status);
            if let Some(description) = description {
                draft = draft.with_description(description);
            }
            if let Some(due) = due {
                draft = draft.with_due_date(due);
            }
            let task = board.create_task(draft)?;
            println!("created {}", task.id);
        }
        Commands::Move { id, status } => match board.move_task(&TaskId::from(id), status)? {
            MoveOutcome::Moved => println!("moved to {status}"),
            MoveOutcome::AlreadyInColumn => println!("already in {status}"),
            MoveOutcome::NotFound => bail!("no active task with that id"),
        },
        Commands::Delete { id } => {
            if !board.soft_delete_task(&TaskId::from(id))? {
                bail!("no active task with that id");
            }
            println!("deleted");
        }
        Commands::Counts => {
            for (status, count) in board.counts_by_status() {
                println!("{status}: {count}");
            }
        }
        Commands::Cleanup { days } => {
            let days = days.unwrap_or(config.retention.deleted_task_max_age_days);
            let pruned = board.cleanup_deleted_tasks(days)?;
            println!("pruned {pruned}");
        }
    }
    Ok(())
}

fn format_task(task: &Task) -> String {
    let mut line = format!("{} [{}] {}", task.id, task.priority, task.title);
    if !task.tags.is_empty() {
        line.push_str(&format!(" #{}", task.tags.join(" #")));
    }
    if let Some(due) = task.due_date {
        line.push_str(&format!(" (due {due})"));
    }
    line
}
