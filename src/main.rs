mod cli;

use std::io::Read as _;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use clap::Parser;

use cli::{Cli, Command, FilterAction};
use tasklens::agenda::Agenda;
use tasklens::config::Config;
use tasklens::filter::{DeadlineBucket, FilterState};
use tasklens::model::{Priority, Reminder, Task};
use tasklens::reminder::{task_reminders, RelativeSpec};
use tasklens::sort::{SortDirection, SortOption};
use tasklens::workspace::{WorkspaceView, Workspaces};
use tasklens::{output, paths, store, watch};

fn open_workspaces(db_path: &str) -> Result<Workspaces> {
    paths::ensure_parent_dir(db_path)?;
    let conn = store::open(db_path)?;
    store::init(&conn)?;
    Ok(Workspaces::new(conn))
}

/// Read a JSON array of tasks from `file`, or stdin when absent.
fn read_tasks(file: Option<&str>) -> Result<Vec<Task>> {
    let raw = match file {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("failed to read {path}"))?
        }
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read tasks from stdin")?;
            buf
        }
    };
    serde_json::from_str(&raw).context("tasks must be a JSON array of task objects")
}

fn build_filters(priority: &[String], deadline: &[String]) -> Result<FilterState> {
    let mut filters = FilterState::default();
    for p in priority {
        filters.priorities.set(Priority::parse(p)?, true);
    }
    for d in deadline {
        filters.deadlines.set(DeadlineBucket::parse(d)?, true);
    }
    Ok(filters)
}

fn dispatch(workspaces: &mut Workspaces, db_path: &str, command: Command) -> Result<()> {
    match command {
        Command::Filter { action } => match action {
            FilterAction::Show { workspace, json } => {
                let filters = workspaces.filters(&workspace)?;
                if json {
                    println!("{}", serde_json::to_string_pretty(&filters)?);
                } else {
                    print!("{}", output::format_filters(filters.as_ref()));
                }
            }
            FilterAction::Set {
                workspace,
                priority,
                deadline,
            } => {
                let filters = build_filters(&priority, &deadline)?;
                workspaces.set_filters(&workspace, Some(&filters))?;
                eprintln!("Updated filters for '{workspace}'");
            }
            FilterAction::Clear { workspace } => {
                workspaces.set_filters(&workspace, None)?;
                eprintln!("Cleared filters for '{workspace}'");
            }
        },

        Command::Sort {
            workspace,
            option,
            direction,
        } => {
            let sort = match option.as_str() {
                "none" => None,
                s => Some(SortOption::parse(s)?),
            };
            let direction = direction.as_deref().map(SortDirection::parse).transpose()?;
            workspaces.set_sort(&workspace, sort, direction)?;
            match sort {
                Some(s) => eprintln!("'{workspace}' {}", s.describe(direction).to_lowercase()),
                None => eprintln!("Cleared sort for '{workspace}'"),
            }
        }

        Command::Visibility { workspace, value } => {
            let public = match value.as_str() {
                "public" => true,
                "private" => false,
                _ => bail!("invalid visibility '{value}': must be public or private"),
            };
            workspaces.set_visibility(&workspace, public)?;
            eprintln!("'{workspace}' is now {value}");
        }

        Command::Status { workspace, json } => {
            let state = workspaces.state(&workspace)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&state)?);
            } else {
                println!("{}", state.describe());
            }
        }

        Command::Apply {
            workspace,
            file,
            json,
        } => {
            let tasks = read_tasks(file.as_deref())?;
            let view = WorkspaceView::load(workspaces, &workspace)?;
            let arranged = view.arrange(&tasks, &Local::now());
            log::info!(
                "'{workspace}' kept {} of {} task(s)",
                arranged.len(),
                tasks.len()
            );
            if json {
                println!("{}", serde_json::to_string_pretty(&arranged)?);
            } else {
                print!("{}", output::format_task_list(&arranged, &Local));
            }
        }

        Command::Reminders { file, custom, json } => {
            let policy = Config::load()?.reminder_policy();
            let specs = custom
                .iter()
                .map(|s| RelativeSpec::parse(s))
                .collect::<Result<Vec<_>>>()?;
            let tasks = read_tasks(file.as_deref())?;

            let all: Vec<Vec<Reminder>> = tasks
                .iter()
                .map(|task| {
                    let mut reminders = task_reminders(task, &Local, &policy);
                    let start = task.start_date.map(|t| t.with_timezone(&Local));
                    let deadline = task.deadline.map(|t| t.with_timezone(&Local));
                    let start_time = task.start_time_of_day(&Local);
                    reminders.extend(
                        specs
                            .iter()
                            .filter_map(|s| s.reminder(start.as_ref(), start_time, deadline.as_ref())),
                    );
                    reminders
                })
                .collect();

            if json {
                let items: Vec<output::TaskReminders> = tasks
                    .iter()
                    .zip(&all)
                    .map(|(t, r)| output::TaskReminders {
                        id: &t.id,
                        reminders: r,
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&items)?);
            } else {
                for (task, reminders) in tasks.iter().zip(&all) {
                    print!("{}", output::format_reminders(task, reminders, &Local));
                }
            }
        }

        Command::Agenda { file, date, json } => {
            let now = Local::now();
            let date = match date {
                Some(d) => NaiveDate::parse_from_str(&d, "%Y-%m-%d")
                    .with_context(|| format!("invalid date '{d}': expected YYYY-MM-DD"))?,
                None => now.date_naive(),
            };
            let tasks = read_tasks(file.as_deref())?;
            let agenda = Agenda::build(&tasks, date, &now);
            if json {
                println!("{}", serde_json::to_string_pretty(&agenda)?);
            } else {
                print!("{}", output::format_agenda(&agenda));
            }
        }

        Command::Watch { workspace, poll } => {
            let (_watcher, rx) = watch::watch_db(db_path)?;
            let mut view = WorkspaceView::load(workspaces, &workspace)?;
            println!("{}", view.state().describe());
            loop {
                if watch::refresh_view(&rx, Duration::from_secs(poll), &mut view, workspaces)? {
                    println!("{}", view.state().describe());
                }
            }
        }
    }
    Ok(())
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let db_path = cli.db.unwrap_or_else(paths::db_path);
    log::debug!("using state database {db_path}");
    let mut workspaces = open_workspaces(&db_path)?;
    dispatch(&mut workspaces, &db_path, cli.command)
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp_secs()
        .init();

    if let Err(e) = run() {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
