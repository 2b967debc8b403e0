use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "tasklens",
    about = "Workspace task filters, sorting, and reminders",
    version
)]
pub struct Cli {
    /// Path to the state database [default: ~/.tasklens/tasklens.db]
    #[arg(long, env = "TASKLENS_DB", global = true)]
    pub db: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Show or change a workspace's filters
    Filter {
        #[command(subcommand)]
        action: FilterAction,
    },

    /// Set how a workspace sorts its tasks
    Sort {
        /// Workspace name
        workspace: String,
        /// task-count, alphabetical, due-date, start-date, priority, or none
        option: String,
        /// ascending or descending
        #[arg(short, long)]
        direction: Option<String>,
    },

    /// Make a workspace public or private
    Visibility {
        /// Workspace name
        workspace: String,
        /// public or private
        value: String,
    },

    /// Describe a workspace's visibility, filters, and sort
    Status {
        /// Workspace name
        workspace: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Filter and sort tasks (JSON array) with a workspace's settings
    Apply {
        /// Workspace name
        workspace: String,
        /// Read tasks from this file instead of stdin
        #[arg(short, long)]
        file: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Compute reminders for tasks (JSON array)
    Reminders {
        /// Read tasks from this file instead of stdin
        #[arg(short, long)]
        file: Option<String>,
        /// Extra relative reminder, e.g. "30m before start" (repeatable)
        #[arg(long = "custom")]
        custom: Vec<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the daily agenda for tasks (JSON array)
    Agenda {
        /// Read tasks from this file instead of stdin
        #[arg(short, long)]
        file: Option<String>,
        /// Day to show (YYYY-MM-DD) [default: today]
        #[arg(long)]
        date: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print a workspace's status whenever it changes
    Watch {
        /// Workspace name
        workspace: String,
        /// Fallback re-read interval in seconds
        #[arg(long, default_value_t = 60)]
        poll: u64,
    },
}

#[derive(Subcommand)]
pub enum FilterAction {
    /// Show current filters
    Show {
        /// Workspace name
        workspace: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Replace filters (omitted dimensions are unconstrained)
    Set {
        /// Workspace name
        workspace: String,
        /// Priority buckets: low, medium, high
        #[arg(short, long, value_delimiter = ',')]
        priority: Vec<String>,
        /// Deadline buckets: overdue, today, this-week, future, none
        #[arg(short, long, value_delimiter = ',')]
        deadline: Vec<String>,
    },

    /// Remove filters
    Clear {
        /// Workspace name
        workspace: String,
    },
}
