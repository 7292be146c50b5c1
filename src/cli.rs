// CLI argument parsing for tasklist

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tasklist::Filter;

#[derive(Parser)]
#[command(
    name = "tasklist",
    about = "Task list with deadlines, importance and completion tracking",
    version = env!("GIT_DESCRIBE"),
    after_help = "Set RUST_LOG=debug for diagnostic output on stderr"
)]
pub struct Cli {
    /// Path to a config file (default: .tasklist.yml, then ~/.config/tasklist/tasklist.yml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding the task file (overrides config)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Add a new task
    Add {
        /// Task title
        title: String,

        /// Description
        #[arg(short = 'D', long, default_value = "")]
        description: String,

        /// Deadline (2024-06-01T18:00, 2024-06-01 18:00, 2024-06-01, or RFC 3339)
        #[arg(short, long, default_value = "")]
        deadline: String,
    },

    /// List tasks, important first, newest first
    List {
        /// Which tasks to show
        #[arg(short, long, value_enum, default_value_t = Filter::All)]
        filter: Filter,
    },

    /// Toggle a task between completed and pending
    Done {
        /// Task ID
        id: i64,
    },

    /// Toggle the important flag of a task
    Star {
        /// Task ID
        id: i64,
    },

    /// Replace title, description and deadline of a task
    Edit {
        /// Task ID
        id: i64,

        /// New title
        title: String,

        /// New description (cleared when omitted)
        #[arg(short = 'D', long)]
        description: Option<String>,

        /// New deadline (cleared when omitted or unparsable)
        #[arg(short, long, default_value = "")]
        deadline: String,
    },

    /// Delete a task
    Delete {
        /// Task ID
        id: i64,
    },
}
