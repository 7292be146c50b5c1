use chrono::{DateTime, Utc};
use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use tasklist::{Config, FileStore, KeyValueStore, Task, TaskStore, countdown, format_deadline};
use tracing_subscriber::EnvFilter;

mod cli;

use cli::{Cli, Command};

fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn render_task(task: &Task, now: DateTime<Utc>) -> String {
    let star = if task.important { "★".yellow() } else { " ".normal() };
    let check = if task.completed { "[x]".green() } else { "[ ]".normal() };
    let title = if task.completed {
        task.title.dimmed().strikethrough()
    } else if task.important {
        task.title.bold()
    } else {
        task.title.normal()
    };

    let mut line = format!("{} {} {} {}", star, check, task.id.to_string().cyan(), title);

    if !task.description.is_empty() {
        line.push_str(&format!("\n      {}", task.description.dimmed()));
    }

    if let Some(deadline) = task.deadline {
        let label = format!("{} ({})", format_deadline(deadline), countdown(deadline, now));
        let label = if task.is_overdue(now) { label.red() } else { label.normal() };
        line.push_str(&format!("\n      due {}", label));
    }

    line
}

fn run(cli: Cli) -> Result<()> {
    let config = Config::load(cli.config.as_ref())?;
    let data_dir = cli.data_dir.clone().unwrap_or_else(|| config.data_dir());

    let storage = FileStore::open(&data_dir).context("Failed to open data directory")?;
    let mut store = TaskStore::open_with_key(storage, &config.storage_key).context("Failed to load tasks")?;

    for line in execute(&mut store, cli.command, Utc::now())? {
        println!("{}", line);
    }

    Ok(())
}

/// Apply `command` to the store and return the lines to print
fn execute<S: KeyValueStore>(store: &mut TaskStore<S>, command: Command, now: DateTime<Utc>) -> Result<Vec<String>> {
    let lines = match command {
        Command::Add {
            title,
            description,
            deadline,
        } => {
            let before = store.len();
            store.add(&title, &description, &deadline)?;
            match store.tasks().last() {
                Some(task) if store.len() > before => {
                    vec![format!("{} Added {} {}", "✓".green(), task.id.to_string().cyan(), task.title)]
                }
                _ => vec![format!("{} Title is empty, nothing added", "!".yellow())],
            }
        }

        Command::List { filter } => {
            let tasks = store.query(filter);
            if tasks.is_empty() {
                vec!["No tasks found".to_string()]
            } else {
                tasks.into_iter().map(|task| render_task(task, now)).collect()
            }
        }

        Command::Done { id } => {
            store.toggle_completed(id)?;
            vec![report(store, id, |task| {
                String::from(if task.completed { "completed" } else { "pending" })
            })]
        }

        Command::Star { id } => {
            store.toggle_important(id)?;
            vec![report(store, id, |task| {
                String::from(if task.important { "important" } else { "not important" })
            })]
        }

        Command::Edit {
            id,
            title,
            description,
            deadline,
        } => {
            if title.trim().is_empty() {
                vec![format!("{} Title is empty, nothing changed", "!".yellow())]
            } else {
                store.edit(id, &title, description.as_deref(), &deadline)?;
                vec![report(store, id, |task| format!("titled {}", task.title))]
            }
        }

        Command::Delete { id } => {
            let existed = store.get(id).is_some();
            store.delete(id)?;
            if existed {
                vec![format!("{} Deleted {}", "✓".green(), id.to_string().cyan())]
            } else {
                vec![missing(id)]
            }
        }
    };

    Ok(lines)
}

fn report<S, F>(store: &TaskStore<S>, id: i64, describe: F) -> String
where
    S: KeyValueStore,
    F: Fn(&Task) -> String,
{
    match store.get(id) {
        Some(task) => format!("{} {} is now {}", "✓".green(), id.to_string().cyan(), describe(task)),
        None => missing(id),
    }
}

fn missing(id: i64) -> String {
    format!("{} No task with id {}", "!".yellow(), id)
}

fn main() -> Result<()> {
    setup_logging();

    let cli = Cli::parse();
    run(cli)
}
