// Task collection with filtering, ordering and persistence

use crate::deadline;
use crate::filter::{Filter, display_order};
use crate::models::{Clock, SystemClock, Task};
use crate::storage::{KeyValueStore, validate_key};
use chrono::{DateTime, Utc};
use eyre::{Context, Result, eyre};
use tracing::{debug, info, warn};

/// Key the collection is stored under unless told otherwise
pub const DEFAULT_KEY: &str = "tasks";

/// Owns the task collection and writes it through to a [`KeyValueStore`]
///
/// Invalid input (blank title, unknown id) is a silent no-op. Only storage
/// failures surface as errors.
pub struct TaskStore<S: KeyValueStore> {
    storage: S,
    key: String,
    tasks: Vec<Task>,
    clock: Box<dyn Clock>,
}

impl<S: KeyValueStore> TaskStore<S> {
    /// Load the collection stored under [`DEFAULT_KEY`]
    pub fn open(storage: S) -> Result<Self> {
        Self::open_with_key(storage, DEFAULT_KEY)
    }

    /// Load the collection stored under `key`
    ///
    /// A missing key starts an empty collection. Stored text that does not
    /// parse is an error, so a later write never clobbers it.
    pub fn open_with_key(storage: S, key: &str) -> Result<Self> {
        validate_key(key)?;

        let tasks: Vec<Task> = match storage.get(key)? {
            Some(raw) if !raw.trim().is_empty() => {
                serde_json::from_str(&raw).with_context(|| format!("Failed to parse stored tasks under key {}", key))?
            }
            _ => Vec::new(),
        };

        info!(key, count = tasks.len(), "Loaded tasks");

        Ok(Self {
            storage,
            key: key.to_string(),
            tasks,
            clock: Box::new(SystemClock),
        })
    }

    /// Replace the clock that stamps new ids and `createdAt`
    pub fn with_clock<C: Clock + 'static>(mut self, clock: C) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// All tasks in insertion order
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: i64) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Append a new task
    ///
    /// Does nothing when `title` is blank. An unparsable `deadline_input`
    /// leaves the task without a deadline.
    pub fn add(&mut self, title: &str, description: &str, deadline_input: &str) -> Result<()> {
        if title.trim().is_empty() {
            debug!("add: blank title, ignoring");
            return Ok(());
        }

        let now = self.clock.now();
        let task = Task::new(
            self.next_id(now)?,
            title,
            description,
            resolve_deadline(deadline_input),
            now,
        );
        debug!(id = task.id, "add: appending task");

        self.tasks.push(task);
        self.persist()
    }

    pub fn toggle_completed(&mut self, id: i64) -> Result<()> {
        let Some(task) = self.find_mut(id) else {
            debug!(id, "toggle_completed: no such task");
            return Ok(());
        };
        task.completed = !task.completed;
        self.persist()
    }

    pub fn toggle_important(&mut self, id: i64) -> Result<()> {
        let Some(task) = self.find_mut(id) else {
            debug!(id, "toggle_important: no such task");
            return Ok(());
        };
        task.important = !task.important;
        self.persist()
    }

    pub fn delete(&mut self, id: i64) -> Result<()> {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.id != id);

        if self.tasks.len() == before {
            debug!(id, "delete: no such task");
            return Ok(());
        }
        self.persist()
    }

    /// Rewrite title, description and deadline of an existing task
    ///
    /// Nothing changes when `new_title` is blank or `id` is unknown. The
    /// deadline is cleared unless `new_deadline_input` parses.
    pub fn edit(
        &mut self,
        id: i64,
        new_title: &str,
        new_description: Option<&str>,
        new_deadline_input: &str,
    ) -> Result<()> {
        if new_title.trim().is_empty() {
            debug!(id, "edit: blank title, ignoring");
            return Ok(());
        }

        let Some(task) = self.find_mut(id) else {
            debug!(id, "edit: no such task");
            return Ok(());
        };
        task.title = new_title.to_string();
        task.description = new_description.unwrap_or_default().to_string();
        task.deadline = resolve_deadline(new_deadline_input);

        self.persist()
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// Tasks passing `filter`, important first, then newest first
    pub fn query(&self, filter: Filter) -> Vec<&Task> {
        let mut selected: Vec<&Task> = self.tasks.iter().filter(|task| filter.matches(task)).collect();
        selected.sort_by(|a, b| display_order(a, b));
        selected
    }

    // ========================================================================
    // Helper methods
    // ========================================================================

    fn find_mut(&mut self, id: i64) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|task| task.id == id)
    }

    /// Creation time in ms, bumped past the largest id already in use
    fn next_id(&self, now: DateTime<Utc>) -> Result<i64> {
        let candidate = now.timestamp_millis();
        match self.tasks.iter().map(|task| task.id).max() {
            Some(max) if max >= candidate => max
                .checked_add(1)
                .ok_or_else(|| eyre!("No task id left after {} in key {}", max, self.key)),
            _ => Ok(candidate),
        }
    }

    fn persist(&mut self) -> Result<()> {
        let json = serde_json::to_string(&self.tasks).context("Failed to serialize tasks")?;
        self.storage
            .set(&self.key, &json)
            .with_context(|| format!("Failed to persist tasks under key {}", self.key))?;
        debug!(key = %self.key, count = self.tasks.len(), "Persisted tasks");
        Ok(())
    }
}

fn resolve_deadline(input: &str) -> Option<DateTime<Utc>> {
    match deadline::parse_deadline(input) {
        Ok(deadline) => deadline,
        Err(e) => {
            warn!(input, error = %e, "Ignoring unparsable deadline");
            None
        }
    }
}
