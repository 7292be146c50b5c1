//! Shared test infrastructure for tasklist integration tests.
//!
//! Provides TestEnv helper for consistent test setup/teardown.

#![allow(dead_code)]

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use std::cell::Cell;
use std::rc::Rc;
use tasklist::{FileStore, Filter, Task, TaskStore};
use tempfile::TempDir;

/// Instant every TestEnv clock starts from.
pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap()
}

/// Test environment backed by a file store in a temp directory.
///
/// The store's clock advances one minute per task created, so creation
/// order is always distinguishable.
pub struct TestEnv {
    pub temp_dir: TempDir,
    pub store: TaskStore<FileStore>,
}

impl TestEnv {
    /// Create a new test environment with an empty store.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let store = open_store(&temp_dir);
        Self { temp_dir, store }
    }

    /// Reopen the store from disk, dropping in-memory state.
    pub fn reopen(&mut self) {
        self.store = open_store(&self.temp_dir);
    }

    /// Add a task with only a title and return its id.
    pub fn add(&mut self, title: &str) -> i64 {
        self.add_full(title, "", "")
    }

    /// Add a task and return its id.
    pub fn add_full(&mut self, title: &str, description: &str, deadline: &str) -> i64 {
        let before = self.store.len();
        self.store.add(title, description, deadline).expect("Failed to add task");
        assert_eq!(self.store.len(), before + 1, "Expected task {:?} to be added", title);
        self.store.tasks().last().expect("Store is empty").id
    }

    /// Add a task and mark it important.
    pub fn add_important(&mut self, title: &str) -> i64 {
        let id = self.add(title);
        self.store.toggle_important(id).expect("Failed to toggle important");
        id
    }

    /// Look up a task that must exist.
    pub fn task(&self, id: i64) -> &Task {
        self.store.get(id).expect("Task not found")
    }

    /// Titles of a query result, in order.
    pub fn titles(&self, filter: Filter) -> Vec<String> {
        self.store.query(filter).iter().map(|task| task.title.clone()).collect()
    }

    /// Raw JSON persisted on disk.
    pub fn raw(&self) -> String {
        std::fs::read_to_string(self.temp_dir.path().join("tasks.json")).expect("Failed to read tasks file")
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

fn open_store(temp_dir: &TempDir) -> TaskStore<FileStore> {
    let storage = FileStore::open(temp_dir.path()).expect("Failed to open file store");
    let store = TaskStore::open(storage).expect("Failed to open task store");

    // Continue after the newest persisted task so reopened stores keep ordering
    let start = store
        .tasks()
        .iter()
        .map(|task| task.created_at + TimeDelta::minutes(1))
        .max()
        .unwrap_or_else(epoch);
    let ticks = Rc::new(Cell::new(0i64));
    store.with_clock(move || {
        let n = ticks.get();
        ticks.set(n + 1);
        start + TimeDelta::minutes(n)
    })
}
