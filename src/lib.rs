// tasklist - Task collection with filtering, importance ordering and key-value persistence

pub mod config;
pub mod deadline;
pub mod display;
pub mod filter;
pub mod models;
pub mod storage;
pub mod store;

// Re-export main types for convenience
pub use config::Config;
pub use deadline::parse_deadline;
pub use display::{countdown, format_deadline, is_overdue};
pub use filter::Filter;
pub use models::{Clock, SystemClock, Task};
pub use storage::{FileStore, KeyValueStore, MemoryStore};
pub use store::{DEFAULT_KEY, TaskStore};
