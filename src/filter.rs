// Task filtering and display ordering

use crate::models::Task;
use clap::ValueEnum;
use std::cmp::Ordering;

/// Named predicate selecting which tasks a query returns
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Filter {
    /// Every task
    #[default]
    All,
    /// Tasks marked done
    Completed,
    /// Tasks still open
    Pending,
}

impl Filter {
    pub const ALL: [Filter; 3] = [Filter::All, Filter::Completed, Filter::Pending];

    pub fn matches(self, task: &Task) -> bool {
        match self {
            Filter::All => true,
            Filter::Completed => task.completed,
            Filter::Pending => !task.completed,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Filter::All => "all",
            Filter::Completed => "completed",
            Filter::Pending => "pending",
        }
    }
}

impl std::fmt::Display for Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Display order: important first, then most recently created first
pub fn display_order(a: &Task, b: &Task) -> Ordering {
    b.important
        .cmp(&a.important)
        .then_with(|| b.created_at.cmp(&a.created_at))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn task(id: i64, minute: u32, important: bool, completed: bool) -> Task {
        let mut task = Task::new(
            id,
            format!("task {}", id),
            "",
            None,
            Utc.with_ymd_and_hms(2024, 3, 1, 12, minute, 0).unwrap(),
        );
        task.important = important;
        task.completed = completed;
        task
    }

    #[test]
    fn test_filter_matches() {
        let done = task(1, 0, false, true);
        let open = task(2, 0, false, false);

        assert!(Filter::All.matches(&done));
        assert!(Filter::All.matches(&open));
        assert!(Filter::Completed.matches(&done));
        assert!(!Filter::Completed.matches(&open));
        assert!(Filter::Pending.matches(&open));
        assert!(!Filter::Pending.matches(&done));
    }

    #[test]
    fn test_filter_default_is_all() {
        assert_eq!(Filter::default(), Filter::All);
    }

    #[test]
    fn test_filter_parse() {
        assert_eq!(Filter::from_str("all", false).unwrap(), Filter::All);
        assert_eq!(Filter::from_str("Completed", true).unwrap(), Filter::Completed);
        assert_eq!(Filter::from_str("pending", false).unwrap(), Filter::Pending);
        assert!(Filter::from_str("done", true).is_err());
    }

    #[test]
    fn test_filter_display_matches_cli_name() {
        assert_eq!(Filter::value_variants(), Filter::ALL.as_slice());
        for filter in Filter::ALL {
            let name = filter.to_possible_value().unwrap();
            assert_eq!(name.get_name(), filter.to_string());
        }
    }

    #[test]
    fn test_display_order_important_first() {
        let old_important = task(1, 0, true, false);
        let new_plain = task(2, 30, false, false);
        assert_eq!(display_order(&old_important, &new_plain), Ordering::Less);
        assert_eq!(display_order(&new_plain, &old_important), Ordering::Greater);
    }

    #[test]
    fn test_display_order_newest_first_within_group() {
        let older = task(1, 0, false, false);
        let newer = task(2, 1, false, false);
        assert_eq!(display_order(&newer, &older), Ordering::Less);

        let same = task(3, 0, false, false);
        assert_eq!(display_order(&older, &same), Ordering::Equal);
    }
}
