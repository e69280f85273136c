use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::model::ids::TaskId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum TaskError {
    #[error("task text cannot be empty")]
    EmptyText,
}

//
// ─── PRIORITY ──────────────────────────────────────────────────────────────────
//

/// Urgency bucket for a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Low => "low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//
// ─── TASK ──────────────────────────────────────────────────────────────────────
//

/// A standalone to-do item with a priority and an optional deadline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub(crate) id: TaskId,
    pub(crate) text: String,
    pub(crate) priority: Priority,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) deadline: Option<NaiveDate>,
    pub(crate) done: bool,
}

impl Task {
    /// Creates a new open task, drawing its id from the creation instant.
    ///
    /// # Errors
    ///
    /// Returns `TaskError::EmptyText` if the text is empty or whitespace-only.
    pub fn new(
        text: impl Into<String>,
        priority: Priority,
        deadline: Option<NaiveDate>,
        now: DateTime<Utc>,
    ) -> Result<Self, TaskError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(TaskError::EmptyText);
        }

        Ok(Self {
            id: TaskId::generate(now),
            text: text.trim().to_owned(),
            priority,
            deadline,
            done: false,
        })
    }

    // Accessors
    #[must_use]
    pub fn id(&self) -> TaskId {
        self.id
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn priority(&self) -> Priority {
        self.priority
    }

    #[must_use]
    pub fn deadline(&self) -> Option<NaiveDate> {
        self.deadline
    }

    #[must_use]
    pub fn is_done(&self) -> bool {
        self.done
    }

    /// Flips the completion flag.
    pub fn toggle(&mut self) {
        self.done = !self.done;
    }
}

/// Orders tasks for display: open tasks first, finished ones after, each
/// group keeping insertion order.
#[must_use]
pub fn ordered_for_display(tasks: &[Task]) -> Vec<&Task> {
    let open = tasks.iter().filter(|task| !task.done);
    let finished = tasks.iter().filter(|task| task.done);
    open.chain(finished).collect()
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    #[test]
    fn task_new_rejects_blank_text() {
        let err = Task::new("   ", Priority::High, None, fixed_now()).unwrap_err();
        assert_eq!(err, TaskError::EmptyText);
    }

    #[test]
    fn task_new_trims_text_and_stamps_id() {
        let task = Task::new("  write abstract  ", Priority::High, None, fixed_now()).unwrap();
        assert_eq!(task.text(), "write abstract");
        assert_eq!(task.id(), TaskId::new(1_700_000_000_000));
        assert!(!task.is_done());
    }

    #[test]
    fn toggle_flips_completion() {
        let mut task = Task::new("submit draft", Priority::Medium, None, fixed_now()).unwrap();
        task.toggle();
        assert!(task.is_done());
        task.toggle();
        assert!(!task.is_done());
    }

    #[test]
    fn display_order_puts_open_tasks_first_and_is_stable() {
        let mut tasks = vec![
            Task::new("a", Priority::High, None, fixed_now()).unwrap(),
            Task::new("b", Priority::Medium, None, fixed_now()).unwrap(),
            Task::new("c", Priority::Low, None, fixed_now()).unwrap(),
            Task::new("d", Priority::Low, None, fixed_now()).unwrap(),
        ];
        tasks[0].toggle();
        tasks[2].toggle();

        let ordered: Vec<&str> = ordered_for_display(&tasks)
            .into_iter()
            .map(Task::text)
            .collect();
        assert_eq!(ordered, vec!["b", "d", "a", "c"]);
    }

    #[test]
    fn priority_serializes_lowercase() {
        assert_eq!(Priority::High.as_str(), "high");
        assert_eq!(Priority::default(), Priority::Medium);
    }
}
