use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::chapter::Chapter;
use crate::model::project::Project;
use crate::model::task::Task;

/// The full dataset as one exportable document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub chapters: Vec<Chapter>,
    pub tasks: Vec<Task>,
    pub projects: Vec<Project>,
    #[serde(rename = "exportedAt")]
    pub exported_at: DateTime<Utc>,
}

impl Snapshot {
    #[must_use]
    pub fn new(
        chapters: Vec<Chapter>,
        tasks: Vec<Task>,
        projects: Vec<Project>,
        exported_at: DateTime<Utc>,
    ) -> Self {
        Self {
            chapters,
            tasks,
            projects,
            exported_at,
        }
    }
}

/// An import document: any of the three collections may be absent, and
/// absent ones are left untouched on apply. Unknown keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PartialSnapshot {
    #[serde(default)]
    pub chapters: Option<Vec<Chapter>>,
    #[serde(default)]
    pub tasks: Option<Vec<Task>>,
    #[serde(default)]
    pub projects: Option<Vec<Project>>,
}

impl PartialSnapshot {
    /// True when the document carries none of the three collections.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chapters.is_none() && self.tasks.is_none() && self.projects.is_none()
    }
}
