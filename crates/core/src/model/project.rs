use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::chapter::Status;
use crate::model::ids::ProjectId;
use crate::model::section::{DEFAULT_SECTION_NAME, Section, normalize_notes};
use crate::progress::{derive_progress, derive_status};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProjectError {
    #[error("project title cannot be empty")]
    EmptyTitle,
}

/// A freeform side project tracked with the same checklist mechanics as a
/// chapter, minus the source file and the revision pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub(crate) id: ProjectId,
    pub(crate) title: String,
    pub(crate) status: Status,
    pub(crate) progress: u8,
    pub(crate) sections: Vec<Section>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) notes: Option<String>,
}

impl Project {
    /// Creates a project with one default section.
    ///
    /// # Errors
    ///
    /// Returns `ProjectError::EmptyTitle` if the title is empty or
    /// whitespace-only.
    pub fn new(
        title: impl Into<String>,
        notes: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<Self, ProjectError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(ProjectError::EmptyTitle);
        }

        Ok(Self {
            id: ProjectId::generate(now),
            title: title.trim().to_owned(),
            status: Status::NotStarted,
            progress: 0,
            sections: vec![Section::new(DEFAULT_SECTION_NAME)],
            notes: notes.as_deref().and_then(normalize_notes),
        })
    }

    // Accessors
    #[must_use]
    pub fn id(&self) -> &ProjectId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn status(&self) -> Status {
        self.status
    }

    #[must_use]
    pub fn progress(&self) -> u8 {
        self.progress
    }

    #[must_use]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    #[must_use]
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    /// Replaces the checklist and notes, recomputing progress and status.
    pub fn commit_edit(&mut self, sections: Vec<Section>, notes: Option<String>) {
        self.progress = derive_progress(&sections);
        self.status = derive_status(self.progress);
        self.sections = sections;
        self.notes = notes;
    }
}
