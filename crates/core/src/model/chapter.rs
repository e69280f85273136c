use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::model::ids::ChapterId;
use crate::model::section::{DEFAULT_SECTION_NAME, Section, normalize_notes};
use crate::progress::{derive_progress, derive_status};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ChapterError {
    #[error("chapter title cannot be empty")]
    EmptyTitle,
}

//
// ─── STATUS ────────────────────────────────────────────────────────────────────
//

/// Coarse completion state derived from progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    #[default]
    NotStarted,
    InProgress,
    Done,
}

impl Status {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::NotStarted => "not-started",
            Status::InProgress => "in-progress",
            Status::Done => "done",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//
// ─── CHAPTER ───────────────────────────────────────────────────────────────────
//

/// A thesis chapter: a writing checklist, an optional revision checklist,
/// and cached progress over the writing units.
///
/// `progress` and `status` are recomputed on every writing commit and only
/// then; the revision checklist never feeds into them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    pub(crate) id: ChapterId,
    pub(crate) title: String,
    pub(crate) file: String,
    pub(crate) status: Status,
    pub(crate) progress: u8,
    pub(crate) sections: Vec<Section>,
    #[serde(default)]
    pub(crate) revision: Option<Vec<Section>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) notes: Option<String>,
}

impl Chapter {
    /// Creates a chapter with one default section and no revision checklist.
    ///
    /// The id is a slug of the title plus the creation instant; when no file
    /// name is given, `<id>.tex` is used.
    ///
    /// # Errors
    ///
    /// Returns `ChapterError::EmptyTitle` if the title is empty or
    /// whitespace-only.
    pub fn new(
        title: impl Into<String>,
        file: Option<String>,
        notes: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<Self, ChapterError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(ChapterError::EmptyTitle);
        }
        let title = title.trim().to_owned();

        let id = ChapterId::generate(&title, now);
        let file = file
            .map(|f| f.trim().to_owned())
            .filter(|f| !f.is_empty())
            .unwrap_or_else(|| format!("{}.tex", id.as_str()));
        let notes = notes.as_deref().and_then(normalize_notes);

        Ok(Self {
            id,
            title,
            file,
            status: Status::NotStarted,
            progress: 0,
            sections: vec![Section::new(DEFAULT_SECTION_NAME)],
            revision: None,
            notes,
        })
    }

    // Accessors
    #[must_use]
    pub fn id(&self) -> &ChapterId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn file(&self) -> &str {
        &self.file
    }

    #[must_use]
    pub fn status(&self) -> Status {
        self.status
    }

    /// Cached writing progress, 0..=100.
    #[must_use]
    pub fn progress(&self) -> u8 {
        self.progress
    }

    #[must_use]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// The revision checklist, absent until the first revision commit.
    #[must_use]
    pub fn revision(&self) -> Option<&[Section]> {
        self.revision.as_deref()
    }

    #[must_use]
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    /// Replaces the writing checklist and notes, recomputing the cached
    /// progress and status from the new sections.
    pub fn commit_writing(&mut self, sections: Vec<Section>, notes: Option<String>) {
        self.progress = derive_progress(&sections);
        self.status = derive_status(self.progress);
        self.sections = sections;
        self.notes = notes;
    }

    /// Replaces the revision checklist and notes.
    ///
    /// Progress, status and the writing sections are left untouched.
    pub fn commit_revision(&mut self, sections: Vec<Section>, notes: Option<String>) {
        self.revision = Some(sections);
        self.notes = notes;
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
