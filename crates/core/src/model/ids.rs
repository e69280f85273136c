use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a Chapter.
///
/// Chapter ids are URL-safe slugs derived from the title at creation time,
/// suffixed with the creation instant so twin titles stay distinct.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChapterId(String);

impl ChapterId {
    /// Creates a `ChapterId` from an existing slug.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Derives a fresh id from a chapter title and the creation instant.
    #[must_use]
    pub fn generate(title: &str, now: DateTime<Utc>) -> Self {
        Self(format!("{}-{}", slugify(title), now.timestamp_millis()))
    }

    /// Returns the underlying slug.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Unique identifier for a Project.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ProjectId(String);

impl ProjectId {
    /// Creates a `ProjectId` from an existing value.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Derives a fresh id from the creation instant.
    #[must_use]
    pub fn generate(now: DateTime<Utc>) -> Self {
        Self(format!("proj-{}", now.timestamp_millis()))
    }

    /// Returns the underlying value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Unique identifier for a Task.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TaskId(i64);

impl TaskId {
    /// Creates a new `TaskId`.
    #[must_use]
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Derives a fresh id from the creation instant (epoch milliseconds).
    #[must_use]
    pub fn generate(now: DateTime<Utc>) -> Self {
        Self(now.timestamp_millis())
    }

    /// Returns the underlying i64 value.
    #[must_use]
    pub fn value(&self) -> i64 {
        self.0
    }
}

/// Lowercases a title and keeps only `a-z`, `0-9` and `-`, collapsing
/// whitespace runs into single hyphens.
fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut in_gap = false;
    for ch in title.trim().to_lowercase().chars() {
        if ch.is_whitespace() {
            if !in_gap {
                slug.push('-');
            }
            in_gap = true;
        } else {
            in_gap = false;
            if ch.is_ascii_alphanumeric() || ch == '-' {
                slug.push(ch);
            }
        }
    }
    slug
}

impl fmt::Debug for ChapterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChapterId({})", self.0)
    }
}

impl fmt::Debug for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ProjectId({})", self.0)
    }
}

impl fmt::Debug for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TaskId({})", self.0)
    }
}

// ─── Display Implementations ───────────────────────────────────────────────────

impl fmt::Display for ChapterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ─── Tests ─────────────────────────────────────────────────────────────────────
