use serde::{Deserialize, Serialize};

/// Name given to units created without an explicit title.
pub const DEFAULT_SECTION_NAME: &str = "New section";
pub const DEFAULT_SUBSECTION_NAME: &str = "New subsection";

//
// ─── SUBSECTION ────────────────────────────────────────────────────────────────
//

/// A leaf unit nested under a section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subsection {
    pub(crate) name: String,
    pub(crate) done: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) notes: Option<String>,
}

impl Subsection {
    /// Creates an unfinished subsection with no notes.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            done: false,
            notes: None,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn is_done(&self) -> bool {
        self.done
    }

    #[must_use]
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub fn set_done(&mut self, done: bool) {
        self.done = done;
    }

    /// Replaces the notes; blank text clears them.
    pub fn set_notes(&mut self, notes: &str) {
        self.notes = normalize_notes(notes);
    }
}

//
// ─── SECTION ───────────────────────────────────────────────────────────────────
//

/// A chapter (or project) checklist entry.
///
/// A section with subsections is a container: its `done` flag is derived
/// from the children and the children are the countable units. A section
/// with an empty subsection list is itself a leaf unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub(crate) name: String,
    pub(crate) done: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) notes: Option<String>,
    #[serde(default)]
    pub(crate) subsections: Vec<Subsection>,
}

impl Section {
    /// Creates an unfinished leaf section with no notes.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            done: false,
            notes: None,
            subsections: Vec::new(),
        }
    }

    /// Creates a section holding the given subsections.
    ///
    /// The section's own flag reflects the children: true only when every
    /// subsection is already done (and there is at least one).
    #[must_use]
    pub fn with_subsections(name: impl Into<String>, subsections: Vec<Subsection>) -> Self {
        let done = !subsections.is_empty() && subsections.iter().all(Subsection::is_done);
        Self {
            name: name.into(),
            done,
            notes: None,
            subsections,
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn is_done(&self) -> bool {
        self.done
    }

    #[must_use]
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    #[must_use]
    pub fn subsections(&self) -> &[Subsection] {
        &self.subsections
    }

    /// True when this section carries subsections and so counts through them.
    #[must_use]
    pub fn is_container(&self) -> bool {
        !self.subsections.is_empty()
    }

    /// Sets the completion flag, cascading to every subsection.
    pub fn set_done(&mut self, done: bool) {
        self.done = done;
        for sub in &mut self.subsections {
            sub.done = done;
        }
    }

    /// Replaces the notes; blank text clears them.
    pub fn set_notes(&mut self, notes: &str) {
        self.notes = normalize_notes(notes);
    }

    /// Recomputes a container's flag as the AND of its children.
    ///
    /// Leaves keep their own flag.
    pub(crate) fn refresh_done(&mut self) {
        if self.is_container() {
            self.done = self.subsections.iter().all(|sub| sub.done);
        }
    }
}

/// Trims note text and maps blank input to `None`.
pub(crate) fn normalize_notes(notes: &str) -> Option<String> {
    let trimmed = notes.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_owned())
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
