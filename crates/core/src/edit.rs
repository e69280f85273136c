//! Scratch copies for checklist editing.
//!
//! An [`EditSession`] owns a deep copy of an entity's section tree plus its
//! notes. Every operation rewrites the scratch only; nothing reaches the
//! committed entity until the session is committed. Index-based operations
//! silently ignore out-of-range indices, and subsections never move across
//! parent sections.

use crate::model::{
    DEFAULT_SECTION_NAME, DEFAULT_SUBSECTION_NAME, Section, Subsection, normalize_notes,
};

/// Which checklist a chapter session edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditMode {
    #[default]
    Writing,
    Revision,
}

/// A single edit applied to a session's scratch tree.
#[derive(Debug, Clone)]
pub enum EditOp {
    ToggleSection { section: usize },
    ToggleSubsection { section: usize, subsection: usize },
    AddSection,
    AddSubsection { section: usize },
    RemoveSection { section: usize },
    RemoveSubsection { section: usize, subsection: usize },
    RenameSection { section: usize, name: String },
    RenameSubsection { section: usize, subsection: usize, name: String },
    SetSectionNotes { section: usize, notes: String },
    SetSubsectionNotes { section: usize, subsection: usize, notes: String },
    SetNotes { notes: String },
    ReorderSections { from: usize, to: usize },
    ReorderSubsections { from_section: usize, from: usize, to_section: usize, to: usize },
}

/// Mutable scratch state for one editing pass over an entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    sections: Vec<Section>,
    notes: Option<String>,
}

impl EditSession {
    /// Opens a session over a deep copy of the given tree and notes.
    #[must_use]
    pub fn new(sections: Vec<Section>, notes: Option<String>) -> Self {
        Self { sections, notes }
    }

    #[must_use]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    #[must_use]
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }

    pub(crate) fn into_parts(self) -> (Vec<Section>, Option<String>) {
        (self.sections, self.notes)
    }

    /// Dispatches one edit onto the scratch tree.
    pub fn apply(&mut self, op: EditOp) {
        match op {
            EditOp::ToggleSection { section } => self.toggle_section(section),
            EditOp::ToggleSubsection { section, subsection } => {
                self.toggle_subsection(section, subsection);
            }
            EditOp::AddSection => self.add_section(),
            EditOp::AddSubsection { section } => self.add_subsection(section),
            EditOp::RemoveSection { section } => self.remove_section(section),
            EditOp::RemoveSubsection { section, subsection } => {
                self.remove_subsection(section, subsection);
            }
            EditOp::RenameSection { section, name } => self.rename_section(section, &name),
            EditOp::RenameSubsection { section, subsection, name } => {
                self.rename_subsection(section, subsection, &name);
            }
            EditOp::SetSectionNotes { section, notes } => self.set_section_notes(section, &notes),
            EditOp::SetSubsectionNotes { section, subsection, notes } => {
                self.set_subsection_notes(section, subsection, &notes);
            }
            EditOp::SetNotes { notes } => self.set_notes(&notes),
            EditOp::ReorderSections { from, to } => self.reorder_sections(from, to),
            EditOp::ReorderSubsections { from_section, from, to_section, to } => {
                self.reorder_subsections(from_section, from, to_section, to);
            }
        }
    }

    /// Flips a section and cascades the new flag to all its subsections.
    pub fn toggle_section(&mut self, section: usize) {
        let Some(target) = self.sections.get_mut(section) else {
            return;
        };
        let next = !target.is_done();
        target.set_done(next);
    }

    /// Flips one subsection and re-derives the parent flag as the AND of
    /// its children.
    pub fn toggle_subsection(&mut self, section: usize, subsection: usize) {
        let Some(parent) = self.sections.get_mut(section) else {
            return;
        };
        let Some(target) = parent.subsections.get_mut(subsection) else {
            return;
        };
        target.done = !target.done;
        parent.refresh_done();
    }

    /// Appends a default-named leaf section.
    pub fn add_section(&mut self) {
        self.sections.push(Section::new(DEFAULT_SECTION_NAME));
    }

    /// Appends a default-named subsection, turning the parent into a
    /// container if it was a leaf.
    pub fn add_subsection(&mut self, section: usize) {
        let Some(parent) = self.sections.get_mut(section) else {
            return;
        };
        parent.subsections.push(Subsection::new(DEFAULT_SUBSECTION_NAME));
        parent.refresh_done();
    }

    pub fn remove_section(&mut self, section: usize) {
        if section < self.sections.len() {
            self.sections.remove(section);
        }
    }

    /// Removes a subsection; the parent flag follows the remaining children.
    pub fn remove_subsection(&mut self, section: usize, subsection: usize) {
        let Some(parent) = self.sections.get_mut(section) else {
            return;
        };
        if subsection < parent.subsections.len() {
            parent.subsections.remove(subsection);
            parent.refresh_done();
        }
    }

    /// Renames a section; blank names are ignored.
    pub fn rename_section(&mut self, section: usize, name: &str) {
        let Some(target) = self.sections.get_mut(section) else {
            return;
        };
        let name = name.trim();
        if !name.is_empty() {
            target.name = name.to_owned();
        }
    }

    /// Renames a subsection; blank names are ignored.
    pub fn rename_subsection(&mut self, section: usize, subsection: usize, name: &str) {
        let Some(parent) = self.sections.get_mut(section) else {
            return;
        };
        let Some(target) = parent.subsections.get_mut(subsection) else {
            return;
        };
        let name = name.trim();
        if !name.is_empty() {
            target.name = name.to_owned();
        }
    }

    pub fn set_section_notes(&mut self, section: usize, notes: &str) {
        if let Some(target) = self.sections.get_mut(section) {
            target.set_notes(notes);
        }
    }

    pub fn set_subsection_notes(&mut self, section: usize, subsection: usize, notes: &str) {
        let Some(parent) = self.sections.get_mut(section) else {
            return;
        };
        if let Some(target) = parent.subsections.get_mut(subsection) {
            target.set_notes(notes);
        }
    }

    /// Replaces the entity-level notes; blank text clears them.
    pub fn set_notes(&mut self, notes: &str) {
        self.notes = normalize_notes(notes);
    }

    /// Moves a section from one position to another.
    pub fn reorder_sections(&mut self, from: usize, to: usize) {
        move_within(&mut self.sections, from, to);
    }

    /// Moves a subsection within its parent section.
    ///
    /// Moves across parents (`from_section != to_section`) are rejected.
    pub fn reorder_subsections(
        &mut self,
        from_section: usize,
        from: usize,
        to_section: usize,
        to: usize,
    ) {
        if from_section != to_section {
            return;
        }
        let Some(parent) = self.sections.get_mut(from_section) else {
            return;
        };
        move_within(&mut parent.subsections, from, to);
    }
}

/// Removes the item at `from` and reinserts it at `to`. Out-of-range
/// positions leave the list untouched.
fn move_within<T>(items: &mut Vec<T>, from: usize, to: usize) {
    if from >= items.len() || to >= items.len() {
        return;
    }
    let item = items.remove(from);
    items.insert(to, item);
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
