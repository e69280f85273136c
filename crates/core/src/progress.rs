//! Pure completion math over section trees.
//!
//! The countable unit is a subsection where the parent section has any,
//! otherwise the section itself. A section that gains subsections stops
//! counting on its own and counts through its children instead.

use crate::model::{Section, Status, Subsection};

/// Counts the leaf units in a section tree.
#[must_use]
pub fn count_total_units(sections: &[Section]) -> usize {
    sections
        .iter()
        .map(|section| {
            if section.is_container() {
                section.subsections().len()
            } else {
                1
            }
        })
        .sum()
}

/// Counts the completed leaf units in a section tree.
#[must_use]
pub fn count_completed_units(sections: &[Section]) -> usize {
    sections
        .iter()
        .map(|section| {
            if section.is_container() {
                section
                    .subsections()
                    .iter()
                    .filter(|sub| sub.is_done())
                    .count()
            } else {
                usize::from(section.is_done())
            }
        })
        .sum()
}

/// Percentage of completed units, rounded to the nearest integer.
///
/// An empty tree is 0, never a division error.
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn derive_progress(sections: &[Section]) -> u8 {
    let total = count_total_units(sections);
    if total == 0 {
        return 0;
    }
    let completed = count_completed_units(sections);
    ((completed as f64 / total as f64) * 100.0).round() as u8
}

/// Maps a progress percentage onto the coarse status.
#[must_use]
pub fn derive_status(progress: u8) -> Status {
    match progress {
        100 => Status::Done,
        0 => Status::NotStarted,
        _ => Status::InProgress,
    }
}

/// Clones a section tree into a fresh revision checklist: same names and
/// nesting, every flag cleared, every note dropped.
#[must_use]
pub fn build_revision_template(sections: &[Section]) -> Vec<Section> {
    sections
        .iter()
        .map(|section| {
            let subsections = section
                .subsections()
                .iter()
                .map(|sub| Subsection::new(sub.name()))
                .collect();
            Section::with_subsections(section.name(), subsections)
        })
        .collect()
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
