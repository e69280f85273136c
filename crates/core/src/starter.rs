//! Built-in dataset for first runs, so the tracker opens on a populated
//! thesis skeleton instead of an empty screen.

use crate::model::{
    Chapter, ChapterId, Priority, Project, ProjectId, Section, Subsection, Task, TaskId,
};
use crate::progress::{derive_progress, derive_status};
use crate::state::AppState;

/// A ready-to-use thesis skeleton: five chapters in varying stages, a few
/// tasks and one side project.
#[must_use]
pub fn starter_state() -> AppState {
    AppState::new(starter_chapters(), starter_tasks(), starter_projects())
}

fn starter_chapters() -> Vec<Chapter> {
    vec![
        chapter(
            "introduction",
            "Introduction",
            vec![
                leaf("Context", true),
                leaf("Problem statement", true),
                container(
                    "Objectives",
                    vec![sub("General objective", true), sub("Specific objectives", true)],
                ),
                leaf("Thesis outline", false),
            ],
            Some(vec![
                leaf("Context", false),
                leaf("Problem statement", false),
                container(
                    "Objectives",
                    vec![sub("General objective", false), sub("Specific objectives", false)],
                ),
                leaf("Thesis outline", false),
            ]),
            Some("First full draft sent to the advisor"),
        ),
        chapter(
            "literature-review",
            "Literature review",
            vec![
                noted_leaf("Key concepts", true, "Definitions settled with the advisor"),
                container(
                    "Related work",
                    vec![sub("Taxonomy", true), sub("Comparative analysis", false)],
                ),
                leaf("State of the art", false),
            ],
            None,
            None,
        ),
        chapter(
            "methodology",
            "Methodology",
            vec![
                leaf("Research design", false),
                container(
                    "Data collection",
                    vec![sub("Instruments", false), sub("Procedures", false)],
                ),
                leaf("Validation strategy", false),
            ],
            None,
            None,
        ),
        chapter(
            "results",
            "Results",
            vec![
                leaf("Experimental setup", false),
                leaf("Findings", false),
                leaf("Discussion", false),
            ],
            None,
            None,
        ),
        chapter(
            "conclusion",
            "Conclusion",
            vec![leaf("Summary of contributions", false), leaf("Future work", false)],
            None,
            None,
        ),
    ]
}

fn starter_tasks() -> Vec<Task> {
    vec![
        task(1, "Send the introduction to the advisor", Priority::High, false),
        task(2, "Rebuild the bibliography file", Priority::Medium, true),
        task(3, "Check the formatting guidelines", Priority::Low, false),
    ]
}

fn starter_projects() -> Vec<Project> {
    vec![project(
        "proj-seminar",
        "Department seminar talk",
        vec![leaf("Slides", true), leaf("Rehearsal", false)],
        Some("Slot booked, date to confirm"),
    )]
}

fn sub(name: &str, done: bool) -> Subsection {
    Subsection {
        name: name.to_owned(),
        done,
        notes: None,
    }
}

fn leaf(name: &str, done: bool) -> Section {
    Section {
        name: name.to_owned(),
        done,
        notes: None,
        subsections: Vec::new(),
    }
}

fn noted_leaf(name: &str, done: bool, notes: &str) -> Section {
    Section {
        notes: Some(notes.to_owned()),
        ..leaf(name, done)
    }
}

fn container(name: &str, subsections: Vec<Subsection>) -> Section {
    Section::with_subsections(name, subsections)
}

/// Builds a chapter whose cached progress and status are derived from the
/// given sections, so the starter data can never disagree with the rules.
fn chapter(
    id: &str,
    title: &str,
    sections: Vec<Section>,
    revision: Option<Vec<Section>>,
    notes: Option<&str>,
) -> Chapter {
    let progress = derive_progress(&sections);
    Chapter {
        id: ChapterId::new(id),
        title: title.to_owned(),
        file: format!("{id}.tex"),
        status: derive_status(progress),
        progress,
        sections,
        revision,
        notes: notes.map(str::to_owned),
    }
}

fn project(id: &str, title: &str, sections: Vec<Section>, notes: Option<&str>) -> Project {
    let progress = derive_progress(&sections);
    Project {
        id: ProjectId::new(id),
        title: title.to_owned(),
        status: derive_status(progress),
        progress,
        sections,
        notes: notes.map(str::to_owned),
    }
}

fn task(id: i64, text: &str, priority: Priority, done: bool) -> Task {
    Task {
        id: TaskId::new(id),
        text: text.to_owned(),
        priority,
        deadline: None,
        done,
    }
}
