//! The single application state container and its reducer.
//!
//! All mutation funnels through [`apply`]: it takes the current state plus
//! one [`Intent`] and returns the next state. Invalid intents (unknown ids,
//! blank titles, session conflicts) return the state unchanged rather than
//! failing, so a caller can fire user input at the reducer as-is.

use chrono::{DateTime, NaiveDate, Utc};

use crate::edit::{EditMode, EditOp, EditSession};
use crate::model::{
    Chapter, ChapterId, Priority, Project, ProjectId, Section, Task, TaskId,
};
use crate::progress::{build_revision_template, count_completed_units, count_total_units};

//
// ─── SESSIONS ──────────────────────────────────────────────────────────────────
//

/// An open editing pass over one chapter's writing or revision checklist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterSession {
    pub(crate) chapter: ChapterId,
    pub(crate) mode: EditMode,
    pub(crate) edit: EditSession,
}

impl ChapterSession {
    #[must_use]
    pub fn chapter_id(&self) -> &ChapterId {
        &self.chapter
    }

    #[must_use]
    pub fn mode(&self) -> EditMode {
        self.mode
    }

    #[must_use]
    pub fn edit(&self) -> &EditSession {
        &self.edit
    }
}

/// An open editing pass over one project's checklist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectSession {
    pub(crate) project: ProjectId,
    pub(crate) edit: EditSession,
}

impl ProjectSession {
    #[must_use]
    pub fn project_id(&self) -> &ProjectId {
        &self.project
    }

    #[must_use]
    pub fn edit(&self) -> &EditSession {
        &self.edit
    }
}

//
// ─── STATE ─────────────────────────────────────────────────────────────────────
//

/// Everything the tracker knows: the three collections plus at most one
/// open session per entity kind.
///
/// Sessions are transient; only the collections are ever persisted.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    pub(crate) chapters: Vec<Chapter>,
    pub(crate) tasks: Vec<Task>,
    pub(crate) projects: Vec<Project>,
    pub(crate) chapter_session: Option<ChapterSession>,
    pub(crate) project_session: Option<ProjectSession>,
}

impl AppState {
    /// Builds a state from loaded collections, with no open sessions.
    #[must_use]
    pub fn new(chapters: Vec<Chapter>, tasks: Vec<Task>, projects: Vec<Project>) -> Self {
        Self {
            chapters,
            tasks,
            projects,
            chapter_session: None,
            project_session: None,
        }
    }

    // Accessors
    #[must_use]
    pub fn chapters(&self) -> &[Chapter] {
        &self.chapters
    }

    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    #[must_use]
    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    #[must_use]
    pub fn chapter_session(&self) -> Option<&ChapterSession> {
        self.chapter_session.as_ref()
    }

    #[must_use]
    pub fn project_session(&self) -> Option<&ProjectSession> {
        self.project_session.as_ref()
    }

    /// Rounded mean of the chapters' cached progress; 0 with no chapters.
    #[must_use]
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn overall_progress(&self) -> u8 {
        if self.chapters.is_empty() {
            return 0;
        }
        let sum: f64 = self.chapters.iter().map(|c| f64::from(c.progress())).sum();
        (sum / self.chapters.len() as f64).round() as u8
    }

    /// Leaf units across all chapters' writing checklists.
    #[must_use]
    pub fn total_units(&self) -> usize {
        self.chapters
            .iter()
            .map(|c| count_total_units(c.sections()))
            .sum()
    }

    #[must_use]
    pub fn completed_units(&self) -> usize {
        self.chapters
            .iter()
            .map(|c| count_completed_units(c.sections()))
            .sum()
    }

    #[must_use]
    pub fn pending_tasks(&self) -> usize {
        self.tasks.iter().filter(|t| !t.is_done()).count()
    }
}

//
// ─── INTENTS ───────────────────────────────────────────────────────────────────
//

/// The collection an intent rewrites in committed state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Chapters,
    Tasks,
    Projects,
}

/// One user action against the state.
#[derive(Debug, Clone)]
pub enum Intent {
    AddTask { text: String, priority: Priority, deadline: Option<NaiveDate> },
    ToggleTask(TaskId),
    DeleteTask(TaskId),
    AddChapter { title: String, file: Option<String>, notes: Option<String> },
    DeleteChapter(ChapterId),
    BeginChapterEdit { id: ChapterId, mode: EditMode },
    EditChapter(EditOp),
    CommitChapterEdit,
    DiscardChapterEdit,
    AddProject { title: String, notes: Option<String> },
    DeleteProject(ProjectId),
    BeginProjectEdit(ProjectId),
    EditProject(EditOp),
    CommitProjectEdit,
    DiscardProjectEdit,
}

impl Intent {
    /// Which collection this intent touches once applied, if any.
    ///
    /// Session intents (begin, edit, discard) never touch committed state
    /// and so never need persisting.
    #[must_use]
    pub fn committed_collection(&self) -> Option<Collection> {
        match self {
            Intent::AddTask { .. } | Intent::ToggleTask(_) | Intent::DeleteTask(_) => {
                Some(Collection::Tasks)
            }
            Intent::AddChapter { .. } | Intent::DeleteChapter(_) | Intent::CommitChapterEdit => {
                Some(Collection::Chapters)
            }
            Intent::AddProject { .. } | Intent::DeleteProject(_) | Intent::CommitProjectEdit => {
                Some(Collection::Projects)
            }
            Intent::BeginChapterEdit { .. }
            | Intent::EditChapter(_)
            | Intent::DiscardChapterEdit
            | Intent::BeginProjectEdit(_)
            | Intent::EditProject(_)
            | Intent::DiscardProjectEdit => None,
        }
    }
}

//
// ─── REDUCER ───────────────────────────────────────────────────────────────────
//

/// Applies one intent to the state and returns the new state.
///
/// `now` feeds id generation, keeping the reducer deterministic under a
/// fixed clock.
#[must_use]
pub fn apply(mut state: AppState, intent: Intent, now: DateTime<Utc>) -> AppState {
    match intent {
        Intent::AddTask { text, priority, deadline } => {
            if let Ok(task) = Task::new(text, priority, deadline, now) {
                state.tasks.push(task);
            }
        }
        Intent::ToggleTask(id) => {
            if let Some(task) = state.tasks.iter_mut().find(|t| t.id() == id) {
                task.toggle();
            }
        }
        Intent::DeleteTask(id) => state.tasks.retain(|t| t.id() != id),

        Intent::AddChapter { title, file, notes } => {
            if let Ok(chapter) = Chapter::new(title, file, notes, now) {
                state.chapters.push(chapter);
            }
        }
        Intent::DeleteChapter(id) => {
            state.chapters.retain(|c| c.id() != &id);
            if state.chapter_session.as_ref().is_some_and(|s| s.chapter == id) {
                state.chapter_session = None;
            }
        }
        Intent::BeginChapterEdit { id, mode } => begin_chapter_edit(&mut state, &id, mode),
        Intent::EditChapter(op) => {
            if let Some(session) = state.chapter_session.as_mut() {
                session.edit.apply(op);
            }
        }
        Intent::CommitChapterEdit => commit_chapter_edit(&mut state),
        Intent::DiscardChapterEdit => state.chapter_session = None,

        Intent::AddProject { title, notes } => {
            if let Ok(project) = Project::new(title, notes, now) {
                state.projects.push(project);
            }
        }
        Intent::DeleteProject(id) => {
            state.projects.retain(|p| p.id() != &id);
            if state.project_session.as_ref().is_some_and(|s| s.project == id) {
                state.project_session = None;
            }
        }
        Intent::BeginProjectEdit(id) => begin_project_edit(&mut state, &id),
        Intent::EditProject(op) => {
            if let Some(session) = state.project_session.as_mut() {
                session.edit.apply(op);
            }
        }
        Intent::CommitProjectEdit => commit_project_edit(&mut state),
        Intent::DiscardProjectEdit => state.project_session = None,
    }
    state
}

/// Opens a chapter session, unless a session for a different chapter is
/// already open. Re-opening the same chapter replaces the scratch copy.
fn begin_chapter_edit(state: &mut AppState, id: &ChapterId, mode: EditMode) {
    if state.chapter_session.as_ref().is_some_and(|s| &s.chapter != id) {
        return;
    }
    let Some(chapter) = state.chapters.iter().find(|c| c.id() == id) else {
        return;
    };

    let sections = match mode {
        EditMode::Writing => chapter.sections().to_vec(),
        // the saved checklist if one exists, otherwise a cleared copy of
        // the writing structure
        EditMode::Revision => chapter
            .revision()
            .map(<[Section]>::to_vec)
            .unwrap_or_else(|| build_revision_template(chapter.sections())),
    };
    let notes = chapter.notes().map(str::to_owned);

    state.chapter_session = Some(ChapterSession {
        chapter: id.clone(),
        mode,
        edit: EditSession::new(sections, notes),
    });
}

fn commit_chapter_edit(state: &mut AppState) {
    let Some(session) = state.chapter_session.take() else {
        return;
    };
    let Some(chapter) = state.chapters.iter_mut().find(|c| c.id() == &session.chapter) else {
        return;
    };

    let (sections, notes) = session.edit.into_parts();
    match session.mode {
        EditMode::Writing => chapter.commit_writing(sections, notes),
        EditMode::Revision => chapter.commit_revision(sections, notes),
    }
}

/// Opens a project session, unless a session for a different project is
/// already open. Chapter and project sessions may coexist.
fn begin_project_edit(state: &mut AppState, id: &ProjectId) {
    if state.project_session.as_ref().is_some_and(|s| &s.project != id) {
        return;
    }
    let Some(project) = state.projects.iter().find(|p| p.id() == id) else {
        return;
    };

    state.project_session = Some(ProjectSession {
        project: id.clone(),
        edit: EditSession::new(
            project.sections().to_vec(),
            project.notes().map(str::to_owned),
        ),
    });
}

fn commit_project_edit(state: &mut AppState) {
    let Some(session) = state.project_session.take() else {
        return;
    };
    let Some(project) = state.projects.iter_mut().find(|p| p.id() == &session.project) else {
        return;
    };

    let (sections, notes) = session.edit.into_parts();
    project.commit_edit(sections, notes);
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Status;
    use crate::time::fixed_now;

    fn step(state: AppState, intent: Intent) -> AppState {
        apply(state, intent, fixed_now())
    }

    fn add_task(state: AppState, text: &str) -> AppState {
        let intent = Intent::AddTask {
            text: text.into(),
            priority: Priority::High,
            deadline: None,
        };
        step(state, intent)
    }

    fn with_chapter(title: &str) -> (AppState, ChapterId) {
        let intent = Intent::AddChapter { title: title.into(), file: None, notes: None };
        let state = step(AppState::default(), intent);
        let id = state.chapters()[0].id().clone();
        (state, id)
    }

    fn begin(state: AppState, id: &ChapterId, mode: EditMode) -> AppState {
        step(state, Intent::BeginChapterEdit { id: id.clone(), mode })
    }

    fn toggle_section(state: AppState, section: usize) -> AppState {
        step(state, Intent::EditChapter(EditOp::ToggleSection { section }))
    }

    #[test]
    fn add_task_appends_and_blank_text_is_ignored() {
        let state = add_task(AppState::default(), "email advisor");
        assert_eq!(state.tasks().len(), 1);

        let state = add_task(state, "   ");
        assert_eq!(state.tasks().len(), 1);
    }

    #[test]
    fn toggle_and_delete_task() {
        let state = add_task(AppState::default(), "email advisor");
        let id = state.tasks()[0].id();

        let state = step(state, Intent::ToggleTask(id));
        assert!(state.tasks()[0].is_done());

        let state = step(state, Intent::DeleteTask(id));
        assert!(state.tasks().is_empty());
    }

    #[test]
    fn add_chapter_ignores_blank_title() {
        let intent = Intent::AddChapter { title: "  ".into(), file: None, notes: None };
        let state = step(AppState::default(), intent);
        assert!(state.chapters().is_empty());
    }

    #[test]
    fn writing_edit_flow_recomputes_on_commit_only() {
        let (state, id) = with_chapter("Methodology");

        let state = begin(state, &id, EditMode::Writing);
        let state = toggle_section(state, 0);

        // scratch changed, committed chapter untouched
        assert!(state.chapter_session().is_some());
        assert!(!state.chapters()[0].sections()[0].is_done());
        assert_eq!(state.chapters()[0].progress(), 0);

        let state = step(state, Intent::CommitChapterEdit);
        assert!(state.chapter_session().is_none());
        assert!(state.chapters()[0].sections()[0].is_done());
        assert_eq!(state.chapters()[0].progress(), 100);
        assert_eq!(state.chapters()[0].status(), Status::Done);
    }

    #[test]
    fn revision_flow_starts_from_template_and_never_moves_progress() {
        let (state, id) = with_chapter("Methodology");

        // finish the single writing unit first
        let state = begin(state, &id, EditMode::Writing);
        let state = toggle_section(state, 0);
        let state = step(state, Intent::CommitChapterEdit);
        assert_eq!(state.chapters()[0].progress(), 100);
        assert_eq!(state.chapters()[0].revision(), None);

        // first revision pass starts from a cleared template
        let state = begin(state, &id, EditMode::Revision);
        {
            let session = state.chapter_session().unwrap();
            assert_eq!(session.mode(), EditMode::Revision);
            assert!(!session.edit().sections()[0].is_done());
        }

        let state = toggle_section(state, 0);
        let state = step(state, Intent::CommitChapterEdit);

        let chapter = &state.chapters()[0];
        assert!(chapter.revision().is_some_and(|r| r[0].is_done()));
        assert_eq!(chapter.progress(), 100);
        assert_eq!(chapter.status(), Status::Done);

        // a later revision pass resumes the saved checklist
        let state = begin(state, &id, EditMode::Revision);
        assert!(state.chapter_session().unwrap().edit().sections()[0].is_done());
    }

    #[test]
    fn begin_for_another_chapter_is_ignored_while_a_session_is_open() {
        let (state, first) = with_chapter("Methodology");
        let later = fixed_now() + chrono::Duration::seconds(1);
        let state = apply(
            state,
            Intent::AddChapter { title: "Results".into(), file: None, notes: None },
            later,
        );
        let second = state.chapters()[1].id().clone();

        let state = begin(state, &first, EditMode::Writing);
        let state = begin(state, &second, EditMode::Writing);

        assert_eq!(state.chapter_session().unwrap().chapter_id(), &first);
    }

    #[test]
    fn re_begin_on_same_chapter_replaces_the_scratch() {
        let (state, id) = with_chapter("Methodology");
        let state = begin(state, &id, EditMode::Writing);
        let state = step(state, Intent::EditChapter(EditOp::AddSection));
        assert_eq!(state.chapter_session().unwrap().edit().sections().len(), 2);

        let state = begin(state, &id, EditMode::Writing);
        assert_eq!(state.chapter_session().unwrap().edit().sections().len(), 1);
    }

    #[test]
    fn chapter_and_project_sessions_coexist() {
        let (state, chapter_id) = with_chapter("Methodology");
        let intent = Intent::AddProject { title: "Conference paper".into(), notes: None };
        let state = step(state, intent);
        let project_id = state.projects()[0].id().clone();

        let state = begin(state, &chapter_id, EditMode::Writing);
        let state = step(state, Intent::BeginProjectEdit(project_id));

        assert!(state.chapter_session().is_some());
        assert!(state.project_session().is_some());
    }

    #[test]
    fn discard_drops_scratch_without_committing() {
        let (state, id) = with_chapter("Methodology");
        let state = begin(state, &id, EditMode::Writing);
        let state = toggle_section(state, 0);
        let state = step(state, Intent::DiscardChapterEdit);

        assert!(state.chapter_session().is_none());
        assert_eq!(state.chapters()[0].progress(), 0);
    }

    #[test]
    fn deleting_a_chapter_discards_its_open_session() {
        let (state, id) = with_chapter("Methodology");
        let state = begin(state, &id, EditMode::Writing);
        let state = step(state, Intent::DeleteChapter(id));

        assert!(state.chapters().is_empty());
        assert!(state.chapter_session().is_none());
    }

    #[test]
    fn commit_and_edit_without_session_are_noops() {
        let (state, _) = with_chapter("Methodology");
        let before = state.clone();

        let state = step(state, Intent::CommitChapterEdit);
        let state = step(state, Intent::EditChapter(EditOp::AddSection));
        let state = step(state, Intent::CommitProjectEdit);

        assert_eq!(state, before);
    }

    #[test]
    fn project_edit_flow() {
        let intent = Intent::AddProject { title: "Conference paper".into(), notes: None };
        let state = step(AppState::default(), intent);
        let id = state.projects()[0].id().clone();

        let state = step(state, Intent::BeginProjectEdit(id.clone()));
        let state = step(state, Intent::EditProject(EditOp::ToggleSection { section: 0 }));
        let state = step(state, Intent::CommitProjectEdit);

        assert_eq!(state.projects()[0].progress(), 100);
        assert_eq!(state.projects()[0].status(), Status::Done);

        let state = step(state, Intent::DeleteProject(id));
        assert!(state.projects().is_empty());
    }

    #[test]
    fn committed_collection_maps_session_intents_to_none() {
        assert_eq!(
            Intent::CommitChapterEdit.committed_collection(),
            Some(Collection::Chapters)
        );
        assert_eq!(
            Intent::DeleteTask(TaskId::new(1)).committed_collection(),
            Some(Collection::Tasks)
        );
        assert_eq!(
            Intent::AddProject { title: "x".into(), notes: None }.committed_collection(),
            Some(Collection::Projects)
        );
        assert_eq!(Intent::DiscardChapterEdit.committed_collection(), None);
        assert_eq!(Intent::EditChapter(EditOp::AddSection).committed_collection(), None);
    }

    #[test]
    fn dashboard_stats() {
        assert_eq!(AppState::default().overall_progress(), 0);

        let (state, id) = with_chapter("Methodology");
        let later = fixed_now() + chrono::Duration::seconds(1);
        let state = apply(
            state,
            Intent::AddChapter { title: "Results".into(), file: None, notes: None },
            later,
        );

        let state = begin(state, &id, EditMode::Writing);
        let state = toggle_section(state, 0);
        let state = step(state, Intent::CommitChapterEdit);

        // one chapter at 100, one at 0
        assert_eq!(state.overall_progress(), 50);
        assert_eq!(state.total_units(), 2);
        assert_eq!(state.completed_units(), 1);

        let state = add_task(state, "submit draft");
        assert_eq!(state.pending_tasks(), 1);
    }
}
