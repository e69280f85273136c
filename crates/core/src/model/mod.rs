mod chapter;
mod ids;
mod project;
mod section;
mod snapshot;
mod task;

pub use chapter::{Chapter, ChapterError, Status};
pub use ids::{ChapterId, ProjectId, TaskId};
pub use project::{Project, ProjectError};
pub use section::{DEFAULT_SECTION_NAME, DEFAULT_SUBSECTION_NAME, Section, Subsection};
pub use snapshot::{PartialSnapshot, Snapshot};
pub use task::{Priority, Task, TaskError, ordered_for_display};

pub(crate) use section::normalize_notes;
