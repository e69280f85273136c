#![forbid(unsafe_code)]

pub mod edit;
pub mod model;
pub mod progress;
pub mod starter;
pub mod state;
pub mod time;

pub use time::Clock;

pub use edit::{EditMode, EditOp, EditSession};
pub use state::{AppState, ChapterSession, Collection, Intent, ProjectSession, apply};
