#![forbid(unsafe_code)]

pub mod app_services;
pub mod error;
pub mod sync;
pub mod tracker;

pub use thesis_core::Clock;

pub use app_services::AppServices;
pub use error::{AppServicesError, SyncError};
pub use sync::{FileSync, ImportOutcome, SyncService, default_backup_file_name};
pub use tracker::Tracker;
