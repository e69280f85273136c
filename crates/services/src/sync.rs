//! Whole-dataset export and import.
//!
//! [`SyncService`] reads and writes the entire dataset as one snapshot
//! document, bypassing the per-collection dispatch path. [`FileSync`] adds
//! an optional linkage to one on-disk snapshot file, so the dataset can
//! live in a folder something else synchronizes (a network drive, a
//! backup directory).

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use storage::repository::DocumentKey;
use storage::state_store::StateStore;
use thesis_core::model::{PartialSnapshot, Snapshot};

use crate::Clock;
use crate::error::SyncError;

/// File name suggested for a fresh export, stamped with the day.
#[must_use]
pub fn default_backup_file_name(now: DateTime<Utc>) -> String {
    format!("thesis-backup-{}.json", now.format("%Y-%m-%d"))
}

//
// ─── IMPORT OUTCOME ────────────────────────────────────────────────────────────
//

/// Which collections an import replaced, with the imported counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportOutcome {
    pub chapters: Option<usize>,
    pub tasks: Option<usize>,
    pub projects: Option<usize>,
}

impl ImportOutcome {
    /// True when the document carried none of the three collections.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chapters.is_none() && self.tasks.is_none() && self.projects.is_none()
    }
}

//
// ─── SYNC SERVICE ──────────────────────────────────────────────────────────────
//

/// Reads and writes the whole dataset as one snapshot document.
#[derive(Clone)]
pub struct SyncService {
    clock: Clock,
    store: StateStore,
}

impl SyncService {
    #[must_use]
    pub fn new(clock: Clock, store: StateStore) -> Self {
        Self { clock, store }
    }

    /// Assembles a timestamped snapshot of the three collections.
    ///
    /// Reads are tolerant, so a store with one unreadable document still
    /// exports the collections that do decode.
    pub async fn export_snapshot(&self) -> Snapshot {
        let state = self.store.load_state().await;
        Snapshot::new(
            state.chapters().to_vec(),
            state.tasks().to_vec(),
            state.projects().to_vec(),
            self.clock.now(),
        )
    }

    /// Serializes a snapshot the way export files are written: pretty,
    /// human-diffable JSON.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Parse` if the snapshot cannot be serialized.
    pub async fn export_json(&self) -> Result<String, SyncError> {
        let snapshot = self.export_snapshot().await;
        Ok(serde_json::to_string_pretty(&snapshot)?)
    }

    /// Applies an import document over the store.
    ///
    /// The whole text is parsed before anything is written, so a malformed
    /// document rejects the operation with no partial apply. Each collection
    /// present in the document replaces its stored counterpart wholesale;
    /// absent collections stay untouched. There is no merging.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Parse` if the text is not an export document and
    /// `SyncError::Storage` if a write fails after parsing.
    pub async fn import_json(&self, text: &str) -> Result<ImportOutcome, SyncError> {
        let doc: PartialSnapshot = serde_json::from_str(text)?;

        let mut outcome = ImportOutcome::default();
        if let Some(chapters) = doc.chapters {
            self.store.save(DocumentKey::Chapters, &chapters).await?;
            outcome.chapters = Some(chapters.len());
        }
        if let Some(tasks) = doc.tasks {
            self.store.save(DocumentKey::Tasks, &tasks).await?;
            outcome.tasks = Some(tasks.len());
        }
        if let Some(projects) = doc.projects {
            self.store.save(DocumentKey::Projects, &projects).await?;
            outcome.projects = Some(projects.len());
        }
        Ok(outcome)
    }
}

//
// ─── FILE SYNC ─────────────────────────────────────────────────────────────────
//

/// Optional linkage to one snapshot file on disk.
///
/// With no linked file, [`FileSync::save`] and [`FileSync::load`] are quiet
/// no-ops, so callers can offer the actions unconditionally and let an
/// unlinked state mean "nothing happens".
pub struct FileSync {
    sync: SyncService,
    linked: Option<PathBuf>,
    last_synced_at: Option<DateTime<Utc>>,
}

impl FileSync {
    #[must_use]
    pub fn new(sync: SyncService) -> Self {
        Self {
            sync,
            linked: None,
            last_synced_at: None,
        }
    }

    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.linked.is_some()
    }

    /// Name of the linked file, if any.
    #[must_use]
    pub fn file_name(&self) -> Option<&str> {
        self.linked
            .as_deref()
            .and_then(Path::file_name)
            .and_then(|name| name.to_str())
    }

    #[must_use]
    pub fn last_synced_at(&self) -> Option<DateTime<Utc>> {
        self.last_synced_at
    }

    /// Reads an existing snapshot file, applies its contents, and links it.
    ///
    /// On failure nothing is applied and any previous linkage is kept.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Io` if the file cannot be read and
    /// `SyncError::Parse` if it is not an export document.
    pub async fn open(&mut self, path: impl Into<PathBuf>) -> Result<ImportOutcome, SyncError> {
        let path = path.into();
        let text = fs::read_to_string(&path)?;
        let outcome = self.sync.import_json(&text).await?;

        self.linked = Some(path);
        self.last_synced_at = Some(self.sync.clock.now());
        Ok(outcome)
    }

    /// Writes the current dataset to a new snapshot file and links it.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Io` if the file cannot be written.
    pub async fn create(&mut self, path: impl Into<PathBuf>) -> Result<(), SyncError> {
        let path = path.into();
        let json = self.sync.export_json().await?;
        fs::write(&path, json)?;

        self.linked = Some(path);
        self.last_synced_at = Some(self.sync.clock.now());
        Ok(())
    }

    /// Writes the current dataset to the linked file.
    ///
    /// Returns `Ok(false)` without touching anything when no file is
    /// linked.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Io` if the file cannot be written.
    pub async fn save(&mut self) -> Result<bool, SyncError> {
        let Some(path) = self.linked.clone() else {
            return Ok(false);
        };
        let json = self.sync.export_json().await?;
        fs::write(&path, json)?;

        self.last_synced_at = Some(self.sync.clock.now());
        Ok(true)
    }

    /// Re-applies the linked file's contents over the store.
    ///
    /// Returns `Ok(None)` when no file is linked.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Io` if the file cannot be read and
    /// `SyncError::Parse` if its contents stopped being an export document.
    pub async fn load(&mut self) -> Result<Option<ImportOutcome>, SyncError> {
        let Some(path) = self.linked.clone() else {
            return Ok(None);
        };
        let text = fs::read_to_string(&path)?;
        let outcome = self.sync.import_json(&text).await?;

        self.last_synced_at = Some(self.sync.clock.now());
        Ok(Some(outcome))
    }

    /// Drops the linkage. The file itself is left alone.
    pub fn disconnect(&mut self) {
        self.linked = None;
        self.last_synced_at = None;
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
