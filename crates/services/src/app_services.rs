use storage::repository::{DocumentKey, Storage};
use storage::state_store::StateStore;
use thesis_core::starter::starter_state;

use crate::Clock;
use crate::error::AppServicesError;
use crate::sync::{FileSync, SyncService};
use crate::tracker::Tracker;

/// Assembles the tracker and sync services over one store.
pub struct AppServices {
    first_run: bool,
    store: StateStore,
    tracker: Tracker,
    sync: SyncService,
    file_sync: FileSync,
}

impl AppServices {
    /// Builds services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization or the
    /// first-run starter install fails.
    pub async fn new_sqlite(db_url: &str, clock: Clock) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Self::with_storage(storage, clock).await
    }

    /// Builds services over an already-open storage backend.
    ///
    /// A store that has never been written to gets the starter dataset
    /// first, so a first launch (and a launch after `clear`) opens on a
    /// populated tracker rather than a blank one.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the first-run starter install fails.
    pub async fn with_storage(storage: Storage, clock: Clock) -> Result<Self, AppServicesError> {
        let store = StateStore::new(storage.clone());
        let first_run = ensure_starter_data(&storage, &store).await?;

        let tracker = Tracker::hydrate(clock, store.clone()).await;
        let sync = SyncService::new(clock, store.clone());
        let file_sync = FileSync::new(sync.clone());

        Ok(Self {
            first_run,
            store,
            tracker,
            sync,
            file_sync,
        })
    }

    /// True when this boot found a virgin store and installed the starter
    /// dataset.
    #[must_use]
    pub fn first_run(&self) -> bool {
        self.first_run
    }

    #[must_use]
    pub fn store(&self) -> &StateStore {
        &self.store
    }

    #[must_use]
    pub fn tracker(&self) -> &Tracker {
        &self.tracker
    }

    pub fn tracker_mut(&mut self) -> &mut Tracker {
        &mut self.tracker
    }

    #[must_use]
    pub fn sync(&self) -> &SyncService {
        &self.sync
    }

    #[must_use]
    pub fn file_sync(&self) -> &FileSync {
        &self.file_sync
    }

    pub fn file_sync_mut(&mut self) -> &mut FileSync {
        &mut self.file_sync
    }
}

/// Installs the starter dataset into a store that has never seen a write.
///
/// A store holding any of the three documents, even an unreadable one, is
/// left alone.
async fn ensure_starter_data(
    storage: &Storage,
    store: &StateStore,
) -> Result<bool, AppServicesError> {
    for key in DocumentKey::ALL {
        if storage.documents.load(key).await?.is_some() {
            return Ok(false);
        }
    }

    store.save_state(&starter_state()).await?;
    Ok(true)
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
