use storage::repository::{DocumentKey, StorageError};
use storage::state_store::StateStore;
use thesis_core::state::{AppState, Intent, apply};

use crate::Clock;

/// The hydrated state container.
///
/// Holds the committed [`AppState`], funnels every user action through the
/// pure reducer, and writes the one collection an intent committed back
/// through the store. Session intents touch only the in-memory scratch and
/// are never persisted.
pub struct Tracker {
    clock: Clock,
    store: StateStore,
    state: AppState,
}

impl Tracker {
    /// Loads the three collections and opens a tracker over them.
    ///
    /// Hydration is tolerant: a missing or unreadable document becomes an
    /// empty collection, never an error.
    pub async fn hydrate(clock: Clock, store: StateStore) -> Self {
        let state = store.load_state().await;
        Self { clock, store, state }
    }

    #[must_use]
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Applies one intent and persists the collection it committed, if any.
    ///
    /// Writes are best-effort: a failed write keeps the new in-memory state
    /// and logs a warning, so one slow or broken disk never loses an edit
    /// the user just made on screen.
    pub async fn dispatch(&mut self, intent: Intent) {
        let touched = intent.committed_collection();
        self.state = apply(std::mem::take(&mut self.state), intent, self.clock.now());

        if let Some(collection) = touched {
            if let Err(err) = self.store.save_collection(&self.state, collection).await {
                let key = DocumentKey::from(collection);
                tracing::warn!("could not persist {} document: {}", key.as_str(), err);
            }
        }
    }

    /// Reloads the collections from the store, dropping any open session.
    ///
    /// Used after an import overwrote documents underneath the tracker.
    pub async fn rehydrate(&mut self) {
        self.state = self.store.load_state().await;
    }

    /// Replaces the whole state and persists all three collections.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on the first failed write; earlier writes
    /// stay, matching the store's per-document contract.
    pub async fn replace_state(&mut self, state: AppState) -> Result<(), StorageError> {
        self.state = state;
        self.store.save_state(&self.state).await
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    use storage::repository::{DocumentKey, Storage};
    use thesis_core::edit::{EditMode, EditOp};
    use thesis_core::model::Priority;
    use thesis_core::starter::starter_state;
    use thesis_core::time::fixed_clock;

    async fn tracker_over(storage: &Storage) -> Tracker {
        Tracker::hydrate(fixed_clock(), StateStore::new(storage.clone())).await
    }

    fn add_task_intent(text: &str) -> Intent {
        Intent::AddTask {
            text: text.into(),
            priority: Priority::High,
            deadline: None,
        }
    }

    #[tokio::test]
    async fn dispatch_persists_only_the_committed_collection() {
        let storage = Storage::in_memory();
        let mut tracker = tracker_over(&storage).await;

        tracker.dispatch(add_task_intent("email advisor")).await;

        assert_eq!(tracker.state().tasks().len(), 1);
        assert!(storage.documents.load(DocumentKey::Tasks).await.unwrap().is_some());
        assert!(storage.documents.load(DocumentKey::Chapters).await.unwrap().is_none());
        assert!(storage.documents.load(DocumentKey::Projects).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn session_intents_never_touch_the_store() {
        let storage = Storage::in_memory();
        let mut tracker = tracker_over(&storage).await;

        tracker
            .dispatch(Intent::AddChapter { title: "Methodology".into(), file: None, notes: None })
            .await;
        let id = tracker.state().chapters()[0].id().clone();
        let stored = storage.documents.load(DocumentKey::Chapters).await.unwrap();

        tracker
            .dispatch(Intent::BeginChapterEdit { id, mode: EditMode::Writing })
            .await;
        tracker
            .dispatch(Intent::EditChapter(EditOp::ToggleSection { section: 0 }))
            .await;

        // scratch moved, document did not
        assert!(tracker.state().chapter_session().is_some());
        assert_eq!(
            storage.documents.load(DocumentKey::Chapters).await.unwrap(),
            stored
        );
    }

    #[tokio::test]
    async fn committing_an_untouched_edit_rewrites_the_same_document() {
        let storage = Storage::in_memory();
        let mut tracker = tracker_over(&storage).await;

        tracker
            .dispatch(Intent::AddChapter { title: "Methodology".into(), file: None, notes: None })
            .await;
        let id = tracker.state().chapters()[0].id().clone();
        let before = storage.documents.load(DocumentKey::Chapters).await.unwrap();
        let progress_before = tracker.state().chapters()[0].progress();

        tracker
            .dispatch(Intent::BeginChapterEdit { id, mode: EditMode::Writing })
            .await;
        tracker.dispatch(Intent::CommitChapterEdit).await;

        assert_eq!(tracker.state().chapters()[0].progress(), progress_before);
        assert_eq!(
            storage.documents.load(DocumentKey::Chapters).await.unwrap(),
            before
        );
    }

    #[tokio::test]
    async fn hydrate_tolerates_corrupt_documents() {
        let storage = Storage::in_memory();
        storage
            .documents
            .save(DocumentKey::Chapters, "{ not json")
            .await
            .unwrap();

        let tracker = tracker_over(&storage).await;
        assert!(tracker.state().chapters().is_empty());
    }

    #[tokio::test]
    async fn replace_state_persists_all_three_collections() {
        let storage = Storage::in_memory();
        let mut tracker = tracker_over(&storage).await;

        tracker.replace_state(starter_state()).await.unwrap();

        for key in DocumentKey::ALL {
            assert!(storage.documents.load(key).await.unwrap().is_some());
        }

        // a fresh tracker over the same store sees the replaced state
        let rehydrated = tracker_over(&storage).await;
        assert_eq!(rehydrated.state(), &starter_state());
    }

    #[tokio::test]
    async fn rehydrate_picks_up_documents_written_underneath() {
        let storage = Storage::in_memory();
        let store = StateStore::new(storage.clone());
        let mut tracker = tracker_over(&storage).await;
        assert!(tracker.state().chapters().is_empty());

        store.save_state(&starter_state()).await.unwrap();
        tracker.rehydrate().await;

        assert_eq!(tracker.state().chapters().len(), 5);
        assert!(tracker.state().chapter_session().is_none());
    }
}
