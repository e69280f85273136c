use serde::Serialize;
use serde::de::DeserializeOwned;

use thesis_core::model::{Chapter, Project, Task};
use thesis_core::state::{AppState, Collection};

use crate::repository::{DocumentKey, Storage, StorageError};

/// Typed access to the three persisted collections.
///
/// Hydration is tolerant: a missing or unreadable document falls back to an
/// empty collection and a warning, never an error, so a corrupt store can
/// still open. Writes replace one whole document at a time.
#[derive(Clone)]
pub struct StateStore {
    storage: Storage,
}

impl StateStore {
    #[must_use]
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    /// Loads and decodes one document, strictly.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend fails or the stored JSON does
    /// not decode.
    pub async fn load<T>(&self, key: DocumentKey) -> Result<Option<T>, StorageError>
    where
        T: DeserializeOwned,
    {
        let Some(body) = self.storage.documents.load(key).await? else {
            return Ok(None);
        };
        serde_json::from_str(&body)
            .map(Some)
            .map_err(|err| StorageError::Serialization(err.to_string()))
    }

    /// Loads one document, falling back to the default on a missing key, a
    /// read failure or undecodable JSON. Failures are logged, not surfaced.
    pub async fn load_or_default<T>(&self, key: DocumentKey) -> T
    where
        T: DeserializeOwned + Default,
    {
        match self.load(key).await {
            Ok(Some(value)) => value,
            Ok(None) => T::default(),
            Err(err) => {
                tracing::warn!("could not read {} document, starting empty: {}", key.as_str(), err);
                T::default()
            }
        }
    }

    /// Encodes and stores one document.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if encoding or the backend write fails.
    pub async fn save<T>(&self, key: DocumentKey, value: &T) -> Result<(), StorageError>
    where
        T: Serialize + ?Sized,
    {
        let body = serde_json::to_string(value)
            .map_err(|err| StorageError::Serialization(err.to_string()))?;
        self.storage.documents.save(key, &body).await
    }

    /// Hydrates a full application state, tolerantly, with no open sessions.
    pub async fn load_state(&self) -> AppState {
        let chapters: Vec<Chapter> = self.load_or_default(DocumentKey::Chapters).await;
        let tasks: Vec<Task> = self.load_or_default(DocumentKey::Tasks).await;
        let projects: Vec<Project> = self.load_or_default(DocumentKey::Projects).await;
        AppState::new(chapters, tasks, projects)
    }

    /// Writes the one collection out of `state`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if encoding or the backend write fails.
    pub async fn save_collection(
        &self,
        state: &AppState,
        collection: Collection,
    ) -> Result<(), StorageError> {
        match collection {
            Collection::Chapters => self.save(DocumentKey::Chapters, state.chapters()).await,
            Collection::Tasks => self.save(DocumentKey::Tasks, state.tasks()).await,
            Collection::Projects => self.save(DocumentKey::Projects, state.projects()).await,
        }
    }

    /// Writes all three collections, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if any write fails; earlier writes stay.
    pub async fn save_state(&self, state: &AppState) -> Result<(), StorageError> {
        self.save(DocumentKey::Chapters, state.chapters()).await?;
        self.save(DocumentKey::Tasks, state.tasks()).await?;
        self.save(DocumentKey::Projects, state.projects()).await
    }

    /// Removes all three documents.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    pub async fn clear_all(&self) -> Result<(), StorageError> {
        for key in DocumentKey::ALL {
            self.storage.documents.clear(key).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use thesis_core::starter::starter_state;

    #[tokio::test]
    async fn load_state_defaults_when_store_is_empty() {
        let store = StateStore::new(Storage::in_memory());
        let state = store.load_state().await;
        assert!(state.chapters().is_empty());
        assert!(state.tasks().is_empty());
        assert!(state.projects().is_empty());
    }

    #[tokio::test]
    async fn state_round_trips_through_documents() {
        let store = StateStore::new(Storage::in_memory());
        let state = starter_state();
        store.save_state(&state).await.unwrap();

        let loaded = store.load_state().await;
        assert_eq!(loaded, state);
    }

    #[tokio::test]
    async fn corrupt_document_hydrates_as_default() {
        let storage = Storage::in_memory();
        storage
            .documents
            .save(DocumentKey::Chapters, "{ not json")
            .await
            .unwrap();

        let store = StateStore::new(storage);
        let state = store.load_state().await;
        assert!(state.chapters().is_empty());
    }

    #[tokio::test]
    async fn strict_load_surfaces_corrupt_documents() {
        let storage = Storage::in_memory();
        storage
            .documents
            .save(DocumentKey::Tasks, "][")
            .await
            .unwrap();

        let store = StateStore::new(storage);
        let result: Result<Option<Vec<Task>>, _> = store.load(DocumentKey::Tasks).await;
        assert!(matches!(result, Err(StorageError::Serialization(_))));
    }

    #[tokio::test]
    async fn save_collection_touches_only_its_document() {
        let storage = Storage::in_memory();
        let store = StateStore::new(storage.clone());
        let state = starter_state();

        store.save_collection(&state, Collection::Tasks).await.unwrap();

        assert!(storage.documents.load(DocumentKey::Tasks).await.unwrap().is_some());
        assert!(storage.documents.load(DocumentKey::Chapters).await.unwrap().is_none());
        assert!(storage.documents.load(DocumentKey::Projects).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn clear_all_removes_every_document() {
        let store = StateStore::new(Storage::in_memory());
        store.save_state(&starter_state()).await.unwrap();
        store.clear_all().await.unwrap();

        let state = store.load_state().await;
        assert!(state.chapters().is_empty());
        assert!(state.tasks().is_empty());
        assert!(state.projects().is_empty());
    }
}
