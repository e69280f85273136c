use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use thesis_core::state::Collection;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// The fixed document slots the tracker persists into.
///
/// Each slot holds one JSON array; there is no transaction spanning slots,
/// so every write replaces exactly one of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKey {
    Chapters,
    Tasks,
    Projects,
}

impl DocumentKey {
    pub const ALL: [DocumentKey; 3] = [
        DocumentKey::Chapters,
        DocumentKey::Tasks,
        DocumentKey::Projects,
    ];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKey::Chapters => "chapters",
            DocumentKey::Tasks => "tasks",
            DocumentKey::Projects => "projects",
        }
    }
}

impl From<Collection> for DocumentKey {
    fn from(collection: Collection) -> Self {
        match collection {
            Collection::Chapters => DocumentKey::Chapters,
            Collection::Tasks => DocumentKey::Tasks,
            Collection::Projects => DocumentKey::Projects,
        }
    }
}

/// Repository contract for keyed JSON documents.
#[async_trait]
pub trait DocumentRepository: Send + Sync {
    /// Fetch the document stored under a key, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn load(&self, key: DocumentKey) -> Result<Option<String>, StorageError>;

    /// Store (or replace) the document under a key.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the document cannot be written.
    async fn save(&self, key: DocumentKey, body: &str) -> Result<(), StorageError>;

    /// Remove the document under a key. Removing an absent key is fine.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    async fn clear(&self, key: DocumentKey) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    documents: Arc<Mutex<HashMap<DocumentKey, String>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            documents: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl DocumentRepository for InMemoryRepository {
    async fn load(&self, key: DocumentKey) -> Result<Option<String>, StorageError> {
        let guard = self
            .documents
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(&key).cloned())
    }

    async fn save(&self, key: DocumentKey, body: &str) -> Result<(), StorageError> {
        let mut guard = self
            .documents
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(key, body.to_owned());
        Ok(())
    }

    async fn clear(&self, key: DocumentKey) -> Result<(), StorageError> {
        let mut guard = self
            .documents
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.remove(&key);
        Ok(())
    }
}

/// Aggregates the document repository behind a trait object for easy
/// backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub documents: Arc<dyn DocumentRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let documents: Arc<dyn DocumentRepository> = Arc::new(InMemoryRepository::new());
        Self { documents }
    }
}
