use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use uuid::Uuid;

use super::{Document, Store, StoreError};

/// In-memory [`Store`]. Clones share the same documents.
pub struct InMemoryStore<T> {
    documents: Arc<RwLock<HashMap<Uuid, T>>>,
}

impl<T> Clone for InMemoryStore<T> {
    fn clone(&self) -> Self {
        Self {
            documents: Arc::clone(&self.documents),
        }
    }
}

impl<T> Default for InMemoryStore<T> {
    fn default() -> Self {
        Self {
            documents: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl<T> InMemoryStore<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.documents.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.read().is_empty()
    }
}

#[async_trait]
impl<T: Document> Store<T> for InMemoryStore<T> {
    async fn create(&self, id: Uuid, document: &T) -> Result<(), StoreError> {
        let mut documents = self.documents.write();
        if documents.contains_key(&id) {
            return Err(StoreError::AlreadyExists(id));
        }
        documents.insert(id, document.clone());
        Ok(())
    }

    async fn update(&self, id: Uuid, document: &T) -> Result<(), StoreError> {
        match self.documents.write().get_mut(&id) {
            Some(existing) => {
                *existing = document.clone();
                Ok(())
            }
            None => Err(StoreError::NotFound(id)),
        }
    }

    async fn get(&self, id: Uuid) -> Result<Option<T>, StoreError> {
        Ok(self.documents.read().get(&id).cloned())
    }
}
