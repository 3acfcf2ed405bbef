//! Document storage used by handlers.
//!
//! A [`Store`] keeps one JSON-serializable document per id. Handlers only
//! need `create`, `update` and `get`; consistency beyond a single call is
//! not guaranteed by either implementation.
//!
//! - [`InMemoryStore`]: a map behind a lock, for tests and local runs.
//! - [`JsonFileStore`]: one `<id>.json` file per document under a folder.

mod error;
mod json_file;
mod memory;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

pub use error::StoreError;
pub use json_file::JsonFileStore;
pub use memory::InMemoryStore;

/// A type that can be kept in a [`Store`].
pub trait Document: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {}

impl<T> Document for T where T: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {}

#[async_trait]
pub trait Store<T: Document>: Send + Sync + 'static {
    /// Insert a new document. Fails with [`StoreError::AlreadyExists`] if `id` is taken.
    async fn create(&self, id: Uuid, document: &T) -> Result<(), StoreError>;

    /// Replace an existing document. Fails with [`StoreError::NotFound`] if `id` is unknown.
    async fn update(&self, id: Uuid, document: &T) -> Result<(), StoreError>;

    async fn get(&self, id: Uuid) -> Result<Option<T>, StoreError>;
}
