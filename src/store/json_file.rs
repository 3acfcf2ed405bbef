use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use super::{Document, Store, StoreError};

/// [`Store`] keeping each document in `<folder>/<id>.json`.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    folder: PathBuf,
}

impl JsonFileStore {
    /// Open a store rooted at `folder`, creating the folder if needed.
    pub async fn open(folder: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let folder = folder.into();
        fs::create_dir_all(&folder).await?;
        tracing::debug!(folder = %folder.display(), "json file store opened");
        Ok(Self { folder })
    }

    pub fn folder(&self) -> &Path {
        &self.folder
    }

    fn path(&self, id: Uuid) -> PathBuf {
        self.folder.join(format!("{id}.json"))
    }

    /// Write `bytes` to a fresh temporary file next to the documents.
    async fn write_tmp(&self, id: Uuid, bytes: &[u8]) -> Result<PathBuf, StoreError> {
        let tmp = self.folder.join(format!("{id}.{}.tmp", Uuid::new_v4().simple()));
        let mut file = fs::File::create(&tmp).await?;
        if let Err(err) = write_synced(&mut file, bytes).await {
            discard(&tmp).await;
            return Err(err.into());
        }
        Ok(tmp)
    }

    async fn replace(&self, id: Uuid, bytes: &[u8]) -> Result<(), StoreError> {
        let tmp = self.write_tmp(id, bytes).await?;
        if let Err(err) = fs::rename(&tmp, self.path(id)).await {
            discard(&tmp).await;
            return Err(err.into());
        }
        Ok(())
    }
}

async fn discard(tmp: &Path) {
    if let Err(err) = fs::remove_file(tmp).await {
        tracing::warn!(path = %tmp.display(), error = %err, "failed to remove temporary file");
    }
}

async fn write_synced(file: &mut fs::File, bytes: &[u8]) -> std::io::Result<()> {
    file.write_all(bytes).await?;
    file.flush().await?;
    file.sync_all().await
}

#[async_trait]
impl<T: Document> Store<T> for JsonFileStore {
    async fn create(&self, id: Uuid, document: &T) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec_pretty(document)?;
        let tmp = self.write_tmp(id, &bytes).await?;
        // Fails with AlreadyExists when the document is already there.
        let linked = fs::hard_link(&tmp, self.path(id)).await;
        discard(&tmp).await;
        match linked {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::AlreadyExists => Err(StoreError::AlreadyExists(id)),
            Err(err) => Err(err.into()),
        }
    }

    async fn update(&self, id: Uuid, document: &T) -> Result<(), StoreError> {
        if !fs::try_exists(self.path(id)).await? {
            return Err(StoreError::NotFound(id));
        }
        let bytes = serde_json::to_vec_pretty(document)?;
        self.replace(id, &bytes).await
    }

    async fn get(&self, id: Uuid) -> Result<Option<T>, StoreError> {
        match fs::read(self.path(id)).await {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }
}
