//! Filesystem object store
//!
//! One pretty-printed JSON document per object under a root directory.
//! Writes go to a hidden temporary file that is then renamed over the
//! target, so a failed save never leaves a half-written object behind.

use async_trait::async_trait;
use curate_core::effects::ObjectStoreEffects;
use curate_core::{CurateError, ObjectId, RepositoryObject, Result};
use std::path::{Path, PathBuf};
use tokio::fs;

const EXTENSION: &str = "json";

/// Filesystem-backed object store
#[derive(Debug, Clone)]
pub struct FilesystemObjectStore {
    root: PathBuf,
}

impl FilesystemObjectStore {
    /// Create a store rooted at `root`. The directory is created on first save.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, id: &ObjectId) -> Result<PathBuf> {
        let raw = id.as_str();
        if raw.is_empty()
            || raw.starts_with('.')
            || raw.contains(['/', '\\'])
            || raw.contains("..")
        {
            return Err(CurateError::invalid(format!(
                "object id '{raw}' cannot be used as a file name"
            )));
        }
        Ok(self.root.join(format!("{raw}.{EXTENSION}")))
    }
}

#[async_trait]
impl ObjectStoreEffects for FilesystemObjectStore {
    async fn load(&self, id: &ObjectId) -> Result<RepositoryObject> {
        let path = self.path_for(id)?;
        let raw = match fs::read(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(CurateError::not_found(format!("object {id}")))
            }
            Err(e) => {
                return Err(CurateError::persist(format!(
                    "failed to read {}: {e}",
                    path.display()
                )))
            }
        };
        let object: RepositoryObject = serde_json::from_slice(&raw)?;
        if &object.id != id {
            return Err(CurateError::serialization(format!(
                "{} holds object '{}', expected '{id}'",
                path.display(),
                object.id
            )));
        }
        Ok(object)
    }

    async fn save(&self, object: &RepositoryObject) -> Result<()> {
        let path = self.path_for(&object.id)?;
        let body = serde_json::to_vec_pretty(object)?;

        fs::create_dir_all(&self.root).await.map_err(|e| {
            CurateError::persist(format!("failed to create {}: {e}", self.root.display()))
        })?;

        let tmp = self.root.join(format!(".{}.{EXTENSION}.tmp", object.id));
        fs::write(&tmp, body)
            .await
            .map_err(|e| CurateError::persist(format!("failed to write {}: {e}", tmp.display())))?;
        fs::rename(&tmp, &path).await.map_err(|e| {
            CurateError::persist(format!("failed to replace {}: {e}", path.display()))
        })?;

        tracing::debug!(object_id = %object.id, path = %path.display(), "object saved");
        Ok(())
    }

    async fn list_ids(&self) -> Result<Vec<ObjectId>> {
        let mut entries = match fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(CurateError::persist(format!(
                    "failed to read {}: {e}",
                    self.root.display()
                )))
            }
        };

        let mut ids = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(|e| {
            CurateError::persist(format!("failed to read directory entry: {e}"))
        })? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTENSION) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            if stem.starts_with('.') {
                continue;
            }
            ids.push(ObjectId::new(stem));
        }

        ids.sort();
        Ok(ids)
    }
}
