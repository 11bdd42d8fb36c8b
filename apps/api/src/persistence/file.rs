use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use crate::errors::PersistenceError;
use crate::persistence::SnapshotStore;

/// One JSON file per key inside a directory.
///
/// Writes go to a sibling temp file first and are then renamed over the
/// target, so a crash mid-write leaves the previous value intact. Each save
/// gets its own temp file; concurrent saves to one key never share one.
#[derive(Debug, Clone)]
pub struct FileSnapshotStore {
    dir: PathBuf,
}

impl FileSnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, PersistenceError> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
            && !key.starts_with('.');
        if !valid {
            return Err(PersistenceError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(format!("{key}.json")))
    }
}

#[async_trait]
impl SnapshotStore for FileSnapshotStore {
    async fn load(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        let path = self.path_for(key)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(contents) => {
                debug!("Read snapshot {}", path.display());
                Ok(Some(contents))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, key: &str, value: String) -> Result<(), PersistenceError> {
        let path = self.path_for(key)?;
        tokio::fs::create_dir_all(&self.dir).await?;
        let tmp = self.dir.join(format!("{key}.json.{}.tmp", Uuid::new_v4().simple()));
        let written = match tokio::fs::write(&tmp, value.as_bytes()).await {
            Ok(()) => tokio::fs::rename(&tmp, &path).await,
            Err(e) => Err(e),
        };
        if let Err(e) = written {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        debug!("Wrote snapshot {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_key_loads_none() {
        let dir = tempfile::tempdir().unwrap();
        let slot = FileSnapshotStore::new(dir.path());
        assert!(slot.load("cv-builder-storage").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_creates_directory_and_file() {
        let dir = tempfile::tempdir().unwrap();
        let slot = FileSnapshotStore::new(dir.path().join("nested"));
        slot.save("cv-builder-storage", r#"{"version":0}"#.to_string())
            .await
            .unwrap();
        assert!(dir.path().join("nested/cv-builder-storage.json").exists());
        let leftovers: Vec<_> = std::fs::read_dir(dir.path().join("nested"))
            .unwrap()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
        assert_eq!(
            slot.load("cv-builder-storage").await.unwrap().as_deref(),
            Some(r#"{"version":0}"#)
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_saves_to_one_key_all_succeed() {
        let dir = tempfile::tempdir().unwrap();
        let slot = FileSnapshotStore::new(dir.path());

        for round in 0..20 {
            let mut handles = Vec::new();
            for writer in 0..8 {
                let slot = slot.clone();
                handles.push(tokio::spawn(async move {
                    slot.save("cv", format!(r#"{{"round":{round},"writer":{writer}}}"#))
                        .await
                }));
            }
            for handle in handles {
                handle.await.unwrap().unwrap();
            }
        }

        let stored = slot.load("cv").await.unwrap().unwrap();
        assert!(serde_json::from_str::<serde_json::Value>(&stored).is_ok());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn test_rejects_path_like_keys() {
        let dir = tempfile::tempdir().unwrap();
        let slot = FileSnapshotStore::new(dir.path());
        for key in ["../escape", "a/b", "", ".hidden"] {
            let err = slot.save(key, "{}".to_string()).await.unwrap_err();
            assert!(matches!(err, PersistenceError::InvalidKey(_)), "{key}");
        }
    }
}
