use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::errors::PersistenceError;
use crate::persistence::SnapshotStore;

/// Process-local slot backed by `Arc<RwLock<HashMap>>`.
///
/// Clone-friendly: clones share the same storage.
#[derive(Clone, Default)]
pub struct InMemorySnapshotStore {
    storage: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SnapshotStore for InMemorySnapshotStore {
    async fn load(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        Ok(self.storage.read().await.get(key).cloned())
    }

    async fn save(&self, key: &str, value: String) -> Result<(), PersistenceError> {
        self.storage.write().await.insert(key.to_string(), value);
        Ok(())
    }
}
