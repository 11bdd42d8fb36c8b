use std::sync::Arc;

use tokio::sync::Mutex;

use crate::config::Config;
use crate::persistence::SnapshotStore;
use crate::store::CvStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// The single CV store. The mutex serializes requests so each operation
    /// finishes before the next one observes the store.
    pub store: Arc<Mutex<CvStore>>,
    /// Local key-value slot the store is snapshotted to after every mutation.
    pub snapshots: Arc<dyn SnapshotStore>,
    pub config: Config,
}

impl AppState {
    pub fn new(store: CvStore, snapshots: Arc<dyn SnapshotStore>, config: Config) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            snapshots,
            config,
        }
    }
}
