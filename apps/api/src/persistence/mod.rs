//! Snapshot and restore of the whole CV state to a local key-value slot.
//!
//! The persisted document is `{"state": {...}, "version": N}` with camelCase
//! keys inside `state`. Keys missing from an older snapshot fall back to the
//! values of a fresh store.

pub mod file;
pub mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::PersistenceError;
use crate::models::cv::{
    Certification, Education, Experience, Language, PersonalInfo, Project, Skill, UiLanguage,
};
use crate::store::CvStore;

pub use file::FileSnapshotStore;
pub use memory::InMemorySnapshotStore;

/// Current snapshot format version.
pub const SNAPSHOT_VERSION: u32 = 0;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct CvSnapshotState {
    pub personal_info: PersonalInfo,
    pub experience: Vec<Experience>,
    pub education: Vec<Education>,
    pub skills: Vec<Skill>,
    pub languages: Vec<Language>,
    pub certifications: Vec<Certification>,
    pub projects: Vec<Project>,
    pub current_template: String,
    pub language: UiLanguage,
    pub current_section: String,
    pub completion_percentage: u8,
    pub ats_score: u8,
}

impl Default for CvSnapshotState {
    fn default() -> Self {
        CvStore::new().snapshot_state()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CvSnapshot {
    #[serde(default)]
    pub state: CvSnapshotState,
    #[serde(default)]
    pub version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,
}

impl CvSnapshot {
    pub fn capture(store: &CvStore) -> Self {
        Self {
            state: store.snapshot_state(),
            version: SNAPSHOT_VERSION,
            saved_at: Some(Utc::now()),
        }
    }
}

/// A durable string slot addressed by key, the way a browser's local storage
/// is. Implementations must overwrite atomically enough that a reader never
/// sees half a value.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    async fn load(&self, key: &str) -> Result<Option<String>, PersistenceError>;

    async fn save(&self, key: &str, value: String) -> Result<(), PersistenceError>;
}

pub async fn save_snapshot(
    slot: &dyn SnapshotStore,
    key: &str,
    snapshot: &CvSnapshot,
) -> Result<(), PersistenceError> {
    let json = serde_json::to_string(snapshot)?;
    slot.save(key, json).await
}

pub async fn load_snapshot(
    slot: &dyn SnapshotStore,
    key: &str,
) -> Result<Option<CvSnapshot>, PersistenceError> {
    let Some(raw) = slot.load(key).await? else {
        return Ok(None);
    };
    let snapshot: CvSnapshot = serde_json::from_str(&raw)?;
    if snapshot.version > SNAPSHOT_VERSION {
        return Err(PersistenceError::UnsupportedVersion {
            found: snapshot.version,
            supported: SNAPSHOT_VERSION,
        });
    }
    Ok(Some(snapshot))
}

/// Builds the startup store: the persisted one when a snapshot exists,
/// otherwise `fresh`. Persisted metrics are kept unless `recalculate` is set.
pub async fn restore_or(
    slot: &dyn SnapshotStore,
    key: &str,
    mut fresh: CvStore,
    recalculate: bool,
) -> Result<CvStore, PersistenceError> {
    match load_snapshot(slot, key).await? {
        Some(snapshot) => {
            info!(
                "Restored CV snapshot '{key}' (saved at {})",
                snapshot
                    .saved_at
                    .map(|t| t.to_rfc3339())
                    .unwrap_or_else(|| "unknown".to_string())
            );
            fresh.restore(snapshot.state);
            if recalculate {
                fresh.recalculate();
            }
        }
        None => info!("No CV snapshot under '{key}', starting fresh"),
    }
    Ok(fresh)
}
