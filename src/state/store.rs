//! State store implementations

use crate::error::{CacheError, CacheResult};
use crate::state::StateStore;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;
use std::sync::Mutex;
use tokio::fs;
use tracing::debug;

/// Persisted state of one job
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobState {
    /// Job id this state belongs to
    pub job_id: String,

    /// Recorded values
    pub values: BTreeMap<String, String>,

    /// When the state was last written
    pub updated_at: DateTime<Utc>,
}

impl JobState {
    /// Create empty state for a job
    pub fn new(job_id: impl Into<String>) -> Self {
        Self {
            job_id: job_id.into(),
            values: BTreeMap::new(),
            updated_at: Utc::now(),
        }
    }
}

/// One JSON file per job in a state directory
pub struct FileStateStore {
    dir: PathBuf,
}

impl FileStateStore {
    /// Create a store rooted at `dir`
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// Get the state file path for a job
    pub fn file_path(&self, job_id: &str) -> PathBuf {
        self.dir.join(format!("{}.json", sanitize_job_id(job_id)))
    }

    async fn load(&self, job_id: &str) -> CacheResult<Option<JobState>> {
        let path = self.file_path(job_id);

        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(CacheError::io(
                    format!("reading state file {}", path.display()),
                    e,
                ))
            }
        };

        let state: JobState = serde_json::from_str(&content)?;
        Ok(Some(state))
    }

    async fn save(&self, state: &JobState) -> CacheResult<()> {
        let path = self.file_path(&state.job_id);

        fs::create_dir_all(&self.dir).await.map_err(|e| {
            CacheError::State(format!("creating {}: {}", self.dir.display(), e))
        })?;

        let content = serde_json::to_string_pretty(state)?;
        fs::write(&path, content)
            .await
            .map_err(|e| CacheError::State(format!("writing {}: {}", path.display(), e)))?;

        debug!("Saved job state to {}", path.display());
        Ok(())
    }
}

#[async_trait]
impl StateStore for FileStateStore {
    async fn get(&self, job_id: &str, name: &str) -> CacheResult<Option<String>> {
        Ok(self
            .load(job_id)
            .await?
            .and_then(|state| state.values.get(name).cloned()))
    }

    async fn set(&self, job_id: &str, name: &str, value: &str) -> CacheResult<()> {
        let mut state = self
            .load(job_id)
            .await?
            .unwrap_or_else(|| JobState::new(job_id));

        state.values.insert(name.to_string(), value.to_string());
        state.updated_at = Utc::now();
        self.save(&state).await
    }

    async fn remove(&self, job_id: &str, name: &str) -> CacheResult<()> {
        let Some(mut state) = self.load(job_id).await? else {
            return Ok(());
        };
        if state.values.remove(name).is_none() {
            return Ok(());
        }

        state.updated_at = Utc::now();
        self.save(&state).await
    }
}

/// Keep job ids usable as file names
fn sanitize_job_id(job_id: &str) -> String {
    let name: String = job_id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    if name.is_empty() {
        "default".to_string()
    } else {
        name
    }
}

/// In-process store
#[derive(Default)]
pub struct MemoryStateStore {
    values: Mutex<HashMap<(String, String), String>>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StateStore for MemoryStateStore {
    async fn get(&self, job_id: &str, name: &str) -> CacheResult<Option<String>> {
        let values = self
            .values
            .lock()
            .map_err(|_| CacheError::Internal("state lock poisoned".to_string()))?;
        Ok(values
            .get(&(job_id.to_string(), name.to_string()))
            .cloned())
    }

    async fn set(&self, job_id: &str, name: &str, value: &str) -> CacheResult<()> {
        let mut values = self
            .values
            .lock()
            .map_err(|_| CacheError::Internal("state lock poisoned".to_string()))?;
        values.insert((job_id.to_string(), name.to_string()), value.to_string());
        Ok(())
    }

    async fn remove(&self, job_id: &str, name: &str) -> CacheResult<()> {
        let mut values = self
            .values
            .lock()
            .map_err(|_| CacheError::Internal("state lock poisoned".to_string()))?;
        values.remove(&(job_id.to_string(), name.to_string()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::STATE_KEY;
    use tempfile::TempDir;

    #[tokio::test]
    async fn file_store_roundtrip() {
        let dir = TempDir::new().unwrap();
        let store = FileStateStore::new(dir.path().join("state"));

        assert_eq!(store.get("build", STATE_KEY).await.unwrap(), None);

        store.set("build", STATE_KEY, "zig-cache-step-0-abc").await.unwrap();
        assert_eq!(
            store.get("build", STATE_KEY).await.unwrap().as_deref(),
            Some("zig-cache-step-0-abc")
        );
        assert_eq!(store.get("test", STATE_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn file_store_keeps_other_values() {
        let dir = TempDir::new().unwrap();
        let store = FileStateStore::new(dir.path().to_path_buf());

        store.set("build", "a", "1").await.unwrap();
        store.set("build", "b", "2").await.unwrap();

        let content = std::fs::read_to_string(store.file_path("build")).unwrap();
        let state: JobState = serde_json::from_str(&content).unwrap();
        assert_eq!(state.job_id, "build");
        assert_eq!(state.values.len(), 2);
    }

    #[tokio::test]
    async fn file_store_remove_forgets_value() {
        let dir = TempDir::new().unwrap();
        let store = FileStateStore::new(dir.path().join("state"));

        // Nothing recorded yet
        store.remove("build", STATE_KEY).await.unwrap();
        assert!(!store.file_path("build").exists());

        store.set("build", STATE_KEY, "old-key").await.unwrap();
        store.set("build", "other", "kept").await.unwrap();
        store.remove("build", STATE_KEY).await.unwrap();

        assert_eq!(store.get("build", STATE_KEY).await.unwrap(), None);
        assert_eq!(store.get("build", "other").await.unwrap().as_deref(), Some("kept"));
    }

    #[tokio::test]
    async fn unwritable_state_dir_is_state_error() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, "").unwrap();
        let store = FileStateStore::new(blocker.join("state"));

        let err = store.set("build", STATE_KEY, "k").await.unwrap_err();
        assert!(matches!(err, CacheError::State(_)));
    }

    #[test]
    fn job_ids_are_sanitized() {
        assert_eq!(sanitize_job_id("build/linux x64"), "build_linux_x64");
        assert_eq!(sanitize_job_id(""), "default");
    }

    #[tokio::test]
    async fn memory_store_scopes_by_job() {
        let store = MemoryStateStore::new();
        store.set("a", STATE_KEY, "k1").await.unwrap();

        assert_eq!(store.get("a", STATE_KEY).await.unwrap().as_deref(), Some("k1"));
        assert_eq!(store.get("b", STATE_KEY).await.unwrap(), None);

        store.remove("a", STATE_KEY).await.unwrap();
        assert_eq!(store.get("a", STATE_KEY).await.unwrap(), None);
    }
}
