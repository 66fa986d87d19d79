//! Cross-phase job state
//!
//! The restore phase records the key it actually restored; the save phase,
//! run later in the same job, reads it back. State is keyed by job id and
//! lives in the runner's temp directory.

mod store;

pub use store::{FileStateStore, JobState, MemoryStateStore};

use crate::error::CacheResult;
use async_trait::async_trait;

/// Name under which the restored cache key is recorded
pub const STATE_KEY: &str = "ZIG_CACHE_KEY";

/// Key-value store scoped by job id
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Read a value recorded for `job_id`
    async fn get(&self, job_id: &str, name: &str) -> CacheResult<Option<String>>;

    /// Record a value for `job_id`
    async fn set(&self, job_id: &str, name: &str, value: &str) -> CacheResult<()>;

    /// Forget a value recorded for `job_id`; missing values are fine
    async fn remove(&self, job_id: &str, name: &str) -> CacheResult<()>;
}
