//! Cache storage backend abstraction
//!
//! Storage itself is external. This module defines the interface the
//! orchestrator drives and an adapter for helper executables that implement
//! it on the other side of a process boundary.

mod command;

pub use command::CommandBackend;

use crate::error::{CacheError, CacheResult};
use async_trait::async_trait;
use std::path::PathBuf;

/// Remote cache storage
#[async_trait]
pub trait CacheBackend: Send + Sync {
    /// Check whether the cache service can be used in this job
    async fn is_available(&self) -> bool;

    /// Restore `paths` from the first matching key
    ///
    /// Returns the key that matched: `primary_key` exactly, one of
    /// `fallback_keys` (prefix match), or `None` on a miss.
    async fn restore(
        &self,
        paths: &[PathBuf],
        primary_key: &str,
        fallback_keys: &[String],
    ) -> CacheResult<Option<String>>;

    /// Store `paths` under `key`. Fails if `key` already exists.
    async fn save(&self, paths: &[PathBuf], key: &str) -> CacheResult<()>;

    /// Get the human-readable backend name for logs
    fn backend_name(&self) -> &'static str;
}

/// Backend used when none is configured; always unavailable
pub struct UnavailableBackend;

#[async_trait]
impl CacheBackend for UnavailableBackend {
    async fn is_available(&self) -> bool {
        false
    }

    async fn restore(
        &self,
        _paths: &[PathBuf],
        _primary_key: &str,
        _fallback_keys: &[String],
    ) -> CacheResult<Option<String>> {
        Err(CacheError::BackendUnavailable)
    }

    async fn save(&self, _paths: &[PathBuf], _key: &str) -> CacheResult<()> {
        Err(CacheError::BackendUnavailable)
    }

    fn backend_name(&self) -> &'static str {
        "none"
    }
}

/// Pick the backend for a `--backend` value
pub fn create_backend(command: Option<&str>) -> Box<dyn CacheBackend> {
    match command.map(str::trim).filter(|cmd| !cmd.is_empty()) {
        Some(cmd) => Box::new(CommandBackend::new(cmd)),
        None => Box::new(UnavailableBackend),
    }
}
