//! Restore phase, run at the start of the job

use crate::cache::{expand_home, CacheConfig};
use crate::error::{CacheError, CacheResult};
use crate::orchestrator::PhaseContext;
use crate::outputs::{CACHE_HIT_OUTPUT, CACHE_ON_FAILURE_VAR};
use crate::state::STATE_KEY;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, info, warn};

/// How the restore phase ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RestoreOutcome {
    /// Backend not available; nothing attempted
    Unavailable,
    /// The exact cache key was restored
    ExactHit { key: String },
    /// Only the restore key matched; the restored paths were deleted
    FallbackHit { key: String, removed: Vec<PathBuf> },
    /// Nothing matched
    Miss,
    /// The phase failed and was treated as a miss
    Errored,
}

impl RestoreOutcome {
    /// Value of the `cache-hit` output
    pub fn cache_hit(&self) -> bool {
        matches!(self, Self::ExactHit { .. })
    }
}

/// Run the restore phase. Never fails.
pub async fn restore(ctx: &PhaseContext<'_>) -> RestoreOutcome {
    if !ctx.backend.is_available().await {
        info!("Cache service is not available, skipping restore");
        if let Err(e) = ctx.state.remove(ctx.job_id(), STATE_KEY).await {
            warn!("Failed to clear recorded cache key: {}", e);
        }
        set_cache_hit(ctx, false).await;
        return RestoreOutcome::Unavailable;
    }

    match run_restore(ctx).await {
        Ok(outcome) => {
            set_cache_hit(ctx, outcome.cache_hit()).await;
            outcome
        }
        Err(e) => {
            error!("unexpected error occurred => {}", e);
            set_cache_hit(ctx, false).await;
            RestoreOutcome::Errored
        }
    }
}

/// Restore flow without the availability check or error containment
pub async fn run_restore(ctx: &PhaseContext<'_>) -> CacheResult<RestoreOutcome> {
    // A key left by an earlier run must not count as restored in this one
    ctx.state.remove(ctx.job_id(), STATE_KEY).await?;

    ctx.outputs
        .export_variable(
            CACHE_ON_FAILURE_VAR,
            &ctx.inputs.cache_on_failure.to_string(),
        )
        .await?;

    let config = ctx.cache_config().await?;

    info!("Restoring cache ...");
    let hit = ctx
        .backend
        .restore(
            config.cache_paths(),
            config.cache_key(),
            &[config.restore_key().to_string()],
        )
        .await?;

    let Some(key) = hit else {
        info!("No cache found.");
        return Ok(RestoreOutcome::Miss);
    };

    info!("Restored from cache key \"{}\".", key);
    ctx.state.set(ctx.job_id(), STATE_KEY, &key).await?;

    if key == config.cache_key() {
        return Ok(RestoreOutcome::ExactHit { key });
    }

    info!("Cache mismatch, cleaning cache.");
    let removed = remove_cache_paths(ctx.cwd, &config).await?;
    Ok(RestoreOutcome::FallbackHit { key, removed })
}

/// Delete every cache path that exists, returning what was removed
///
/// A path that cannot be deleted does not stop the others from being
/// deleted; the failures are reported together afterwards.
async fn remove_cache_paths(cwd: &Path, config: &CacheConfig) -> CacheResult<Vec<PathBuf>> {
    let mut removed = Vec::new();
    let mut failed = Vec::new();

    for path in config.cache_paths() {
        let resolved = cwd.join(expand_home(path));
        let metadata = match fs::symlink_metadata(&resolved).await {
            Ok(metadata) => metadata,
            Err(_) => continue,
        };

        info!("deleting \"{}\"", resolved.display());
        let result = if metadata.is_dir() {
            fs::remove_dir_all(&resolved).await
        } else {
            fs::remove_file(&resolved).await
        };
        match result {
            Ok(()) => removed.push(path.clone()),
            Err(e) => {
                warn!("Failed to delete \"{}\": {}", resolved.display(), e);
                failed.push(format!("{} ({})", resolved.display(), e));
            }
        }
    }

    if !failed.is_empty() {
        return Err(CacheError::Cleanup(failed.join(", ")));
    }
    Ok(removed)
}

async fn set_cache_hit(ctx: &PhaseContext<'_>, hit: bool) {
    if let Err(e) = ctx
        .outputs
        .set_output(CACHE_HIT_OUTPUT, &hit.to_string())
        .await
    {
        warn!("Failed to set {} output: {}", CACHE_HIT_OUTPUT, e);
    }
}
