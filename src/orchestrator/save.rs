//! Save phase, run at the end of the job

use crate::config::parse_bool_input;
use crate::error::CacheResult;
use crate::orchestrator::PhaseContext;
use crate::outputs::CACHE_ON_FAILURE_VAR;
use crate::state::STATE_KEY;
use tracing::{error, info};

/// Final status of the job being cached
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JobStatus {
    #[default]
    Success,
    Failure,
    Cancelled,
}

/// How the save phase ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Backend not available; nothing attempted
    Unavailable,
    /// Job did not succeed and `cache-on-failure` is off
    SkippedJobFailed,
    /// The restored key equals the current key
    UpToDate { key: String },
    /// A new entry was stored
    Saved { key: String },
    /// The phase failed; nothing was saved
    Errored,
}

/// Run the save phase. Never fails.
pub async fn save(ctx: &PhaseContext<'_>, status: JobStatus) -> SaveOutcome {
    if !ctx.backend.is_available().await {
        info!("Cache service is not available, skipping save");
        return SaveOutcome::Unavailable;
    }

    match run_save(ctx, status).await {
        Ok(outcome) => outcome,
        Err(e) => {
            error!("unexpected error occurred => {}", e);
            SaveOutcome::Errored
        }
    }
}

/// Save flow without the availability check or error containment
pub async fn run_save(ctx: &PhaseContext<'_>, status: JobStatus) -> CacheResult<SaveOutcome> {
    let cache_on_failure = ctx.inputs.cache_on_failure
        || ctx
            .env
            .get(CACHE_ON_FAILURE_VAR)
            .is_some_and(parse_bool_input);
    if status != JobStatus::Success && !cache_on_failure {
        info!("Job status is {:?}, not saving the cache.", status);
        return Ok(SaveOutcome::SkippedJobFailed);
    }

    let config = ctx.cache_config().await?;

    let restored = ctx.state.get(ctx.job_id(), STATE_KEY).await?;
    if restored.as_deref() == Some(config.cache_key()) {
        info!("cache is up to date.");
        return Ok(SaveOutcome::UpToDate {
            key: config.cache_key().to_string(),
        });
    }
    info!("cache is outdated.");

    ctx.backend
        .save(config.cache_paths(), config.cache_key())
        .await?;
    info!("cache saved under \"{}\"", config.cache_key());

    Ok(SaveOutcome::Saved {
        key: config.cache_key().to_string(),
    })
}
