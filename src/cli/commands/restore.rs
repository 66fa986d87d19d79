//! Restore command - restore the cache at job start

use crate::cli::commands::Job;
use crate::error::CacheResult;
use crate::orchestrator;
use tracing::debug;

/// Execute the restore command
///
/// Always succeeds; failures were already downgraded to a miss.
pub async fn execute(job: &Job) -> CacheResult<()> {
    let outcome = orchestrator::restore(&job.phase()).await;
    debug!("Restore finished: {:?}", outcome);
    Ok(())
}
