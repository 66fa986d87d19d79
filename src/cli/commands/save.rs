//! Save command - save the cache at job end

use crate::cli::args::SaveArgs;
use crate::cli::commands::Job;
use crate::error::CacheResult;
use crate::orchestrator;
use tracing::debug;

/// Execute the save command
pub async fn execute(args: SaveArgs, job: &Job) -> CacheResult<()> {
    let outcome = orchestrator::save(&job.phase(), args.job_status.into()).await;
    debug!("Save finished: {:?}", outcome);
    Ok(())
}
