//! Step outputs and exported variables
//!
//! On GitHub Actions, outputs are appended to the file named by
//! `GITHUB_OUTPUT` and exported variables to the one named by `GITHUB_ENV`.
//! Elsewhere outputs go to stdout.

use crate::cache::JobEnv;
use crate::error::{CacheError, CacheResult};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

/// Output reporting whether the exact key was restored
pub const CACHE_HIT_OUTPUT: &str = "cache-hit";

/// Variable exported so a later step can gate the save phase
pub const CACHE_ON_FAILURE_VAR: &str = "CACHE_ON_FAILURE";

/// Destination for step outputs
#[async_trait]
pub trait OutputSink: Send + Sync {
    /// Set a step output
    async fn set_output(&self, name: &str, value: &str) -> CacheResult<()>;

    /// Export a variable to the following steps of the job
    async fn export_variable(&self, name: &str, value: &str) -> CacheResult<()>;
}

/// GitHub Actions output files, with a stdout fallback
pub struct GithubOutputs {
    output_file: Option<PathBuf>,
    env_file: Option<PathBuf>,
}

impl GithubOutputs {
    pub fn new(output_file: Option<PathBuf>, env_file: Option<PathBuf>) -> Self {
        Self {
            output_file,
            env_file,
        }
    }

    /// Use `GITHUB_OUTPUT` / `GITHUB_ENV` from the job environment
    pub fn from_env(env: &JobEnv) -> Self {
        Self::new(
            env.get_non_empty("GITHUB_OUTPUT").map(PathBuf::from),
            env.get_non_empty("GITHUB_ENV").map(PathBuf::from),
        )
    }

    async fn append(path: &Path, name: &str, value: &str) -> CacheResult<()> {
        let line = format!("{}={}\n", name, value);

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await
            .map_err(|e| CacheError::io(format!("opening {}", path.display()), e))?;

        file.write_all(line.as_bytes())
            .await
            .map_err(|e| CacheError::io(format!("writing {}", path.display()), e))?;
        file.flush()
            .await
            .map_err(|e| CacheError::io(format!("flushing {}", path.display()), e))?;
        Ok(())
    }
}

#[async_trait]
impl OutputSink for GithubOutputs {
    async fn set_output(&self, name: &str, value: &str) -> CacheResult<()> {
        info!("Output {} = {}", name, value);
        match &self.output_file {
            Some(path) => Self::append(path, name, value).await,
            None => {
                println!("{}={}", name, value);
                Ok(())
            }
        }
    }

    async fn export_variable(&self, name: &str, value: &str) -> CacheResult<()> {
        match &self.env_file {
            Some(path) => Self::append(path, name, value).await,
            None => {
                debug!("No GITHUB_ENV, not exporting {}={}", name, value);
                Ok(())
            }
        }
    }
}
