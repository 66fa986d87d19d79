//! Input loading for zig-cache-step

pub mod schema;

pub use schema::{parse_bool_input, Inputs};

use crate::error::{CacheError, CacheResult};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Project-local input file name
pub const LOCAL_CONFIG_FILE: &str = ".zig-cache-step.toml";

/// Input values given on the command line or through `INPUT_*` variables
///
/// `None` leaves the file/default value untouched.
#[derive(Debug, Clone, Default)]
pub struct InputOverrides {
    pub prefix_key: Option<String>,
    pub shared_key: Option<String>,
    pub key: Option<String>,
    pub env_vars: Option<String>,
    pub cache_directories: Option<String>,
    pub cache_on_failure: Option<String>,
    pub zig_exe: Option<String>,
}

impl InputOverrides {
    /// Apply these overrides on top of `inputs`
    pub fn apply(self, mut inputs: Inputs) -> Inputs {
        if let Some(v) = self.prefix_key {
            inputs.prefix_key = v;
        }
        if let Some(v) = self.shared_key {
            inputs.shared_key = v;
        }
        if let Some(v) = self.key {
            inputs.key = v;
        }
        if let Some(v) = self.env_vars {
            inputs.env_vars = v;
        }
        if let Some(v) = self.cache_directories {
            inputs.cache_directories = v;
        }
        if let Some(v) = self.cache_on_failure {
            inputs.cache_on_failure = parse_bool_input(&v);
        }
        if let Some(v) = self.zig_exe {
            inputs.zig_exe = v;
        }
        inputs
    }
}

/// Input loader
pub struct InputsLoader {
    config_path: Option<PathBuf>,
}

impl InputsLoader {
    /// Loader without an input file (defaults only)
    pub fn new() -> Self {
        Self { config_path: None }
    }

    /// Loader reading the given TOML file
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            config_path: Some(path),
        }
    }

    /// Find `.zig-cache-step.toml` in `cwd`
    pub fn find_local_config(cwd: &Path) -> Option<PathBuf> {
        let candidate = cwd.join(LOCAL_CONFIG_FILE);
        candidate.is_file().then_some(candidate)
    }

    /// Load inputs, returning defaults when no file is configured
    pub async fn load(&self) -> CacheResult<Inputs> {
        match &self.config_path {
            Some(path) => Self::load_from_file(path).await,
            None => {
                debug!("No input file, using defaults");
                Ok(Inputs::default())
            }
        }
    }

    /// Load inputs from a specific file
    pub async fn load_from_file(path: &Path) -> CacheResult<Inputs> {
        let content = fs::read_to_string(path)
            .await
            .map_err(|e| CacheError::io(format!("reading inputs from {}", path.display()), e))?;

        toml::from_str(&content).map_err(|e| CacheError::ConfigInvalid {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Directory for cross-phase job state
    ///
    /// Prefers the runner's per-job temp dir so state never outlives the job.
    pub fn state_dir(runner_temp: Option<&str>) -> PathBuf {
        match runner_temp.filter(|dir| !dir.is_empty()) {
            Some(dir) => PathBuf::from(dir).join("zig-cache-step"),
            None => dirs::state_dir()
                .or_else(dirs::data_local_dir)
                .unwrap_or_else(std::env::temp_dir)
                .join("zig-cache-step"),
        }
    }
}

impl Default for InputsLoader {
    fn default() -> Self {
        Self::new()
    }
}
