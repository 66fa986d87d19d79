//! The per-phase cache configuration aggregate

use crate::cache::environment::{select_env_vars, JobEnv};
use crate::cache::key::{derive_cache_key, derive_restore_key, tracked_files};
use crate::cache::package_manager::{detect_package_manager, PackageManager};
use crate::cache::paths::resolve_cache_paths;
use crate::cache::prefix::build_key_prefix;
use crate::config::Inputs;
use crate::error::CacheResult;
use crate::toolchain::ToolchainInfo;
use std::path::{Path, PathBuf};
use tracing::info;

/// Environment variable carrying the CI job id
pub const JOB_ID_VAR: &str = "GITHUB_JOB";

/// Everything that identifies and locates one cache entry
///
/// Built once per phase by [`CacheConfig::build`] and never mutated.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    cache_paths: Vec<PathBuf>,
    key_prefix: String,
    key_toolchain: String,
    restore_key: String,
    cache_key: String,
    tracked_env_names: Vec<String>,
    tracked_files: Vec<PathBuf>,
    package_manager: PackageManager,
}

impl CacheConfig {
    /// Derive keys and paths for the project in `cwd`
    pub async fn build(
        cwd: &Path,
        inputs: &Inputs,
        env: &JobEnv,
        toolchain: &ToolchainInfo,
    ) -> CacheResult<Self> {
        let key_prefix = build_key_prefix(inputs, env.get(JOB_ID_VAR));

        let env_vars = select_env_vars(env, &inputs.env_vars);
        let restore_key = derive_restore_key(&key_prefix, toolchain, &env_vars);

        let package_manager = detect_package_manager(cwd);
        let tracked_files = tracked_files(cwd, package_manager);
        let cache_key = derive_cache_key(&restore_key, &tracked_files).await?;

        let cache_paths = resolve_cache_paths(
            cwd,
            &toolchain.global_cache_dir,
            package_manager,
            &inputs.cache_directories,
        );

        Ok(Self {
            cache_paths,
            key_prefix,
            key_toolchain: toolchain.key_material(),
            restore_key,
            cache_key,
            tracked_env_names: env_vars.into_iter().map(|(name, _)| name).collect(),
            tracked_files,
            package_manager,
        })
    }

    pub fn cache_paths(&self) -> &[PathBuf] {
        &self.cache_paths
    }

    pub fn key_prefix(&self) -> &str {
        &self.key_prefix
    }

    pub fn restore_key(&self) -> &str {
        &self.restore_key
    }

    pub fn cache_key(&self) -> &str {
        &self.cache_key
    }

    pub fn tracked_env_names(&self) -> &[String] {
        &self.tracked_env_names
    }

    pub fn tracked_files(&self) -> &[PathBuf] {
        &self.tracked_files
    }

    pub fn package_manager(&self) -> PackageManager {
        self.package_manager
    }

    /// Log the configuration the way CI users read it
    pub fn log_summary(&self) {
        info!("Cache Configuration");
        info!("Cache Paths:");
        for path in &self.cache_paths {
            info!("    {}", path.display());
        }
        info!("Restore Key:");
        info!("    {}", self.restore_key);
        info!("Cache Key:");
        info!("    {}", self.cache_key);
        info!(".. Prefix:");
        info!("  - {}", self.key_prefix);
        info!(".. Environment considered:");
        info!("  - Zig Version: {}", self.key_toolchain);
        for name in &self.tracked_env_names {
            info!("  - {}", name);
        }
        info!(".. Package manager: {}", self.package_manager);
        info!(".. Lockfiles considered:");
        for file in &self.tracked_files {
            info!("  - {}", file.display());
        }
    }
}
