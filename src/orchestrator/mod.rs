//! Restore and save phases
//!
//! Each phase builds a fresh [`CacheConfig`] and talks to the backend
//! sequentially. The only thing carried between phases is the key the
//! restore phase actually hit, recorded in the [`StateStore`] under the job
//! id.
//!
//! The entry points [`restore`] and [`save`] never fail: any error is logged
//! and downgraded to `cache-hit=false` or to not saving, so a caching
//! problem cannot fail the build.

mod restore;
mod save;

pub use restore::{restore, run_restore, RestoreOutcome};
pub use save::{run_save, save, JobStatus, SaveOutcome};

use crate::backend::CacheBackend;
use crate::cache::{CacheConfig, JobEnv, JOB_ID_VAR};
use crate::config::Inputs;
use crate::error::CacheResult;
use crate::outputs::OutputSink;
use crate::state::StateStore;
use crate::toolchain::{probe, ToolchainRunner};
use std::path::Path;

/// Job id used when the CI does not provide one
pub const DEFAULT_JOB_ID: &str = "default";

/// Collaborators and inputs for one phase
pub struct PhaseContext<'a> {
    /// Project checkout
    pub cwd: &'a Path,
    /// Resolved inputs
    pub inputs: &'a Inputs,
    /// Environment snapshot
    pub env: &'a JobEnv,
    /// Toolchain to probe
    pub toolchain: &'a dyn ToolchainRunner,
    /// Cache storage
    pub backend: &'a dyn CacheBackend,
    /// Cross-phase state
    pub state: &'a dyn StateStore,
    /// Step outputs
    pub outputs: &'a dyn OutputSink,
}

impl PhaseContext<'_> {
    /// Job id scoping the cross-phase state
    pub fn job_id(&self) -> &str {
        self.env.get_non_empty(JOB_ID_VAR).unwrap_or(DEFAULT_JOB_ID)
    }

    /// Probe the toolchain and derive this phase's cache configuration
    pub async fn cache_config(&self) -> CacheResult<CacheConfig> {
        let toolchain = probe(self.toolchain).await?;
        let config = CacheConfig::build(self.cwd, self.inputs, self.env, &toolchain).await?;
        config.log_summary();
        Ok(config)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::PhaseContext;
    use crate::backend::CacheBackend;
    use crate::cache::JobEnv;
    use crate::config::Inputs;
    use crate::error::{CacheError, CacheResult};
    use crate::outputs::OutputSink;
    use crate::state::MemoryStateStore;
    use crate::toolchain::FakeZig;
    use async_trait::async_trait;
    use std::path::PathBuf;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// A Zig project in a temp dir with canned collaborators
    pub(crate) struct Fixture {
        pub dir: TempDir,
        pub inputs: Inputs,
        pub env: JobEnv,
        pub zig: FakeZig,
        pub state: MemoryStateStore,
        pub outputs: RecordingOutputs,
    }

    impl Fixture {
        pub(crate) fn new() -> Self {
            let dir = TempDir::new().unwrap();
            std::fs::write(dir.path().join("build.zig"), "pub fn build() void {}").unwrap();
            let global = dir.path().join("global-cache");

            Self {
                zig: FakeZig::json("0.11.0", &global.to_string_lossy(), "x86_64-linux"),
                dir,
                inputs: Inputs::default(),
                env: JobEnv::from_pairs([("GITHUB_JOB", "build"), ("CC", "zig cc")]),
                state: MemoryStateStore::new(),
                outputs: RecordingOutputs::default(),
            }
        }

        pub(crate) fn ctx<'a>(&'a self, backend: &'a FakeBackend) -> PhaseContext<'a> {
            PhaseContext {
                cwd: self.dir.path(),
                inputs: &self.inputs,
                env: &self.env,
                toolchain: &self.zig,
                backend,
                state: &self.state,
                outputs: &self.outputs,
            }
        }
    }

    /// Scripted backend recording every call
    #[derive(Default)]
    pub(crate) struct FakeBackend {
        pub unavailable: bool,
        pub restore_result: Option<String>,
        pub fail_restore: bool,
        pub fail_save: bool,
        pub restores: Mutex<Vec<(String, Vec<String>)>>,
        pub saves: Mutex<Vec<(Vec<PathBuf>, String)>>,
    }

    #[async_trait]
    impl CacheBackend for FakeBackend {
        async fn is_available(&self) -> bool {
            !self.unavailable
        }

        async fn restore(
            &self,
            _paths: &[PathBuf],
            primary_key: &str,
            fallback_keys: &[String],
        ) -> CacheResult<Option<String>> {
            self.restores
                .lock()
                .unwrap()
                .push((primary_key.to_string(), fallback_keys.to_vec()));
            if self.fail_restore {
                return Err(CacheError::backend("restore", "503 Service Unavailable"));
            }
            Ok(self.restore_result.clone())
        }

        async fn save(&self, paths: &[PathBuf], key: &str) -> CacheResult<()> {
            self.saves
                .lock()
                .unwrap()
                .push((paths.to_vec(), key.to_string()));
            if self.fail_save {
                return Err(CacheError::backend("save", "another job is saving this key"));
            }
            Ok(())
        }

        fn backend_name(&self) -> &'static str {
            "fake"
        }
    }

    /// Captures outputs and exported variables
    #[derive(Default)]
    pub(crate) struct RecordingOutputs {
        pub outputs: Mutex<Vec<(String, String)>>,
        pub exports: Mutex<Vec<(String, String)>>,
    }

    impl RecordingOutputs {
        pub(crate) fn output(&self, name: &str) -> Option<String> {
            self.outputs
                .lock()
                .unwrap()
                .iter()
                .rev()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.clone())
        }
    }

    #[async_trait]
    impl OutputSink for RecordingOutputs {
        async fn set_output(&self, name: &str, value: &str) -> CacheResult<()> {
            self.outputs
                .lock()
                .unwrap()
                .push((name.to_string(), value.to_string()));
            Ok(())
        }

        async fn export_variable(&self, name: &str, value: &str) -> CacheResult<()> {
            self.exports
                .lock()
                .unwrap()
                .push((name.to_string(), value.to_string()));
            Ok(())
        }
    }
}
