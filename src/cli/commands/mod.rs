//! CLI command implementations

pub mod info;
pub mod restore;
pub mod save;

pub use info::execute as info;
pub use restore::execute as restore;
pub use save::execute as save;

use crate::backend::{create_backend, CacheBackend};
use crate::cache::JobEnv;
use crate::config::{Inputs, InputsLoader};
use crate::orchestrator::PhaseContext;
use crate::outputs::GithubOutputs;
use crate::state::FileStateStore;
use crate::toolchain::ZigCommand;
use std::path::PathBuf;
use tracing::debug;

/// Process-level collaborators for one invocation
pub struct Job {
    cwd: PathBuf,
    inputs: Inputs,
    env: JobEnv,
    zig: ZigCommand,
    backend: Box<dyn CacheBackend>,
    state: FileStateStore,
    outputs: GithubOutputs,
}

impl Job {
    /// Wire the real toolchain, backend, state and outputs
    pub fn new(cwd: PathBuf, inputs: Inputs, backend: Option<&str>) -> Self {
        let env = JobEnv::from_process();
        let state_dir = InputsLoader::state_dir(env.get("RUNNER_TEMP"));
        let backend = create_backend(backend);
        debug!(
            "Using {} backend, state in {}",
            backend.backend_name(),
            state_dir.display()
        );

        Self {
            zig: ZigCommand::new(inputs.zig_exe()),
            outputs: GithubOutputs::from_env(&env),
            state: FileStateStore::new(state_dir),
            backend,
            cwd,
            inputs,
            env,
        }
    }

    /// Borrow everything as a phase context
    pub fn phase(&self) -> PhaseContext<'_> {
        PhaseContext {
            cwd: &self.cwd,
            inputs: &self.inputs,
            env: &self.env,
            toolchain: &self.zig,
            backend: self.backend.as_ref(),
            state: &self.state,
            outputs: &self.outputs,
        }
    }
}
