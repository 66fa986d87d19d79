//! CLI argument definitions using clap derive

use crate::config::InputOverrides;
use crate::orchestrator::JobStatus;
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// zig-cache-step - CI cache helper for Zig build artifacts
///
/// Derives a cache key from the Zig toolchain, the environment and the
/// build files, restores the matching cache at job start and saves it at
/// job end.
#[derive(Parser, Debug)]
#[command(name = "zig-cache-step")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Input file path (TOML, same keys as the action inputs)
    #[arg(short, long, global = true, env = "ZIG_CACHE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Skip local .zig-cache-step.toml discovery
    #[arg(long, global = true)]
    pub no_local: bool,

    /// Project directory (defaults to current directory)
    #[arg(short = 'C', long, global = true)]
    pub directory: Option<PathBuf>,

    /// Cache backend helper command
    #[arg(long, global = true, env = "ZIG_CACHE_BACKEND")]
    pub backend: Option<String>,

    #[command(flatten)]
    pub inputs: InputArgs,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Restore the cache (run at job start)
    Restore,

    /// Save the cache if it changed (run at job end)
    Save(SaveArgs),

    /// Show the derived cache configuration without touching the backend
    Info,
}

/// Arguments for the save command
#[derive(Parser, Debug)]
pub struct SaveArgs {
    /// Status of the job so far
    #[arg(long, value_enum, default_value_t = JobStatusArg::Success, env = "ZIG_CACHE_JOB_STATUS")]
    pub job_status: JobStatusArg,
}

/// Job status as given on the command line
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JobStatusArg {
    #[default]
    Success,
    Failure,
    Cancelled,
}

impl From<JobStatusArg> for JobStatus {
    fn from(status: JobStatusArg) -> Self {
        match status {
            JobStatusArg::Success => JobStatus::Success,
            JobStatusArg::Failure => JobStatus::Failure,
            JobStatusArg::Cancelled => JobStatus::Cancelled,
        }
    }
}

/// Action inputs, also read from the `INPUT_*` variables of a step
#[derive(Args, Debug, Default)]
pub struct InputArgs {
    /// Leading component of the cache key [default: zig-cache-step-0]
    #[arg(long, global = true, env = "INPUT_PREFIX-KEY")]
    pub prefix_key: Option<String>,

    /// Key shared across jobs (replaces --key and the job id)
    #[arg(long, global = true, env = "INPUT_SHARED-KEY")]
    pub shared_key: Option<String>,

    /// Additional key component
    #[arg(long, global = true, env = "INPUT_KEY")]
    pub key: Option<String>,

    /// Extra environment variable prefixes, whitespace separated
    #[arg(long, global = true, env = "INPUT_ENV-VARS")]
    pub env_vars: Option<String>,

    /// Extra directories to cache, whitespace separated
    #[arg(long, global = true, env = "INPUT_CACHE-DIRECTORIES")]
    pub cache_directories: Option<String>,

    /// Save the cache even if the job failed ("true"/"false")
    #[arg(long, global = true, env = "INPUT_CACHE-ON-FAILURE")]
    pub cache_on_failure: Option<String>,

    /// Zig executable [default: zig]
    #[arg(long, global = true, env = "INPUT_ZIG-EXE")]
    pub zig_exe: Option<String>,
}

impl From<InputArgs> for InputOverrides {
    fn from(args: InputArgs) -> Self {
        Self {
            prefix_key: args.prefix_key,
            shared_key: args.shared_key,
            key: args.key,
            env_vars: args.env_vars,
            cache_directories: args.cache_directories,
            cache_on_failure: args.cache_on_failure,
            zig_exe: args.zig_exe,
        }
    }
}
