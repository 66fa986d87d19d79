//! Cache key derivation for Zig projects
//!
//! Builds the [`CacheConfig`] for one phase from the probed toolchain, the
//! job environment and the project files.
//!
//! # Key shape
//!
//! ```text
//! <prefix>-<sha1(toolchain, env)>-<sha1(build files)>
//! \_____ restore key ___________/
//! \_____ cache key ______________________________/
//! ```
//!
//! A restore that only matches the restore key is a fallback hit: the
//! toolchain and environment are the same, the build files are not.

pub mod config;
pub mod environment;
pub mod key;
pub mod package_manager;
pub mod paths;
pub mod prefix;

pub use config::{CacheConfig, JOB_ID_VAR};
pub use environment::{select_env_vars, JobEnv, BASE_ENV_PREFIXES};
pub use key::{derive_cache_key, derive_restore_key, tracked_files};
pub use package_manager::{detect_package_manager, PackageManager};
pub use paths::{expand_home, resolve_cache_paths, LOCAL_CACHE_DIRS};
pub use prefix::build_key_prefix;
