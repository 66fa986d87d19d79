//! Input schema for zig-cache-step
//!
//! Inputs can come from `.zig-cache-step.toml`, CLI flags, or the
//! `INPUT_*` variables GitHub Actions sets for a step. The TOML keys use the
//! same kebab-case names as the action inputs.

use serde::{Deserialize, Serialize};

/// Default value of `prefix-key`
pub const DEFAULT_PREFIX_KEY: &str = "zig-cache-step-0";

/// Default toolchain executable
pub const DEFAULT_ZIG_EXE: &str = "zig";

/// Recognized cache inputs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Inputs {
    /// Leading component of every key
    pub prefix_key: String,

    /// Key shared across jobs; replaces `key` and the job id
    pub shared_key: String,

    /// Extra key component, followed by the job id
    pub key: String,

    /// Whitespace-separated extra environment variable prefixes
    pub env_vars: String,

    /// Whitespace-separated extra directories to cache
    pub cache_directories: String,

    /// Save the cache even when the job failed
    pub cache_on_failure: bool,

    /// Zig executable name or path
    pub zig_exe: String,
}

impl Default for Inputs {
    fn default() -> Self {
        Self {
            prefix_key: DEFAULT_PREFIX_KEY.to_string(),
            shared_key: String::new(),
            key: String::new(),
            env_vars: String::new(),
            cache_directories: String::new(),
            cache_on_failure: false,
            zig_exe: DEFAULT_ZIG_EXE.to_string(),
        }
    }
}

impl Inputs {
    /// `prefix-key`, falling back to the default when empty
    pub fn prefix_key(&self) -> &str {
        if self.prefix_key.is_empty() {
            DEFAULT_PREFIX_KEY
        } else {
            &self.prefix_key
        }
    }

    /// Zig executable, falling back to `zig` when empty
    pub fn zig_exe(&self) -> &str {
        if self.zig_exe.is_empty() {
            DEFAULT_ZIG_EXE
        } else {
            &self.zig_exe
        }
    }
}

/// Parse an action boolean input: only a case-insensitive "true" is true
pub fn parse_bool_input(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("true")
}
