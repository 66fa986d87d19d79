//! Zig toolchain introspection
//!
//! Produces a [`ToolchainInfo`] once per phase from `zig version` and
//! `zig env`. The info is never persisted.

mod env_info;
mod probe;

pub use env_info::{EnvFormat, EnvInfo};
pub use probe::{probe, ToolchainRunner, ZigCommand};

#[cfg(test)]
pub(crate) use probe::tests::FakeZig;

use std::path::PathBuf;

/// Facts about the installed toolchain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolchainInfo {
    /// Trimmed `zig version` output
    pub version: String,
    /// Zig's global cache directory
    pub global_cache_dir: PathBuf,
    /// Host target triple
    pub target: String,
}

impl ToolchainInfo {
    /// The string that identifies this toolchain in the restore key
    pub fn key_material(&self) -> String {
        format!("{} {}", self.version, self.target)
    }
}
