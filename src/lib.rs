//! zig-cache-step - CI cache helper for Zig build artifacts
//!
//! Derives a deterministic cache key from the installed Zig toolchain, the
//! relevant environment and the project's build files, restores the
//! matching cache at job start and saves it again at job end when the key
//! changed.

pub mod backend;
pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod orchestrator;
pub mod outputs;
pub mod state;
pub mod toolchain;

pub use error::{CacheError, CacheResult};
