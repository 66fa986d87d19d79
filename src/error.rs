//! Error types for zig-cache-step
//!
//! All modules use `CacheResult<T>` as their return type.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for zig-cache-step operations
pub type CacheResult<T> = Result<T, CacheError>;

/// All errors that can occur while deriving keys or running a cache phase
#[derive(Error, Debug)]
pub enum CacheError {
    // Toolchain errors
    #[error("Zig toolchain not found: {command}")]
    ToolchainNotFound {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Toolchain command failed: {command}, stderr: {stderr}")]
    ToolchainCommand { command: String, stderr: String },

    #[error("Unusable `zig env` output: {0}")]
    ToolchainEnv(String),

    // Backend errors
    #[error("Cache backend error during {operation}: {reason}")]
    Backend { operation: String, reason: String },

    /// Returned by adapters that cannot serve requests; the phases check
    /// `is_available` first and never surface it.
    #[error("Cache backend is not available")]
    BackendUnavailable,

    #[error("Failed to delete stale cache paths: {0}")]
    Cleanup(String),

    // State errors
    #[error("Failed to persist job state: {0}")]
    State(String),

    // Configuration errors
    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // General errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CacheError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a backend error for the given operation
    pub fn backend(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Backend {
            operation: operation.into(),
            reason: reason.into(),
        }
    }

    /// Whether this error came from probing the toolchain
    pub fn is_probe_error(&self) -> bool {
        matches!(
            self,
            Self::ToolchainNotFound { .. } | Self::ToolchainCommand { .. } | Self::ToolchainEnv(_)
        )
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::ToolchainNotFound { .. } => {
                Some("Install Zig first (e.g. with a setup-zig step) or pass --zig-exe")
            }
            Self::ConfigInvalid { .. } => Some("Check the keys in .zig-cache-step.toml"),
            _ => None,
        }
    }
}
