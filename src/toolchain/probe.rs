//! Running the Zig executable

use crate::error::{CacheError, CacheResult};
use crate::toolchain::env_info::{EnvFormat, EnvInfo};
use crate::toolchain::ToolchainInfo;
use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, warn};

/// Source of raw toolchain introspection output
#[async_trait]
pub trait ToolchainRunner: Send + Sync {
    /// Raw stdout of `zig version`
    async fn version(&self) -> CacheResult<String>;

    /// Raw stdout of `zig env`
    async fn env(&self) -> CacheResult<String>;
}

/// Runs a real `zig` executable
pub struct ZigCommand {
    exe: String,
}

impl ZigCommand {
    /// Create a runner for the given executable name or path
    pub fn new(exe: impl Into<String>) -> Self {
        Self { exe: exe.into() }
    }

    /// Run `<exe> <arg>` and return its stdout
    async fn output(&self, arg: &str) -> CacheResult<String> {
        let command = format!("{} {}", self.exe, arg);
        debug!("Executing: {}", command);

        let output = Command::new(&self.exe)
            .arg(arg)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| CacheError::ToolchainNotFound {
                command: command.clone(),
                source: e,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            warn!("Command failed: {}", command);
            warn!("{}", stderr);
            return Err(CacheError::ToolchainCommand { command, stderr });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Default for ZigCommand {
    fn default() -> Self {
        Self::new("zig")
    }
}

#[async_trait]
impl ToolchainRunner for ZigCommand {
    async fn version(&self) -> CacheResult<String> {
        self.output("version").await
    }

    async fn env(&self) -> CacheResult<String> {
        self.output("env").await
    }
}

/// Probe the installed toolchain for its version, target and cache directory
pub async fn probe(runner: &dyn ToolchainRunner) -> CacheResult<ToolchainInfo> {
    let version = runner.version().await?.trim().to_string();
    if version.is_empty() {
        return Err(CacheError::ToolchainEnv(
            "`zig version` printed nothing".to_string(),
        ));
    }

    let raw_env = runner.env().await?;
    let (env, format) = EnvInfo::parse(&raw_env);
    if format == EnvFormat::Lines {
        debug!("Decoded `zig env` with the line-oriented fallback");
    }

    let global_cache_dir = env
        .global_cache_dir
        .filter(|dir| !dir.is_empty())
        .ok_or_else(|| CacheError::ToolchainEnv("missing global_cache_dir".to_string()))?;
    let target = env
        .target
        .filter(|target| !target.is_empty())
        .ok_or_else(|| CacheError::ToolchainEnv("missing target".to_string()))?;

    debug!("Probed zig {} for {}", version, target);
    Ok(ToolchainInfo {
        version,
        global_cache_dir: PathBuf::from(global_cache_dir),
        target,
    })
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Canned toolchain output
    #[derive(Default)]
    pub(crate) struct FakeZig {
        pub version: String,
        pub env: String,
        pub calls: AtomicUsize,
    }

    impl FakeZig {
        pub(crate) fn json(version: &str, cache_dir: &str, target: &str) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                version: format!("{}\n", version),
                env: serde_json::json!({
                    "zig_exe": "/usr/bin/zig",
                    "global_cache_dir": cache_dir,
                    "version": version,
                    "target": target,
                })
                .to_string(),
            }
        }
    }

    #[async_trait]
    impl ToolchainRunner for FakeZig {
        async fn version(&self) -> CacheResult<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.version.clone())
        }

        async fn env(&self) -> CacheResult<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.env.clone())
        }
    }

    #[tokio::test]
    async fn probe_trims_version() {
        let zig = FakeZig::json("0.11.0", "/home/ci/.cache/zig", "x86_64-linux");
        let info = probe(&zig).await.unwrap();

        assert_eq!(info.version, "0.11.0");
        assert_eq!(info.global_cache_dir, PathBuf::from("/home/ci/.cache/zig"));
        assert_eq!(info.target, "x86_64-linux");
    }

    #[tokio::test]
    async fn json_and_lines_agree() {
        let json = FakeZig::json("0.11.0", "/home/ci/.cache/zig", "x86_64-linux");
        let lines = FakeZig {
            version: "0.11.0".to_string(),
            env: "zig_exe=/usr/bin/zig\nglobal_cache_dir=\"/home/ci/.cache/zig\"\ntarget=x86_64-linux\n"
                .to_string(),
            ..FakeZig::default()
        };

        assert_eq!(probe(&json).await.unwrap(), probe(&lines).await.unwrap());
    }

    #[tokio::test]
    async fn missing_target_is_probe_error() {
        let zig = FakeZig {
            version: "0.11.0".to_string(),
            env: r#"{"global_cache_dir": "/c"}"#.to_string(),
            ..FakeZig::default()
        };

        let err = probe(&zig).await.unwrap_err();
        assert!(err.is_probe_error());
        assert!(err.to_string().contains("missing target"));
    }

    #[tokio::test]
    async fn missing_executable_is_not_found() {
        let zig = ZigCommand::new("zig-cache-step-no-such-zig");
        let err = probe(&zig).await.unwrap_err();
        assert!(matches!(err, CacheError::ToolchainNotFound { .. }));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn non_zero_exit_is_command_error() {
        let zig = ZigCommand::new("false");
        let err = zig.version().await.unwrap_err();
        assert!(matches!(err, CacheError::ToolchainCommand { .. }));
    }
}
