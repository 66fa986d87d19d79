//! Backend adapter for an external helper executable
//!
//! Protocol:
//!
//! | Call | Invocation | Result |
//! |------|------------|--------|
//! | available | `<cmd> available` | exit 0 means available |
//! | restore | `<cmd> restore <primary> [<fallback>...] -- <paths...>` | stdout is the matched key, empty on miss |
//! | save | `<cmd> save <key> -- <paths...>` | exit 0 on success |

use crate::backend::CacheBackend;
use crate::error::{CacheError, CacheResult};
use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

/// Cache backend driven through a helper command
pub struct CommandBackend {
    program: String,
    base_args: Vec<String>,
}

impl CommandBackend {
    /// Create a backend from a command line such as `node cache-helper.js`
    ///
    /// The line is split on whitespace; the first word is the program.
    pub fn new(command_line: impl AsRef<str>) -> Self {
        let mut words = command_line.as_ref().split_whitespace().map(str::to_string);
        Self {
            program: words.next().unwrap_or_default(),
            base_args: words.collect(),
        }
    }

    /// Execute the helper and return its output
    async fn exec(&self, operation: &str, args: &[String]) -> CacheResult<std::process::Output> {
        debug!("Executing: {} {} {:?}", self.program, operation, args);

        Command::new(&self.program)
            .args(&self.base_args)
            .arg(operation)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| CacheError::backend(operation, format!("{}: {}", self.program, e)))
    }

    /// Execute the helper, turning a non-zero exit into an error
    async fn exec_checked(&self, operation: &str, args: &[String]) -> CacheResult<String> {
        let output = self.exec(operation, args).await?;

        if output.status.success() {
            Ok(String::from_utf8_lossy(&output.stdout).into_owned())
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Err(CacheError::backend(operation, stderr.trim()))
        }
    }
}

/// Keys, then `--`, then paths
fn key_and_path_args(keys: &[&str], paths: &[PathBuf]) -> Vec<String> {
    keys.iter()
        .map(|key| key.to_string())
        .chain(std::iter::once("--".to_string()))
        .chain(paths.iter().map(|p| p.to_string_lossy().into_owned()))
        .collect()
}

#[async_trait]
impl CacheBackend for CommandBackend {
    async fn is_available(&self) -> bool {
        match self.exec("available", &[]).await {
            Ok(output) => output.status.success(),
            Err(e) => {
                debug!("Cache backend probe failed: {}", e);
                false
            }
        }
    }

    async fn restore(
        &self,
        paths: &[PathBuf],
        primary_key: &str,
        fallback_keys: &[String],
    ) -> CacheResult<Option<String>> {
        let keys: Vec<&str> = std::iter::once(primary_key)
            .chain(fallback_keys.iter().map(String::as_str))
            .collect();

        let stdout = self
            .exec_checked("restore", &key_and_path_args(&keys, paths))
            .await?;
        let matched = stdout.trim();

        Ok((!matched.is_empty()).then(|| matched.to_string()))
    }

    async fn save(&self, paths: &[PathBuf], key: &str) -> CacheResult<()> {
        self.exec_checked("save", &key_and_path_args(&[key], paths))
            .await
            .map(|_| ())
    }

    fn backend_name(&self) -> &'static str {
        "command"
    }
}
