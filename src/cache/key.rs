//! Two-stage cache key derivation
//!
//! The restore key hashes the toolchain identity and the selected
//! environment. The cache key extends it with a hash of the tracked build
//! files, so a one-byte change to `build.zig` produces a new cache key while
//! the restore key still matches the previous entry.

use crate::cache::package_manager::{PackageManager, BUILD_FILE, BUILD_ZON_FILE};
use crate::error::{CacheError, CacheResult};
use crate::toolchain::ToolchainInfo;
use sha1::{Digest, Sha1};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::AsyncReadExt;
use tracing::debug;

const READ_CHUNK: usize = 64 * 1024;

/// Derive the restore key: `prefix-sha1(toolchain, sorted env)`
///
/// Each piece is a separate digest update with no delimiter between them:
/// first `"<version> <target>"`, then `"NAME=value"` per variable in
/// ascending name order.
pub fn derive_restore_key(
    prefix: &str,
    toolchain: &ToolchainInfo,
    env: &[(String, String)],
) -> String {
    let mut sorted: Vec<&(String, String)> = env.iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(&b.0));

    let mut hasher = Sha1::new();
    hasher.update(toolchain.key_material().as_bytes());
    for (name, value) in sorted {
        hasher.update(format!("{}={}", name, value).as_bytes());
    }

    format!("{}-{}", prefix, hex::encode(hasher.finalize()))
}

/// Files whose content feeds the cache key, in hashing order
///
/// Only files that exist are returned.
pub fn tracked_files(cwd: &Path, manager: PackageManager) -> Vec<PathBuf> {
    let mut names = vec![BUILD_FILE, BUILD_ZON_FILE];
    for name in [manager.manifest(), manager.lockfile()].into_iter().flatten() {
        if !names.contains(&name) {
            names.push(name);
        }
    }

    names
        .into_iter()
        .map(|name| cwd.join(name))
        .filter(|path| {
            let found = path.is_file();
            if !found {
                debug!("Skipping missing key file {}", path.display());
            }
            found
        })
        .collect()
}

/// Derive the cache key: `restore_key-sha1(file bytes...)`
pub async fn derive_cache_key(restore_key: &str, files: &[PathBuf]) -> CacheResult<String> {
    let mut hasher = Sha1::new();
    let mut buf = vec![0u8; READ_CHUNK];

    for path in files {
        let mut file = match File::open(path).await {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("Key file vanished before hashing: {}", path.display());
                continue;
            }
            Err(e) => {
                return Err(CacheError::io(format!("opening {}", path.display()), e));
            }
        };

        loop {
            let n = file
                .read(&mut buf)
                .await
                .map_err(|e| CacheError::io(format!("reading {}", path.display()), e))?;
            if n == 0 {
                break;
            }
            hasher.update(&buf[..n]);
        }
    }

    Ok(format!("{}-{}", restore_key, hex::encode(hasher.finalize())))
}
