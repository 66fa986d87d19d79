//! Paths persisted in the cache

use crate::cache::package_manager::{path_exists, PackageManager};
use std::path::{Path, PathBuf};

/// Project-local Zig cache directories (pre- and post-0.13 names)
pub const LOCAL_CACHE_DIRS: &[&str] = &["zig-cache", ".zig-cache"];

/// Resolve every path to restore and save, in call order
///
/// `extra_dirs` is the whitespace-separated `cache-directories` input; each
/// entry is kept verbatim. A manager's dependency directory is only added
/// when its lock file exists.
pub fn resolve_cache_paths(
    cwd: &Path,
    global_cache_dir: &Path,
    manager: PackageManager,
    extra_dirs: &str,
) -> Vec<PathBuf> {
    let mut paths = vec![global_cache_dir.to_path_buf()];
    paths.extend(LOCAL_CACHE_DIRS.iter().map(PathBuf::from));
    paths.extend(extra_dirs.split_whitespace().map(PathBuf::from));

    if let (Some(lockfile), Some(deps_dir)) = (manager.lockfile(), manager.deps_dir()) {
        if path_exists(&cwd.join(lockfile)) {
            paths.push(PathBuf::from(deps_dir));
        }
    }

    paths
}

/// Expand a leading `~/` against the home directory
pub fn expand_home(path: &Path) -> PathBuf {
    match path.strip_prefix("~") {
        Ok(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| path.to_path_buf()),
        Err(_) => path.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn global_dir_first_then_local_then_extra() {
        let dir = TempDir::new().unwrap();
        let paths = resolve_cache_paths(
            dir.path(),
            Path::new("/home/ci/.cache/zig"),
            PackageManager::None,
            " out\n  vendor/cache ",
        );

        assert_eq!(
            paths,
            vec![
                PathBuf::from("/home/ci/.cache/zig"),
                PathBuf::from("zig-cache"),
                PathBuf::from(".zig-cache"),
                PathBuf::from("out"),
                PathBuf::from("vendor/cache"),
            ]
        );
    }

    #[test]
    fn deps_dir_requires_lockfile() {
        let dir = TempDir::new().unwrap();
        let without = resolve_cache_paths(dir.path(), Path::new("/g"), PackageManager::Gyro, "");
        assert!(!without.contains(&PathBuf::from(".gyro")));

        fs::write(dir.path().join("gyro.lock"), "").unwrap();
        let with = resolve_cache_paths(dir.path(), Path::new("/g"), PackageManager::Gyro, "");
        assert_eq!(with.last(), Some(&PathBuf::from(".gyro")));
    }

    #[test]
    fn builtin_has_no_local_deps_dir() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("build.zig.zon"), "").unwrap();
        let paths = resolve_cache_paths(dir.path(), Path::new("/g"), PackageManager::Builtin, "");
        assert_eq!(paths.len(), 1 + LOCAL_CACHE_DIRS.len());
    }

    #[test]
    fn expand_home_only_touches_tilde() {
        assert_eq!(expand_home(Path::new("/abs")), PathBuf::from("/abs"));
        assert_eq!(expand_home(Path::new("rel/dir")), PathBuf::from("rel/dir"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_home(Path::new("~/.cache")), home.join(".cache"));
        }
    }
}
