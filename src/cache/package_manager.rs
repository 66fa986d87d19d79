//! Package manager detection
//!
//! Classifies a Zig project by the manifest files in its root. The first
//! manifest found in priority order wins.

use std::fmt;
use std::path::Path;
use tracing::debug;

/// Main build definition, always tracked
pub const BUILD_FILE: &str = "build.zig";

/// Builtin package manifest, tracked when present
pub const BUILD_ZON_FILE: &str = "build.zig.zon";

/// How a project declares its dependencies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PackageManager {
    /// No package manager detected
    #[default]
    None,
    /// zigmod (zigmod.yml, zigmod.lock)
    Zigmod,
    /// gyro (gyro.zzz, gyro.lock)
    Gyro,
    /// Zig's own package manager (build.zig.zon)
    Builtin,
}

impl PackageManager {
    /// Manifest file declaring dependencies; its presence identifies the manager
    pub fn manifest(&self) -> Option<&'static str> {
        match self {
            Self::None => None,
            Self::Zigmod => Some("zigmod.yml"),
            Self::Gyro => Some("gyro.zzz"),
            Self::Builtin => Some(BUILD_ZON_FILE),
        }
    }

    /// Lock file pinning dependency versions
    pub fn lockfile(&self) -> Option<&'static str> {
        match self {
            Self::Zigmod => Some("zigmod.lock"),
            Self::Gyro => Some("gyro.lock"),
            Self::None | Self::Builtin => None,
        }
    }

    /// Project-local directory holding fetched dependencies
    ///
    /// The builtin manager stores packages under the global cache
    /// directory, which is always cached.
    pub fn deps_dir(&self) -> Option<&'static str> {
        match self {
            Self::Zigmod => Some(".zigmod"),
            Self::Gyro => Some(".gyro"),
            Self::None | Self::Builtin => None,
        }
    }

    /// Managers in detection priority order
    fn all() -> &'static [Self] {
        &[Self::Zigmod, Self::Gyro, Self::Builtin]
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::None => "none",
            Self::Zigmod => "zigmod",
            Self::Gyro => "gyro",
            Self::Builtin => "builtin",
        };
        write!(f, "{}", name)
    }
}

/// Whether `path` exists; anything that cannot be stat'ed counts as missing
pub(crate) fn path_exists(path: &Path) -> bool {
    path.symlink_metadata().is_ok()
}

/// Detect the package manager used by the project in `cwd`
pub fn detect_package_manager(cwd: &Path) -> PackageManager {
    for manager in PackageManager::all() {
        let Some(manifest) = manager.manifest() else {
            continue;
        };
        if path_exists(&cwd.join(manifest)) {
            debug!("Found {} manifest: {}", manager, manifest);
            return *manager;
        }
    }

    debug!("No package manager manifest in {}", cwd.display());
    PackageManager::None
}
