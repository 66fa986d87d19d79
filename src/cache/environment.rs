//! Selection of key-relevant environment variables

use std::collections::BTreeSet;

/// Prefixes always considered: Zig itself, C/C++ compilers and flags, CMake
pub const BASE_ENV_PREFIXES: &[&str] = &["ZIG", "CC", "CFLAGS", "CXX", "CMAKE"];

/// Snapshot of the job's environment, read once per phase
#[derive(Debug, Clone, Default)]
pub struct JobEnv {
    vars: Vec<(String, String)>,
}

impl JobEnv {
    /// Capture the current process environment
    pub fn from_process() -> Self {
        Self {
            vars: std::env::vars_os()
                .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
                .collect(),
        }
    }

    /// Build from explicit pairs, keeping their order
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Look up a variable
    pub fn get(&self, name: &str) -> Option<&str> {
        self.vars
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Look up a variable, treating empty values as unset
    pub fn get_non_empty(&self, name: &str) -> Option<&str> {
        self.get(name).filter(|v| !v.is_empty())
    }

    /// All variables in discovery order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Select variables whose name starts with an active prefix and whose value
/// is non-empty. `extra_prefixes` is a whitespace-separated list.
///
/// The result keeps discovery order; hash it through
/// [`derive_restore_key`](crate::cache::derive_restore_key), which sorts.
pub fn select_env_vars(env: &JobEnv, extra_prefixes: &str) -> Vec<(String, String)> {
    let prefixes: BTreeSet<&str> = BASE_ENV_PREFIXES
        .iter()
        .copied()
        .chain(extra_prefixes.split_whitespace())
        .collect();

    env.iter()
        .filter(|(name, value)| {
            !value.is_empty() && prefixes.iter().any(|prefix| name.starts_with(prefix))
        })
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .collect()
}
