//! Decoding of `zig env` output
//!
//! Older Zig releases print a JSON object, newer ones print a ZON struct
//! literal, and wrappers sometimes print shell-style `key=value` lines. The
//! JSON decoder is tried first; everything else goes through a line decoder
//! that never fails.

use serde::Deserialize;
use std::collections::HashMap;
use tracing::debug;

/// Which decoder produced an [`EnvInfo`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvFormat {
    /// Structured JSON object
    Json,
    /// Line-oriented `key=value` fallback
    Lines,
}

/// Facts extracted from `zig env`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EnvInfo {
    /// Zig's global cache directory
    #[serde(default)]
    pub global_cache_dir: Option<String>,

    /// Host target triple
    #[serde(default)]
    pub target: Option<String>,
}

impl EnvInfo {
    /// Decode raw `zig env` output, reporting which format matched
    pub fn parse(raw: &str) -> (Self, EnvFormat) {
        match serde_json::from_str::<EnvInfo>(raw) {
            Ok(info) => (info, EnvFormat::Json),
            Err(e) => {
                debug!("`zig env` output is not JSON ({}), using line decoder", e);
                (Self::parse_lines(raw), EnvFormat::Lines)
            }
        }
    }

    /// Line-oriented decoder; unparseable lines are skipped
    pub fn parse_lines(raw: &str) -> Self {
        let mut fields: HashMap<String, String> = raw.lines().filter_map(parse_line).collect();

        Self {
            global_cache_dir: fields.remove("global_cache_dir"),
            target: fields.remove("target"),
        }
    }
}

/// Parse a single `key=value` line. A key without `=` maps to "".
fn parse_line(line: &str) -> Option<(String, String)> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let (key, value) = line.split_once('=').unwrap_or((line, ""));

    // ZON fields look like `.name = "value",`
    let key = key.trim().trim_start_matches('.');
    if key.is_empty() || !key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return None;
    }

    let value = value.trim();
    let value = value.strip_suffix(',').unwrap_or(value).trim_end();

    Some((key.to_string(), strip_quotes(value).to_string()))
}

/// Remove exactly one layer of matching surrounding quotes
fn strip_quotes(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}
