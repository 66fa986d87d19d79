//! Human-readable cache key prefix
//!
//! The prefix is embedded verbatim in every published key, so its shape
//! must not change: parts after the first carry their own leading `-` and
//! everything is joined with `|`.

use crate::config::Inputs;

/// Build the key prefix from the inputs and the CI job id
pub fn build_key_prefix(inputs: &Inputs, job_id: Option<&str>) -> String {
    let mut parts = vec![inputs.prefix_key().to_string()];

    if !inputs.shared_key.is_empty() {
        parts.push(format!("-{}", inputs.shared_key));
    } else {
        if !inputs.key.is_empty() {
            parts.push(format!("-{}", inputs.key));
        }
        if let Some(job) = job_id.filter(|job| !job.is_empty()) {
            parts.push(format!("-{}", job));
        }
    }

    parts.join("|")
}
