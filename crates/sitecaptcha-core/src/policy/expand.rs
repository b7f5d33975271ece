//! Comma expansion of multi-path catalog keys.

use super::{FormPolicyMap, PathPolicy, PATH_SEPARATOR};

/// Split every comma-joined key into one entry per non-empty trimmed segment.
///
/// Each segment inherits the original policy. A segment whose policy is
/// [`PathPolicy::Unset`] becomes `Enforced(true)` when `enabled` is set.
/// Keys without a separator are copied unchanged.
pub fn expand_keys(raw: &FormPolicyMap, enabled: bool) -> FormPolicyMap {
    let mut out = FormPolicyMap::new();
    for (key, policy) in raw.iter() {
        if !key.contains(PATH_SEPARATOR) {
            out.insert(key, policy.clone());
            continue;
        }

        let value = match policy {
            PathPolicy::Unset if enabled => PathPolicy::Enforced(true),
            other => other.clone(),
        };
        for segment in key.split(PATH_SEPARATOR).map(str::trim) {
            if segment.is_empty() {
                continue;
            }
            out.insert(segment, value.clone());
        }
        tracing::trace!(key = %key, "expanded multi-path form key");
    }
    out
}
