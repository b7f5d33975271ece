//! Path policy resolution.
//!
//! Read-only lookups over a merged [`FormPolicyMap`]. Same inputs always give
//! the same answer.

use super::{FormPolicyMap, PathPolicy, WILDCARD_FIELD};
use crate::markup::{action_path, scan_action};

/// Decision for one rendered form or submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Enforcement {
    NotEnforced,
    /// Token required; `action` is the label the widget is executed with.
    Enforce { action: String },
}

impl Enforcement {
    pub fn is_enforced(&self) -> bool {
        matches!(self, Enforcement::Enforce { .. })
    }
}

/// Decide whether form `field` on `path` must carry a token.
///
/// `body` is the rendered form body; it is only consulted for wildcard
/// matches, where the first `action="..."` attribute names the action.
pub fn resolve(forms: &FormPolicyMap, path: &str, field: &str, body: &str) -> Enforcement {
    let Some(policy) = forms.get(path) else {
        return Enforcement::NotEnforced;
    };

    match policy {
        PathPolicy::Unset | PathPolicy::Enforced(false) => Enforcement::NotEnforced,
        PathPolicy::Enforced(true) => Enforcement::Enforce {
            action: field.to_string(),
        },
        PathPolicy::PerField(fields) => match fields.get(field) {
            Some(true) => Enforcement::Enforce {
                action: field.to_string(),
            },
            Some(false) => Enforcement::NotEnforced,
            None if fields.get(WILDCARD_FIELD) == Some(&true) => {
                let action = scan_action(body)
                    .map(action_path)
                    .unwrap_or_else(|| field.to_string());
                Enforcement::Enforce { action }
            }
            None => Enforcement::NotEnforced,
        },
    }
}

/// Whole-path check: the path has any entry, whatever its value.
pub fn covers(forms: &FormPolicyMap, path: &str) -> bool {
    forms.contains(path)
}

/// True if a submission to `path` may need a token.
pub fn requires_verification(forms: &FormPolicyMap, path: &str) -> bool {
    forms.get(path).is_some_and(PathPolicy::can_enforce)
}
