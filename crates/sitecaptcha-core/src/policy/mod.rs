//! Form policy model (catalogs, per-path policies, resolution).
//!
//! Raw catalogs are loaded from configuration, expanded and merged once per
//! site, then consulted read-only by the render decorators and the
//! verification middleware.

pub mod expand;
pub mod merge;
pub mod resolve;

use std::collections::btree_map::{self, BTreeMap};

use serde::{Deserialize, Deserializer};

pub use expand::expand_keys;
pub use merge::merge;
pub use resolve::{covers, requires_verification, resolve, Enforcement};

/// Field key matching any form on the path.
pub const WILDCARD_FIELD: &str = "*";

/// Separator for multi-path keys (`"login, signup": true`).
pub const PATH_SEPARATOR: char = ',';

/// Enforcement policy attached to one path.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PathPolicy {
    /// Declared without a value (`signup:`). Filled in by expansion when the
    /// catalog is enabled and the key is comma-joined.
    #[default]
    Unset,
    /// Whole path on/off, independent of the form name.
    Enforced(bool),
    /// Per form name, `*` matches any form.
    PerField(BTreeMap<String, bool>),
}

impl PathPolicy {
    /// True if some form on the path could be asked for a token.
    pub fn can_enforce(&self) -> bool {
        match self {
            PathPolicy::Unset => false,
            PathPolicy::Enforced(v) => *v,
            PathPolicy::PerField(fields) => fields.values().any(|v| *v),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawPolicy {
    Flag(bool),
    Fields(BTreeMap<String, bool>),
}

impl<'de> Deserialize<'de> for PathPolicy {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<RawPolicy>::deserialize(deserializer).map_err(|_| {
            <D::Error as serde::de::Error>::custom(
                "form policy must be empty, a bool, or a map of form name to bool",
            )
        })?;
        Ok(match raw {
            None => PathPolicy::Unset,
            Some(RawPolicy::Flag(v)) => PathPolicy::Enforced(v),
            Some(RawPolicy::Fields(m)) => PathPolicy::PerField(m),
        })
    }
}

/// Path (leading `/` stripped) to policy. Last write wins per path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "BTreeMap<String, PathPolicy>")]
pub struct FormPolicyMap {
    entries: BTreeMap<String, PathPolicy>,
}

impl FormPolicyMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite. The key is trimmed and its leading `/` removed.
    pub fn insert(&mut self, path: impl AsRef<str>, policy: PathPolicy) -> Option<PathPolicy> {
        self.entries.insert(normalize_path(path.as_ref()).to_string(), policy)
    }

    pub fn get(&self, path: &str) -> Option<&PathPolicy> {
        self.entries.get(normalize_path(path))
    }

    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(normalize_path(path))
    }

    pub fn remove(&mut self, path: &str) -> Option<PathPolicy> {
        self.entries.remove(normalize_path(path))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries sorted by path.
    pub fn iter(&self) -> btree_map::Iter<'_, String, PathPolicy> {
        self.entries.iter()
    }

    /// Overlay `other` on top of `self`; entries from `other` win.
    pub fn extend(&mut self, other: FormPolicyMap) {
        self.entries.extend(other.entries);
    }
}

impl<K: AsRef<str>> FromIterator<(K, PathPolicy)> for FormPolicyMap {
    fn from_iter<I: IntoIterator<Item = (K, PathPolicy)>>(iter: I) -> Self {
        let mut map = FormPolicyMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl From<BTreeMap<String, PathPolicy>> for FormPolicyMap {
    fn from(entries: BTreeMap<String, PathPolicy>) -> Self {
        entries.into_iter().collect()
    }
}

impl IntoIterator for FormPolicyMap {
    type Item = (String, PathPolicy);
    type IntoIter = btree_map::IntoIter<String, PathPolicy>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Ordered list of raw catalogs (global defaults first). Keys may still be
/// comma-joined; see [`expand_keys`].
pub type FormCatalog = Vec<FormPolicyMap>;

/// Strip surrounding whitespace and a single leading `/`.
pub fn normalize_path(path: &str) -> &str {
    let path = path.trim();
    path.strip_prefix('/').unwrap_or(path)
}
