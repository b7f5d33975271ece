//! Merge of the global catalog with a site's own forms.

use super::{expand_keys, FormCatalog, FormPolicyMap};

/// Build the effective policy map for one site.
///
/// Global catalogs are expanded and overlaid in order, then the site map on
/// top; later entries override earlier ones by path. Inputs are left
/// untouched so every site gets its own copy.
pub fn merge(global: &FormCatalog, site: Option<&FormPolicyMap>, enabled: bool) -> FormPolicyMap {
    let mut merged = FormPolicyMap::new();
    for raw in global.iter().chain(site) {
        merged.extend(expand_keys(raw, enabled));
    }
    merged
}
