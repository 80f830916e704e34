//! Merging the default table with stored overrides.

use tracing::debug;

use super::{AuthoritiesByCategory, Authority, AuthorityPatch, OverrideTable};

/// Merge `overrides` onto `base`.
///
/// The result holds every category of either side. Within a category the
/// base order is kept; a patch whose id is already present is applied in
/// place (patch fields win), and patches with new ids are appended in the
/// order they are stored. With no overrides, `base` is returned as is.
pub fn merge(mut base: AuthoritiesByCategory, overrides: Option<&OverrideTable>) -> AuthoritiesByCategory {
    let Some(overrides) = overrides else {
        return base;
    };

    let mut result = AuthoritiesByCategory::new();

    let mut categories: Vec<String> = base.keys().cloned().collect();
    for category in overrides.keys() {
        if !base.contains_key(category) {
            categories.push(category.clone());
        }
    }

    for category in categories {
        let base_list = base.remove(&category).unwrap_or_default();
        let patches = overrides.get(&category).map(Vec::as_slice).unwrap_or(&[]);
        let merged = merge_list(base_list, patches);
        debug!(category = %category, entries = merged.len(), patches = patches.len(), "merged authority list");
        result.insert(category, merged);
    }

    result
}

/// Merge one category's patches onto its base list.
///
/// Duplicate ids collapse onto the position of their first occurrence,
/// later values winning.
fn merge_list(base: Vec<Authority>, patches: &[AuthorityPatch]) -> Vec<Authority> {
    let mut merged: Vec<Authority> = Vec::with_capacity(base.len() + patches.len());

    for authority in base {
        match merged.iter().position(|a| a.id == authority.id) {
            Some(idx) => merged[idx] = authority,
            None => merged.push(authority),
        }
    }

    for patch in patches {
        match merged.iter().position(|a| a.id == patch.id) {
            Some(idx) => merged[idx].apply(patch),
            None => merged.push(patch.clone().into_authority()),
        }
    }

    merged
}
