//! Authority directory: which offices can receive a routed report.
//!
//! The effective table is recomputed on every read by merging the static
//! defaults ([`defaults`]) with the override table persisted through a
//! [`KeyValueStore`](crate::storage::KeyValueStore):
//!
//! 1. Start from the default list of each category, in order.
//! 2. Apply each stored patch onto the entry with the same id.
//! 3. Append patches whose id the defaults do not know.

pub mod defaults;
pub mod merge;
pub mod routing;
pub mod store;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub use merge::merge;
pub use routing::{authority_class_for, AuthorityClass};
pub use store::{AuthorityStore, OVERRIDES_KEY};

/// Category used when a lookup finds no entry of its own.
pub const DEFAULT_CATEGORY: &str = "default";

/// An office or department that can receive a routed report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Authority {
    /// Stable key, unique within its category list.
    pub id: String,
    pub name: String,
    pub department: String,
    /// Contact address. Empty means unset.
    #[serde(default)]
    pub email: String,
}

impl Authority {
    pub fn new(id: &str, name: &str, department: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            department: department.to_string(),
            email: String::new(),
        }
    }

    /// True when a contact address has been set.
    pub fn has_email(&self) -> bool {
        !self.email.trim().is_empty()
    }

    /// Overlay the fields present in `patch`.
    pub fn apply(&mut self, patch: &AuthorityPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(department) = &patch.department {
            self.department = department.clone();
        }
        if let Some(email) = &patch.email {
            self.email = email.clone();
        }
    }
}

/// A stored override for one authority. Fields left as `None` keep the
/// default value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorityPatch {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl AuthorityPatch {
    /// A patch that only sets the contact address.
    pub fn email(id: &str, email: &str) -> Self {
        Self {
            id: id.to_string(),
            name: None,
            department: None,
            email: Some(email.to_string()),
        }
    }

    /// Turn a patch for an id the defaults do not know into a full record.
    /// Missing fields become empty strings.
    pub fn into_authority(self) -> Authority {
        Authority {
            id: self.id,
            name: self.name.unwrap_or_default(),
            department: self.department.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
        }
    }
}

impl From<&Authority> for AuthorityPatch {
    fn from(a: &Authority) -> Self {
        Self {
            id: a.id.clone(),
            name: Some(a.name.clone()),
            department: Some(a.department.clone()),
            email: Some(a.email.clone()),
        }
    }
}

/// Category key (lower-case) to ordered authority list.
pub type AuthoritiesByCategory = BTreeMap<String, Vec<Authority>>;

/// Category key to ordered list of stored patches.
///
/// The persisted JSON is a plain object of arrays, so payloads that hold
/// complete authority records parse as patches that set every field.
pub type OverrideTable = BTreeMap<String, Vec<AuthorityPatch>>;

/// Express a full table as overrides that set every field.
pub fn to_override_table(table: &AuthoritiesByCategory) -> OverrideTable {
    table
        .iter()
        .map(|(cat, list)| (cat.clone(), list.iter().map(AuthorityPatch::from).collect()))
        .collect()
}

/// Normalize a caller-supplied category: blank means [`DEFAULT_CATEGORY`],
/// anything else is lower-cased.
pub fn category_key(category: &str) -> String {
    if category.is_empty() {
        DEFAULT_CATEGORY.to_string()
    } else {
        category.to_lowercase()
    }
}

/// Take the list for `category` out of `table`, falling back to the
/// [`DEFAULT_CATEGORY`] list and then to an empty list.
pub fn authorities_for(mut table: AuthoritiesByCategory, category: &str) -> Vec<Authority> {
    let key = category_key(category);
    table
        .remove(&key)
        .or_else(|| table.remove(DEFAULT_CATEGORY))
        .unwrap_or_default()
}
