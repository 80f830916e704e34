//! Ownership checks built on canonical identifiers.
//!
//! A record belongs to the signed-in user when the canonical ids match or,
//! failing that, when the emails match case-insensitively. When neither
//! pair can be compared the answer is [`Ownership::Unknown`], which callers
//! must not read as either yes or no.

use super::resolver::{resolve, RawId};

/// Result of comparing a record's owner against the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ownership {
    Owned,
    NotOwned,
    /// No id pair and no email pair was available to compare.
    Unknown,
}

impl Ownership {
    pub fn is_owned(self) -> bool {
        self == Ownership::Owned
    }
}

/// The signed-in user, reduced to what ownership checks need.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Viewer {
    id: Option<String>,
    email: Option<String>,
}

impl Viewer {
    /// Build a viewer from a raw id and an optional email. The email is
    /// lower-cased; blank emails are dropped.
    pub fn new(id: &RawId, email: Option<&str>) -> Self {
        Self {
            id: resolve(id),
            email: normalize_email(email),
        }
    }

    /// A viewer nobody is signed in as.
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Compare a record's owner reference against this viewer.
    pub fn ownership_of(&self, owner_id: &RawId, owner_email: Option<&str>) -> Ownership {
        let owner_id = resolve(owner_id);
        let owner_email = normalize_email(owner_email);

        let by_id = match (&self.id, &owner_id) {
            (Some(mine), Some(theirs)) => Some(mine == theirs),
            _ => None,
        };
        let by_email = match (&self.email, &owner_email) {
            (Some(mine), Some(theirs)) => Some(mine == theirs),
            _ => None,
        };

        match (by_id, by_email) {
            (Some(true), _) | (_, Some(true)) => Ownership::Owned,
            (None, None) => Ownership::Unknown,
            _ => Ownership::NotOwned,
        }
    }
}

fn normalize_email(email: Option<&str>) -> Option<String> {
    email
        .map(str::trim)
        .filter(|e| !e.is_empty())
        .map(str::to_lowercase)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_owned_by_nested_id() {
        let viewer = Viewer::new(&"u1".into(), None);
        let owner = RawId::from(json!({"_id": {"$oid": "u1"}}));
        assert_eq!(viewer.ownership_of(&owner, None), Ownership::Owned);
    }

    #[test]
    fn test_owned_by_email_case_insensitive() {
        let viewer = Viewer::new(&RawId::Absent, Some("Juan@Example.com"));
        let result = viewer.ownership_of(&"someone-else".into(), Some("juan@example.COM"));
        assert_eq!(result, Ownership::Owned);
    }

    #[test]
    fn test_email_match_overrides_id_mismatch() {
        let viewer = Viewer::new(&"u1".into(), Some("a@b.ph"));
        assert!(viewer.ownership_of(&"u2".into(), Some("A@B.ph")).is_owned());
    }

    #[test]
    fn test_not_owned_when_ids_differ() {
        let viewer = Viewer::new(&"u1".into(), None);
        assert_eq!(viewer.ownership_of(&"u2".into(), None), Ownership::NotOwned);
    }

    #[test]
    fn test_unknown_when_nothing_comparable() {
        let viewer = Viewer::anonymous();
        assert_eq!(viewer.ownership_of(&"u2".into(), Some("x@y.ph")), Ownership::Unknown);

        let viewer = Viewer::new(&"u1".into(), None);
        let placeholder = RawId::from("[object Object]");
        assert_eq!(viewer.ownership_of(&placeholder, None), Ownership::Unknown);
        assert!(!Ownership::Unknown.is_owned());
    }
}
