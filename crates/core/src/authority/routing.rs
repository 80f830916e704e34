//! Routing a report's free-text category to an authority class.
//!
//! Reports carry whatever category string the reporter picked ("Broken
//! streetlight (Utilities)", "waste collection", ...). Routing matches
//! keywords in a fixed order; the first hit wins.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The classes authorities are grouped into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuthorityClass {
    Infrastructure,
    Utilities,
    SanitationAndWaste,
    EnvironmentAndPublicSpaces,
    CommunityAndSafety,
    GovernmentAdministrative,
    Others,
    Default,
}

/// `(keyword, class)` in match order.
const KEYWORDS: &[(&str, AuthorityClass)] = &[
    ("infrastructure", AuthorityClass::Infrastructure),
    ("utilities", AuthorityClass::Utilities),
    ("sanitation", AuthorityClass::SanitationAndWaste),
    ("waste", AuthorityClass::SanitationAndWaste),
    ("environment", AuthorityClass::EnvironmentAndPublicSpaces),
    ("safety", AuthorityClass::CommunityAndSafety),
    ("community", AuthorityClass::CommunityAndSafety),
    ("government", AuthorityClass::GovernmentAdministrative),
];

/// Classes offered when a category matches no keyword.
pub const UNROUTED_CLASSES: [AuthorityClass; 2] = [AuthorityClass::Default, AuthorityClass::Others];

impl AuthorityClass {
    /// Display label, as the backend spells it.
    pub fn label(self) -> &'static str {
        match self {
            AuthorityClass::Infrastructure => "Infrastructure",
            AuthorityClass::Utilities => "Utilities",
            AuthorityClass::SanitationAndWaste => "Sanitation and Waste",
            AuthorityClass::EnvironmentAndPublicSpaces => "Environment and Public Spaces",
            AuthorityClass::CommunityAndSafety => "Community and Safety",
            AuthorityClass::GovernmentAdministrative => "Government / Administrative",
            AuthorityClass::Others => "Others",
            AuthorityClass::Default => "Default",
        }
    }

    /// Key of this class in the authority directory.
    pub fn directory_key(self) -> String {
        self.label().to_lowercase()
    }
}

impl fmt::Display for AuthorityClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The class a report category routes to, or `None` when no keyword
/// matches (callers then offer [`UNROUTED_CLASSES`]).
pub fn authority_class_for(report_category: &str) -> Option<AuthorityClass> {
    let lower = report_category.to_lowercase();
    KEYWORDS
        .iter()
        .find(|(keyword, _)| lower.contains(keyword))
        .map(|&(_, class)| class)
}

/// Directory keys to consult for a report category, in display order.
pub fn directory_keys_for(report_category: &str) -> Vec<String> {
    match authority_class_for(report_category) {
        Some(class) => vec![class.directory_key()],
        None => UNROUTED_CLASSES.iter().map(|c| c.directory_key()).collect(),
    }
}
