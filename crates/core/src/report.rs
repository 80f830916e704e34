//! Report and comment records as the reports backend returns them, with the
//! status and ownership rules the pages apply to them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ident::{resolve, Ownership, RawId, Viewer};

/// Normalized report status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportStatus {
    Reported,
    Pending,
    Processing,
    Resolved,
    /// A status string none of the rules recognize, kept verbatim.
    Other(String),
}

impl ReportStatus {
    /// Map the backend's loose status strings onto the four known states.
    ///
    /// Rules are substring matches on the lower-cased input, checked in
    /// order; a missing status counts as `Reported`.
    pub fn normalize(raw: Option<&str>) -> Self {
        let raw = match raw {
            Some(s) if !s.is_empty() => s,
            _ => return ReportStatus::Reported,
        };
        let lower = raw.to_lowercase();
        if lower.contains("pend") {
            ReportStatus::Pending
        } else if lower.contains("report") {
            ReportStatus::Reported
        } else if lower.contains("progress") || lower.contains("process") {
            ReportStatus::Processing
        } else if lower.contains("resolve") {
            ReportStatus::Resolved
        } else {
            ReportStatus::Other(raw.to_string())
        }
    }

    pub fn label(&self) -> &str {
        match self {
            ReportStatus::Reported => "Reported",
            ReportStatus::Pending => "Pending",
            ReportStatus::Processing => "Processing",
            ReportStatus::Resolved => "Resolved",
            ReportStatus::Other(s) => s,
        }
    }
}

impl fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// True when a report in this raw status can no longer be edited or
/// deleted by its reporter (work has started or finished).
pub fn is_locked_status(raw: Option<&str>) -> bool {
    let lower = raw.unwrap_or_default().to_lowercase();
    lower.contains("progress") || lower.contains("resolve")
}

/// A comment on a report.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[serde(default, rename = "_id")]
    pub object_id: RawId,
    #[serde(default)]
    pub id: RawId,
    #[serde(default)]
    pub user_id: RawId,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub edited_at: Option<String>,
}

impl Comment {
    /// Canonical id of the comment itself: `_id` first, then `id`.
    pub fn canonical_id(&self) -> Option<String> {
        resolve(&self.object_id).or_else(|| resolve(&self.id))
    }

    /// Whether `viewer` wrote this comment.
    pub fn ownership(&self, viewer: &Viewer) -> Ownership {
        viewer.ownership_of(&self.user_id, self.email.as_deref())
    }

    /// A comment can be edited or deleted only when it has a usable id and
    /// the viewer owns it.
    pub fn can_manage(&self, viewer: &Viewer) -> bool {
        self.canonical_id().is_some() && self.ownership(viewer).is_owned()
    }
}

/// The signed-in user's profile, as far as ownership is concerned.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserProfile {
    #[serde(default, rename = "_id")]
    pub object_id: RawId,
    #[serde(default)]
    pub id: RawId,
    #[serde(default)]
    pub email: Option<String>,
}

impl UserProfile {
    /// Canonical user id: `_id` first, then `id`.
    pub fn canonical_id(&self) -> Option<String> {
        resolve(&self.object_id).or_else(|| resolve(&self.id))
    }

    /// The viewer this profile signs in as.
    pub fn viewer(&self) -> Viewer {
        let id = self.canonical_id().map(RawId::Text).unwrap_or_default();
        Viewer::new(&id, self.email.as_deref())
    }

    /// Storage key remembering that this user dismissed the
    /// "complete your profile" banner.
    pub fn banner_storage_key(&self) -> Option<String> {
        let identifier = self
            .canonical_id()
            .or_else(|| self.email.clone().filter(|e| !e.is_empty()))?;
        Some(format!("profileBannerDismissed:{identifier}"))
    }
}
