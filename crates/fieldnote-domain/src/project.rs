//! Project-side types consulted during account lifecycle decisions.
//!
//! The identity service does not own project CRUD; it only reads role and
//! status data to decide between hard-delete and archival.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A user's role on a project. Stored as a lowercase string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProjectRole {
    Creator,
    Manager,
    Curator,
    Collector,
    Viewer,
}

/// Error returned when parsing an unknown project role string.
#[derive(Debug, thiserror::Error)]
#[error("unknown project role: {0}")]
pub struct UnknownProjectRole(pub String);

impl ProjectRole {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Creator => "creator",
            Self::Manager => "manager",
            Self::Curator => "curator",
            Self::Collector => "collector",
            Self::Viewer => "viewer",
        }
    }
}

impl fmt::Display for ProjectRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProjectRole {
    type Err = UnknownProjectRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "creator" => Ok(Self::Creator),
            "manager" => Ok(Self::Manager),
            "curator" => Ok(Self::Curator),
            "collector" => Ok(Self::Collector),
            "viewer" => Ok(Self::Viewer),
            other => Err(UnknownProjectRole(other.to_owned())),
        }
    }
}

/// Project lifecycle status.
///
/// Wire format: `i16` (0 = Active, 1 = Locked, 2 = Archived).
/// Archived is a soft status change; the row and its relations survive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Active = 0,
    Locked = 1,
    Archived = 2,
}

impl ProjectStatus {
    pub fn from_i16(v: i16) -> Option<Self> {
        match v {
            0 => Some(Self::Active),
            1 => Some(Self::Locked),
            2 => Some(Self::Archived),
            _ => None,
        }
    }

    pub fn as_i16(self) -> i16 {
        self as i16
    }
}
