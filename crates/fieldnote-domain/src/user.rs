//! User domain types.

use serde::{Deserialize, Serialize};

/// Server-wide permission level of a user account.
///
/// Wire format: `i16` (0 = Basic, 1 = Admin, 2 = Superadmin).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServerRole {
    Basic = 0,
    Admin = 1,
    Superadmin = 2,
}

impl ServerRole {
    /// Convert from the `i16` wire value. Returns `None` for unknown values.
    pub fn from_i16(v: i16) -> Option<Self> {
        match v {
            0 => Some(Self::Basic),
            1 => Some(Self::Admin),
            2 => Some(Self::Superadmin),
            _ => None,
        }
    }

    /// Convert to the `i16` wire value.
    pub fn as_i16(self) -> i16 {
        self as i16
    }

    /// Admin or above. Privileged accounts are held to stricter login policy.
    pub fn is_privileged(self) -> bool {
        self >= Self::Admin
    }
}

impl PartialOrd for ServerRole {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ServerRole {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.as_i16().cmp(&other.as_i16())
    }
}

/// Account lifecycle state.
///
/// Wire format: `i16` (0 = Unverified, 1 = Active, 2 = Disabled, 3 = Archived).
///
/// Transitions are one-directional: Unverified → Active on first successful
/// authentication; Active → Disabled by admin action; Active/Unverified →
/// Archived by account deletion. Nothing reactivates a Disabled or Archived
/// account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserState {
    Unverified = 0,
    Active = 1,
    Disabled = 2,
    Archived = 3,
}

impl UserState {
    /// Convert from the `i16` wire value. Returns `None` for unknown values.
    pub fn from_i16(v: i16) -> Option<Self> {
        match v {
            0 => Some(Self::Unverified),
            1 => Some(Self::Active),
            2 => Some(Self::Disabled),
            3 => Some(Self::Archived),
            _ => None,
        }
    }

    /// Convert to the `i16` wire value.
    pub fn as_i16(self) -> i16 {
        self as i16
    }
}
