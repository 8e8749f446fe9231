//! Identity provider kinds.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// An identity source a user can authenticate through.
///
/// Stored as a lowercase string in the `provider_links` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Local,
    Ldap,
    Google,
    Apple,
    Passwordless,
}

/// Error returned when parsing an unknown provider string.
#[derive(Debug, thiserror::Error)]
#[error("unknown provider: {0}")]
pub struct UnknownProvider(pub String);

impl ProviderKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Ldap => "ldap",
            Self::Google => "google",
            Self::Apple => "apple",
            Self::Passwordless => "passwordless",
        }
    }

    /// First-party providers prove inbox ownership through this system's own
    /// channels; federated ones assert it on behalf of an external account.
    pub fn is_federated(self) -> bool {
        matches!(self, Self::Google | Self::Apple)
    }

    /// Default display name assigned when the provider supplies no usable
    /// profile name. Overwritten once real profile data arrives.
    pub fn placeholder_name(self) -> &'static str {
        match self {
            Self::Local => "Local User",
            Self::Ldap => "LDAP User",
            Self::Google => "Google User",
            Self::Apple => "Apple User",
            Self::Passwordless => "Passwordless User",
        }
    }
}

/// True if `name` is empty or one of the system-assigned placeholder names.
pub fn is_placeholder_name(name: &str) -> bool {
    let name = name.trim();
    name.is_empty()
        || [
            ProviderKind::Local,
            ProviderKind::Ldap,
            ProviderKind::Google,
            ProviderKind::Apple,
            ProviderKind::Passwordless,
        ]
        .iter()
        .any(|p| p.placeholder_name() == name)
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = UnknownProvider;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "local" => Ok(Self::Local),
            "ldap" => Ok(Self::Ldap),
            "google" => Ok(Self::Google),
            "apple" => Ok(Self::Apple),
            "passwordless" => Ok(Self::Passwordless),
            other => Err(UnknownProvider(other.to_owned())),
        }
    }
}
