use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Super-capability: a role holding `all` passes every check.
pub const ALL: &str = "all";

pub const CREATE_PROTOCOL: &str = "create_protocol";
pub const VIEW_PROTOCOL: &str = "view_protocol";
pub const MANAGE_USERS: &str = "manage_users";
pub const MANAGE_TEMPLATES: &str = "manage_templates";

/// PermissionSet is a role's set of capability tags.
///
/// Stored in the database as a JSON array of strings and serialized the same
/// way on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionSet(BTreeSet<String>);

impl PermissionSet {
    #[must_use]
    pub fn from_tags(tags: &[&str]) -> Self {
        Self(tags.iter().map(|t| (*t).to_string()).collect())
    }

    /// Returns true if this set grants the given capability, either
    /// literally or through the `all` super-capability.
    #[must_use]
    pub fn has(&self, capability: &str) -> bool {
        self.0.contains(ALL) || self.0.contains(capability)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Parses the JSON array stored in the permissions column.
    pub fn from_json(s: &str) -> serde_json::Result<Self> {
        serde_json::from_str(s)
    }

    /// Serializes for storage in the permissions column.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "[]".to_string())
    }
}

impl From<Vec<String>> for PermissionSet {
    fn from(tags: Vec<String>) -> Self {
        Self(tags.into_iter().collect())
    }
}

impl fmt::Display for PermissionSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tags: Vec<&str> = self.0.iter().map(String::as_str).collect();
        write!(f, "{}", tags.join(", "))
    }
}
