use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::PermissionSet;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Role {
    pub id: i64,
    pub name: String,
    pub permissions: PermissionSet,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role_id: i64,
}

/// A user joined with its role, as returned by login and `/api/me`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserWithRole {
    pub id: i64,
    pub username: String,
    pub role: String,
    pub permissions: PermissionSet,
}

/// Listing shape for `/api/users`: no credentials, role by name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: i64,
    pub username: String,
    pub role: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Template {
    pub id: i64,
    pub name: String,
    pub content: String,
    pub created_by: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Protocol {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Denormalized copy of the template name at creation time.
    pub doc_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_id: Option<i64>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub created_by: i64,
}

/// Fields supplied when creating a protocol. Status and creation time come
/// from column defaults; the id is generated by the caller.
#[derive(Debug, Clone)]
pub struct NewProtocol {
    pub id: String,
    pub title: String,
    pub description: String,
    pub doc_type: String,
    pub template_id: Option<i64>,
    pub created_by: i64,
}

/// An audit log row joined with the acting user's name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: i64,
    pub user_id: i64,
    pub username: String,
    pub action: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    pub created_at: DateTime<Utc>,
}
