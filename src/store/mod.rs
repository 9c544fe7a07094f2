mod schema;
mod sqlite;

pub use sqlite::SqliteStore;

use crate::error::Result;
use crate::types::*;

/// Store defines the database interface.
pub trait Store: Send + Sync {
    /// Creates tables if absent and applies additive migrations.
    fn initialize(&self) -> Result<()>;

    /// Seeds default roles, the admin user, and the stock templates.
    /// Each seed is gated on its table being empty; the whole pass runs in
    /// one transaction so concurrent first boots cannot double-seed.
    fn seed_defaults(&self, admin_password_hash: &str) -> Result<()>;

    // Role operations
    fn create_role(&self, name: &str, permissions: &PermissionSet) -> Result<Role>;
    fn get_role(&self, id: i64) -> Result<Option<Role>>;
    fn list_roles(&self) -> Result<Vec<Role>>;

    // User operations
    fn create_user(&self, username: &str, password_hash: &str, role_id: i64) -> Result<User>;
    fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;
    fn get_user_with_role(&self, id: i64) -> Result<Option<UserWithRole>>;
    fn list_users(&self) -> Result<Vec<UserSummary>>;

    // Template operations
    fn create_template(&self, name: &str, content: &str, created_by: i64) -> Result<Template>;
    fn get_template(&self, id: i64) -> Result<Option<Template>>;
    fn list_templates(&self) -> Result<Vec<Template>>;
    /// Overwrites name and content by id. Absent ids are a silent no-op.
    fn update_template(&self, id: i64, name: &str, content: &str) -> Result<()>;

    // Protocol operations
    fn create_protocol(&self, protocol: &NewProtocol) -> Result<()>;
    fn list_protocols(&self) -> Result<Vec<Protocol>>;

    // Audit log operations (append-only)
    fn append_log(&self, user_id: i64, action: &str, details: &str) -> Result<()>;
    fn list_recent_logs(&self, limit: i64) -> Result<Vec<LogEntry>>;
}
