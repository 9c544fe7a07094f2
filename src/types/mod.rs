mod models;
pub mod permission;
pub mod protocol_id;

pub use models::{LogEntry, NewProtocol, Protocol, Role, Template, User, UserSummary, UserWithRole};
pub use permission::PermissionSet;
