use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::{Connection, OptionalExtension, Row, params};

use super::Store;
use super::schema::{DEFAULT_TEMPLATES, SCHEMA};
use crate::error::{Error, Result};
use crate::types::*;

pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self> {
        let conn = Connection::open(db_path)?;

        conn.pragma_update(None, "foreign_keys", "ON")?;
        conn.pragma_update(None, "journal_mode", "WAL")?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Returns a guard to the underlying database connection.
    /// This allows consuming applications to execute custom SQL.
    pub fn connection(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn()
    }
}

fn parse_datetime(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| {
            // Handle SQLite's default datetime format: "YYYY-MM-DD HH:MM:SS"
            chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            tracing::error!("Invalid datetime in database: '{}' - {}", s, e);
            Utc::now()
        })
}

/// Maps uniqueness and foreign-key failures onto the conflict error the
/// handlers report as "already exists".
fn map_constraint(e: rusqlite::Error) -> Error {
    match e {
        rusqlite::Error::SqliteFailure(err, _)
            if err.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            Error::AlreadyExists
        }
        e => Error::from(e),
    }
}

fn role_from_row(row: &Row<'_>) -> rusqlite::Result<Role> {
    let permissions: String = row.get(2)?;
    Ok(Role {
        id: row.get(0)?,
        name: row.get(1)?,
        permissions: PermissionSet::from_json(&permissions).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(e))
        })?,
    })
}

fn protocol_from_row(row: &Row<'_>) -> rusqlite::Result<Protocol> {
    Ok(Protocol {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        doc_type: row.get::<_, Option<String>>(3)?.unwrap_or_else(|| "Geral".to_string()),
        data: row.get(4)?,
        template_id: row.get(5)?,
        status: row.get(6)?,
        created_at: parse_datetime(&row.get::<_, String>(7)?),
        created_by: row.get(8)?,
    })
}

impl Store for SqliteStore {
    fn initialize(&self) -> Result<()> {
        let conn = self.conn();
        conn.execute_batch(SCHEMA)?;

        // Additive migration: databases created before doc_type existed get
        // the column retrofitted. Detection is probe-and-catch.
        if conn.prepare("SELECT doc_type FROM protocols LIMIT 1").is_err() {
            conn.execute(
                "ALTER TABLE protocols ADD COLUMN doc_type TEXT DEFAULT 'Geral'",
                [],
            )?;
        }

        Ok(())
    }

    fn seed_defaults(&self, admin_password_hash: &str) -> Result<()> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;

        let role_count: i64 = tx.query_row("SELECT COUNT(*) FROM roles", [], |row| row.get(0))?;
        if role_count == 0 {
            tx.execute(
                "INSERT INTO roles (name, permissions) VALUES (?1, ?2)",
                params!["Admin", PermissionSet::from_tags(&[permission::ALL]).to_json()],
            )?;
            tx.execute(
                "INSERT INTO roles (name, permissions) VALUES (?1, ?2)",
                params![
                    "Operador",
                    PermissionSet::from_tags(&[
                        permission::CREATE_PROTOCOL,
                        permission::VIEW_PROTOCOL
                    ])
                    .to_json()
                ],
            )?;
        }

        let user_count: i64 = tx.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
        if user_count == 0 {
            let admin_role_id: i64 =
                tx.query_row("SELECT id FROM roles WHERE name = 'Admin'", [], |row| {
                    row.get(0)
                })?;
            tx.execute(
                "INSERT INTO users (username, password, role_id) VALUES ('admin', ?1, ?2)",
                params![admin_password_hash, admin_role_id],
            )?;
        }

        let template_count: i64 =
            tx.query_row("SELECT COUNT(*) FROM templates", [], |row| row.get(0))?;
        if template_count == 0 {
            let admin_id: i64 =
                tx.query_row("SELECT id FROM users WHERE username = 'admin'", [], |row| {
                    row.get(0)
                })?;
            for (name, content) in DEFAULT_TEMPLATES {
                tx.execute(
                    "INSERT INTO templates (name, content, created_by) VALUES (?1, ?2, ?3)",
                    params![name, content, admin_id],
                )?;
            }
        }

        tx.commit()?;
        Ok(())
    }

    // Role operations

    fn create_role(&self, name: &str, permissions: &PermissionSet) -> Result<Role> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO roles (name, permissions) VALUES (?1, ?2)",
            params![name, permissions.to_json()],
        )
        .map_err(map_constraint)?;

        Ok(Role {
            id: conn.last_insert_rowid(),
            name: name.to_string(),
            permissions: permissions.clone(),
        })
    }

    fn get_role(&self, id: i64) -> Result<Option<Role>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT id, name, permissions FROM roles WHERE id = ?1",
            params![id],
            role_from_row,
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_roles(&self) -> Result<Vec<Role>> {
        let conn = self.conn();
        let mut stmt = conn.prepare("SELECT id, name, permissions FROM roles ORDER BY id")?;

        let rows = stmt.query_map([], role_from_row)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    // User operations

    fn create_user(&self, username: &str, password_hash: &str, role_id: i64) -> Result<User> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO users (username, password, role_id) VALUES (?1, ?2, ?3)",
            params![username, password_hash, role_id],
        )
        .map_err(map_constraint)?;

        Ok(User {
            id: conn.last_insert_rowid(),
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            role_id,
        })
    }

    fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT id, username, password, role_id FROM users WHERE username = ?1",
            params![username],
            |row| {
                Ok(User {
                    id: row.get(0)?,
                    username: row.get(1)?,
                    password_hash: row.get(2)?,
                    role_id: row.get(3)?,
                })
            },
        )
        .optional()
        .map_err(Error::from)
    }

    fn get_user_with_role(&self, id: i64) -> Result<Option<UserWithRole>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT u.id, u.username, r.name, r.permissions
             FROM users u
             JOIN roles r ON u.role_id = r.id
             WHERE u.id = ?1",
            params![id],
            |row| {
                let permissions: String = row.get(3)?;
                Ok(UserWithRole {
                    id: row.get(0)?,
                    username: row.get(1)?,
                    role: row.get(2)?,
                    permissions: PermissionSet::from_json(&permissions).map_err(|e| {
                        rusqlite::Error::FromSqlConversionFailure(
                            3,
                            rusqlite::types::Type::Text,
                            Box::new(e),
                        )
                    })?,
                })
            },
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_users(&self) -> Result<Vec<UserSummary>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT u.id, u.username, r.name AS role
             FROM users u
             JOIN roles r ON u.role_id = r.id
             ORDER BY u.id",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(UserSummary {
                id: row.get(0)?,
                username: row.get(1)?,
                role: row.get(2)?,
            })
        })?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    // Template operations

    fn create_template(&self, name: &str, content: &str, created_by: i64) -> Result<Template> {
        let conn = self.conn();
        conn.execute(
            "INSERT INTO templates (name, content, created_by) VALUES (?1, ?2, ?3)",
            params![name, content, created_by],
        )
        .map_err(map_constraint)?;

        Ok(Template {
            id: conn.last_insert_rowid(),
            name: name.to_string(),
            content: content.to_string(),
            created_by,
        })
    }

    fn get_template(&self, id: i64) -> Result<Option<Template>> {
        let conn = self.conn();
        conn.query_row(
            "SELECT id, name, content, created_by FROM templates WHERE id = ?1",
            params![id],
            |row| {
                Ok(Template {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    content: row.get(2)?,
                    created_by: row.get(3)?,
                })
            },
        )
        .optional()
        .map_err(Error::from)
    }

    fn list_templates(&self) -> Result<Vec<Template>> {
        let conn = self.conn();
        let mut stmt =
            conn.prepare("SELECT id, name, content, created_by FROM templates ORDER BY id")?;

        let rows = stmt.query_map([], |row| {
            Ok(Template {
                id: row.get(0)?,
                name: row.get(1)?,
                content: row.get(2)?,
                created_by: row.get(3)?,
            })
        })?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    fn update_template(&self, id: i64, name: &str, content: &str) -> Result<()> {
        // Absent ids are a silent no-op: the row count is not checked.
        self.conn().execute(
            "UPDATE templates SET name = ?1, content = ?2 WHERE id = ?3",
            params![name, content, id],
        )?;
        Ok(())
    }

    // Protocol operations

    fn create_protocol(&self, protocol: &NewProtocol) -> Result<()> {
        self.conn()
            .execute(
                "INSERT INTO protocols (id, title, description, doc_type, template_id, created_by)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    protocol.id,
                    protocol.title,
                    protocol.description,
                    protocol.doc_type,
                    protocol.template_id,
                    protocol.created_by,
                ],
            )
            .map_err(map_constraint)?;
        Ok(())
    }

    fn list_protocols(&self) -> Result<Vec<Protocol>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT id, title, description, doc_type, data, template_id, status, created_at, created_by
             FROM protocols ORDER BY created_at DESC",
        )?;

        let rows = stmt.query_map([], protocol_from_row)?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }

    // Audit log operations

    fn append_log(&self, user_id: i64, action: &str, details: &str) -> Result<()> {
        self.conn().execute(
            "INSERT INTO logs (user_id, action, details) VALUES (?1, ?2, ?3)",
            params![user_id, action, details],
        )?;
        Ok(())
    }

    fn list_recent_logs(&self, limit: i64) -> Result<Vec<LogEntry>> {
        let conn = self.conn();
        // Inner join: entries whose user row is gone drop out of listings.
        let mut stmt = conn.prepare(
            "SELECT l.id, l.user_id, u.username, l.action, l.details, l.created_at
             FROM logs l
             JOIN users u ON l.user_id = u.id
             ORDER BY l.created_at DESC, l.id DESC
             LIMIT ?1",
        )?;

        let rows = stmt.query_map(params![limit], |row| {
            Ok(LogEntry {
                id: row.get(0)?,
                user_id: row.get(1)?,
                username: row.get(2)?,
                action: row.get(3)?,
                details: row.get(4)?,
                created_at: parse_datetime(&row.get::<_, String>(5)?),
            })
        })?;

        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Error::from)
    }
}
