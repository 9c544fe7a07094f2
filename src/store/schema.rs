pub const SCHEMA: &str = r#"
-- Roles hold the capability tags granted to their users
CREATE TABLE IF NOT EXISTS roles (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE,
    permissions TEXT NOT NULL DEFAULT '[]'  -- JSON array of capability tags
);

CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL UNIQUE,
    password TEXT NOT NULL,                 -- argon2id hash with embedded salt
    role_id INTEGER NOT NULL REFERENCES roles(id)
);

-- Document templates; content carries {{tag}} placeholders
CREATE TABLE IF NOT EXISTS templates (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    content TEXT NOT NULL,
    created_by INTEGER REFERENCES users(id)
);

-- Protocol ids are temporal 17-digit strings generated at creation time
CREATE TABLE IF NOT EXISTS protocols (
    id TEXT PRIMARY KEY,
    title TEXT NOT NULL,
    description TEXT,
    doc_type TEXT,                          -- template name at creation time
    data TEXT,                              -- JSON payload, reserved
    template_id INTEGER REFERENCES templates(id),
    status TEXT DEFAULT 'Aberto',
    created_at TEXT DEFAULT (datetime('now')),
    created_by INTEGER REFERENCES users(id)
);

-- Declared for file uploads; no handler writes here yet
CREATE TABLE IF NOT EXISTS attachments (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    protocol_id TEXT REFERENCES protocols(id),
    filename TEXT,
    file_path TEXT
);

-- Append-only audit trail
CREATE TABLE IF NOT EXISTS logs (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER REFERENCES users(id),
    action TEXT NOT NULL,
    details TEXT,
    created_at TEXT DEFAULT (datetime('now'))
);

-- Create indexes
CREATE INDEX IF NOT EXISTS idx_users_role ON users(role_id);
CREATE INDEX IF NOT EXISTS idx_protocols_created_at ON protocols(created_at);
CREATE INDEX IF NOT EXISTS idx_attachments_protocol ON attachments(protocol_id);
CREATE INDEX IF NOT EXISTS idx_logs_user ON logs(user_id);
CREATE INDEX IF NOT EXISTS idx_logs_created_at ON logs(created_at);
"#;

/// Templates seeded on first boot, keyed by document type name.
pub const DEFAULT_TEMPLATES: &[(&str, &str)] = &[
    (
        "Geral",
        r#"<div style="font-family: sans-serif; padding: 20px;"><h1>Protocolo Geral</h1><p>{{description}}</p></div>"#,
    ),
    (
        "Ofício",
        r#"<div style="font-family: serif; padding: 40px; border: 1px solid #ccc;"><h2>OFÍCIO Nº {{protocol_id}}</h2><p>{{description}}</p></div>"#,
    ),
    (
        "Memorando",
        r#"<div style="background: #f9f9f9; padding: 20px;"><h3>MEMORANDO INTERNO</h3><hr/><p>{{description}}</p></div>"#,
    ),
    (
        "Requerimento",
        r#"<div style="padding: 30px;"><h1>REQUERIMENTO</h1><p>Eu, abaixo assinado, venho requerer: {{description}}</p></div>"#,
    ),
    (
        "Contrato",
        r#"<div style="padding: 50px; line-height: 1.6;"><h1>CONTRATO DE PRESTAÇÃO DE SERVIÇOS</h1><p>{{description}}</p></div>"#,
    ),
];
