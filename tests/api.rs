mod common;

use common::test_server::TestServer;
use reqwest::StatusCode;
use reqwest::header::{COOKIE, SET_COOKIE};
use serde_json::{Value, json};

/// Extracts the `session=...` pair from a login response, for replay on
/// subsequent requests.
fn session_cookie(resp: &reqwest::Response) -> String {
    resp.headers()
        .get(SET_COOKIE)
        .expect("set-cookie header")
        .to_str()
        .expect("cookie is ascii")
        .split(';')
        .next()
        .expect("cookie pair")
        .to_string()
}

async fn login(client: &reqwest::Client, base_url: &str, username: &str, password: &str) -> reqwest::Response {
    client
        .post(format!("{}/api/login", base_url))
        .json(&json!({ "username": username, "password": password }))
        .send()
        .await
        .expect("login request")
}

async fn login_admin(client: &reqwest::Client, base_url: &str) -> (String, Value) {
    let resp = login(client, base_url, "admin", "admin123").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let cookie = session_cookie(&resp);
    let body: Value = resp.json().await.expect("login body");
    (cookie, body)
}

#[tokio::test]
async fn login_and_session() {
    let server = TestServer::start().await;
    let client = reqwest::Client::new();

    // Seeded admin logs in.
    let (cookie, body) = login_admin(&client, &server.base_url).await;
    assert_eq!(body["username"], "admin");
    assert_eq!(body["role"], "Admin");
    assert!(
        body["permissions"]
            .as_array()
            .expect("permissions array")
            .iter()
            .any(|p| p == "all")
    );

    // /me returns the same identity, repeatedly.
    for _ in 0..2 {
        let me: Value = client
            .get(format!("{}/api/me", server.base_url))
            .header(COOKIE, &cookie)
            .send()
            .await
            .expect("me request")
            .json()
            .await
            .expect("me body");
        assert_eq!(me["id"], body["id"]);
        assert_eq!(me["username"], "admin");
    }

    // Without a cookie the session is rejected.
    let resp = client
        .get(format!("{}/api/me", server.base_url))
        .send()
        .await
        .expect("me without cookie");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // A forged cookie pointing at a nonexistent user is rejected too.
    let resp = client
        .get(format!("{}/api/me", server.base_url))
        .header(COOKIE, "session=%7B%22id%22%3A9999%2C%22username%22%3A%22x%22%7D")
        .send()
        .await
        .expect("me with forged cookie");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // Wrong password.
    let resp = login(&client, &server.base_url, "admin", "senha-errada").await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = resp.json().await.expect("error body");
    assert_eq!(body["error"], "Credenciais inválidas");

    // Unknown user.
    let resp = login(&client, &server.base_url, "ninguem", "x").await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    assert!(server.data_dir().join("protocolo.db").exists());
}

#[tokio::test]
async fn protocol_creation() {
    let server = TestServer::start().await;
    let client = reqwest::Client::new();
    let (cookie, admin) = login_admin(&client, &server.base_url).await;
    let admin_id = admin["id"].as_i64().expect("admin id");

    // Five stock templates are seeded on first boot.
    let templates: Value = client
        .get(format!("{}/api/templates", server.base_url))
        .header(COOKIE, &cookie)
        .send()
        .await
        .expect("list templates")
        .json()
        .await
        .expect("templates body");
    let templates = templates.as_array().expect("templates array");
    assert_eq!(templates.len(), 5);

    let geral_id = templates
        .iter()
        .find(|t| t["name"] == "Geral")
        .expect("Geral template")["id"]
        .as_i64()
        .expect("template id");

    // Create with an explicit template: doc_type copies the template name.
    let resp = client
        .post(format!("{}/api/protocols", server.base_url))
        .header(COOKIE, &cookie)
        .json(&json!({
            "title": "T",
            "description": "D",
            "template_id": geral_id,
            "created_by": admin_id,
        }))
        .send()
        .await
        .expect("create protocol");
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = resp.json().await.expect("created body");
    let id = created["id"].as_str().expect("protocol id");
    assert_eq!(id.len(), 17);
    assert!(id.chars().all(|c| c.is_ascii_digit()));

    // Ids are millisecond-resolution; keep the second create out of the
    // first one's millisecond.
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;

    // Create without a template: doc_type falls back to Geral.
    let resp = client
        .post(format!("{}/api/protocols", server.base_url))
        .header(COOKIE, &cookie)
        .json(&json!({
            "title": "Sem modelo",
            "description": "D2",
            "created_by": admin_id,
        }))
        .send()
        .await
        .expect("create protocol without template");
    assert_eq!(resp.status(), StatusCode::CREATED);

    let protocols: Value = client
        .get(format!("{}/api/protocols", server.base_url))
        .header(COOKIE, &cookie)
        .send()
        .await
        .expect("list protocols")
        .json()
        .await
        .expect("protocols body");
    let protocols = protocols.as_array().expect("protocols array");
    assert_eq!(protocols.len(), 2);

    let stored = protocols
        .iter()
        .find(|p| p["id"] == id)
        .expect("created protocol listed");
    assert_eq!(stored["title"], "T");
    assert_eq!(stored["doc_type"], "Geral");
    assert_eq!(stored["status"], "Aberto");

    // An empty title is rejected before touching storage.
    let resp = client
        .post(format!("{}/api/protocols", server.base_url))
        .header(COOKIE, &cookie)
        .json(&json!({ "title": "", "description": "D", "created_by": admin_id }))
        .send()
        .await
        .expect("create protocol with empty title");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn template_management() {
    let server = TestServer::start().await;
    let client = reqwest::Client::new();
    let (cookie, admin) = login_admin(&client, &server.base_url).await;
    let admin_id = admin["id"].as_i64().expect("admin id");

    let resp = client
        .post(format!("{}/api/templates", server.base_url))
        .header(COOKIE, &cookie)
        .json(&json!({
            "name": "Ata",
            "content": "<p>{{title}} - {{title}}</p>",
            "created_by": admin_id,
        }))
        .send()
        .await
        .expect("create template");
    assert_eq!(resp.status(), StatusCode::CREATED);

    let templates: Value = client
        .get(format!("{}/api/templates", server.base_url))
        .header(COOKIE, &cookie)
        .send()
        .await
        .expect("list templates")
        .json()
        .await
        .expect("templates body");
    let ata = templates
        .as_array()
        .expect("templates array")
        .iter()
        .find(|t| t["name"] == "Ata")
        .expect("Ata listed")
        .clone();
    let ata_id = ata["id"].as_i64().expect("template id");

    // Update in place.
    let resp = client
        .put(format!("{}/api/templates/{}", server.base_url, ata_id))
        .header(COOKIE, &cookie)
        .json(&json!({ "name": "Ata de Reunião", "content": "<p>{{description}}</p>" }))
        .send()
        .await
        .expect("update template");
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("update body");
    assert_eq!(body["success"], true);

    // Updating an id that does not exist still reports success.
    let resp = client
        .put(format!("{}/api/templates/99999", server.base_url))
        .header(COOKIE, &cookie)
        .json(&json!({ "name": "Fantasma", "content": "<p>nada</p>" }))
        .send()
        .await
        .expect("update absent template");
    assert_eq!(resp.status(), StatusCode::OK);

    // Preview substitutes the synthetic example values.
    let resp = client
        .get(format!("{}/api/templates/{}/preview", server.base_url, ata_id))
        .header(COOKIE, &cookie)
        .send()
        .await
        .expect("preview template");
    assert_eq!(resp.status(), StatusCode::OK);
    let preview: Value = resp.json().await.expect("preview body");
    let content = preview["content"].as_str().expect("preview content");
    assert!(content.contains("Este é um exemplo"));
    assert!(!content.contains("{{description}}"));

    let resp = client
        .get(format!("{}/api/templates/99999/preview", server.base_url))
        .header(COOKIE, &cookie)
        .send()
        .await
        .expect("preview absent template");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn user_and_role_management() {
    let server = TestServer::start().await;
    let client = reqwest::Client::new();
    let (cookie, _admin) = login_admin(&client, &server.base_url).await;

    let roles: Value = client
        .get(format!("{}/api/roles", server.base_url))
        .header(COOKIE, &cookie)
        .send()
        .await
        .expect("list roles")
        .json()
        .await
        .expect("roles body");
    let operador_id = roles
        .as_array()
        .expect("roles array")
        .iter()
        .find(|r| r["name"] == "Operador")
        .expect("Operador seeded")["id"]
        .as_i64()
        .expect("role id");

    // New role.
    let resp = client
        .post(format!("{}/api/roles", server.base_url))
        .header(COOKIE, &cookie)
        .json(&json!({ "name": "Auditor", "permissions": ["view_protocol"] }))
        .send()
        .await
        .expect("create role");
    assert_eq!(resp.status(), StatusCode::CREATED);

    // Duplicate role name.
    let resp = client
        .post(format!("{}/api/roles", server.base_url))
        .header(COOKIE, &cookie)
        .json(&json!({ "name": "Auditor", "permissions": [] }))
        .send()
        .await
        .expect("create duplicate role");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.expect("error body");
    assert_eq!(body["error"], "Perfil já existe");

    // New user.
    let resp = client
        .post(format!("{}/api/users", server.base_url))
        .header(COOKIE, &cookie)
        .json(&json!({ "username": "maria", "password": "s3nha", "role_id": operador_id }))
        .send()
        .await
        .expect("create user");
    assert_eq!(resp.status(), StatusCode::CREATED);

    // Duplicate username.
    let resp = client
        .post(format!("{}/api/users", server.base_url))
        .header(COOKIE, &cookie)
        .json(&json!({ "username": "maria", "password": "outra", "role_id": operador_id }))
        .send()
        .await
        .expect("create duplicate user");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.expect("error body");
    assert_eq!(body["error"], "Usuário já existe");

    let users: Value = client
        .get(format!("{}/api/users", server.base_url))
        .header(COOKIE, &cookie)
        .send()
        .await
        .expect("list users")
        .json()
        .await
        .expect("users body");
    let users = users.as_array().expect("users array");
    assert!(users.iter().any(|u| u["username"] == "admin" && u["role"] == "Admin"));
    assert!(users.iter().any(|u| u["username"] == "maria" && u["role"] == "Operador"));
}

#[tokio::test]
async fn capability_enforcement() {
    let server = TestServer::start().await;
    let client = reqwest::Client::new();
    let (admin_cookie, _admin) = login_admin(&client, &server.base_url).await;

    let roles: Value = client
        .get(format!("{}/api/roles", server.base_url))
        .header(COOKIE, &admin_cookie)
        .send()
        .await
        .expect("list roles")
        .json()
        .await
        .expect("roles body");
    let operador_id = roles
        .as_array()
        .expect("roles array")
        .iter()
        .find(|r| r["name"] == "Operador")
        .expect("Operador seeded")["id"]
        .as_i64()
        .expect("role id");

    client
        .post(format!("{}/api/users", server.base_url))
        .header(COOKIE, &admin_cookie)
        .json(&json!({ "username": "operador1", "password": "s3nha", "role_id": operador_id }))
        .send()
        .await
        .expect("create operador user");

    let resp = login(&client, &server.base_url, "operador1", "s3nha").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let op_cookie = session_cookie(&resp);
    let op: Value = resp.json().await.expect("operador body");
    let op_id = op["id"].as_i64().expect("operador id");

    // Operador holds create_protocol.
    let resp = client
        .post(format!("{}/api/protocols", server.base_url))
        .header(COOKIE, &op_cookie)
        .json(&json!({ "title": "Pedido", "description": "D", "created_by": op_id }))
        .send()
        .await
        .expect("create protocol as operador");
    assert_eq!(resp.status(), StatusCode::CREATED);

    // But not manage_users.
    let resp = client
        .post(format!("{}/api/users", server.base_url))
        .header(COOKIE, &op_cookie)
        .json(&json!({ "username": "intruso", "password": "x", "role_id": operador_id }))
        .send()
        .await
        .expect("create user as operador");
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);

    // Nor manage_templates.
    let resp = client
        .post(format!("{}/api/templates", server.base_url))
        .header(COOKIE, &op_cookie)
        .json(&json!({ "name": "X", "content": "<p></p>", "created_by": op_id }))
        .send()
        .await
        .expect("create template as operador");
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn audit_log_and_logout() {
    let server = TestServer::start().await;
    let client = reqwest::Client::new();
    let (cookie, admin) = login_admin(&client, &server.base_url).await;
    let admin_id = admin["id"].as_i64().expect("admin id");

    client
        .post(format!("{}/api/protocols", server.base_url))
        .header(COOKIE, &cookie)
        .json(&json!({ "title": "T", "description": "D", "created_by": admin_id }))
        .send()
        .await
        .expect("create protocol");

    let logs: Value = client
        .get(format!("{}/api/logs", server.base_url))
        .header(COOKIE, &cookie)
        .send()
        .await
        .expect("list logs")
        .json()
        .await
        .expect("logs body");
    let logs = logs.as_array().expect("logs array");
    assert!(logs.iter().any(|l| l["action"] == "Login" && l["username"] == "admin"));
    assert!(logs.iter().any(|l| l["action"] == "Criação de Protocolo"));

    // Logout records an entry and expires the cookie.
    let resp = client
        .post(format!("{}/api/logout", server.base_url))
        .header(COOKIE, &cookie)
        .send()
        .await
        .expect("logout");
    assert_eq!(resp.status(), StatusCode::OK);
    let set_cookie = resp
        .headers()
        .get(SET_COOKIE)
        .expect("clearing cookie")
        .to_str()
        .expect("cookie is ascii")
        .to_string();
    assert!(set_cookie.contains("Max-Age=0"));
    let body: Value = resp.json().await.expect("logout body");
    assert_eq!(body["success"], true);

    // Logout without a session still succeeds.
    let resp = client
        .post(format!("{}/api/logout", server.base_url))
        .send()
        .await
        .expect("logout without cookie");
    assert_eq!(resp.status(), StatusCode::OK);

    let logs: Value = client
        .get(format!("{}/api/logs", server.base_url))
        .header(COOKIE, &cookie)
        .send()
        .await
        .expect("list logs after logout")
        .json()
        .await
        .expect("logs body");
    assert!(
        logs.as_array()
            .expect("logs array")
            .iter()
            .any(|l| l["action"] == "Logout")
    );
}

#[tokio::test]
async fn reads_require_authentication() {
    let server = TestServer::start().await;
    let client = reqwest::Client::new();

    for path in ["protocols", "templates", "users", "roles", "logs"] {
        let resp = client
            .get(format!("{}/api/{}", server.base_url, path))
            .send()
            .await
            .expect("unauthenticated list");
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "GET /api/{path}");
    }
}
