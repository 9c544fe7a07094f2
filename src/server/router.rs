use std::sync::Arc;
use std::time::Instant;

use axum::extract::Request;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::{
    Router,
    routing::{get, post, put},
};

use super::{logs, protocols, roles, session, templates, users};
use crate::store::Store;

pub struct AppState {
    pub store: Arc<dyn Store>,
}

async fn health() -> &'static str {
    "OK"
}

async fn log_request(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let uri = request.uri().clone();
    let start = Instant::now();

    let response = next.run(request).await;

    let latency = start.elapsed();
    let status = response.status();

    tracing::info!(
        "{} {} {} {}ms",
        method,
        uri.path(),
        status.as_u16(),
        latency.as_millis()
    );

    response
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api", api_router())
        .layer(middleware::from_fn(log_request))
        .with_state(state)
}

fn api_router() -> Router<Arc<AppState>> {
    Router::new()
        // Session
        .route("/login", post(session::login))
        .route("/logout", post(session::logout))
        .route("/me", get(session::me))
        // Protocols
        .route("/protocols", get(protocols::list_protocols))
        .route("/protocols", post(protocols::create_protocol))
        // Templates
        .route("/templates", get(templates::list_templates))
        .route("/templates", post(templates::create_template))
        .route("/templates/{id}", put(templates::update_template))
        .route("/templates/{id}/preview", get(templates::preview_template))
        // Users and roles
        .route("/users", get(users::list_users))
        .route("/users", post(users::create_user))
        .route("/roles", get(roles::list_roles))
        .route("/roles", post(roles::create_role))
        // Audit log
        .route("/logs", get(logs::list_logs))
}
