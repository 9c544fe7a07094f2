use std::sync::Arc;

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, header::COOKIE, request::Parts},
    response::{IntoResponse, Response},
};
use serde_json::json;

use super::session::{self, Session};
use crate::server::AppState;
use crate::server::response::ApiError;
use crate::types::UserWithRole;

/// Extractor that requires a session cookie backed by a live user row.
///
/// The cookie is a bearer blob with no integrity protection, so the user and
/// role are re-read from the store on every request.
pub struct RequireUser(pub UserWithRole);

#[derive(Debug)]
pub enum AuthError {
    MissingSession,
    InvalidSession,
    UnknownUser,
    InternalError,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::MissingSession => (StatusCode::UNAUTHORIZED, "Não autenticado"),
            AuthError::InvalidSession => (StatusCode::UNAUTHORIZED, "Sessão inválida"),
            AuthError::UnknownUser => (StatusCode::UNAUTHORIZED, "Usuário não encontrado"),
            AuthError::InternalError => (StatusCode::INTERNAL_SERVER_ERROR, "Erro interno"),
        };

        let body = json!({ "error": message });

        (status, Json(body)).into_response()
    }
}

impl FromRequestParts<Arc<AppState>> for RequireUser {
    type Rejection = AuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let header = parts.headers.get(COOKIE).and_then(|h| h.to_str().ok());

        let value = header
            .and_then(session::cookie_value)
            .ok_or(AuthError::MissingSession)?;

        let session = Session::parse(value).ok_or(AuthError::InvalidSession)?;

        let user = state
            .store
            .get_user_with_role(session.id)
            .map_err(|e| {
                tracing::error!("failed to load session user: {e}");
                AuthError::InternalError
            })?
            .ok_or(AuthError::UnknownUser)?;

        Ok(RequireUser(user))
    }
}

impl RequireUser {
    /// Server-side capability check; the `all` tag grants everything.
    pub fn require(&self, capability: &str) -> Result<(), ApiError> {
        if self.0.permissions.has(capability) {
            Ok(())
        } else {
            Err(ApiError::forbidden("Permissão negada"))
        }
    }
}
