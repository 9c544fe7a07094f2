use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::{HeaderMap, header::COOKIE, header::SET_COOKIE},
    response::{AppendHeaders, IntoResponse},
};
use serde_json::json;

use crate::auth::{RequireUser, Session, clear_cookie, cookie_value, password};
use crate::server::AppState;
use crate::server::dto::LoginRequest;
use crate::server::response::{ApiError, StoreResultExt};

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .store
        .get_user_by_username(&req.username)
        .api_err("Erro ao autenticar")?;

    let Some(user) = user else {
        return Err(ApiError::unauthorized("Credenciais inválidas"));
    };

    let valid = password::verify(&req.password, &user.password_hash).map_err(|e| {
        tracing::error!("password verification failed: {e}");
        ApiError::internal("Erro ao autenticar")
    })?;
    if !valid {
        return Err(ApiError::unauthorized("Credenciais inválidas"));
    }

    let profile = state
        .store
        .get_user_with_role(user.id)
        .api_err("Erro ao autenticar")?
        .ok_or_else(|| ApiError::unauthorized("Credenciais inválidas"))?;

    state
        .store
        .append_log(
            user.id,
            "Login",
            &format!("Usuário {} entrou no sistema", user.username),
        )
        .api_err("Erro ao autenticar")?;

    let session = Session {
        id: profile.id,
        username: profile.username.clone(),
    };

    Ok((
        AppendHeaders([(SET_COOKIE, session.to_cookie())]),
        Json(profile),
    ))
}

pub async fn logout(State(state): State<Arc<AppState>>, headers: HeaderMap) -> impl IntoResponse {
    let raw = headers
        .get(COOKIE)
        .and_then(|h| h.to_str().ok())
        .and_then(cookie_value);

    if let Some(value) = raw {
        match Session::parse(value) {
            Some(session) => {
                if let Err(e) = state.store.append_log(
                    session.id,
                    "Logout",
                    &format!("Usuário {} saiu do sistema", session.username),
                ) {
                    tracing::warn!("failed to record logout: {e}");
                }
            }
            None => tracing::warn!("ignoring malformed session cookie during logout"),
        }
    }

    (
        AppendHeaders([(SET_COOKIE, clear_cookie())]),
        Json(json!({ "success": true })),
    )
}

pub async fn me(user: RequireUser) -> impl IntoResponse {
    Json(user.0)
}
