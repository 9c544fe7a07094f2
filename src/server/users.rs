use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;

use crate::auth::{RequireUser, password};
use crate::server::AppState;
use crate::server::dto::CreateUserRequest;
use crate::server::response::{ApiError, StoreResultExt};
use crate::server::validation;
use crate::types::{UserSummary, permission};

pub async fn list_users(
    _user: RequireUser,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<UserSummary>>, ApiError> {
    let users = state.store.list_users().api_err("Erro ao listar usuários")?;

    Ok(Json(users))
}

pub async fn create_user(
    user: RequireUser,
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    user.require(permission::MANAGE_USERS)?;
    validation::validate_username(&req.username)?;
    validation::validate_password(&req.password)?;

    let password_hash = password::hash(&req.password).map_err(|e| {
        tracing::error!("failed to hash password: {e}");
        ApiError::internal("Erro ao criar usuário")
    })?;

    let created = state
        .store
        .create_user(&req.username, &password_hash, req.role_id)
        .conflict_err("Usuário já existe", "Erro ao criar usuário")?;

    state
        .store
        .append_log(
            user.0.id,
            "Criação de Usuário",
            &format!("Usuário criado: {}", created.username),
        )
        .api_err("Erro ao criar usuário")?;

    Ok((StatusCode::CREATED, Json(json!({ "success": true }))))
}
