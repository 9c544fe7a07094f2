use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;

use crate::auth::RequireUser;
use crate::server::AppState;
use crate::server::dto::CreateRoleRequest;
use crate::server::response::{ApiError, StoreResultExt};
use crate::server::validation;
use crate::types::{PermissionSet, Role, permission};

pub async fn list_roles(
    _user: RequireUser,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Role>>, ApiError> {
    let roles = state.store.list_roles().api_err("Erro ao listar perfis")?;

    Ok(Json(roles))
}

pub async fn create_role(
    user: RequireUser,
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateRoleRequest>,
) -> Result<impl IntoResponse, ApiError> {
    user.require(permission::MANAGE_USERS)?;
    validation::validate_name(&req.name)?;

    let permissions = PermissionSet::from(req.permissions);

    let created = state
        .store
        .create_role(&req.name, &permissions)
        .conflict_err("Perfil já existe", "Erro ao criar perfil")?;

    state
        .store
        .append_log(
            user.0.id,
            "Criação de Perfil",
            &format!("Perfil criado: {}", created.name),
        )
        .api_err("Erro ao criar perfil")?;

    Ok((StatusCode::CREATED, Json(json!({ "success": true }))))
}
