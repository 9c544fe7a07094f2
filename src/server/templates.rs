use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;

use crate::auth::RequireUser;
use crate::render;
use crate::server::AppState;
use crate::server::dto::{CreateTemplateRequest, UpdateTemplateRequest};
use crate::server::response::{ApiError, StoreOptionExt, StoreResultExt};
use crate::server::validation;
use crate::types::{Template, permission};

pub async fn list_templates(
    _user: RequireUser,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Template>>, ApiError> {
    let templates = state
        .store
        .list_templates()
        .api_err("Erro ao listar modelos")?;

    Ok(Json(templates))
}

pub async fn create_template(
    user: RequireUser,
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateTemplateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    user.require(permission::MANAGE_TEMPLATES)?;
    validation::validate_name(&req.name)?;

    let template = state
        .store
        .create_template(&req.name, &req.content, req.created_by)
        .api_err("Erro ao criar modelo")?;

    state
        .store
        .append_log(
            req.created_by,
            "Criação de Modelo",
            &format!("Modelo criado: {}", template.name),
        )
        .api_err("Erro ao criar modelo")?;

    Ok((StatusCode::CREATED, Json(json!({ "success": true }))))
}

/// Overwrites a template in place. Absent ids are a silent no-op, and the
/// update is not recorded in the audit log.
pub async fn update_template(
    user: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateTemplateRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    user.require(permission::MANAGE_TEMPLATES)?;
    validation::validate_name(&req.name)?;

    state
        .store
        .update_template(id, &req.name, &req.content)
        .api_err("Erro ao atualizar modelo")?;

    Ok(Json(json!({ "success": true })))
}

/// Renders a template with synthetic example values. Stored protocols are
/// never passed through substitution; this is preview-only.
pub async fn preview_template(
    user: RequireUser,
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let template = state
        .store
        .get_template(id)
        .api_err("Erro ao carregar modelo")?
        .or_not_found("Modelo não encontrado")?;

    let values = render::sample_values(&user.0.username);
    let content = render::render_tags(
        &template.content,
        values.iter().map(|(tag, value)| (*tag, value.as_str())),
    );

    Ok(Json(json!({ "content": content })))
}
