use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde_json::json;

use crate::auth::RequireUser;
use crate::server::AppState;
use crate::server::dto::CreateProtocolRequest;
use crate::server::response::{ApiError, StoreResultExt};
use crate::server::validation;
use crate::types::{NewProtocol, Protocol, permission, protocol_id};

/// Document type recorded when no template is chosen or the lookup misses.
const DEFAULT_DOC_TYPE: &str = "Geral";

pub async fn list_protocols(
    _user: RequireUser,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Protocol>>, ApiError> {
    let protocols = state
        .store
        .list_protocols()
        .api_err("Erro ao listar protocolos")?;

    Ok(Json(protocols))
}

pub async fn create_protocol(
    user: RequireUser,
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateProtocolRequest>,
) -> Result<impl IntoResponse, ApiError> {
    user.require(permission::CREATE_PROTOCOL)?;
    validation::validate_title(&req.title)?;

    let id = protocol_id::generate();

    // doc_type is denormalized from the template name at creation time.
    let doc_type = match req.template_id {
        Some(template_id) => state
            .store
            .get_template(template_id)
            .api_err("Erro ao criar protocolo no banco de dados")?
            .map_or_else(|| DEFAULT_DOC_TYPE.to_string(), |t| t.name),
        None => DEFAULT_DOC_TYPE.to_string(),
    };

    let protocol = NewProtocol {
        id: id.clone(),
        title: req.title.clone(),
        description: req.description,
        doc_type,
        template_id: req.template_id,
        created_by: req.created_by,
    };

    // Same-millisecond creations collide on the primary key; that surfaces
    // here as a storage error, not a retry.
    state
        .store
        .create_protocol(&protocol)
        .api_err("Erro ao criar protocolo no banco de dados")?;

    state
        .store
        .append_log(
            req.created_by,
            "Criação de Protocolo",
            &format!("Protocolo {id} criado: {}", req.title),
        )
        .api_err("Erro ao criar protocolo no banco de dados")?;

    Ok((StatusCode::CREATED, Json(json!({ "id": id }))))
}
