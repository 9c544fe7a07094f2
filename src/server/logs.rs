use std::sync::Arc;

use axum::{Json, extract::State};

use crate::auth::RequireUser;
use crate::server::AppState;
use crate::server::response::{ApiError, StoreResultExt};
use crate::types::LogEntry;

/// How far back `/api/logs` reaches.
const RECENT_LOG_LIMIT: i64 = 100;

pub async fn list_logs(
    _user: RequireUser,
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<LogEntry>>, ApiError> {
    let entries = state
        .store
        .list_recent_logs(RECENT_LOG_LIMIT)
        .api_err("Erro ao listar registros")?;

    Ok(Json(entries))
}
