use axum::{
    extract::{Path, Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::analysis::models::AnalysisKind;
use crate::auth::OwnerId;
use crate::errors::AppError;
use crate::history::HistoryRecord;
use crate::state::AppState;

const DEFAULT_LIMIT: i64 = 20;
const MAX_LIMIT: i64 = 100;

#[derive(Deserialize)]
pub struct HistoryQuery {
    pub kind: Option<String>,
    pub limit: Option<i64>,
}

/// GET /api/v1/history
pub async fn handle_list_history(
    State(state): State<AppState>,
    owner: OwnerId,
    Query(params): Query<HistoryQuery>,
) -> Result<Json<Vec<HistoryRecord>>, AppError> {
    let kind = match params.kind.as_deref().map(str::trim).filter(|k| !k.is_empty()) {
        Some(raw) => Some(AnalysisKind::parse(raw).ok_or_else(|| {
            AppError::Validation(format!("Unknown analysis kind '{raw}'"))
        })?),
        None => None,
    };
    let limit = params.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    let records = state.history.list(owner.as_str(), kind, limit).await?;
    Ok(Json(records))
}

/// GET /api/v1/history/:id/report
pub async fn handle_history_report(
    State(state): State<AppState>,
    owner: OwnerId,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let markdown = state
        .history
        .report(owner.as_str(), id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Report for analysis {id} not found")))?;
    Ok((
        [(header::CONTENT_TYPE, "text/markdown; charset=utf-8")],
        markdown,
    ))
}
