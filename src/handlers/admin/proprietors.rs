//! Admin handlers for registered proprietors and their chapters

use axum::extract::{Path, Query, State};
use axum::{Extension, Json};
use serde::Serialize;
use crate::handlers::{ApiResponse, AppState, ValidatedJson};
use crate::models::{
    BulkAssignChaptersRequest, ChapterStats, Page, ProprietorQuery, ProprietorView, UpdateChaptersRequest,
};
use crate::services::Claims;
use crate::utils::errors::Result;
use crate::utils::logging::log_admin_action;

#[derive(Debug, Serialize)]
pub struct BulkAssignResult {
    pub updated: u64,
}

/// GET /proprietors?search=&status=&chapter=
pub async fn list_proprietors(
    State(state): State<AppState>,
    Query(query): Query<ProprietorQuery>,
) -> Result<Json<ApiResponse<Page<ProprietorView>>>> {
    Ok(Json(ApiResponse::ok(state.services.registration.list(&query).await?)))
}

/// PUT /proprietors/{id}/chapters
pub async fn update_chapters(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
    ValidatedJson(request): ValidatedJson<UpdateChaptersRequest>,
) -> Result<Json<ApiResponse<ProprietorView>>> {
    let view = state.services.registration.update_chapters(id, request).await?;
    log_admin_action(&claims.sub, "update_chapters", "proprietor", Some(&id.to_string()));
    Ok(Json(ApiResponse::ok(view)))
}

/// POST /proprietors/bulk-assign-chapters
pub async fn bulk_assign_chapters(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    ValidatedJson(request): ValidatedJson<BulkAssignChaptersRequest>,
) -> Result<Json<ApiResponse<BulkAssignResult>>> {
    let updated = state.services.registration.bulk_assign_chapters(request).await?;
    log_admin_action(&claims.sub, "bulk_assign_chapters", "proprietor", Some(&updated.to_string()));
    Ok(Json(ApiResponse::with_message(
        BulkAssignResult { updated },
        format!("Chapters assigned to {} proprietors", updated),
    )))
}

/// GET /proprietors/chapter-stats
pub async fn chapter_stats(State(state): State<AppState>) -> Result<Json<ApiResponse<ChapterStats>>> {
    Ok(Json(ApiResponse::ok(state.services.registration.chapter_stats().await?)))
}
