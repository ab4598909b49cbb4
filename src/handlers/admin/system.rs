//! Admin handlers for dashboard data, seeding, file uploads and the
//! contact inbox

use axum::extract::{Multipart, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use chrono::Utc;
use crate::handlers::admin::record_write;
use crate::handlers::{ApiResponse, AppState};
use crate::models::{Analytics, ContactMessage, ContactMessageQuery, Page, SeedReport};
use crate::services::{Claims, DeleteFileRequest, UploadedFile};
use crate::utils::errors::{ConnectHubError, Result};
use crate::utils::logging::log_admin_action;

/// Multipart field carrying the file
const FILE_FIELD: &str = "file";

pub async fn analytics(State(state): State<AppState>) -> Result<Json<ApiResponse<Analytics>>> {
    Ok(Json(ApiResponse::ok(state.services.content.analytics(Utc::now()).await?)))
}

/// POST /seed-data - fills empty content tables only
pub async fn seed_data(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<ApiResponse<SeedReport>>> {
    let report = state.services.content.seed().await?;
    log_admin_action(&claims.sub, "seed", "content", Some(&report.total().to_string()));

    let message = if report.total() == 0 {
        "Content already present, nothing seeded"
    } else {
        "Initial data seeded"
    };
    Ok(Json(ApiResponse::with_message(report, message)))
}

/// POST /upload-image (multipart, field `file`)
pub async fn upload_image(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<UploadedFile>>)> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ConnectHubError::Upload(e.body_text()))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let filename = field.file_name().map(str::to_string);
        let content_type = field
            .content_type()
            .map(str::to_string)
            .unwrap_or_else(|| "application/octet-stream".to_string());
        let bytes = field.bytes().await.map_err(|e| ConnectHubError::Upload(e.body_text()))?;

        let uploaded = state
            .services
            .uploads
            .save(filename.as_deref(), &content_type, &bytes)
            .await?;
        record_write(&state, &claims, "upload", "file", Some(&uploaded.public_id)).await;
        return Ok((StatusCode::CREATED, Json(ApiResponse::ok(uploaded))));
    }

    Err(ConnectHubError::Upload(format!("Multipart field '{}' is missing", FILE_FIELD)))
}

/// POST /delete-file
pub async fn delete_file(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(request): Json<DeleteFileRequest>,
) -> Result<Json<ApiResponse<String>>> {
    if !state.services.uploads.delete(&request.public_id).await? {
        return Err(ConnectHubError::not_found("File", request.public_id));
    }
    record_write(&state, &claims, "delete", "file", Some(&request.public_id)).await;
    Ok(Json(ApiResponse::with_message(request.public_id, "File deleted")))
}

/// GET /contact-messages - newest first
pub async fn contact_messages(
    State(state): State<AppState>,
    Query(query): Query<ContactMessageQuery>,
) -> Result<Json<ApiResponse<Page<ContactMessage>>>> {
    Ok(Json(ApiResponse::ok(state.db.contact.list(&query).await?)))
}
