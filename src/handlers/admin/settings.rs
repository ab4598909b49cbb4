//! Admin handlers for site settings

use axum::extract::{Path, Query, State};
use axum::{Extension, Json};
use crate::handlers::admin::record_write;
use crate::handlers::{ApiResponse, AppState, ValidatedJson};
use crate::models::{SiteSetting, SiteSettingQuery, UpdateSiteSettingRequest, UpsertSiteSettingRequest};
use crate::services::Claims;
use crate::utils::errors::{ConnectHubError, Result};
use crate::validation::Validate;

pub async fn list_settings(
    State(state): State<AppState>,
    Query(query): Query<SiteSettingQuery>,
) -> Result<Json<ApiResponse<Vec<SiteSetting>>>> {
    Ok(Json(ApiResponse::ok(state.db.settings.list(&query).await?)))
}

/// POST /settings - insert or overwrite one setting
pub async fn upsert_setting(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    ValidatedJson(request): ValidatedJson<UpsertSiteSettingRequest>,
) -> Result<Json<ApiResponse<SiteSetting>>> {
    let setting = state.db.settings.upsert(request).await?;
    record_write(&state, &claims, "upsert", "site_setting", Some(&setting.setting_key)).await;
    Ok(Json(ApiResponse::ok(setting)))
}

/// PUT /settings - replace every setting in one transaction
pub async fn replace_settings(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    ValidatedJson(requests): ValidatedJson<Vec<UpsertSiteSettingRequest>>,
) -> Result<Json<ApiResponse<Vec<SiteSetting>>>> {
    let settings = state.db.settings.replace_all(requests).await?;
    record_write(&state, &claims, "replace_all", "site_setting", Some(&settings.len().to_string())).await;
    Ok(Json(ApiResponse::with_message(settings, "Settings saved")))
}

/// PUT /settings/{key}
pub async fn update_setting(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(key): Path<String>,
    Json(request): Json<UpdateSiteSettingRequest>,
) -> Result<Json<ApiResponse<SiteSetting>>> {
    let request = request.into_upsert(&key);
    request.validate()?;

    let setting = state.db.settings.upsert(request).await?;
    record_write(&state, &claims, "update", "site_setting", Some(&key)).await;
    Ok(Json(ApiResponse::ok(setting)))
}

pub async fn delete_setting(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(key): Path<String>,
) -> Result<Json<ApiResponse<String>>> {
    if !state.db.settings.delete(&key).await? {
        return Err(ConnectHubError::not_found("Setting", key));
    }
    record_write(&state, &claims, "delete", "site_setting", Some(&key)).await;
    Ok(Json(ApiResponse::with_message(key, "Setting deleted")))
}
