//! Admin handlers for page content: hero images, team members,
//! announcements and homepage sections

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use crate::handlers::admin::record_write;
use crate::handlers::{ApiResponse, AppState, ValidatedJson};
use crate::models::{
    Announcement, AnnouncementQuery, CreateAnnouncementRequest, CreateHeroImageRequest, CreateHomepageContentRequest,
    CreateTeamMemberRequest, HeroImage, HeroImageQuery, HomepageContent, HomepageContentQuery, Page, SetActiveRequest,
    TeamMember, TeamMemberPatch, TeamMemberQuery, UpdateAnnouncementRequest, UpdateHeroImageRequest,
    UpdateHomepageContentRequest, UpdateTeamMemberRequest,
};
use crate::services::Claims;
use crate::utils::errors::{ConnectHubError, Result};

type Created<T> = (StatusCode, Json<ApiResponse<T>>);

fn created<T>(data: T) -> Created<T> {
    (StatusCode::CREATED, Json(ApiResponse::ok(data)))
}

fn deleted(resource: &'static str, id: i64, removed: bool) -> Result<Json<ApiResponse<i64>>> {
    if removed {
        Ok(Json(ApiResponse::with_message(id, format!("{} deleted", resource))))
    } else {
        Err(ConnectHubError::not_found(resource, id))
    }
}

// Hero images

pub async fn list_hero_images(
    State(state): State<AppState>,
    Query(query): Query<HeroImageQuery>,
) -> Result<Json<ApiResponse<Page<HeroImage>>>> {
    Ok(Json(ApiResponse::ok(state.db.hero_images.list(&query).await?)))
}

pub async fn get_hero_image(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<ApiResponse<HeroImage>>> {
    let image = state
        .db
        .hero_images
        .find_by_id(id)
        .await?
        .ok_or_else(|| ConnectHubError::not_found("Hero image", id))?;
    Ok(Json(ApiResponse::ok(image)))
}

pub async fn create_hero_image(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    ValidatedJson(request): ValidatedJson<CreateHeroImageRequest>,
) -> Result<Created<HeroImage>> {
    let image = state.db.hero_images.create(request).await?;
    record_write(&state, &claims, "create", "hero_image", Some(&image.id.to_string())).await;
    Ok(created(image))
}

pub async fn update_hero_image(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
    ValidatedJson(request): ValidatedJson<UpdateHeroImageRequest>,
) -> Result<Json<ApiResponse<HeroImage>>> {
    let image = state
        .db
        .hero_images
        .update(id, request)
        .await?
        .ok_or_else(|| ConnectHubError::not_found("Hero image", id))?;
    record_write(&state, &claims, "update", "hero_image", Some(&id.to_string())).await;
    Ok(Json(ApiResponse::ok(image)))
}

pub async fn delete_hero_image(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<i64>>> {
    let removed = state.db.hero_images.delete(id).await?;
    if removed {
        record_write(&state, &claims, "delete", "hero_image", Some(&id.to_string())).await;
    }
    deleted("Hero image", id, removed)
}

// Team members

pub async fn list_members(
    State(state): State<AppState>,
    Query(query): Query<TeamMemberQuery>,
) -> Result<Json<ApiResponse<Page<TeamMember>>>> {
    Ok(Json(ApiResponse::ok(state.db.team_members.list(&query).await?)))
}

pub async fn get_member(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<ApiResponse<TeamMember>>> {
    let member = state
        .db
        .team_members
        .find_by_id(id)
        .await?
        .ok_or_else(|| ConnectHubError::not_found("Team member", id))?;
    Ok(Json(ApiResponse::ok(member)))
}

pub async fn create_member(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    ValidatedJson(request): ValidatedJson<CreateTeamMemberRequest>,
) -> Result<Created<TeamMember>> {
    let member = state.db.team_members.create(request).await?;
    record_write(&state, &claims, "create", "team_member", Some(&member.id.to_string())).await;
    Ok(created(member))
}

/// POST /members/bulk - all rows are inserted or none are
pub async fn bulk_create_members(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    ValidatedJson(requests): ValidatedJson<Vec<CreateTeamMemberRequest>>,
) -> Result<Created<Vec<TeamMember>>> {
    if requests.is_empty() {
        return Err(ConnectHubError::InvalidInput("No members to create".to_string()));
    }
    let members = state.db.team_members.bulk_create(requests).await?;
    record_write(&state, &claims, "bulk_create", "team_member", Some(&members.len().to_string())).await;
    Ok(created(members))
}

/// PUT /members/bulk-update - all patches apply or none do
pub async fn bulk_update_members(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    ValidatedJson(patches): ValidatedJson<Vec<TeamMemberPatch>>,
) -> Result<Json<ApiResponse<Vec<TeamMember>>>> {
    let members = state.db.team_members.bulk_update(patches).await?;
    record_write(&state, &claims, "bulk_update", "team_member", Some(&members.len().to_string())).await;
    Ok(Json(ApiResponse::ok(members)))
}

pub async fn update_member(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
    ValidatedJson(request): ValidatedJson<UpdateTeamMemberRequest>,
) -> Result<Json<ApiResponse<TeamMember>>> {
    let member = state
        .db
        .team_members
        .update(id, request)
        .await?
        .ok_or_else(|| ConnectHubError::not_found("Team member", id))?;
    record_write(&state, &claims, "update", "team_member", Some(&id.to_string())).await;
    Ok(Json(ApiResponse::ok(member)))
}

pub async fn delete_member(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<i64>>> {
    let removed = state.db.team_members.delete(id).await?;
    if removed {
        record_write(&state, &claims, "delete", "team_member", Some(&id.to_string())).await;
    }
    deleted("Team member", id, removed)
}

// Announcements

pub async fn list_announcements(
    State(state): State<AppState>,
    Query(query): Query<AnnouncementQuery>,
) -> Result<Json<ApiResponse<Page<Announcement>>>> {
    Ok(Json(ApiResponse::ok(state.db.announcements.list(&query).await?)))
}

pub async fn get_announcement(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<Announcement>>> {
    let announcement = state
        .db
        .announcements
        .find_by_id(id)
        .await?
        .ok_or_else(|| ConnectHubError::not_found("Announcement", id))?;
    Ok(Json(ApiResponse::ok(announcement)))
}

pub async fn create_announcement(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    ValidatedJson(request): ValidatedJson<CreateAnnouncementRequest>,
) -> Result<Created<Announcement>> {
    let announcement = state.db.announcements.create(request).await?;
    record_write(&state, &claims, "create", "announcement", Some(&announcement.id.to_string())).await;
    Ok(created(announcement))
}

pub async fn update_announcement(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
    ValidatedJson(request): ValidatedJson<UpdateAnnouncementRequest>,
) -> Result<Json<ApiResponse<Announcement>>> {
    let announcement = state
        .db
        .announcements
        .update(id, request)
        .await?
        .ok_or_else(|| ConnectHubError::not_found("Announcement", id))?;
    record_write(&state, &claims, "update", "announcement", Some(&id.to_string())).await;
    Ok(Json(ApiResponse::ok(announcement)))
}

/// PATCH /announcements/{id}/active
pub async fn set_announcement_active(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
    Json(request): Json<SetActiveRequest>,
) -> Result<Json<ApiResponse<Announcement>>> {
    let announcement = state
        .db
        .announcements
        .set_active(id, request.is_active)
        .await?
        .ok_or_else(|| ConnectHubError::not_found("Announcement", id))?;
    let action = if request.is_active { "activate" } else { "deactivate" };
    record_write(&state, &claims, action, "announcement", Some(&id.to_string())).await;
    Ok(Json(ApiResponse::ok(announcement)))
}

pub async fn delete_announcement(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<i64>>> {
    let removed = state.db.announcements.delete(id).await?;
    if removed {
        record_write(&state, &claims, "delete", "announcement", Some(&id.to_string())).await;
    }
    deleted("Announcement", id, removed)
}

// Homepage sections

pub async fn list_homepage(
    State(state): State<AppState>,
    Query(query): Query<HomepageContentQuery>,
) -> Result<Json<ApiResponse<Page<HomepageContent>>>> {
    Ok(Json(ApiResponse::ok(state.db.homepage.list(&query).await?)))
}

pub async fn get_homepage(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<HomepageContent>>> {
    let content = state
        .db
        .homepage
        .find_by_id(id)
        .await?
        .ok_or_else(|| ConnectHubError::not_found("Homepage content", id))?;
    Ok(Json(ApiResponse::ok(content)))
}

pub async fn create_homepage(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    ValidatedJson(request): ValidatedJson<CreateHomepageContentRequest>,
) -> Result<Created<HomepageContent>> {
    let content = state.db.homepage.create(request).await?;
    record_write(&state, &claims, "create", "homepage_content", Some(&content.id.to_string())).await;
    Ok(created(content))
}

pub async fn update_homepage(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
    ValidatedJson(request): ValidatedJson<UpdateHomepageContentRequest>,
) -> Result<Json<ApiResponse<HomepageContent>>> {
    let content = state
        .db
        .homepage
        .update(id, request)
        .await?
        .ok_or_else(|| ConnectHubError::not_found("Homepage content", id))?;
    record_write(&state, &claims, "update", "homepage_content", Some(&id.to_string())).await;
    Ok(Json(ApiResponse::ok(content)))
}

pub async fn delete_homepage(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<i64>>> {
    let removed = state.db.homepage.delete(id).await?;
    if removed {
        record_write(&state, &claims, "delete", "homepage_content", Some(&id.to_string())).await;
    }
    deleted("Homepage content", id, removed)
}
