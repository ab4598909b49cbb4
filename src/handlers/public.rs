//! Public website handlers

use std::sync::LazyLock;
use std::time::Instant;

use axum::extract::{Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use crate::handlers::{ApiResponse, AppState, ValidatedJson};
use crate::models::{
    AboutPage, Announcement, ContactMessage, CreateContactMessageRequest, HeroImage, HeroImageQuery, HomePage,
    HomepageContent, HomepageContentQuery, Page, SiteSetting, TeamMember, TeamMemberQuery, CHAPTERS,
};
use crate::utils::errors::Result;
use crate::utils::helpers::MAX_PAGE_SIZE;

static START_TIME: LazyLock<Instant> = LazyLock::new(Instant::now);

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// Uptime in seconds
    pub uptime: u64,
    pub database: bool,
    pub redis: Option<bool>,
    pub issues: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct MemberFilter {
    pub category: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SectionFilter {
    pub section: Option<String>,
}

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let status = state.services.health_check(&state.db).await;
    let healthy = status.is_healthy();

    let body = HealthResponse {
        status: if healthy { "up" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime: START_TIME.elapsed().as_secs(),
        database: status.database_healthy,
        redis: status.redis_healthy,
        issues: status.get_issues(),
    };
    let code = if healthy { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };

    (
        code,
        [
            (header::CACHE_CONTROL, "no-store, no-cache, must-revalidate"),
            (header::PRAGMA, "no-cache"),
        ],
        Json(body),
    )
}

/// GET /api/public/home
pub async fn home(State(state): State<AppState>) -> Result<Json<ApiResponse<HomePage>>> {
    let page = state.services.content.home(Utc::now()).await?;
    Ok(Json(ApiResponse::ok(page)))
}

/// GET /api/public/about
pub async fn about(State(state): State<AppState>) -> Result<Json<ApiResponse<AboutPage>>> {
    let page = state.services.content.about().await?;
    Ok(Json(ApiResponse::ok(page)))
}

/// GET /api/hero-images - active slides in carousel order
pub async fn hero_images(State(state): State<AppState>) -> Result<Json<ApiResponse<Page<HeroImage>>>> {
    let page = state
        .db
        .hero_images
        .list(&HeroImageQuery { is_active: Some(true), limit: Some(MAX_PAGE_SIZE), offset: None })
        .await?;
    Ok(Json(ApiResponse::ok(page)))
}

/// GET /api/members
pub async fn members(
    State(state): State<AppState>,
    Query(filter): Query<MemberFilter>,
) -> Result<Json<ApiResponse<Page<TeamMember>>>> {
    let page = state
        .db
        .team_members
        .list(&TeamMemberQuery {
            category: filter.category,
            is_active: Some(true),
            limit: Some(MAX_PAGE_SIZE),
            ..Default::default()
        })
        .await?;
    Ok(Json(ApiResponse::ok(page)))
}

/// GET /api/announcements - only those live right now
pub async fn announcements(State(state): State<AppState>) -> Result<Json<ApiResponse<Vec<Announcement>>>> {
    let live = state.db.announcements.list_live(Utc::now()).await?;
    Ok(Json(ApiResponse::ok(live)))
}

/// GET /api/settings
pub async fn settings(State(state): State<AppState>) -> Result<Json<ApiResponse<Vec<SiteSetting>>>> {
    let settings = state.db.settings.list_public().await?;
    Ok(Json(ApiResponse::ok(settings)))
}

/// GET /api/homepage?section=
pub async fn homepage(
    State(state): State<AppState>,
    Query(filter): Query<SectionFilter>,
) -> Result<Json<ApiResponse<Page<HomepageContent>>>> {
    let page = state
        .db
        .homepage
        .list(&HomepageContentQuery {
            section: filter.section,
            is_active: Some(true),
            limit: Some(MAX_PAGE_SIZE),
            offset: None,
        })
        .await?;
    Ok(Json(ApiResponse::ok(page)))
}

/// GET /api/chapters
pub async fn chapters() -> Json<ApiResponse<Vec<&'static str>>> {
    Json(ApiResponse::ok(CHAPTERS.to_vec()))
}

/// POST /api/contact
pub async fn submit_contact(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateContactMessageRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ContactMessage>>)> {
    let message = state.db.contact.create(request).await?;
    info!(message_id = message.id, "Contact message received");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(message, "Thank you, your message has been sent")),
    ))
}
