//! Admin panel handlers
//!
//! Every route here except login sits behind [`require_admin`]. Writes are
//! logged with the acting admin and clear the public page cache.

pub mod content;
pub mod proprietors;
pub mod settings;
pub mod system;

use axum::extract::{DefaultBodyLimit, State};
use axum::routing::{get, patch, post, put};
use axum::{middleware, Json, Router};
use crate::handlers::{ApiResponse, AppState};
use crate::middleware::require_admin;
use crate::services::{Claims, LoginRequest, LoginResponse};
use crate::utils::errors::Result;
use crate::utils::logging::log_admin_action;

/// Headroom on top of the file size for multipart framing
const MULTIPART_OVERHEAD_BYTES: u64 = 64 * 1024;

/// POST /api/admin/login
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>> {
    let response = state.services.auth.login(&request)?;
    Ok(Json(ApiResponse::ok(response)))
}

/// Log an admin write and drop cached public pages
pub(crate) async fn record_write(state: &AppState, claims: &Claims, action: &str, resource: &str, target: Option<&str>) {
    log_admin_action(&claims.sub, action, resource, target);
    state.services.content.invalidate().await;
}

/// Admin routes, guarded by the bearer-token check
pub fn router(state: &AppState) -> Router<AppState> {
    let upload_limit = (state.settings.uploads.max_file_size_bytes + MULTIPART_OVERHEAD_BYTES) as usize;

    Router::new()
        .route("/api/admin/hero-images", get(content::list_hero_images).post(content::create_hero_image))
        .route(
            "/api/admin/hero-images/:id",
            get(content::get_hero_image)
                .put(content::update_hero_image)
                .delete(content::delete_hero_image),
        )
        .route("/api/admin/members", get(content::list_members).post(content::create_member))
        .route("/api/admin/members/bulk", post(content::bulk_create_members))
        .route("/api/admin/members/bulk-update", put(content::bulk_update_members))
        .route(
            "/api/admin/members/:id",
            get(content::get_member)
                .put(content::update_member)
                .delete(content::delete_member),
        )
        .route(
            "/api/admin/announcements",
            get(content::list_announcements).post(content::create_announcement),
        )
        .route(
            "/api/admin/announcements/:id",
            get(content::get_announcement)
                .put(content::update_announcement)
                .delete(content::delete_announcement),
        )
        .route("/api/admin/announcements/:id/active", patch(content::set_announcement_active))
        .route("/api/admin/homepage", get(content::list_homepage).post(content::create_homepage))
        .route(
            "/api/admin/homepage/:id",
            get(content::get_homepage)
                .put(content::update_homepage)
                .delete(content::delete_homepage),
        )
        .route(
            "/api/admin/settings",
            get(settings::list_settings)
                .post(settings::upsert_setting)
                .put(settings::replace_settings),
        )
        .route(
            "/api/admin/settings/:key",
            put(settings::update_setting).delete(settings::delete_setting),
        )
        .route("/api/admin/proprietors", get(proprietors::list_proprietors))
        .route("/api/admin/proprietors/:id/chapters", put(proprietors::update_chapters))
        .route("/api/admin/proprietors/bulk-assign-chapters", post(proprietors::bulk_assign_chapters))
        .route("/api/admin/proprietors/chapter-stats", get(proprietors::chapter_stats))
        .route("/api/admin/analytics", get(system::analytics))
        .route("/api/admin/seed-data", post(system::seed_data))
        .route(
            "/api/admin/upload-image",
            post(system::upload_image).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/api/admin/delete-file", post(system::delete_file))
        .route("/api/admin/contact-messages", get(system::contact_messages))
        .route_layer(middleware::from_fn_with_state(state.services.auth.clone(), require_admin))
}
