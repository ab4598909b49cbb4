//! HTTP handlers module
//!
//! This module contains the REST API organized by audience:
//! - Public handlers serving the website
//! - Registration handlers for the three-step proprietor wizard
//! - Admin handlers for the content-management panel

pub mod admin;
pub mod public;
pub mod registration;

use std::sync::Arc;

use axum::extract::{FromRequest, Request};
use axum::http::{HeaderValue, Method};
use axum::routing::{get, post};
use axum::{async_trait, middleware, Json, Router};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use crate::config::Settings;
use crate::database::DatabaseService;
use crate::middleware::{limit_by_ip, log_requests, RateLimitMiddleware};
use crate::services::{ServiceFactory, UPLOADS_ROUTE};
use crate::utils::errors::ConnectHubError;
use crate::validation::Validate;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseService,
    pub services: ServiceFactory,
    pub settings: Arc<Settings>,
    pub limiter: RateLimitMiddleware,
}

impl AppState {
    pub fn new(settings: Settings, db: DatabaseService, services: ServiceFactory) -> Result<Self, ConnectHubError> {
        let limiter = RateLimitMiddleware::new(&settings.rate_limit)?;
        Ok(Self {
            db,
            services,
            settings: Arc::new(settings),
            limiter,
        })
    }
}

/// Envelope for successful responses
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
            message: None,
        }
    }

    pub fn with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data,
            message: Some(message.into()),
        }
    }
}

/// JSON body that has passed its field checks
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ConnectHubError;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(request, state)
            .await
            .map_err(|rejection| ConnectHubError::InvalidInput(rejection.body_text()))?;
        value.validate()?;
        Ok(Self(value))
    }
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.iter().any(|o| o == "*") {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(origins.iter().filter_map(|o| HeaderValue::from_str(o).ok()))
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::PATCH, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any)
}

/// Build the full application router
pub fn router(state: AppState) -> Router {
    let limited = Router::new()
        .route("/api/contact", post(public::submit_contact))
        .route("/api/registration/step1", post(registration::step1))
        .route("/api/registration/step2", post(registration::step2))
        .route("/api/registration/step3", post(registration::step3))
        .route("/api/admin/login", post(admin::login))
        .route_layer(middleware::from_fn_with_state(state.limiter.clone(), limit_by_ip));

    let public = Router::new()
        .route("/api/health", get(public::health))
        .route("/api/public/home", get(public::home))
        .route("/api/public/about", get(public::about))
        .route("/api/hero-images", get(public::hero_images))
        .route("/api/members", get(public::members))
        .route("/api/announcements", get(public::announcements))
        .route("/api/settings", get(public::settings))
        .route("/api/homepage", get(public::homepage))
        .route("/api/chapters", get(public::chapters))
        .route("/api/registration/:submission_id", get(registration::status));

    let uploads = ServeDir::new(state.services.uploads.directory());
    let cors = cors_layer(&state.settings.server.cors_origins);

    Router::new()
        .merge(public)
        .merge(limited)
        .merge(admin::router(&state))
        .nest_service(UPLOADS_ROUTE, uploads)
        .layer(middleware::from_fn(log_requests))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
