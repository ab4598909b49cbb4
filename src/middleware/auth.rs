//! Authentication middleware
//!
//! Guards the admin API. Requests must carry `Authorization: Bearer <token>`
//! signed by [`AuthService`]; the verified [`Claims`] are attached to the
//! request extensions for handlers to read.

use axum::extract::{Request, State};
use axum::http::{header, HeaderMap};
use axum::middleware::Next;
use axum::response::Response;
use tracing::{debug, warn};
use crate::services::{AuthService, Claims};
use crate::utils::errors::{ConnectHubError, Result};

/// Token from an `Authorization: Bearer` header
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();

    if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() {
        Some(token)
    } else {
        None
    }
}

/// Reject requests without a valid admin token
pub async fn require_admin(State(auth): State<AuthService>, mut request: Request, next: Next) -> Result<Response> {
    let Some(token) = bearer_token(request.headers()) else {
        warn!(path = %request.uri().path(), "Admin request without bearer token");
        return Err(ConnectHubError::Authentication("Missing bearer token".to_string()));
    };

    let claims: Claims = auth.require_admin(token)?;
    debug!(admin = %claims.sub, path = %request.uri().path(), "Admin request authorized");

    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}
