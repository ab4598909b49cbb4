//! Authentication service implementation
//!
//! The admin panel signs in with the credentials from configuration and
//! receives an HS256 token. Every `/api/admin` request carries that token as
//! a bearer credential.

use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use crate::config::AuthConfig;
use crate::utils::errors::{ConnectHubError, Result};

pub const ADMIN_ROLE: &str = "admin";

/// Token payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn is_admin(&self) -> bool {
        self.role == ADMIN_ROLE
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub username: String,
    pub expires_at: DateTime<Utc>,
}

/// Authentication service for the admin panel
#[derive(Clone)]
pub struct AuthService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_ttl: Duration,
    admin_username: String,
    admin_password: String,
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("admin_username", &self.admin_username)
            .field("token_ttl", &self.token_ttl)
            .finish_non_exhaustive()
    }
}

/// Compare without short-circuiting on the first differing byte
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

impl AuthService {
    /// Create a new AuthService instance
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            token_ttl: Duration::seconds(config.token_ttl_seconds as i64),
            admin_username: config.admin_username.clone(),
            admin_password: config.admin_password.clone(),
        }
    }

    /// Check credentials and issue a token
    pub fn login(&self, request: &LoginRequest) -> Result<LoginResponse> {
        let username_ok = constant_time_eq(request.username.trim().as_bytes(), self.admin_username.as_bytes());
        let password_ok = constant_time_eq(request.password.as_bytes(), self.admin_password.as_bytes());

        if !(username_ok && password_ok) {
            warn!(username = %request.username, "Admin login rejected");
            return Err(ConnectHubError::Authentication("Invalid username or password".to_string()));
        }

        let (token, expires_at) = self.issue_token(&self.admin_username, Utc::now())?;
        info!(username = %self.admin_username, "Admin logged in");

        Ok(LoginResponse {
            token,
            username: self.admin_username.clone(),
            expires_at,
        })
    }

    /// Sign an admin token valid from `now` for the configured lifetime
    pub fn issue_token(&self, subject: &str, now: DateTime<Utc>) -> Result<(String, DateTime<Utc>)> {
        let expires_at = now + self.token_ttl;
        let claims = Claims {
            sub: subject.to_string(),
            role: ADMIN_ROLE.to_string(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?;
        Ok((token, expires_at))
    }

    /// Validate a token and return its claims
    pub fn verify(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let data = decode::<Claims>(token, &self.decoding_key, &validation)?;
        debug!(sub = %data.claims.sub, "Token verified");
        Ok(data.claims)
    }

    /// Validate a token and require the admin role
    pub fn require_admin(&self, token: &str) -> Result<Claims> {
        let claims = self.verify(token)?;
        if !claims.is_admin() {
            return Err(ConnectHubError::PermissionDenied(format!(
                "Role {} cannot access the admin panel",
                claims.role
            )));
        }
        Ok(claims)
    }

    /// Expiry of a set of claims as a timestamp
    pub fn expires_at(claims: &Claims) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(claims.exp, 0).single()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "a-test-secret-that-is-long-enough-for-hs256".to_string(),
            token_ttl_seconds: 3600,
            admin_username: "admin".to_string(),
            admin_password: "correct horse battery staple".to_string(),
        }
    }

    #[test]
    fn test_login_and_verify_round_trip() {
        let auth = AuthService::new(&config());
        let response = auth
            .login(&LoginRequest {
                username: "admin".to_string(),
                password: "correct horse battery staple".to_string(),
            })
            .unwrap();

        let claims = auth.require_admin(&response.token).unwrap();
        assert_eq!(claims.sub, "admin");
        assert!(claims.is_admin());
        assert_eq!(AuthService::expires_at(&claims).map(|t| t.timestamp()), Some(response.expires_at.timestamp()));
    }

    #[test]
    fn test_wrong_password_rejected() {
        let auth = AuthService::new(&config());
        let result = auth.login(&LoginRequest {
            username: "admin".to_string(),
            password: "guess".to_string(),
        });
        assert_matches!(result, Err(ConnectHubError::Authentication(_)));
    }

    #[test]
    fn test_expired_token_rejected() {
        let auth = AuthService::new(&config());
        let (token, _) = auth.issue_token("admin", Utc::now() - Duration::hours(2)).unwrap();
        assert_matches!(auth.verify(&token), Err(ConnectHubError::Token(_)));
    }

    #[test]
    fn test_token_from_other_secret_rejected() {
        let other = AuthService::new(&AuthConfig {
            jwt_secret: "another-secret-that-is-also-long-enough".to_string(),
            ..config()
        });
        let (token, _) = other.issue_token("admin", Utc::now()).unwrap();
        assert!(AuthService::new(&config()).verify(&token).is_err());
    }

    #[test]
    fn test_constant_time_eq() {
        assert!(constant_time_eq(b"abc", b"abc"));
        assert!(!constant_time_eq(b"abc", b"abd"));
        assert!(!constant_time_eq(b"abc", b"abcd"));
    }
}
