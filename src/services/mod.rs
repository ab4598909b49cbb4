//! Services module
//!
//! This module contains business logic services

pub mod auth;
pub mod content;
pub mod redis;
pub mod registration;
pub mod uploads;

// Re-export commonly used services
pub use auth::{AuthService, Claims, LoginRequest, LoginResponse, ADMIN_ROLE};
pub use content::ContentService;
pub use redis::{CacheService, PUBLIC_NAMESPACE};
pub use registration::RegistrationService;
pub use uploads::{DeleteFileRequest, UploadStorage, UploadedFile, UPLOADS_ROUTE};

use serde::Serialize;
use crate::config::Settings;
use crate::database::DatabaseService;
use crate::utils::errors::Result;

/// Service factory for creating and managing all services
#[derive(Clone, Debug)]
pub struct ServiceFactory {
    pub auth: AuthService,
    pub cache: CacheService,
    pub content: ContentService,
    pub registration: RegistrationService,
    pub uploads: UploadStorage,
}

impl ServiceFactory {
    /// Create a new ServiceFactory with all services initialized
    pub fn new(settings: &Settings, db: DatabaseService) -> Result<Self> {
        let cache = CacheService::new(&settings.redis)?;
        Ok(Self::with_cache(settings, db, cache))
    }

    /// Build services around an already constructed cache
    pub fn with_cache(settings: &Settings, db: DatabaseService, cache: CacheService) -> Self {
        let auth = AuthService::new(&settings.auth);
        let content = ContentService::new(db.clone(), cache.clone(), settings.features.public_cache);
        let registration = RegistrationService::new(db.proprietors.clone());
        let uploads = UploadStorage::new(&settings.uploads, &settings.server.public_base_url);

        Self {
            auth,
            cache,
            content,
            registration,
            uploads,
        }
    }

    /// Health check for the services with external dependencies
    pub async fn health_check(&self, db: &DatabaseService) -> ServiceHealthStatus {
        let database_healthy = db.health_check().await.is_ok();
        let redis_healthy = self.cache.health_check().await;
        let uploads_writable = self.uploads.ensure_directory().await.is_ok();

        ServiceHealthStatus {
            database_healthy,
            redis_healthy,
            uploads_writable,
        }
    }
}

/// Health status for all services
#[derive(Debug, Clone, Serialize)]
pub struct ServiceHealthStatus {
    pub database_healthy: bool,
    /// `None` when the cache is turned off
    pub redis_healthy: Option<bool>,
    pub uploads_writable: bool,
}

impl ServiceHealthStatus {
    /// The site can serve requests without Redis
    pub fn is_healthy(&self) -> bool {
        self.database_healthy && self.uploads_writable
    }

    /// Get list of unhealthy services
    pub fn get_issues(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if !self.database_healthy {
            issues.push("Database connection failed".to_string());
        }
        if self.redis_healthy == Some(false) {
            issues.push("Redis connection failed".to_string());
        }
        if !self.uploads_writable {
            issues.push("Upload directory is not writable".to_string());
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redis_outage_is_not_fatal() {
        let status = ServiceHealthStatus {
            database_healthy: true,
            redis_healthy: Some(false),
            uploads_writable: true,
        };
        assert!(status.is_healthy());
        assert_eq!(status.get_issues(), vec!["Redis connection failed".to_string()]);
    }

    #[test]
    fn test_database_outage_is_fatal() {
        let status = ServiceHealthStatus {
            database_healthy: false,
            redis_healthy: None,
            uploads_writable: true,
        };
        assert!(!status.is_healthy());
        assert_eq!(status.get_issues().len(), 1);
    }
}
