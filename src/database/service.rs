//! Database service layer
//!
//! This module provides a high-level interface to database operations

use crate::database::{
    health_check, AnalyticsRepository, AnnouncementRepository, ContactRepository, DatabasePool, HeroImageRepository,
    HomepageContentRepository, ProprietorRepository, SiteSettingRepository, TeamMemberRepository,
};
use crate::utils::errors::ConnectHubError;

#[derive(Debug, Clone)]
pub struct DatabaseService {
    pub hero_images: HeroImageRepository,
    pub team_members: TeamMemberRepository,
    pub announcements: AnnouncementRepository,
    pub homepage: HomepageContentRepository,
    pub settings: SiteSettingRepository,
    pub proprietors: ProprietorRepository,
    pub contact: ContactRepository,
    pub analytics: AnalyticsRepository,
    pool: DatabasePool,
}

impl DatabaseService {
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            hero_images: HeroImageRepository::new(pool.clone()),
            team_members: TeamMemberRepository::new(pool.clone()),
            announcements: AnnouncementRepository::new(pool.clone()),
            homepage: HomepageContentRepository::new(pool.clone()),
            settings: SiteSettingRepository::new(pool.clone()),
            proprietors: ProprietorRepository::new(pool.clone()),
            contact: ContactRepository::new(pool.clone()),
            analytics: AnalyticsRepository::new(pool.clone()),
            pool,
        }
    }

    pub fn pool(&self) -> &DatabasePool {
        &self.pool
    }

    /// Check that the database answers
    pub async fn health_check(&self) -> Result<(), ConnectHubError> {
        health_check(&self.pool).await
    }
}
