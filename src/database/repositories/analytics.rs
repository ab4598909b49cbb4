//! Dashboard statistics queries

use sqlx::PgPool;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use crate::models::Analytics;
use crate::utils::errors::ConnectHubError;

#[derive(Debug, Clone)]
pub struct AnalyticsRepository {
    pool: PgPool,
}

impl AnalyticsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn breakdown(&self, sql: &str) -> Result<BTreeMap<String, i64>, ConnectHubError> {
        let rows: Vec<(String, i64)> = sqlx::query_as(sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().collect())
    }

    /// Gather every dashboard counter
    pub async fn collect(&self, now: DateTime<Utc>) -> Result<Analytics, ConnectHubError> {
        let (total_homepage_content, active_content): (i64, i64) = sqlx::query_as(
            "SELECT COUNT(*), COUNT(*) FILTER (WHERE is_active) FROM homepage_content"
        )
        .fetch_one(&self.pool)
        .await?;

        let (total_team_members, featured_members): (i64, i64) = sqlx::query_as(
            "SELECT COUNT(*), COUNT(*) FILTER (WHERE is_featured) FROM team_members"
        )
        .fetch_one(&self.pool)
        .await?;

        let (hero_images, active_hero_images): (i64, i64) = sqlx::query_as(
            "SELECT COUNT(*), COUNT(*) FILTER (WHERE is_active) FROM hero_images"
        )
        .fetch_one(&self.pool)
        .await?;

        let (announcements, live_announcements): (i64, i64) = sqlx::query_as(
            r#"
            SELECT COUNT(*),
                   COUNT(*) FILTER (WHERE is_active
                                      AND (start_date IS NULL OR start_date <= $1)
                                      AND (end_date IS NULL OR end_date >= $1))
            FROM announcements
            "#
        )
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        let contact_messages: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM contact_messages")
            .fetch_one(&self.pool)
            .await?;

        Ok(Analytics {
            total_homepage_content,
            total_team_members,
            active_content,
            featured_members,
            section_breakdown: self
                .breakdown("SELECT section, COUNT(*) FROM homepage_content GROUP BY section")
                .await?,
            category_breakdown: self
                .breakdown("SELECT category, COUNT(*) FROM team_members GROUP BY category")
                .await?,
            hero_images,
            active_hero_images,
            announcements,
            live_announcements,
            registrations_by_status: self
                .breakdown("SELECT registration_status, COUNT(*) FROM proprietors GROUP BY registration_status")
                .await?,
            contact_messages: contact_messages.0,
        })
    }

    /// Row counts of the tables filled by the seed data
    pub async fn seeded_table_counts(&self) -> Result<SeededCounts, ConnectHubError> {
        let counts: (i64, i64, i64, i64) = sqlx::query_as(
            r#"
            SELECT (SELECT COUNT(*) FROM hero_images),
                   (SELECT COUNT(*) FROM team_members),
                   (SELECT COUNT(*) FROM homepage_content),
                   (SELECT COUNT(*) FROM site_settings)
            "#
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(SeededCounts {
            hero_images: counts.0,
            team_members: counts.1,
            homepage_content: counts.2,
            site_settings: counts.3,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeededCounts {
    pub hero_images: i64,
    pub team_members: i64,
    pub homepage_content: i64,
    pub site_settings: i64,
}
