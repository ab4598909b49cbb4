//! Hero image repository implementation

use sqlx::PgPool;
use chrono::Utc;
use crate::models::{HeroImage, CreateHeroImageRequest, UpdateHeroImageRequest, HeroImageQuery, Page};
use crate::utils::errors::ConnectHubError;
use crate::utils::helpers::{clamp_limit, clamp_offset};

const COLUMNS: &str = "id, title, description, image_url, button_text, button_link, display_order, is_active, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct HeroImageRepository {
    pool: PgPool,
}

impl HeroImageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new hero image
    pub async fn create(&self, request: CreateHeroImageRequest) -> Result<HeroImage, ConnectHubError> {
        let now = Utc::now();
        let image = sqlx::query_as::<_, HeroImage>(&format!(
            r#"
            INSERT INTO hero_images (title, description, image_url, button_text, button_link, display_order, is_active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(request.title.trim())
        .bind(request.description)
        .bind(request.image_url.trim())
        .bind(request.button_text)
        .bind(request.button_link)
        .bind(request.display_order.unwrap_or(0))
        .bind(request.is_active.unwrap_or(true))
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(image)
    }

    /// Find hero image by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<HeroImage>, ConnectHubError> {
        let image = sqlx::query_as::<_, HeroImage>(&format!("SELECT {COLUMNS} FROM hero_images WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(image)
    }

    /// Update hero image; absent fields keep their value
    pub async fn update(&self, id: i64, request: UpdateHeroImageRequest) -> Result<Option<HeroImage>, ConnectHubError> {
        let image = sqlx::query_as::<_, HeroImage>(&format!(
            r#"
            UPDATE hero_images
            SET title = COALESCE($2, title),
                description = COALESCE($3, description),
                image_url = COALESCE($4, image_url),
                button_text = COALESCE($5, button_text),
                button_link = COALESCE($6, button_link),
                display_order = COALESCE($7, display_order),
                is_active = COALESCE($8, is_active),
                updated_at = $9
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .bind(request.title)
        .bind(request.description)
        .bind(request.image_url)
        .bind(request.button_text)
        .bind(request.button_link)
        .bind(request.display_order)
        .bind(request.is_active)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(image)
    }

    /// Delete hero image, returning whether a row was removed
    pub async fn delete(&self, id: i64) -> Result<bool, ConnectHubError> {
        let result = sqlx::query("DELETE FROM hero_images WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// List hero images ordered for the carousel
    pub async fn list(&self, query: &HeroImageQuery) -> Result<Page<HeroImage>, ConnectHubError> {
        let images = sqlx::query_as::<_, HeroImage>(&format!(
            r#"
            SELECT {COLUMNS} FROM hero_images
            WHERE ($1::BOOLEAN IS NULL OR is_active = $1)
            ORDER BY display_order, id
            LIMIT $2 OFFSET $3
            "#
        ))
        .bind(query.is_active)
        .bind(clamp_limit(query.limit))
        .bind(clamp_offset(query.offset))
        .fetch_all(&self.pool)
        .await?;

        let total: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM hero_images WHERE ($1::BOOLEAN IS NULL OR is_active = $1)"
        )
        .bind(query.is_active)
        .fetch_one(&self.pool)
        .await?;

        Ok(Page::new(images, total.0))
    }
}
