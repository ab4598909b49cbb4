//! Homepage content repository implementation

use sqlx::PgPool;
use chrono::Utc;
use crate::models::{HomepageContent, CreateHomepageContentRequest, UpdateHomepageContentRequest, HomepageContentQuery, Page};
use crate::utils::errors::ConnectHubError;
use crate::utils::helpers::{clamp_limit, clamp_offset};

const COLUMNS: &str = "id, section, title, subtitle, content, image_url, button_text, button_link, is_active, display_order, metadata, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct HomepageContentRepository {
    pool: PgPool,
}

impl HomepageContentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new content block
    pub async fn create(&self, request: CreateHomepageContentRequest) -> Result<HomepageContent, ConnectHubError> {
        let now = Utc::now();
        let content = sqlx::query_as::<_, HomepageContent>(&format!(
            r#"
            INSERT INTO homepage_content (section, title, subtitle, content, image_url, button_text, button_link,
                                          is_active, display_order, metadata, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(request.section)
        .bind(request.title.trim())
        .bind(request.subtitle)
        .bind(request.content)
        .bind(request.image_url)
        .bind(request.button_text)
        .bind(request.button_link)
        .bind(request.is_active.unwrap_or(true))
        .bind(request.display_order.unwrap_or(0))
        .bind(request.metadata.unwrap_or_else(|| serde_json::json!({})))
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(content)
    }

    /// Find content block by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<HomepageContent>, ConnectHubError> {
        let content = sqlx::query_as::<_, HomepageContent>(&format!("SELECT {COLUMNS} FROM homepage_content WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(content)
    }

    /// Update content block; absent fields keep their value
    pub async fn update(&self, id: i64, request: UpdateHomepageContentRequest) -> Result<Option<HomepageContent>, ConnectHubError> {
        let content = sqlx::query_as::<_, HomepageContent>(&format!(
            r#"
            UPDATE homepage_content
            SET section = COALESCE($2, section),
                title = COALESCE($3, title),
                subtitle = COALESCE($4, subtitle),
                content = COALESCE($5, content),
                image_url = COALESCE($6, image_url),
                button_text = COALESCE($7, button_text),
                button_link = COALESCE($8, button_link),
                is_active = COALESCE($9, is_active),
                display_order = COALESCE($10, display_order),
                metadata = COALESCE($11, metadata),
                updated_at = $12
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .bind(request.section)
        .bind(request.title)
        .bind(request.subtitle)
        .bind(request.content)
        .bind(request.image_url)
        .bind(request.button_text)
        .bind(request.button_link)
        .bind(request.is_active)
        .bind(request.display_order)
        .bind(request.metadata)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(content)
    }

    /// Delete content block, returning whether a row was removed
    pub async fn delete(&self, id: i64) -> Result<bool, ConnectHubError> {
        let result = sqlx::query("DELETE FROM homepage_content WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// List content blocks, optionally for one section
    pub async fn list(&self, query: &HomepageContentQuery) -> Result<Page<HomepageContent>, ConnectHubError> {
        let filter = "($1::TEXT IS NULL OR section = $1) AND ($2::BOOLEAN IS NULL OR is_active = $2)";
        let content = sqlx::query_as::<_, HomepageContent>(&format!(
            "SELECT {COLUMNS} FROM homepage_content WHERE {filter} ORDER BY display_order, id LIMIT $3 OFFSET $4"
        ))
        .bind(query.section.as_deref())
        .bind(query.is_active)
        .bind(clamp_limit(query.limit))
        .bind(clamp_offset(query.offset))
        .fetch_all(&self.pool)
        .await?;

        let total: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM homepage_content WHERE {filter}"))
            .bind(query.section.as_deref())
            .bind(query.is_active)
            .fetch_one(&self.pool)
            .await?;

        Ok(Page::new(content, total.0))
    }
}
