//! Announcement repository implementation

use sqlx::PgPool;
use chrono::{DateTime, Utc};
use crate::models::{Announcement, CreateAnnouncementRequest, UpdateAnnouncementRequest, AnnouncementQuery, Page};
use crate::utils::errors::ConnectHubError;
use crate::utils::helpers::{clamp_limit, clamp_offset};

const COLUMNS: &str = "id, title, message, kind, is_active, show_on_all_pages, background_color, text_color, start_date, end_date, display_order, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct AnnouncementRepository {
    pool: PgPool,
}

impl AnnouncementRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new announcement
    pub async fn create(&self, request: CreateAnnouncementRequest) -> Result<Announcement, ConnectHubError> {
        let now = Utc::now();
        let kind = request.kind_or_default();
        let announcement = sqlx::query_as::<_, Announcement>(&format!(
            r#"
            INSERT INTO announcements (title, message, kind, is_active, show_on_all_pages, background_color, text_color,
                                       start_date, end_date, display_order, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(request.title.trim())
        .bind(request.message.trim())
        .bind(kind)
        .bind(request.is_active.unwrap_or(true))
        .bind(request.show_on_all_pages.unwrap_or(true))
        .bind(request.background_color)
        .bind(request.text_color)
        .bind(request.start_date)
        .bind(request.end_date)
        .bind(request.display_order.unwrap_or(0))
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(map_window_violation)?;

        Ok(announcement)
    }

    /// Find announcement by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Announcement>, ConnectHubError> {
        let announcement = sqlx::query_as::<_, Announcement>(&format!("SELECT {COLUMNS} FROM announcements WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(announcement)
    }

    /// Update announcement; absent fields keep their value
    ///
    /// The stored window is checked again after merging so a patch that only
    /// moves one bound cannot invert it.
    pub async fn update(&self, id: i64, request: UpdateAnnouncementRequest) -> Result<Option<Announcement>, ConnectHubError> {
        let announcement = sqlx::query_as::<_, Announcement>(&format!(
            r#"
            UPDATE announcements
            SET title = COALESCE($2, title),
                message = COALESCE($3, message),
                kind = COALESCE(NULLIF(TRIM($4), ''), kind),
                is_active = COALESCE($5, is_active),
                show_on_all_pages = COALESCE($6, show_on_all_pages),
                background_color = COALESCE($7, background_color),
                text_color = COALESCE($8, text_color),
                start_date = COALESCE($9, start_date),
                end_date = COALESCE($10, end_date),
                display_order = COALESCE($11, display_order),
                updated_at = $12
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .bind(request.title)
        .bind(request.message)
        .bind(request.kind)
        .bind(request.is_active)
        .bind(request.show_on_all_pages)
        .bind(request.background_color)
        .bind(request.text_color)
        .bind(request.start_date)
        .bind(request.end_date)
        .bind(request.display_order)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_window_violation)?;

        Ok(announcement)
    }

    /// Toggle whether an announcement is shown
    pub async fn set_active(&self, id: i64, is_active: bool) -> Result<Option<Announcement>, ConnectHubError> {
        let announcement = sqlx::query_as::<_, Announcement>(&format!(
            "UPDATE announcements SET is_active = $2, updated_at = $3 WHERE id = $1 RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(is_active)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(announcement)
    }

    /// Delete announcement, returning whether a row was removed
    pub async fn delete(&self, id: i64) -> Result<bool, ConnectHubError> {
        let result = sqlx::query("DELETE FROM announcements WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// List announcements with optional filters
    pub async fn list(&self, query: &AnnouncementQuery) -> Result<Page<Announcement>, ConnectHubError> {
        let filter = "($1::TEXT IS NULL OR kind = $1) AND ($2::BOOLEAN IS NULL OR is_active = $2)";
        let announcements = sqlx::query_as::<_, Announcement>(&format!(
            "SELECT {COLUMNS} FROM announcements WHERE {filter} ORDER BY display_order, id LIMIT $3 OFFSET $4"
        ))
        .bind(query.kind.as_deref())
        .bind(query.is_active)
        .bind(clamp_limit(query.limit))
        .bind(clamp_offset(query.offset))
        .fetch_all(&self.pool)
        .await?;

        let total: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM announcements WHERE {filter}"))
            .bind(query.kind.as_deref())
            .bind(query.is_active)
            .fetch_one(&self.pool)
            .await?;

        Ok(Page::new(announcements, total.0))
    }

    /// Announcements that are active and inside their window at `now`
    pub async fn list_live(&self, now: DateTime<Utc>) -> Result<Vec<Announcement>, ConnectHubError> {
        let announcements = sqlx::query_as::<_, Announcement>(&format!(
            r#"
            SELECT {COLUMNS} FROM announcements
            WHERE is_active
              AND (start_date IS NULL OR start_date <= $1)
              AND (end_date IS NULL OR end_date >= $1)
            ORDER BY display_order, id
            "#
        ))
        .bind(now)
        .fetch_all(&self.pool)
        .await?;

        Ok(announcements)
    }
}

/// Named in the migration so other checks on the table are not mistaken for it
const WINDOW_CONSTRAINT: &str = "announcements_schedule_window";

/// The table check on the scheduling window surfaces as a field error
fn map_window_violation(error: sqlx::Error) -> ConnectHubError {
    if let sqlx::Error::Database(db_error) = &error {
        if db_error.constraint() == Some(WINDOW_CONSTRAINT) {
            return ConnectHubError::Validation(crate::validation::ValidationErrors::single(
                "end_date",
                "End date must be after the start date",
            ));
        }
    }
    ConnectHubError::Database(error)
}
