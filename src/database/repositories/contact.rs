//! Contact message repository implementation

use sqlx::PgPool;
use chrono::Utc;
use crate::models::{ContactMessage, CreateContactMessageRequest, ContactMessageQuery, Page};
use crate::utils::errors::ConnectHubError;
use crate::utils::helpers::{clamp_limit, clamp_offset};

#[derive(Debug, Clone)]
pub struct ContactRepository {
    pool: PgPool,
}

impl ContactRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Store a message from the contact form
    pub async fn create(&self, request: CreateContactMessageRequest) -> Result<ContactMessage, ConnectHubError> {
        let message = sqlx::query_as::<_, ContactMessage>(
            r#"
            INSERT INTO contact_messages (name, email, phone, subject, message, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, email, phone, subject, message, created_at
            "#
        )
        .bind(request.name.trim())
        .bind(request.email.trim())
        .bind(request.phone)
        .bind(request.subject)
        .bind(request.message)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(message)
    }

    /// Newest messages first
    pub async fn list(&self, query: &ContactMessageQuery) -> Result<Page<ContactMessage>, ConnectHubError> {
        let messages = sqlx::query_as::<_, ContactMessage>(
            "SELECT id, name, email, phone, subject, message, created_at FROM contact_messages ORDER BY created_at DESC, id DESC LIMIT $1 OFFSET $2"
        )
        .bind(clamp_limit(query.limit))
        .bind(clamp_offset(query.offset))
        .fetch_all(&self.pool)
        .await?;

        Ok(Page::new(messages, self.count().await?))
    }

    pub async fn count(&self) -> Result<i64, ConnectHubError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM contact_messages")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }
}
