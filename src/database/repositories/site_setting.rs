//! Site setting repository implementation

use sqlx::{PgPool, Postgres};
use chrono::Utc;
use crate::models::{SiteSetting, UpsertSiteSettingRequest, SiteSettingQuery};
use crate::utils::errors::ConnectHubError;

const COLUMNS: &str = "id, setting_key, setting_value, setting_type, description, is_public, created_at, updated_at";

#[derive(Debug, Clone)]
pub struct SiteSettingRepository {
    pool: PgPool,
}

impl SiteSettingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn upsert_with<'e, E>(executor: E, request: UpsertSiteSettingRequest) -> Result<SiteSetting, ConnectHubError>
    where
        E: sqlx::Executor<'e, Database = Postgres>,
    {
        let now = Utc::now();
        let setting_type = request.resolved_type();
        let setting = sqlx::query_as::<_, SiteSetting>(&format!(
            r#"
            INSERT INTO site_settings (setting_key, setting_value, setting_type, description, is_public, created_at, updated_at)
            VALUES ($1, $2, $3, $4, COALESCE($5, TRUE), $6, $7)
            ON CONFLICT (setting_key) DO UPDATE
            SET setting_value = EXCLUDED.setting_value,
                setting_type = EXCLUDED.setting_type,
                description = COALESCE(EXCLUDED.description, site_settings.description),
                is_public = COALESCE($5, site_settings.is_public),
                updated_at = EXCLUDED.updated_at
            RETURNING {COLUMNS}
            "#
        ))
        .bind(request.setting_key)
        .bind(request.setting_value)
        .bind(setting_type)
        .bind(request.description)
        .bind(request.is_public)
        .bind(now)
        .bind(now)
        .fetch_one(executor)
        .await?;

        Ok(setting)
    }

    /// Insert a setting or overwrite the existing value for its key
    pub async fn upsert(&self, request: UpsertSiteSettingRequest) -> Result<SiteSetting, ConnectHubError> {
        Self::upsert_with(&self.pool, request).await
    }

    /// Replace the whole settings table in one transaction
    pub async fn replace_all(&self, requests: Vec<UpsertSiteSettingRequest>) -> Result<Vec<SiteSetting>, ConnectHubError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("DELETE FROM site_settings")
            .execute(&mut *tx)
            .await?;

        let mut settings = Vec::with_capacity(requests.len());
        for request in requests {
            settings.push(Self::upsert_with(&mut *tx, request).await?);
        }
        tx.commit().await?;

        Ok(settings)
    }

    /// Delete setting, returning whether a row was removed
    pub async fn delete(&self, key: &str) -> Result<bool, ConnectHubError> {
        let result = sqlx::query("DELETE FROM site_settings WHERE setting_key = $1")
            .bind(key)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// List settings ordered by type then key
    pub async fn list(&self, query: &SiteSettingQuery) -> Result<Vec<SiteSetting>, ConnectHubError> {
        let settings = sqlx::query_as::<_, SiteSetting>(&format!(
            r#"
            SELECT {COLUMNS} FROM site_settings
            WHERE ($1::TEXT IS NULL OR setting_type = $1)
              AND ($2::BOOLEAN IS NULL OR is_public = $2)
            ORDER BY setting_type, setting_key
            "#
        ))
        .bind(query.setting_type.as_deref())
        .bind(query.is_public)
        .fetch_all(&self.pool)
        .await?;

        Ok(settings)
    }

    /// Settings the website may read
    pub async fn list_public(&self) -> Result<Vec<SiteSetting>, ConnectHubError> {
        self.list(&SiteSettingQuery { setting_type: None, is_public: Some(true) }).await
    }
}
