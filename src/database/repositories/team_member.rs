//! Team member repository implementation

use sqlx::{PgPool, Postgres, Transaction};
use chrono::Utc;
use crate::models::{TeamMember, CreateTeamMemberRequest, UpdateTeamMemberRequest, TeamMemberPatch, TeamMemberQuery, Page};
use crate::utils::errors::ConnectHubError;
use crate::utils::helpers::{clamp_limit, clamp_offset};

const COLUMNS: &str = "id, name, position, category, bio, email, phone, image_url, linkedin, twitter, facebook, display_order, is_active, is_featured, created_at, updated_at";

const FILTER: &str = r#"
    ($1::TEXT IS NULL OR category = $1)
    AND ($2::BOOLEAN IS NULL OR is_active = $2)
    AND ($3::BOOLEAN IS NULL OR is_featured = $3)
"#;

#[derive(Debug, Clone)]
pub struct TeamMemberRepository {
    pool: PgPool,
}

impl TeamMemberRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn insert<'e, E>(executor: E, request: CreateTeamMemberRequest) -> Result<TeamMember, ConnectHubError>
    where
        E: sqlx::Executor<'e, Database = Postgres>,
    {
        let now = Utc::now();
        let category = request.category_or_default();
        let member = sqlx::query_as::<_, TeamMember>(&format!(
            r#"
            INSERT INTO team_members (name, position, category, bio, email, phone, image_url, linkedin, twitter, facebook,
                                      display_order, is_active, is_featured, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(request.name.trim())
        .bind(request.position.trim())
        .bind(category)
        .bind(request.bio)
        .bind(request.email)
        .bind(request.phone)
        .bind(request.image_url)
        .bind(request.linkedin)
        .bind(request.twitter)
        .bind(request.facebook)
        .bind(request.display_order.unwrap_or(0))
        .bind(request.is_active.unwrap_or(true))
        .bind(request.is_featured.unwrap_or(false))
        .bind(now)
        .bind(now)
        .fetch_one(executor)
        .await?;

        Ok(member)
    }

    async fn apply_update<'e, E>(executor: E, id: i64, request: UpdateTeamMemberRequest) -> Result<Option<TeamMember>, ConnectHubError>
    where
        E: sqlx::Executor<'e, Database = Postgres>,
    {
        let member = sqlx::query_as::<_, TeamMember>(&format!(
            r#"
            UPDATE team_members
            SET name = COALESCE($2, name),
                position = COALESCE($3, position),
                category = COALESCE(NULLIF(TRIM($4), ''), category),
                bio = COALESCE($5, bio),
                email = COALESCE($6, email),
                phone = COALESCE($7, phone),
                image_url = COALESCE($8, image_url),
                linkedin = COALESCE($9, linkedin),
                twitter = COALESCE($10, twitter),
                facebook = COALESCE($11, facebook),
                display_order = COALESCE($12, display_order),
                is_active = COALESCE($13, is_active),
                is_featured = COALESCE($14, is_featured),
                updated_at = $15
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .bind(request.name)
        .bind(request.position)
        .bind(request.category)
        .bind(request.bio)
        .bind(request.email)
        .bind(request.phone)
        .bind(request.image_url)
        .bind(request.linkedin)
        .bind(request.twitter)
        .bind(request.facebook)
        .bind(request.display_order)
        .bind(request.is_active)
        .bind(request.is_featured)
        .bind(Utc::now())
        .fetch_optional(executor)
        .await?;

        Ok(member)
    }

    /// Create a new team member
    pub async fn create(&self, request: CreateTeamMemberRequest) -> Result<TeamMember, ConnectHubError> {
        Self::insert(&self.pool, request).await
    }

    /// Create several members; either all are stored or none are
    pub async fn bulk_create(&self, requests: Vec<CreateTeamMemberRequest>) -> Result<Vec<TeamMember>, ConnectHubError> {
        let mut tx: Transaction<'_, Postgres> = self.pool.begin().await?;
        let mut created = Vec::with_capacity(requests.len());
        for request in requests {
            created.push(Self::insert(&mut *tx, request).await?);
        }
        tx.commit().await?;

        Ok(created)
    }

    /// Find team member by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<TeamMember>, ConnectHubError> {
        let member = sqlx::query_as::<_, TeamMember>(&format!("SELECT {COLUMNS} FROM team_members WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(member)
    }

    /// Update team member; absent fields keep their value
    pub async fn update(&self, id: i64, request: UpdateTeamMemberRequest) -> Result<Option<TeamMember>, ConnectHubError> {
        Self::apply_update(&self.pool, id, request).await
    }

    /// Apply several patches in one transaction
    ///
    /// Fails with `NotFound` and rolls back if any id is unknown.
    pub async fn bulk_update(&self, patches: Vec<TeamMemberPatch>) -> Result<Vec<TeamMember>, ConnectHubError> {
        let mut tx: Transaction<'_, Postgres> = self.pool.begin().await?;
        let mut updated = Vec::with_capacity(patches.len());
        for patch in patches {
            let id = patch.id;
            match Self::apply_update(&mut *tx, id, patch.changes).await? {
                Some(member) => updated.push(member),
                None => return Err(ConnectHubError::not_found("team member", id)),
            }
        }
        tx.commit().await?;

        Ok(updated)
    }

    /// Delete team member, returning whether a row was removed
    pub async fn delete(&self, id: i64) -> Result<bool, ConnectHubError> {
        let result = sqlx::query("DELETE FROM team_members WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// List team members with optional filters
    pub async fn list(&self, query: &TeamMemberQuery) -> Result<Page<TeamMember>, ConnectHubError> {
        let members = sqlx::query_as::<_, TeamMember>(&format!(
            "SELECT {COLUMNS} FROM team_members WHERE {FILTER} ORDER BY display_order, id LIMIT $4 OFFSET $5"
        ))
        .bind(query.category.as_deref())
        .bind(query.is_active)
        .bind(query.is_featured)
        .bind(clamp_limit(query.limit))
        .bind(clamp_offset(query.offset))
        .fetch_all(&self.pool)
        .await?;

        let total: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM team_members WHERE {FILTER}"))
            .bind(query.category.as_deref())
            .bind(query.is_active)
            .bind(query.is_featured)
            .fetch_one(&self.pool)
            .await?;

        Ok(Page::new(members, total.0))
    }
}
