//! Proprietor registration repository implementation

use sqlx::PgPool;
use sqlx::types::Json;
use chrono::{DateTime, Utc};
use crate::models::{
    ChapterCount, ChapterStats, Enrollment, PaymentInfo, PersonalInfo, Proprietor, ProprietorQuery, SchoolInfo, Page,
};
use crate::utils::errors::ConnectHubError;
use crate::utils::helpers::{clamp_limit, clamp_offset};

const COLUMNS: &str = r#"id, submission_id, first_name, middle_name, last_name, email, phone, sex, chapters,
    personal, school, enrollment, payment, school_name, current_step, registration_status,
    registration_number, created_at, updated_at, submitted_at"#;

const FILTER: &str = r#"
    ($1::TEXT IS NULL
        OR first_name ILIKE $1 OR last_name ILIKE $1 OR email ILIKE $1
        OR school_name ILIKE $1 OR submission_id ILIKE $1 OR registration_number ILIKE $1)
    AND ($2::TEXT IS NULL OR registration_status = $2)
    AND ($3::BOOLEAN IS NOT TRUE OR cardinality(chapters) = 0)
    AND ($4::TEXT IS NULL OR $4 = ANY(chapters))
"#;

#[derive(Debug, Clone)]
pub struct ProprietorRepository {
    pool: PgPool,
}

impl ProprietorRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a draft registration from step 1
    pub async fn start_registration(&self, submission_id: &str, personal: &PersonalInfo) -> Result<Proprietor, ConnectHubError> {
        let now = Utc::now();
        let proprietor = sqlx::query_as::<_, Proprietor>(&format!(
            r#"
            INSERT INTO proprietors (submission_id, first_name, middle_name, last_name, email, phone, sex, chapters,
                                     personal, current_step, registration_status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, 1, 'draft', $10, $11)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(submission_id)
        .bind(personal.first_name.trim())
        .bind(personal.middle_name.as_deref())
        .bind(personal.last_name.trim())
        .bind(personal.email.trim())
        .bind(personal.phone.trim())
        .bind(&personal.sex)
        .bind(&personal.chapters)
        .bind(Json(personal))
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(proprietor)
    }

    /// Overwrite step 1 data of an existing draft without moving its step
    pub async fn update_personal_info(&self, submission_id: &str, personal: &PersonalInfo) -> Result<Option<Proprietor>, ConnectHubError> {
        let proprietor = sqlx::query_as::<_, Proprietor>(&format!(
            r#"
            UPDATE proprietors
            SET first_name = $2, middle_name = $3, last_name = $4, email = $5, phone = $6, sex = $7,
                chapters = $8, personal = $9, updated_at = $10
            WHERE submission_id = $1 AND registration_status = 'draft'
            RETURNING {COLUMNS}
            "#
        ))
        .bind(submission_id)
        .bind(personal.first_name.trim())
        .bind(personal.middle_name.as_deref())
        .bind(personal.last_name.trim())
        .bind(personal.email.trim())
        .bind(personal.phone.trim())
        .bind(&personal.sex)
        .bind(&personal.chapters)
        .bind(Json(personal))
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(proprietor)
    }

    /// Store step 2; the step only ever moves forward
    pub async fn save_school_info(
        &self,
        submission_id: &str,
        school: &SchoolInfo,
        enrollment: &Enrollment,
    ) -> Result<Option<Proprietor>, ConnectHubError> {
        let proprietor = sqlx::query_as::<_, Proprietor>(&format!(
            r#"
            UPDATE proprietors
            SET school = $2, enrollment = $3, school_name = $4,
                current_step = GREATEST(current_step, 2), updated_at = $5
            WHERE submission_id = $1 AND registration_status = 'draft'
            RETURNING {COLUMNS}
            "#
        ))
        .bind(submission_id)
        .bind(Json(school))
        .bind(Json(enrollment))
        .bind(school.school_name.trim())
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(proprietor)
    }

    /// Store step 3 and, when `registration_number` is given, submit the registration
    pub async fn complete_registration(
        &self,
        submission_id: &str,
        payment: &PaymentInfo,
        registration_number: Option<&str>,
        submitted_at: DateTime<Utc>,
    ) -> Result<Option<Proprietor>, ConnectHubError> {
        let proprietor = sqlx::query_as::<_, Proprietor>(&format!(
            r#"
            UPDATE proprietors
            SET payment = $2,
                current_step = GREATEST(current_step, 3),
                registration_number = COALESCE($3, registration_number),
                registration_status = CASE WHEN $3::TEXT IS NULL THEN registration_status ELSE 'submitted' END,
                submitted_at = CASE WHEN $3::TEXT IS NULL THEN submitted_at ELSE $4 END,
                updated_at = $4
            WHERE submission_id = $1 AND registration_status = 'draft'
            RETURNING {COLUMNS}
            "#
        ))
        .bind(submission_id)
        .bind(Json(payment))
        .bind(registration_number)
        .bind(submitted_at)
        .fetch_optional(&self.pool)
        .await?;

        Ok(proprietor)
    }

    /// Find registration by its submission identifier
    pub async fn find_by_submission_id(&self, submission_id: &str) -> Result<Option<Proprietor>, ConnectHubError> {
        let proprietor = sqlx::query_as::<_, Proprietor>(&format!("SELECT {COLUMNS} FROM proprietors WHERE submission_id = $1"))
            .bind(submission_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(proprietor)
    }

    /// List registrations, newest first
    pub async fn list(&self, query: &ProprietorQuery) -> Result<Page<Proprietor>, ConnectHubError> {
        let search = query
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{}%", s));
        let unassigned = query.wants_unassigned();
        let chapter = if unassigned { None } else { query.chapter.as_deref() };

        let proprietors = sqlx::query_as::<_, Proprietor>(&format!(
            "SELECT {COLUMNS} FROM proprietors WHERE {FILTER} ORDER BY created_at DESC, id DESC LIMIT $5 OFFSET $6"
        ))
        .bind(search.as_deref())
        .bind(query.status.as_deref())
        .bind(unassigned)
        .bind(chapter)
        .bind(clamp_limit(query.limit))
        .bind(clamp_offset(query.offset))
        .fetch_all(&self.pool)
        .await?;

        let total: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM proprietors WHERE {FILTER}"))
            .bind(search.as_deref())
            .bind(query.status.as_deref())
            .bind(unassigned)
            .bind(chapter)
            .fetch_one(&self.pool)
            .await?;

        Ok(Page::new(proprietors, total.0))
    }

    /// Replace the chapters of one proprietor
    pub async fn update_chapters(&self, id: i64, chapters: &[String]) -> Result<Option<Proprietor>, ConnectHubError> {
        let proprietor = sqlx::query_as::<_, Proprietor>(&format!(
            "UPDATE proprietors SET chapters = $2, updated_at = $3 WHERE id = $1 RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(chapters)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(proprietor)
    }

    /// Add chapters to many proprietors, keeping the ones they already have
    pub async fn bulk_assign_chapters(&self, ids: &[i64], chapters: &[String]) -> Result<u64, ConnectHubError> {
        let result = sqlx::query(
            r#"
            UPDATE proprietors
            SET chapters = ARRAY(
                    SELECT c FROM unnest(chapters || $2::TEXT[]) WITH ORDINALITY AS t(c, n)
                    GROUP BY c
                    ORDER BY MIN(n)
                ),
                updated_at = $3
            WHERE id = ANY($1)
            "#
        )
        .bind(ids)
        .bind(chapters)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    /// Registrations per chapter
    pub async fn chapter_counts(&self) -> Result<ChapterStats, ConnectHubError> {
        let chapters = sqlx::query_as::<_, ChapterCount>(
            r#"
            SELECT c AS chapter, COUNT(*) AS count
            FROM proprietors, unnest(chapters) AS c
            GROUP BY c
            ORDER BY c
            "#
        )
        .fetch_all(&self.pool)
        .await?;

        let (total, unassigned): (i64, i64) = sqlx::query_as(
            "SELECT COUNT(*), COUNT(*) FILTER (WHERE cardinality(chapters) = 0) FROM proprietors"
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(ChapterStats { chapters, unassigned, total })
    }
}
