//! Proprietor registration service
//!
//! Drives the three registration steps. Step 1 creates a draft and hands out
//! a `submission_id`; the later steps must present it. A step may be posted
//! again after navigating back, which never moves `current_step` backwards.
//! Once a registration is submitted it no longer accepts step writes.

use chrono::{DateTime, Utc};
use tracing::{debug, warn};
use crate::database::ProprietorRepository;
use crate::models::{
    BulkAssignChaptersRequest, ChapterStats, Enrollment, Page, PaymentInfoRequest, PersonalInfoRequest, Proprietor,
    ProprietorQuery, ProprietorView, SchoolInfoRequest, UpdateChaptersRequest,
};
use crate::utils::errors::{ConnectHubError, Result};
use crate::utils::helpers::{generate_registration_number, generate_uuid};
use crate::utils::logging::log_registration_step;
use crate::validation::Validate;

/// Attempts at drawing an unused registration number
const REGISTRATION_NUMBER_ATTEMPTS: usize = 5;

#[derive(Clone, Debug)]
pub struct RegistrationService {
    proprietors: ProprietorRepository,
}

fn is_unique_violation(error: &ConnectHubError) -> bool {
    match error {
        ConnectHubError::Database(sqlx::Error::Database(db_error)) => db_error.code().as_deref() == Some("23505"),
        _ => false,
    }
}

fn step_rejected(proprietor: &Proprietor, step: u8) -> ConnectHubError {
    ConnectHubError::InvalidStateTransition {
        from: format!("{} (step {})", proprietor.registration_status, proprietor.current_step),
        to: format!("step {}", step),
    }
}

impl RegistrationService {
    pub fn new(proprietors: ProprietorRepository) -> Self {
        Self { proprietors }
    }

    async fn load(&self, submission_id: &str) -> Result<Proprietor> {
        self.proprietors
            .find_by_submission_id(submission_id)
            .await?
            .ok_or_else(|| ConnectHubError::not_found("Registration", submission_id))
    }

    /// Load a registration and check it can take data for `step`
    async fn load_for_step(&self, submission_id: &str, step: u8) -> Result<Proprietor> {
        let proprietor = self.load(submission_id).await?;
        let reached = proprietor.current_step >= i32::from(step) - 1;

        if !proprietor.status().accepts_step_writes() || !reached {
            log_registration_step(submission_id, step, false, Some("step not allowed"));
            return Err(step_rejected(&proprietor, step));
        }
        Ok(proprietor)
    }

    /// Step 1: create a draft, or overwrite the personal details of an
    /// existing one when `submission_id` is given
    pub async fn submit_personal_info(&self, request: PersonalInfoRequest) -> Result<Proprietor> {
        request.validate()?;

        let proprietor = match request.submission_id.as_deref().filter(|id| !id.trim().is_empty()) {
            Some(submission_id) => {
                let existing = self.load_for_step(submission_id, 1).await?;
                self.proprietors
                    .update_personal_info(submission_id, &request.personal)
                    .await?
                    .ok_or_else(|| step_rejected(&existing, 1))?
            }
            None => {
                let submission_id = generate_uuid();
                self.proprietors.start_registration(&submission_id, &request.personal).await?
            }
        };

        log_registration_step(&proprietor.submission_id, 1, true, None);
        Ok(proprietor)
    }

    /// Step 2: school details and enrollment counts
    pub async fn submit_school_info(&self, request: SchoolInfoRequest) -> Result<Proprietor> {
        request.validate()?;
        let existing = self.load_for_step(&request.submission_id, 2).await?;

        let enrollment = Enrollment::from_raw(&request.enrollment);
        let proprietor = self
            .proprietors
            .save_school_info(&request.submission_id, &request.school, &enrollment)
            .await?
            .ok_or_else(|| step_rejected(&existing, 2))?;

        let totals = enrollment.totals();
        debug!(
            submission_id = %proprietor.submission_id,
            male = totals.male,
            female = totals.female,
            "Enrollment stored"
        );
        log_registration_step(&proprietor.submission_id, 2, true, None);
        Ok(proprietor)
    }

    /// Step 3: payment details; `final_submit` submits the registration and
    /// issues its number
    pub async fn submit_payment_info(&self, request: PaymentInfoRequest, now: DateTime<Utc>) -> Result<Proprietor> {
        request.validate()?;
        let existing = self.load_for_step(&request.submission_id, 3).await?;

        if !request.final_submit {
            let proprietor = self
                .proprietors
                .complete_registration(&request.submission_id, &request.payment, None, now)
                .await?
                .ok_or_else(|| step_rejected(&existing, 3))?;
            log_registration_step(&proprietor.submission_id, 3, true, Some("saved without submitting"));
            return Ok(proprietor);
        }

        for attempt in 1..=REGISTRATION_NUMBER_ATTEMPTS {
            let number = generate_registration_number(now);
            match self
                .proprietors
                .complete_registration(&request.submission_id, &request.payment, Some(&number), now)
                .await
            {
                Ok(Some(proprietor)) => {
                    log_registration_step(&proprietor.submission_id, 3, true, Some(&number));
                    return Ok(proprietor);
                }
                Ok(None) => return Err(step_rejected(&existing, 3)),
                Err(e) if is_unique_violation(&e) => {
                    warn!(attempt = attempt, number = %number, "Registration number already taken, retrying");
                }
                Err(e) => return Err(e),
            }
        }

        log_registration_step(&request.submission_id, 3, false, Some("no free registration number"));
        Err(ConnectHubError::ServiceUnavailable(
            "Could not issue a registration number, please try again".to_string(),
        ))
    }

    /// Current state of a registration
    pub async fn get(&self, submission_id: &str) -> Result<ProprietorView> {
        Ok(self.load(submission_id).await?.to_view())
    }

    /// Admin listing with search, status and chapter filters
    pub async fn list(&self, query: &ProprietorQuery) -> Result<Page<ProprietorView>> {
        let page = self.proprietors.list(query).await?;
        Ok(Page::new(page.data.iter().map(Proprietor::to_view).collect(), page.total))
    }

    /// Replace the chapters of one proprietor
    pub async fn update_chapters(&self, id: i64, request: UpdateChaptersRequest) -> Result<ProprietorView> {
        request.validate()?;
        self.proprietors
            .update_chapters(id, &request.chapters)
            .await?
            .map(|p| p.to_view())
            .ok_or_else(|| ConnectHubError::not_found("Proprietor", id))
    }

    /// Add chapters to many proprietors, keeping the ones they already have
    pub async fn bulk_assign_chapters(&self, request: BulkAssignChaptersRequest) -> Result<u64> {
        request.validate()?;
        self.proprietors
            .bulk_assign_chapters(&request.proprietor_ids, &request.chapters)
            .await
    }

    pub async fn chapter_stats(&self) -> Result<ChapterStats> {
        self.proprietors.chapter_counts().await
    }
}
