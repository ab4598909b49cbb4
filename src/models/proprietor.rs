//! Proprietor registration model
//!
//! A registration is collected in three steps: personal details, school
//! details with enrollment figures, then payment and verification. The row
//! is created as a draft by step 1 and keyed by its `submission_id`.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::FromRow;

use crate::models::chapters::{self, UNASSIGNED};
use crate::validation::{self, FieldRule, Validate, ValidationErrors};

/// Class levels that carry male/female enrollment counts
pub const ENROLLMENT_LEVELS: [&str; 17] = [
    "kg1", "kg2", "eccd", "nursery1", "nursery2", "primary1", "primary2", "primary3", "primary4",
    "primary5", "primary6", "jss1", "jss2", "jss3", "ss1", "ss2", "ss3",
];

pub const LAST_STEP: i32 = 3;

#[derive(Debug, Clone, FromRow)]
pub struct Proprietor {
    pub id: i64,
    pub submission_id: String,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub sex: String,
    pub chapters: Vec<String>,
    pub personal: Json<PersonalInfo>,
    pub school: Option<Json<SchoolInfo>>,
    pub enrollment: Json<Enrollment>,
    pub payment: Option<Json<PaymentInfo>>,
    pub school_name: Option<String>,
    pub current_step: i32,
    pub registration_status: String,
    pub registration_number: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub submitted_at: Option<DateTime<Utc>>,
}

impl Proprietor {
    pub fn full_name(&self) -> String {
        match self.middle_name.as_deref().filter(|m| !m.is_empty()) {
            Some(middle) => format!("{} {} {}", self.first_name, middle, self.last_name),
            None => format!("{} {}", self.first_name, self.last_name),
        }
    }

    pub fn status(&self) -> RegistrationStatus {
        self.registration_status.parse().unwrap_or(RegistrationStatus::Draft)
    }

    /// Flattened view returned by the API
    pub fn to_view(&self) -> ProprietorView {
        ProprietorView {
            id: self.id,
            submission_id: self.submission_id.clone(),
            full_name: self.full_name(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            sex: self.sex.clone(),
            chapters: self.chapters.clone(),
            school_name: self.school_name.clone(),
            current_step: self.current_step,
            registration_status: self.registration_status.clone(),
            registration_number: self.registration_number.clone(),
            personal: self.personal.0.clone(),
            school: self.school.as_ref().map(|s| s.0.clone()),
            enrollment: self.enrollment.0.clone(),
            enrollment_totals: self.enrollment.0.totals(),
            payment: self.payment.as_ref().map(|p| p.0.clone()),
            created_at: self.created_at,
            updated_at: self.updated_at,
            submitted_at: self.submitted_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProprietorView {
    pub id: i64,
    pub submission_id: String,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub sex: String,
    pub chapters: Vec<String>,
    pub school_name: Option<String>,
    pub current_step: i32,
    pub registration_status: String,
    pub registration_number: Option<String>,
    pub personal: PersonalInfo,
    pub school: Option<SchoolInfo>,
    pub enrollment: Enrollment,
    pub enrollment_totals: EnrollmentTotals,
    pub payment: Option<PaymentInfo>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub submitted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RegistrationStatus {
    Draft,
    Submitted,
    Approved,
    Rejected,
}

impl RegistrationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegistrationStatus::Draft => "draft",
            RegistrationStatus::Submitted => "submitted",
            RegistrationStatus::Approved => "approved",
            RegistrationStatus::Rejected => "rejected",
        }
    }

    /// Step writes are only accepted while the registration is a draft
    pub fn accepts_step_writes(&self) -> bool {
        matches!(self, RegistrationStatus::Draft)
    }
}

impl fmt::Display for RegistrationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RegistrationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(RegistrationStatus::Draft),
            "submitted" => Ok(RegistrationStatus::Submitted),
            "approved" => Ok(RegistrationStatus::Approved),
            "rejected" => Ok(RegistrationStatus::Rejected),
            _ => Err(format!("Unknown registration status: {}", s)),
        }
    }
}

/// Step 1: personal information
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonalInfo {
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub sex: String,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub chapters: Vec<String>,
    pub napps_registered: Option<String>,
    pub participation_history: Option<String>,
    pub times_participated: Option<i32>,
    pub pupils_presented_last_exam: Option<i32>,
    pub awards: Option<String>,
    pub position_held: Option<String>,
}

impl Validate for PersonalInfo {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        validation::require(&mut errors, "first_name", &self.first_name, 2, "First name is required");
        validation::require(&mut errors, "last_name", &self.last_name, 2, "Last name is required");
        FieldRule::choice(["Male", "Female"])
            .message("Please select your gender")
            .check("sex", &self.sex, &mut errors);
        FieldRule::email().check("email", self.email.trim(), &mut errors);
        FieldRule::phone()
            .message("Phone number is required")
            .check("phone", self.phone.trim(), &mut errors);
        check_chapter_list(&mut errors, &self.chapters);
        validation::check_optional(
            &mut errors,
            "napps_registered",
            self.napps_registered.as_deref(),
            &FieldRule::choice(["Not Registered", "Registered", "Registered with Certificate"]),
        );
        validation::non_negative(&mut errors, "times_participated", self.times_participated);
        validation::non_negative(&mut errors, "pupils_presented_last_exam", self.pupils_presented_last_exam);
        errors.into_result()
    }
}

/// Step 1 body; `submission_id` is set when the user navigates back and
/// resubmits an existing draft
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersonalInfoRequest {
    pub submission_id: Option<String>,
    #[serde(flatten)]
    pub personal: PersonalInfo,
}

impl Validate for PersonalInfoRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        self.personal.validate()
    }
}

/// Enrollment counts keyed `<level>_male` / `<level>_female`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Enrollment(pub BTreeMap<String, i32>);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrollmentTotals {
    pub male: i64,
    pub female: i64,
    pub total: i64,
}

impl Enrollment {
    /// Keep only the values that were provided; zero counts as provided
    pub fn from_raw(raw: &BTreeMap<String, Option<i32>>) -> Self {
        Self(
            raw.iter()
                .filter_map(|(key, value)| value.map(|v| (key.clone(), v)))
                .collect(),
        )
    }

    pub fn get(&self, key: &str) -> Option<i32> {
        self.0.get(key).copied()
    }

    pub fn totals(&self) -> EnrollmentTotals {
        let mut totals = EnrollmentTotals::default();
        for (key, value) in &self.0 {
            if key.ends_with("_female") {
                totals.female += i64::from(*value);
            } else if key.ends_with("_male") {
                totals.male += i64::from(*value);
            }
        }
        totals.total = totals.male + totals.female;
        totals
    }

    pub fn is_known_key(key: &str) -> bool {
        key.strip_suffix("_male")
            .or_else(|| key.strip_suffix("_female"))
            .map_or(false, |level| ENROLLMENT_LEVELS.contains(&level))
    }
}

/// Step 2 school details as stored
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchoolInfo {
    pub school_name: String,
    pub school_name2: Option<String>,
    pub address: String,
    pub address_line2: Option<String>,
    pub lga: Option<String>,
    pub aeqeo_zone: Option<String>,
    pub gps_longitude: Option<f64>,
    pub gps_latitude: Option<f64>,
    pub type_of_school: Option<String>,
    pub category_of_school: Option<String>,
    pub ownership: Option<String>,
    pub year_of_establishment: Option<i32>,
    pub year_of_approval: Option<i32>,
    pub registration_evidence: Option<String>,
}

impl Validate for SchoolInfo {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        validation::require(&mut errors, "school_name", &self.school_name, 3, "School name is required");
        validation::require(&mut errors, "address", &self.address, 5, "Address is required");
        validation::check_optional(
            &mut errors,
            "type_of_school",
            self.type_of_school.as_deref(),
            &FieldRule::choice(["Faith Based", "Conventional", "Islamiyah Integrated", "Secular", "Other"]),
        );
        validation::check_optional(
            &mut errors,
            "ownership",
            self.ownership.as_deref(),
            &FieldRule::choice([
                "Individual(s)",
                "Sole",
                "Partnership",
                "Corporate",
                "Community",
                "Religious Organization",
                "Other",
            ]),
        );
        validation::range(&mut errors, "year_of_establishment", self.year_of_establishment, 1900, 2100);
        validation::range(&mut errors, "year_of_approval", self.year_of_approval, 1900, 2100);
        validation::range(&mut errors, "gps_longitude", self.gps_longitude, -180.0, 180.0);
        validation::range(&mut errors, "gps_latitude", self.gps_latitude, -90.0, 90.0);
        errors.into_result()
    }
}

/// Step 2 body
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchoolInfoRequest {
    pub submission_id: String,
    #[serde(flatten)]
    pub school: SchoolInfo,
    #[serde(default)]
    pub enrollment: BTreeMap<String, Option<i32>>,
}

impl Validate for SchoolInfoRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        validation::require(&mut errors, "submission_id", &self.submission_id, 1, "Submission ID is required");
        if let Err(school_errors) = self.school.validate() {
            for error in school_errors.errors() {
                errors.add(&error.field, error.message.clone());
            }
        }
        for (key, value) in &self.enrollment {
            if !Enrollment::is_known_key(key) {
                errors.add(&format!("enrollment.{}", key), "Unknown enrollment field");
            } else {
                validation::non_negative(&mut errors, &format!("enrollment.{}", key), *value);
            }
        }
        errors.into_result()
    }
}

/// Step 3 payment and verification details as stored
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaymentInfo {
    pub payment_method: Option<String>,
    pub payment_status: Option<String>,
    pub approval_status: Option<String>,
    pub approval_evidence: Option<String>,
}

/// Step 3 body
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaymentInfoRequest {
    pub submission_id: String,
    #[serde(flatten)]
    pub payment: PaymentInfo,
    #[serde(default)]
    pub confirm_accuracy: bool,
    #[serde(default)]
    pub final_submit: bool,
}

impl Validate for PaymentInfoRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        validation::require(&mut errors, "submission_id", &self.submission_id, 1, "Submission ID is required");
        validation::check_optional(
            &mut errors,
            "approval_status",
            self.payment.approval_status.as_deref(),
            &FieldRule::choice(["pending", "approved", "rejected"]),
        );
        if !self.confirm_accuracy {
            errors.add("confirm_accuracy", "You must confirm that the information provided is accurate");
        }
        errors.into_result()
    }
}

/// Returned by every registration step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepResponse {
    pub submission_id: String,
    pub current_step: i32,
    pub registration_status: String,
    pub registration_number: Option<String>,
    pub message: String,
}

impl StepResponse {
    pub fn from_proprietor(proprietor: &Proprietor, message: impl Into<String>) -> Self {
        Self {
            submission_id: proprietor.submission_id.clone(),
            current_step: proprietor.current_step,
            registration_status: proprietor.registration_status.clone(),
            registration_number: proprietor.registration_number.clone(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProprietorQuery {
    pub search: Option<String>,
    pub status: Option<String>,
    /// A chapter name, or `unassigned` for proprietors without one
    pub chapter: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl ProprietorQuery {
    pub fn wants_unassigned(&self) -> bool {
        self.chapter.as_deref() == Some(UNASSIGNED)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateChaptersRequest {
    pub chapters: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BulkAssignChaptersRequest {
    pub proprietor_ids: Vec<i64>,
    pub chapters: Vec<String>,
}

fn check_chapter_list(errors: &mut ValidationErrors, chapters: &[String]) {
    for chapter in chapters {
        if !chapters::is_valid_chapter(chapter) {
            errors.add("chapters", format!("Unknown chapter: {}", chapter));
        }
    }
}

impl Validate for UpdateChaptersRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_chapter_list(&mut errors, &self.chapters);
        errors.into_result()
    }
}

impl Validate for BulkAssignChaptersRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if self.proprietor_ids.is_empty() {
            errors.add("proprietor_ids", "Select at least one proprietor");
        }
        if self.chapters.is_empty() {
            errors.add("chapters", "Select at least one chapter");
        }
        check_chapter_list(&mut errors, &self.chapters);
        errors.into_result()
    }
}

/// Registrations per chapter plus those with no chapter
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChapterStats {
    pub chapters: Vec<chapters::ChapterCount>,
    pub unassigned: i64,
    pub total: i64,
}
