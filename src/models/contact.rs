//! Contact form messages

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::validation::{self, FieldRule, Validate, ValidationErrors};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct ContactMessage {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: Option<String>,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateContactMessageRequest {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactMessageQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl Validate for CreateContactMessageRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        validation::require(&mut errors, "name", &self.name, 2, "Name is required");
        FieldRule::email().check("email", self.email.trim(), &mut errors);
        validation::check_optional(&mut errors, "phone", self.phone.as_deref(), &FieldRule::phone());
        validation::check_optional(&mut errors, "subject", self.subject.as_deref(), &FieldRule::text().max_length(200));
        validation::require(&mut errors, "message", &self.message, 10, "Message must be at least 10 characters");
        if let Err(message) = FieldRule::text().max_length(5000).evaluate(&self.message) {
            errors.add("message", message);
        }
        errors.into_result()
    }
}
