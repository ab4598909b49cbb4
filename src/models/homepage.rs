//! Homepage content blocks

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::validation::{self, FieldRule, Validate, ValidationErrors};

/// Sections of the home page that can carry a content block
pub const HOMEPAGE_SECTIONS: [&str; 7] = ["hero", "about", "elder-omaku", "team", "events", "gallery", "footer"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct HomepageContent {
    pub id: i64,
    pub section: String,
    pub title: String,
    pub subtitle: Option<String>,
    pub content: String,
    pub image_url: Option<String>,
    pub button_text: Option<String>,
    pub button_link: Option<String>,
    pub is_active: bool,
    pub display_order: i32,
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateHomepageContentRequest {
    pub section: String,
    pub title: String,
    pub subtitle: Option<String>,
    pub content: String,
    pub image_url: Option<String>,
    pub button_text: Option<String>,
    pub button_link: Option<String>,
    pub is_active: Option<bool>,
    pub display_order: Option<i32>,
    pub metadata: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateHomepageContentRequest {
    pub section: Option<String>,
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub content: Option<String>,
    pub image_url: Option<String>,
    pub button_text: Option<String>,
    pub button_link: Option<String>,
    pub is_active: Option<bool>,
    pub display_order: Option<i32>,
    pub metadata: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HomepageContentQuery {
    pub section: Option<String>,
    pub is_active: Option<bool>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

fn section_rule() -> FieldRule {
    FieldRule::choice(HOMEPAGE_SECTIONS)
}

fn check_metadata(errors: &mut ValidationErrors, metadata: Option<&serde_json::Value>) {
    if let Some(metadata) = metadata {
        if !metadata.is_object() {
            errors.add("metadata", "Metadata must be a JSON object");
        }
    }
}

impl Validate for CreateHomepageContentRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        section_rule().check("section", &self.section, &mut errors);
        validation::require(&mut errors, "title", &self.title, 1, "Title is required");
        validation::require(&mut errors, "content", &self.content, 1, "Content is required");
        validation::check_optional(&mut errors, "image_url", self.image_url.as_deref(), &FieldRule::url());
        validation::check_optional(&mut errors, "button_link", self.button_link.as_deref(), &FieldRule::url());
        validation::range(&mut errors, "display_order", self.display_order, 0, 10_000);
        check_metadata(&mut errors, self.metadata.as_ref());
        errors.into_result()
    }
}

impl Validate for UpdateHomepageContentRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        if let Some(section) = &self.section {
            section_rule().check("section", section, &mut errors);
        }
        validation::require_if_present(&mut errors, "title", self.title.as_deref(), 1, "Title is required");
        validation::require_if_present(&mut errors, "content", self.content.as_deref(), 1, "Content is required");
        validation::check_optional(&mut errors, "image_url", self.image_url.as_deref(), &FieldRule::url());
        validation::check_optional(&mut errors, "button_link", self.button_link.as_deref(), &FieldRule::url());
        validation::range(&mut errors, "display_order", self.display_order, 0, 10_000);
        check_metadata(&mut errors, self.metadata.as_ref());
        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unknown_section_rejected() {
        let request = CreateHomepageContentRequest {
            section: "pricing".to_string(),
            title: "Plans".to_string(),
            content: "...".to_string(),
            ..Default::default()
        };
        assert!(request.validate().unwrap_err().has_field("section"));
    }

    #[test]
    fn test_metadata_must_be_object() {
        let request = CreateHomepageContentRequest {
            section: "elder-omaku".to_string(),
            title: "Elder Omaku".to_string(),
            content: "Founder".to_string(),
            metadata: Some(json!([1, 2])),
            ..Default::default()
        };
        assert!(request.validate().unwrap_err().has_field("metadata"));

        let request = CreateHomepageContentRequest { metadata: Some(json!({"years": 30})), ..request };
        assert!(request.validate().is_ok());
    }
}
