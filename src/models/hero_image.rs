//! Hero image model
//!
//! Carousel slides shown at the top of the home page.

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::validation::{self, FieldRule, Validate, ValidationErrors};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct HeroImage {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub image_url: String,
    pub button_text: Option<String>,
    pub button_link: Option<String>,
    pub display_order: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateHeroImageRequest {
    pub title: String,
    pub description: Option<String>,
    pub image_url: String,
    pub button_text: Option<String>,
    pub button_link: Option<String>,
    pub display_order: Option<i32>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateHeroImageRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub button_text: Option<String>,
    pub button_link: Option<String>,
    pub display_order: Option<i32>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HeroImageQuery {
    pub is_active: Option<bool>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl Validate for CreateHeroImageRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        validation::require(&mut errors, "title", &self.title, 1, "Title is required");
        validation::require(&mut errors, "image_url", &self.image_url, 1, "Image URL is required");
        if !self.image_url.trim().is_empty() {
            FieldRule::url().check("image_url", &self.image_url, &mut errors);
        }
        validation::check_optional(&mut errors, "button_link", self.button_link.as_deref(), &FieldRule::url());
        validation::range(&mut errors, "display_order", self.display_order, 0, 10_000);
        errors.into_result()
    }
}

impl Validate for UpdateHeroImageRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        validation::require_if_present(&mut errors, "title", self.title.as_deref(), 1, "Title is required");
        validation::require_if_present(&mut errors, "image_url", self.image_url.as_deref(), 1, "Image URL is required");
        validation::check_optional(&mut errors, "image_url", self.image_url.as_deref(), &FieldRule::url());
        validation::check_optional(&mut errors, "button_link", self.button_link.as_deref(), &FieldRule::url());
        validation::range(&mut errors, "display_order", self.display_order, 0, 10_000);
        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_requires_title_and_image() {
        let errors = CreateHeroImageRequest::default().validate().unwrap_err();
        assert!(errors.has_field("title"));
        assert!(errors.has_field("image_url"));
    }

    #[test]
    fn test_update_allows_empty_patch() {
        assert!(UpdateHeroImageRequest::default().validate().is_ok());
    }

    #[test]
    fn test_update_rejects_blank_title() {
        let patch = UpdateHeroImageRequest {
            title: Some(" ".to_string()),
            ..Default::default()
        };
        assert!(patch.validate().unwrap_err().has_field("title"));
    }
}
