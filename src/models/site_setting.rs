//! Site settings
//!
//! Key/value pairs edited from the admin panel. Public settings (contact
//! details, social links, SEO) are exposed to the website.

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::validation::{self, FieldRule, Validate, ValidationErrors};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct SiteSetting {
    pub id: i64,
    pub setting_key: String,
    pub setting_value: Option<String>,
    pub setting_type: String,
    pub description: Option<String>,
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Category of a setting derived from its key prefix
pub fn derive_setting_type(key: &str) -> &'static str {
    if key.starts_with("contact_") {
        "contact"
    } else if key.starts_with("social_") {
        "social"
    } else if key.starts_with("seo_") || key.starts_with("google_") {
        "seo"
    } else if key.starts_with("primary_") || key.starts_with("secondary_") || key.starts_with("logo_") {
        "appearance"
    } else {
        "general"
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpsertSiteSettingRequest {
    pub setting_key: String,
    pub setting_value: Option<String>,
    pub setting_type: Option<String>,
    pub description: Option<String>,
    pub is_public: Option<bool>,
}

impl UpsertSiteSettingRequest {
    pub fn resolved_type(&self) -> String {
        self.setting_type
            .clone()
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| derive_setting_type(&self.setting_key).to_string())
    }
}

/// Body of `PUT /settings/{key}`: the key comes from the path
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateSiteSettingRequest {
    pub setting_value: Option<String>,
    pub setting_type: Option<String>,
    pub description: Option<String>,
    pub is_public: Option<bool>,
}

impl UpdateSiteSettingRequest {
    pub fn into_upsert(self, key: &str) -> UpsertSiteSettingRequest {
        UpsertSiteSettingRequest {
            setting_key: key.to_string(),
            setting_value: self.setting_value,
            setting_type: self.setting_type,
            description: self.description,
            is_public: self.is_public,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SiteSettingQuery {
    pub setting_type: Option<String>,
    pub is_public: Option<bool>,
}

fn key_rule() -> FieldRule {
    FieldRule::text()
        .min_length(1)
        .max_length(100)
        .pattern(r"^[a-z0-9_]+$")
        .message("Setting key may only contain lowercase letters, digits and underscores")
}

impl Validate for UpsertSiteSettingRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        key_rule().check("setting_key", &self.setting_key, &mut errors);
        validation::check_optional(
            &mut errors,
            "setting_type",
            self.setting_type.as_deref(),
            &FieldRule::choice(["contact", "social", "seo", "appearance", "general"]),
        );
        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derive_setting_type() {
        assert_eq!(derive_setting_type("contact_email"), "contact");
        assert_eq!(derive_setting_type("social_facebook"), "social");
        assert_eq!(derive_setting_type("seo_title"), "seo");
        assert_eq!(derive_setting_type("google_analytics_id"), "seo");
        assert_eq!(derive_setting_type("primary_color"), "appearance");
        assert_eq!(derive_setting_type("logo_url"), "appearance");
        assert_eq!(derive_setting_type("site_name"), "general");
    }

    #[test]
    fn test_explicit_type_wins() {
        let request = UpsertSiteSettingRequest {
            setting_key: "contact_email".to_string(),
            setting_type: Some("general".to_string()),
            ..Default::default()
        };
        assert_eq!(request.resolved_type(), "general");

        let request = UpsertSiteSettingRequest { setting_type: None, ..request };
        assert_eq!(request.resolved_type(), "contact");
    }

    #[test]
    fn test_key_format() {
        let bad = UpsertSiteSettingRequest { setting_key: "Contact Email".to_string(), ..Default::default() };
        assert!(bad.validate().unwrap_err().has_field("setting_key"));

        let good = UpsertSiteSettingRequest { setting_key: "contact_email".to_string(), ..Default::default() };
        assert!(good.validate().is_ok());
    }
}
