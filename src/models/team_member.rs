//! Team member model

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

use crate::validation::{self, FieldRule, Validate, ValidationErrors};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct TeamMember {
    pub id: i64,
    pub name: String,
    pub position: String,
    pub category: String,
    pub bio: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub image_url: Option<String>,
    pub linkedin: Option<String>,
    pub twitter: Option<String>,
    pub facebook: Option<String>,
    pub display_order: i32,
    pub is_active: bool,
    pub is_featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Leadership groupings used by the about page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemberCategory {
    Executive,
    Board,
    Leadership,
    Staff,
    Advisory,
}

impl MemberCategory {
    pub const ALL: [MemberCategory; 5] = [
        MemberCategory::Executive,
        MemberCategory::Board,
        MemberCategory::Leadership,
        MemberCategory::Staff,
        MemberCategory::Advisory,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MemberCategory::Executive => "executive",
            MemberCategory::Board => "board",
            MemberCategory::Leadership => "leadership",
            MemberCategory::Staff => "staff",
            MemberCategory::Advisory => "advisory",
        }
    }

    fn rule() -> FieldRule {
        FieldRule::choice(Self::ALL.iter().map(|c| c.as_str()))
    }
}

impl fmt::Display for MemberCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MemberCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("Unknown member category: {}", s))
    }
}

impl Default for MemberCategory {
    fn default() -> Self {
        MemberCategory::Executive
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateTeamMemberRequest {
    pub name: String,
    pub position: String,
    pub category: Option<String>,
    pub bio: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub image_url: Option<String>,
    pub linkedin: Option<String>,
    pub twitter: Option<String>,
    pub facebook: Option<String>,
    pub display_order: Option<i32>,
    pub is_active: Option<bool>,
    pub is_featured: Option<bool>,
}

impl CreateTeamMemberRequest {
    /// Category to store; a blank choice falls back to executive
    pub fn category_or_default(&self) -> String {
        self.category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| MemberCategory::default().to_string())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTeamMemberRequest {
    pub name: Option<String>,
    pub position: Option<String>,
    pub category: Option<String>,
    pub bio: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub image_url: Option<String>,
    pub linkedin: Option<String>,
    pub twitter: Option<String>,
    pub facebook: Option<String>,
    pub display_order: Option<i32>,
    pub is_active: Option<bool>,
    pub is_featured: Option<bool>,
}

/// One entry of a bulk update: the target id plus its patch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamMemberPatch {
    pub id: i64,
    #[serde(flatten)]
    pub changes: UpdateTeamMemberRequest,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TeamMemberQuery {
    pub category: Option<String>,
    pub is_active: Option<bool>,
    pub is_featured: Option<bool>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

fn check_contact_fields(
    errors: &mut ValidationErrors,
    email: Option<&str>,
    phone: Option<&str>,
    links: [(&str, Option<&str>); 4],
) {
    validation::check_optional(errors, "email", email, &FieldRule::email());
    validation::check_optional(errors, "phone", phone, &FieldRule::phone());
    for (field, value) in links {
        validation::check_optional(errors, field, value, &FieldRule::url());
    }
}

impl Validate for CreateTeamMemberRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        validation::require(&mut errors, "name", &self.name, 2, "Name must be at least 2 characters");
        validation::require(&mut errors, "position", &self.position, 1, "Position is required");
        validation::check_optional(&mut errors, "category", self.category.as_deref(), &MemberCategory::rule());
        check_contact_fields(
            &mut errors,
            self.email.as_deref(),
            self.phone.as_deref(),
            [
                ("image_url", self.image_url.as_deref()),
                ("linkedin", self.linkedin.as_deref()),
                ("twitter", self.twitter.as_deref()),
                ("facebook", self.facebook.as_deref()),
            ],
        );
        validation::range(&mut errors, "display_order", self.display_order, 0, 10_000);
        errors.into_result()
    }
}

impl Validate for UpdateTeamMemberRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        validation::require_if_present(&mut errors, "name", self.name.as_deref(), 2, "Name must be at least 2 characters");
        validation::require_if_present(&mut errors, "position", self.position.as_deref(), 1, "Position is required");
        validation::check_optional(&mut errors, "category", self.category.as_deref(), &MemberCategory::rule());
        check_contact_fields(
            &mut errors,
            self.email.as_deref(),
            self.phone.as_deref(),
            [
                ("image_url", self.image_url.as_deref()),
                ("linkedin", self.linkedin.as_deref()),
                ("twitter", self.twitter.as_deref()),
                ("facebook", self.facebook.as_deref()),
            ],
        );
        validation::range(&mut errors, "display_order", self.display_order, 0, 10_000);
        errors.into_result()
    }
}

impl Validate for TeamMemberPatch {
    fn validate(&self) -> Result<(), ValidationErrors> {
        self.changes.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_member() -> CreateTeamMemberRequest {
        CreateTeamMemberRequest {
            name: "Amina Yusuf".to_string(),
            position: "State Chairman".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_member_passes() {
        assert!(valid_member().validate().is_ok());
        assert_eq!(valid_member().category_or_default(), "executive");
    }

    #[test]
    fn test_short_name_rejected() {
        let member = CreateTeamMemberRequest { name: "A".to_string(), ..valid_member() };
        let errors = member.validate().unwrap_err();
        assert_eq!(errors.message_for("name"), Some("Name must be at least 2 characters"));
    }

    #[test]
    fn test_unknown_category_and_bad_email() {
        let member = CreateTeamMemberRequest {
            category: Some("janitorial".to_string()),
            email: Some("nope".to_string()),
            ..valid_member()
        };
        let errors = member.validate().unwrap_err();
        assert!(errors.has_field("category"));
        assert!(errors.has_field("email"));
    }

    #[test]
    fn test_blank_optional_email_is_ignored() {
        let member = CreateTeamMemberRequest { email: Some(String::new()), ..valid_member() };
        assert!(member.validate().is_ok());
    }

    #[test]
    fn test_blank_category_falls_back_to_executive() {
        for blank in ["", "  "] {
            let member = CreateTeamMemberRequest { category: Some(blank.to_string()), ..valid_member() };
            assert!(member.validate().is_ok());
            assert_eq!(member.category_or_default(), "executive");
        }
        let board = CreateTeamMemberRequest { category: Some("board".to_string()), ..valid_member() };
        assert_eq!(board.category_or_default(), "board");
    }

    #[test]
    fn test_category_round_trip() {
        for category in MemberCategory::ALL {
            assert_eq!(category.as_str().parse::<MemberCategory>(), Ok(category));
        }
        assert!("other".parse::<MemberCategory>().is_err());
    }

    #[test]
    fn test_patch_deserializes_flattened() {
        let patch: TeamMemberPatch =
            serde_json::from_str(r#"{"id": 4, "is_featured": true, "display_order": 2}"#).unwrap();
        assert_eq!(patch.id, 4);
        assert_eq!(patch.changes.is_featured, Some(true));
        assert_eq!(patch.changes.display_order, Some(2));
    }
}
