//! Announcement model
//!
//! Site-wide banners with optional colours and a scheduling window.

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;

use crate::validation::{self, FieldRule, Validate, ValidationErrors};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Announcement {
    pub id: i64,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub is_active: bool,
    pub show_on_all_pages: bool,
    pub background_color: Option<String>,
    pub text_color: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub display_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Announcement {
    /// Active and inside whichever scheduling bounds are set
    pub fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.is_active
            && self.start_date.map_or(true, |start| start <= now)
            && self.end_date.map_or(true, |end| now <= end)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnouncementKind {
    Info,
    Warning,
    Success,
    Error,
}

impl AnnouncementKind {
    pub const ALL: [AnnouncementKind; 4] = [
        AnnouncementKind::Info,
        AnnouncementKind::Warning,
        AnnouncementKind::Success,
        AnnouncementKind::Error,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AnnouncementKind::Info => "info",
            AnnouncementKind::Warning => "warning",
            AnnouncementKind::Success => "success",
            AnnouncementKind::Error => "error",
        }
    }

    fn rule() -> FieldRule {
        FieldRule::choice(Self::ALL.iter().map(|k| k.as_str()))
    }
}

impl fmt::Display for AnnouncementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnnouncementKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| format!("Unknown announcement type: {}", s))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateAnnouncementRequest {
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub is_active: Option<bool>,
    pub show_on_all_pages: Option<bool>,
    pub background_color: Option<String>,
    pub text_color: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub display_order: Option<i32>,
}

impl CreateAnnouncementRequest {
    pub fn kind_or_default(&self) -> String {
        self.kind
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| AnnouncementKind::Info.to_string())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateAnnouncementRequest {
    pub title: Option<String>,
    pub message: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub is_active: Option<bool>,
    pub show_on_all_pages: Option<bool>,
    pub background_color: Option<String>,
    pub text_color: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub display_order: Option<i32>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SetActiveRequest {
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnnouncementQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub is_active: Option<bool>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

fn check_schedule(errors: &mut ValidationErrors, start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) {
    if let (Some(start), Some(end)) = (start, end) {
        if end < start {
            errors.add("end_date", "End date must be after the start date");
        }
    }
}

impl Validate for CreateAnnouncementRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        validation::require(&mut errors, "title", &self.title, 1, "Title is required");
        validation::require(&mut errors, "message", &self.message, 1, "Message is required");
        validation::check_optional(&mut errors, "type", self.kind.as_deref(), &AnnouncementKind::rule());
        validation::check_optional(&mut errors, "background_color", self.background_color.as_deref(), &FieldRule::color());
        validation::check_optional(&mut errors, "text_color", self.text_color.as_deref(), &FieldRule::color());
        check_schedule(&mut errors, self.start_date, self.end_date);
        validation::range(&mut errors, "display_order", self.display_order, 0, 10_000);
        errors.into_result()
    }
}

impl Validate for UpdateAnnouncementRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        validation::require_if_present(&mut errors, "title", self.title.as_deref(), 1, "Title is required");
        validation::require_if_present(&mut errors, "message", self.message.as_deref(), 1, "Message is required");
        validation::check_optional(&mut errors, "type", self.kind.as_deref(), &AnnouncementKind::rule());
        validation::check_optional(&mut errors, "background_color", self.background_color.as_deref(), &FieldRule::color());
        validation::check_optional(&mut errors, "text_color", self.text_color.as_deref(), &FieldRule::color());
        check_schedule(&mut errors, self.start_date, self.end_date);
        validation::range(&mut errors, "display_order", self.display_order, 0, 10_000);
        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn announcement(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Announcement {
        let now = Utc::now();
        Announcement {
            id: 1,
            title: "Exams".to_string(),
            message: "Registration closes Friday".to_string(),
            kind: "info".to_string(),
            is_active: true,
            show_on_all_pages: true,
            background_color: None,
            text_color: None,
            start_date: start,
            end_date: end,
            display_order: 0,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_live_window() {
        let now = Utc::now();
        let hour = Duration::hours(1);

        assert!(announcement(None, None).is_live(now));
        assert!(announcement(Some(now - hour), Some(now + hour)).is_live(now));
        assert!(!announcement(Some(now + hour), None).is_live(now));
        assert!(!announcement(None, Some(now - hour)).is_live(now));

        let mut inactive = announcement(None, None);
        inactive.is_active = false;
        assert!(!inactive.is_live(now));
    }

    #[test]
    fn test_end_before_start_rejected() {
        let now = Utc::now();
        let request = CreateAnnouncementRequest {
            title: "Notice".to_string(),
            message: "Body".to_string(),
            start_date: Some(now),
            end_date: Some(now - Duration::days(1)),
            ..Default::default()
        };
        assert!(request.validate().unwrap_err().has_field("end_date"));
    }

    #[test]
    fn test_colors_and_type_checked() {
        let request = CreateAnnouncementRequest {
            title: "Notice".to_string(),
            message: "Body".to_string(),
            kind: Some("urgent".to_string()),
            background_color: Some("blue".to_string()),
            text_color: Some("#ffffff".to_string()),
            ..Default::default()
        };
        let errors = request.validate().unwrap_err();
        assert!(errors.has_field("type"));
        assert!(errors.has_field("background_color"));
        assert!(!errors.has_field("text_color"));
    }

    #[test]
    fn test_blank_type_falls_back_to_info() {
        for blank in ["", "   "] {
            let request = CreateAnnouncementRequest {
                title: "Notice".to_string(),
                message: "Body".to_string(),
                kind: Some(blank.to_string()),
                ..Default::default()
            };
            assert!(request.validate().is_ok());
            assert_eq!(request.kind_or_default(), "info");
        }
    }

    #[test]
    fn test_type_field_serialized_as_type() {
        let json = serde_json::to_value(announcement(None, None)).unwrap();
        assert_eq!(json["type"], "info");
        assert!(json.get("kind").is_none());
    }
}
