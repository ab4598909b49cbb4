//! Test data builders
//!
//! Valid request bodies filled with fake values. Tests override the
//! fields they care about with struct update syntax.

use std::collections::BTreeMap;

use chrono::Utc;
use fake::faker::internet::en::SafeEmail;
use fake::faker::lorem::en::Sentence;
use fake::faker::name::en::{FirstName, LastName, Name};
use fake::Fake;
use serde_json::{json, Value};
use ConnectHub::models::{
    CreateAnnouncementRequest, CreateContactMessageRequest, CreateHeroImageRequest, CreateTeamMemberRequest,
    HeroImage, PaymentInfo, PaymentInfoRequest, PersonalInfo, PersonalInfoRequest, SchoolInfo, SchoolInfoRequest,
    CHAPTERS,
};

pub fn personal_info() -> PersonalInfo {
    PersonalInfo {
        first_name: format!("{}a", FirstName().fake::<String>()),
        last_name: format!("{}a", LastName().fake::<String>()),
        sex: "Female".to_string(),
        email: SafeEmail().fake(),
        phone: "08031234567".to_string(),
        chapters: vec![CHAPTERS[0].to_string()],
        ..Default::default()
    }
}

pub fn personal_request() -> PersonalInfoRequest {
    PersonalInfoRequest {
        submission_id: None,
        personal: personal_info(),
    }
}

pub fn school_request(submission_id: &str) -> SchoolInfoRequest {
    let mut enrollment = BTreeMap::new();
    enrollment.insert("primary1_male".to_string(), Some(12));
    enrollment.insert("primary1_female".to_string(), Some(15));
    enrollment.insert("jss1_male".to_string(), Some(0));
    enrollment.insert("jss1_female".to_string(), None);

    SchoolInfoRequest {
        submission_id: submission_id.to_string(),
        school: SchoolInfo {
            school_name: "Bright Future Academy".to_string(),
            address: "12 Jos Road, Lafia".to_string(),
            lga: Some("Lafia".to_string()),
            type_of_school: Some("Conventional".to_string()),
            year_of_establishment: Some(2004),
            ..Default::default()
        },
        enrollment,
    }
}

pub fn payment_request(submission_id: &str, final_submit: bool) -> PaymentInfoRequest {
    PaymentInfoRequest {
        submission_id: submission_id.to_string(),
        payment: PaymentInfo {
            payment_method: Some("bank_transfer".to_string()),
            payment_status: Some("paid".to_string()),
            ..Default::default()
        },
        confirm_accuracy: true,
        final_submit,
    }
}

pub fn contact_request() -> CreateContactMessageRequest {
    CreateContactMessageRequest {
        name: Name().fake(),
        email: SafeEmail().fake(),
        phone: None,
        subject: Some("Membership".to_string()),
        message: format!("Enquiry: {}", Sentence(4..8).fake::<String>()),
    }
}

pub fn hero_image_request(title: &str) -> CreateHeroImageRequest {
    CreateHeroImageRequest {
        title: title.to_string(),
        image_url: "/uploads/hero.jpg".to_string(),
        button_text: Some("Learn more".to_string()),
        button_link: Some("/about".to_string()),
        display_order: Some(1),
        ..Default::default()
    }
}

pub fn team_member_request(name: &str, category: &str) -> CreateTeamMemberRequest {
    CreateTeamMemberRequest {
        name: name.to_string(),
        position: "Secretary".to_string(),
        category: Some(category.to_string()),
        email: Some(SafeEmail().fake()),
        is_active: Some(true),
        ..Default::default()
    }
}

pub fn announcement_request(title: &str) -> CreateAnnouncementRequest {
    CreateAnnouncementRequest {
        title: title.to_string(),
        message: "Registration for the new session is open".to_string(),
        kind: Some("info".to_string()),
        is_active: Some(true),
        show_on_all_pages: Some(true),
        ..Default::default()
    }
}

/// A stored hero image as the server would return it
pub fn hero_image(id: i64, title: &str) -> HeroImage {
    let now = Utc::now();
    HeroImage {
        id,
        title: title.to_string(),
        description: None,
        image_url: "/uploads/hero.jpg".to_string(),
        button_text: None,
        button_link: None,
        display_order: id as i32,
        is_active: true,
        created_at: now,
        updated_at: now,
    }
}

/// Wrap a payload in the success envelope
pub fn envelope(data: Value) -> Value {
    json!({ "success": true, "data": data })
}

/// An error body as the server renders it
pub fn error_body(kind: &str, message: &str) -> Value {
    json!({ "success": false, "error": { "kind": kind, "message": message } })
}
