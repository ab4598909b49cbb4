//! Typed client tests against a mock server
//!
//! The mock server stands in for the API; each test mounts only the
//! endpoints it expects to be hit. Mocks with `expect(0)` fail the test on
//! drop if the client sent anything it should have held back.

mod helpers;

use chrono::{Duration, Utc};
use helpers::*;
use serde_json::json;
use tokio_test::{assert_err, assert_ok};
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};
use ConnectHub::client::{
    AnnouncementFeed, ApiClient, HeroImages, NotificationKind, RegistrationWizard, ResourceStore, TeamMembers,
    WizardStep,
};
use ConnectHub::models::{Announcement, CreateContactMessageRequest, TeamMemberQuery, UpdateHeroImageRequest};
use ConnectHub::services::LoginRequest;
use ConnectHub::{ConnectHubError, ErrorKind};

fn client(server: &MockServer) -> ApiClient {
    ApiClient::new(&server.uri()).unwrap()
}

fn step_response(submission_id: &str, step: i32, status: &str, number: Option<&str>) -> serde_json::Value {
    envelope(json!({
        "submission_id": submission_id,
        "current_step": step,
        "registration_status": status,
        "registration_number": number,
        "message": "Saved",
    }))
}

fn announcement(id: i64, end_in_hours: i64) -> Announcement {
    let now = Utc::now();
    Announcement {
        id,
        title: format!("Notice {}", id),
        message: "Registration is open".to_string(),
        kind: "info".to_string(),
        is_active: true,
        show_on_all_pages: true,
        background_color: None,
        text_color: None,
        start_date: None,
        end_date: Some(now + Duration::hours(end_in_hours)),
        display_order: 0,
        created_at: now,
        updated_at: now,
    }
}

#[tokio::test]
async fn test_login_keeps_token_for_admin_requests() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/admin/login"))
        .and(body_partial_json(json!({ "username": "admin" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "token": "issued-token",
            "username": "admin",
            "expires_at": Utc::now(),
        }))))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/admin/hero-images"))
        .and(header("authorization", "Bearer issued-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({ "data": [], "total": 0 }))))
        .expect(1)
        .mount(&server)
        .await;

    let mut api = client(&server);
    let request = LoginRequest {
        username: "admin".to_string(),
        password: "secret".to_string(),
    };
    assert_ok!(api.login(&request).await);
    assert_eq!(api.token(), Some("issued-token"));

    let mut store = ResourceStore::<HeroImages>::new(api);
    assert_ok!(store.refetch().await);
    assert_eq!(store.total(), 0);
}

#[tokio::test]
async fn test_create_refetches_the_list() {
    let server = MockServer::start().await;
    let created = hero_image(7, "Welcome");

    Mock::given(method("POST"))
        .and(path("/api/admin/hero-images"))
        .and(body_partial_json(json!({ "title": "Welcome" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(envelope(serde_json::to_value(&created).unwrap())))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/admin/hero-images"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "data": [hero_image(3, "Existing"), created],
            "total": 2,
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let mut store = ResourceStore::<HeroImages>::new(client(&server).with_token("t"));
    let record = assert_ok!(store.create(&hero_image_request("Welcome")).await);

    assert_eq!(record.id, 7);
    assert_eq!(store.total(), 2);
    assert_eq!(store.items().iter().map(|h| h.id).collect::<Vec<_>>(), vec![3, 7]);
    assert!(!store.is_loading());
    let notification = store.last_notification().unwrap();
    assert_eq!(notification.kind, NotificationKind::Success);
    assert_eq!(notification.message, "Hero image created successfully");
}

#[tokio::test]
async fn test_update_refetches_the_list() {
    let server = MockServer::start().await;
    let renamed = hero_image(3, "Renamed");

    Mock::given(method("PUT"))
        .and(path("/api/admin/hero-images/3"))
        .and(body_partial_json(json!({ "title": "Renamed" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(serde_json::to_value(&renamed).unwrap())))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/admin/hero-images"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "data": [renamed, hero_image(5, "Second")],
            "total": 2,
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let mut store = ResourceStore::<HeroImages>::new(client(&server).with_token("t"));
    let request = UpdateHeroImageRequest {
        title: Some("Renamed".to_string()),
        ..Default::default()
    };
    let record = assert_ok!(store.update(3, &request).await);

    assert_eq!(record.title, "Renamed");
    assert_eq!(store.total(), 2);
    assert_eq!(
        store.items().iter().map(|h| h.title.as_str()).collect::<Vec<_>>(),
        vec!["Renamed", "Second"]
    );
    assert_eq!(store.last_notification().unwrap().message, "Hero image updated successfully");
}

#[tokio::test]
async fn test_delete_refetches_the_list() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/admin/hero-images/3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!(3))))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/admin/hero-images"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({
            "data": [hero_image(5, "Remaining")],
            "total": 1,
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let mut store = ResourceStore::<HeroImages>::new(client(&server).with_token("t"));
    assert_ok!(store.delete(3).await);

    assert_eq!(store.total(), 1);
    assert_eq!(store.items().iter().map(|h| h.id).collect::<Vec<_>>(), vec![5]);
    let notification = store.last_notification().unwrap();
    assert_eq!(notification.kind, NotificationKind::Success);
    assert_eq!(notification.message, "Hero image deleted successfully");
}

#[tokio::test]
async fn test_refetch_sends_current_filters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/admin/members"))
        .and(query_param("category", "executive"))
        .and(query_param("limit", "20"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!({ "data": [], "total": 0 }))))
        .expect(1)
        .mount(&server)
        .await;

    let mut store = ResourceStore::<TeamMembers>::new(client(&server));
    store.set_query(TeamMemberQuery {
        category: Some("executive".to_string()),
        limit: Some(20),
        ..Default::default()
    });
    assert_ok!(store.refetch().await);
    assert!(store.items().is_empty());
    assert!(store.error().is_none());
}

#[tokio::test]
async fn test_invalid_form_is_never_sent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let mut store = ResourceStore::<HeroImages>::new(client(&server));
    let mut request = hero_image_request("");
    request.image_url = "not a url".to_string();
    let error = assert_err!(store.create(&request).await);

    assert!(error.is_validation());
    assert!(store.last_notification().unwrap().is_error());

    let contact = CreateContactMessageRequest {
        email: "broken".to_string(),
        ..contact_request()
    };
    assert!(client(&server).submit_contact(&contact).await.unwrap_err().is_validation());
}

#[tokio::test]
async fn test_server_error_surfaces_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/admin/hero-images"))
        .respond_with(ResponseTemplate::new(500).set_body_json(error_body("server", "Internal server error")))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/admin/hero-images/99"))
        .respond_with(ResponseTemplate::new(404).set_body_json(error_body("not_found", "Hero image not found: 99")))
        .mount(&server)
        .await;

    let mut store = ResourceStore::<HeroImages>::new(client(&server));

    let error = assert_err!(store.refetch().await);
    assert!(matches!(error, ConnectHubError::Api { status: 500, .. }));
    assert_eq!(error.kind(), ErrorKind::Server);
    assert_eq!(store.error(), Some("Internal server error"));

    let error = assert_err!(store.delete(99).await);
    assert_eq!(error.kind(), ErrorKind::NotFound);
    assert_eq!(store.last_notification().unwrap().message, "Hero image not found: 99");
}

#[tokio::test]
async fn test_wizard_walks_all_three_steps() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/registration/step1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(step_response("sub-1", 1, "draft", None)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/registration/step2"))
        .and(body_partial_json(json!({ "submission_id": "sub-1", "enrollment": { "primary1_male": 10 } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(step_response("sub-1", 2, "draft", None)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/registration/step3"))
        .and(body_partial_json(json!({
            "submission_id": "sub-1",
            "payment_method": "bank_transfer",
            "confirm_accuracy": true,
            "final_submit": true,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(step_response(
            "sub-1",
            3,
            "submitted",
            Some("NAPPS-2026-004217"),
        )))
        .expect(1)
        .mount(&server)
        .await;

    let mut wizard = RegistrationWizard::new(client(&server));
    *wizard.personal_mut() = personal_info();
    assert_ok!(wizard.submit_step1().await);
    assert_eq!(wizard.step(), WizardStep::School);
    assert_eq!(wizard.submission_id(), Some("sub-1"));
    assert_eq!(wizard.progress(), 50);

    let school = school_request("sub-1").school;
    *wizard.school_mut() = school;
    wizard.set_enrollment("primary1_male", Some(10));
    assert_ok!(wizard.submit_step2().await);
    assert_eq!(wizard.step(), WizardStep::Payment);

    wizard.payment_mut().payment_method = Some("bank_transfer".to_string());

    // Step 3 refuses to send until accuracy is confirmed
    assert!(assert_err!(wizard.submit_step3(false).await).is_validation());
    assert_eq!(wizard.step(), WizardStep::Payment);

    let response = assert_ok!(wizard.submit_step3(true).await);
    assert_eq!(response.registration_status, "submitted");
    assert_eq!(wizard.step(), WizardStep::Completed);
    assert_eq!(wizard.registration_number(), Some("NAPPS-2026-004217"));
}

#[tokio::test]
async fn test_wizard_stays_put_without_submission_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/registration/step1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(step_response("", 1, "draft", None)))
        .mount(&server)
        .await;

    let mut wizard = RegistrationWizard::new(client(&server));
    *wizard.personal_mut() = personal_info();
    assert_err!(wizard.submit_step1().await);

    assert_eq!(wizard.step(), WizardStep::Personal);
    assert!(wizard.submission_id().is_none());
    assert_eq!(wizard.last_notification().unwrap().message, "No submission ID received");
}

#[tokio::test]
async fn test_wizard_stays_put_when_server_refuses() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/registration/step1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(step_response("sub-2", 1, "draft", None)))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/registration/step2"))
        .respond_with(
            ResponseTemplate::new(409)
                .set_body_json(error_body("conflict", "Invalid state transition: submitted -> step 2")),
        )
        .mount(&server)
        .await;

    let mut wizard = RegistrationWizard::new(client(&server));
    *wizard.personal_mut() = personal_info();
    assert_ok!(wizard.submit_step1().await);
    *wizard.school_mut() = school_request("sub-2").school;

    let error = assert_err!(wizard.submit_step2().await);
    assert_eq!(error.kind(), ErrorKind::Conflict);
    assert_eq!(wizard.step(), WizardStep::School);

    // Going back is local; the submission id is kept for the resubmit
    wizard.back();
    assert_eq!(wizard.step(), WizardStep::Personal);
    assert_eq!(wizard.submission_id(), Some("sub-2"));
}

#[tokio::test]
async fn test_dismissed_announcement_survives_refetch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/announcements"))
        .respond_with(ResponseTemplate::new(200).set_body_json(envelope(json!([
            announcement(1, 24),
            announcement(2, 24),
            announcement(3, -1),
        ]))))
        .expect(2)
        .mount(&server)
        .await;

    let mut feed = AnnouncementFeed::new(client(&server));
    assert_ok!(feed.refetch().await);
    assert_eq!(feed.all().len(), 3);
    assert_eq!(feed.visible().iter().map(|a| a.id).collect::<Vec<_>>(), vec![1, 2]);

    feed.dismiss(1);
    assert_ok!(feed.refetch().await);
    assert_eq!(feed.visible().iter().map(|a| a.id).collect::<Vec<_>>(), vec![2]);
}
