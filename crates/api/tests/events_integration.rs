//! Integration tests for event management, health and request plumbing.
//!
//! Run with: cargo test --test events_integration

mod common;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
};
use chrono::{Duration, Utc};
use common::{empty_request, json_request, TestApp, ATTENDEE_ID};
use serde_json::json;
use shared::jwt::Role;

// ============================================================================
// Events
// ============================================================================

#[tokio::test]
async fn test_create_event_normalizes_domains() {
    let app = TestApp::new();
    let now = Utc::now();
    let event_id = app.create_event(now, now + Duration::hours(8)).await;

    let (status, body) = app
        .send(empty_request(
            Method::GET,
            &format!("/api/v1/events/{event_id}"),
            Some(&app.token(ATTENDEE_ID, Role::User)),
        ))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["event"]["allowed_domains"], json!(["acme.com"]));
    assert_eq!(body["event"]["status"], "draft");
    assert!(body["activities"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_create_event_drops_blank_domains() {
    let app = TestApp::new();
    let now = Utc::now();

    let (status, body) = app
        .send(json_request(
            Method::POST,
            "/api/v1/events",
            Some(&app.admin_token()),
            json!({
                "name": "Conf2024",
                "allowed_domains": ["acme.com", "", " @ "],
                "start_date": now.to_rfc3339(),
                "end_date": (now + Duration::hours(1)).to_rfc3339(),
            }),
        ))
        .await;

    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["allowed_domains"], json!(["acme.com"]));
}

#[tokio::test]
async fn test_create_event_requires_admin() {
    let app = TestApp::new();
    let now = Utc::now();

    let (status, _) = app
        .send(json_request(
            Method::POST,
            "/api/v1/events",
            Some(&app.token(ATTENDEE_ID, Role::User)),
            json!({
                "name": "Conf2024",
                "start_date": now.to_rfc3339(),
                "end_date": (now + Duration::hours(1)).to_rfc3339(),
            }),
        ))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_create_event_rejects_blank_name() {
    let app = TestApp::new();
    let now = Utc::now();

    let (status, body) = app
        .send(json_request(
            Method::POST,
            "/api/v1/events",
            Some(&app.admin_token()),
            json!({
                "name": "   ",
                "start_date": now.to_rfc3339(),
                "end_date": (now + Duration::hours(1)).to_rfc3339(),
            }),
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
}

#[tokio::test]
async fn test_create_event_rejects_inverted_window() {
    let app = TestApp::new();
    let now = Utc::now();

    let (status, _) = app
        .send(json_request(
            Method::POST,
            "/api/v1/events",
            Some(&app.admin_token()),
            json!({
                "name": "Conf2024",
                "start_date": now.to_rfc3339(),
                "end_date": (now - Duration::hours(1)).to_rfc3339(),
            }),
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_get_unknown_event() {
    let app = TestApp::new();
    let (status, _) = app
        .send(empty_request(
            Method::GET,
            &format!("/api/v1/events/{}", uuid::Uuid::new_v4()),
            Some(&app.admin_token()),
        ))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// ============================================================================
// Activities
// ============================================================================

#[tokio::test]
async fn test_create_activities_rejects_duplicate_name() {
    let app = TestApp::new();
    let now = Utc::now();
    let event_id = app.create_event(now, now + Duration::hours(8)).await;
    app.create_activity(&event_id, "Keynote", now, now + Duration::hours(1))
        .await;

    let (status, _) = app
        .send(json_request(
            Method::POST,
            &format!("/api/v1/events/{event_id}/activities"),
            Some(&app.admin_token()),
            json!({
                "activities": [{
                    "name": "Keynote",
                    "start_date": (now + Duration::hours(2)).to_rfc3339(),
                    "end_date": (now + Duration::hours(3)).to_rfc3339(),
                }]
            }),
        ))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(app.activities.count(), 1);
}

#[tokio::test]
async fn test_create_activities_limits_batch_size() {
    let app = TestApp::new();
    let now = Utc::now();
    let event_id = app.create_event(now, now + Duration::hours(24)).await;

    let activities: Vec<_> = (0..11)
        .map(|i| {
            json!({
                "name": format!("Session {i}"),
                "start_date": (now + Duration::hours(i)).to_rfc3339(),
                "end_date": (now + Duration::hours(i) + Duration::minutes(30)).to_rfc3339(),
            })
        })
        .collect();

    let (status, _) = app
        .send(json_request(
            Method::POST,
            &format!("/api/v1/events/{event_id}/activities"),
            Some(&app.admin_token()),
            json!({ "activities": activities }),
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(app.activities.count(), 0);
}

#[tokio::test]
async fn test_event_details_groups_check_ins() {
    let app = TestApp::new();
    let (event_id, activity_id) = app.seed_finished_activity().await;
    let token = app.token(ATTENDEE_ID, Role::User);
    app.send(empty_request(
        Method::POST,
        &format!("/api/v1/activities/{activity_id}/check-in"),
        Some(&token),
    ))
    .await;

    let (status, body) = app
        .send(empty_request(
            Method::GET,
            &format!("/api/v1/events/{event_id}/details"),
            Some(&token),
        ))
        .await;

    assert_eq!(status, StatusCode::OK);
    let activities = body["activities"].as_array().unwrap();
    assert_eq!(activities.len(), 1);
    assert_eq!(activities[0]["activity_name"], "Keynote");
    assert_eq!(activities[0]["check_ins"][0]["user_id"], ATTENDEE_ID);
}

// ============================================================================
// Health and plumbing
// ============================================================================

#[tokio::test]
async fn test_health_endpoints() {
    let app = TestApp::new();

    let (status, body) = app
        .send(empty_request(Method::GET, "/api/health/live", None))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "alive");

    let (status, body) = app.send(empty_request(Method::GET, "/api/health", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["queue"]["depth"], 0);

    app.queue.set_unavailable(true);
    let (status, _) = app
        .send(empty_request(Method::GET, "/api/health/ready", None))
        .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let app = TestApp::new();
    let request = Request::builder()
        .uri("/api/health/live")
        .header("X-Request-ID", "req-42")
        .body(Body::empty())
        .unwrap();

    let response = tower::ServiceExt::oneshot(app.router.clone(), request)
        .await
        .unwrap();
    assert_eq!(response.headers()["x-request-id"], "req-42");
}
