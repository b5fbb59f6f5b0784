//! Common test utilities for integration tests.
//!
//! The router runs against the in-memory ports, so these tests need neither
//! PostgreSQL nor Redis.

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use checkin_gate_api::app::{create_app, AppState, Ports};
use checkin_gate_api::config::Config;
use chrono::{DateTime, Duration, Utc};
use domain::models::UserInfo;
use domain::ports::memory::{
    InMemoryActivityRepository, InMemoryCertificateQueue, InMemoryCheckInRepository,
    InMemoryEventRepository, InMemoryUserDirectory,
};
use fake::faker::name::en::{FirstName, LastName};
use fake::Fake;
use serde_json::{json, Value};
use shared::jwt::{JwtConfig, Role};
use tower::ServiceExt;

pub const TEST_JWT_SECRET: &str = "test-jwt-secret";

pub const ADMIN_ID: &str = "admin-1";
pub const ATTENDEE_ID: &str = "attendee-1";
pub const OUTSIDER_ID: &str = "outsider-1";

pub struct TestApp {
    pub router: Router,
    pub events: Arc<InMemoryEventRepository>,
    pub activities: Arc<InMemoryActivityRepository>,
    pub check_ins: Arc<InMemoryCheckInRepository>,
    pub users: Arc<InMemoryUserDirectory>,
    pub queue: Arc<InMemoryCertificateQueue>,
    jwt: JwtConfig,
}

fn user(id: &str, email: &str, is_admin: bool) -> UserInfo {
    UserInfo {
        id: id.to_string(),
        first_name: FirstName().fake(),
        last_name: LastName().fake(),
        email: email.to_string(),
        is_admin,
    }
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_overrides(&[])
    }

    pub fn with_overrides(overrides: &[(&str, &str)]) -> Self {
        let config = Config::load_for_test(overrides).expect("Failed to load test config");

        let events = Arc::new(InMemoryEventRepository::new());
        let activities = Arc::new(InMemoryActivityRepository::new());
        let check_ins = Arc::new(InMemoryCheckInRepository::new());
        let queue = Arc::new(InMemoryCertificateQueue::new());
        let users = Arc::new(InMemoryUserDirectory::with_users([
            user(ADMIN_ID, "admin@acme.com", true),
            user(ATTENDEE_ID, "attendee@acme.com", false),
            user(OUTSIDER_ID, "outsider@other.org", false),
        ]));

        let ports = Ports {
            events: events.clone(),
            activities: activities.clone(),
            check_ins: check_ins.clone(),
            users: users.clone(),
            queue: queue.clone(),
        };
        let state = AppState::new(config, ports, None).expect("Failed to build app state");

        Self {
            router: create_app(state),
            events,
            activities,
            check_ins,
            users,
            queue,
            jwt: JwtConfig::new(TEST_JWT_SECRET, 0).expect("Failed to build JWT config"),
        }
    }

    pub fn token(&self, user_id: &str, role: Role) -> String {
        self.jwt
            .generate_access_token(user_id, role)
            .expect("Failed to issue token")
            .0
    }

    pub fn admin_token(&self) -> String {
        self.token(ADMIN_ID, Role::Admin)
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
    }

    /// Creates an event through the API and returns its id.
    pub async fn create_event(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> String {
        let (status, body) = self
            .send(json_request(
                Method::POST,
                "/api/v1/events",
                Some(&self.admin_token()),
                json!({
                    "name": "Conf2024",
                    "allowed_domains": ["@ACME.com"],
                    "start_date": start.to_rfc3339(),
                    "end_date": end.to_rfc3339(),
                }),
            ))
            .await;
        assert_eq!(status, StatusCode::CREATED, "create event failed: {body}");
        body["id"].as_str().unwrap().to_string()
    }

    /// Creates one activity through the API and returns its id.
    pub async fn create_activity(
        &self,
        event_id: &str,
        name: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> String {
        let (status, body) = self
            .send(json_request(
                Method::POST,
                &format!("/api/v1/events/{event_id}/activities"),
                Some(&self.admin_token()),
                json!({
                    "activities": [{
                        "name": name,
                        "start_date": start.to_rfc3339(),
                        "end_date": end.to_rfc3339(),
                    }]
                }),
            ))
            .await;
        assert_eq!(status, StatusCode::CREATED, "create activity failed: {body}");
        body[0]["id"].as_str().unwrap().to_string()
    }

    /// An event that started five hours ago with one activity that already ended.
    pub async fn seed_finished_activity(&self) -> (String, String) {
        let now = Utc::now();
        let event_id = self
            .create_event(now - Duration::hours(5), now + Duration::hours(1))
            .await;
        let activity_id = self
            .create_activity(
                &event_id,
                "Keynote",
                now - Duration::hours(4),
                now - Duration::hours(2),
            )
            .await;
        (event_id, activity_id)
    }
}

/// Helper to create a request with an optional bearer token and JSON body.
pub fn json_request(method: Method, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

/// Helper to create a body-less request.
pub fn empty_request(method: Method, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}
