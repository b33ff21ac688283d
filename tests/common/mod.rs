#![allow(dead_code)]

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use setlog::config::{Config, DEFAULT_IDENTITY_HEADER};
use setlog::db::{create_memory_pool, DbPool};
use setlog::middleware::LOCAL_DATE_HEADER;
use setlog::migrations::run_migrations_for_tests;
use setlog::session::SESSION_COOKIE_NAME;

pub fn setup_test_db() -> DbPool {
    let pool = create_memory_pool().expect("Failed to create test database");
    run_migrations_for_tests(&pool).expect("Failed to run migrations");
    pool
}

pub fn test_config() -> Config {
    Config {
        database_url: ":memory:".to_string(),
        host: "127.0.0.1".to_string(),
        port: 0,
        identity_header: DEFAULT_IDENTITY_HEADER.to_string(),
    }
}

pub fn create_test_app(pool: DbPool) -> Router {
    setlog::build_app(pool, &test_config())
}

/// Open a session for `auth_id` and return the `Cookie` header value.
pub async fn login(app: &Router, auth_id: &str) -> String {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auth/session")
                .header(DEFAULT_IDENTITY_HEADER, auth_id)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{}"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("session cookie")
        .to_str()
        .unwrap()
        .to_string();
    let pair = set_cookie.split(';').next().unwrap().to_string();
    assert!(pair.starts_with(&format!("{}=", SESSION_COOKIE_NAME)));
    pair
}

/// Builder for authenticated requests.
pub struct TestRequest {
    method: &'static str,
    uri: String,
    cookie: Option<String>,
    local_date: Option<String>,
    body: Option<Value>,
}

impl TestRequest {
    pub fn new(method: &'static str, uri: impl Into<String>) -> Self {
        Self {
            method,
            uri: uri.into(),
            cookie: None,
            local_date: None,
            body: None,
        }
    }

    pub fn get(uri: impl Into<String>) -> Self {
        Self::new("GET", uri)
    }

    pub fn post(uri: impl Into<String>) -> Self {
        Self::new("POST", uri)
    }

    pub fn cookie(mut self, cookie: &str) -> Self {
        self.cookie = Some(cookie.to_string());
        self
    }

    pub fn local_date(mut self, date: &str) -> Self {
        self.local_date = Some(date.to_string());
        self
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn build(self) -> Request<Body> {
        let mut builder = Request::builder().method(self.method).uri(self.uri);
        if let Some(cookie) = self.cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        if let Some(date) = self.local_date {
            builder = builder.header(LOCAL_DATE_HEADER, date);
        }
        match self.body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }
}

/// Send a request and decode the JSON envelope.
pub async fn send(app: &Router, request: TestRequest) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request.build()).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

/// Send a request that is expected to succeed and return its `data`.
pub async fn send_ok(app: &Router, request: TestRequest) -> Value {
    let (status, body) = send(app, request).await;
    assert_eq!(status, StatusCode::OK, "unexpected response: {}", body);
    assert_eq!(body["success"], true);
    body["data"].clone()
}
