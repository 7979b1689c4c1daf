//! Shared helpers for the HTTP integration tests.
//!
//! Each test file pulls this in with `mod common;` and uses only part of it.
#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::PgPool;
use tower::ServiceExt;

use woundcare_api::auth::jwt::{issue_token, JwtConfig, TokenKind, TokenSubject};
use woundcare_api::auth::password::hash_password;
use woundcare_api::config::ServerConfig;
use woundcare_api::router::build_app_router;
use woundcare_api::state::AppState;
use woundcare_core::patient::complete_cpf;
use woundcare_db::models::user::{CreateUser, User};
use woundcare_db::repositories::UserRepo;

pub const TEST_JWT_SECRET: &str = "integration-test-secret";
pub const TEST_PASSWORD: &str = "correct-horse-42";
const MULTIPART_BOUNDARY: &str = "woundcare-test-boundary";

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

/// Build a test `ServerConfig` storing uploads under `upload_dir`.
pub fn test_config(upload_dir: PathBuf) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3001".to_string()],
        request_timeout_secs: 30,
        upload_dir,
        max_upload_bytes: 1024 * 1024,
        cookie_secure: false,
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
            access_token_expiry_days: 7,
            refresh_token_expiry_days: 30,
        },
        bootstrap_admin: None,
    }
}

/// Full application router with the production middleware stack.
pub fn build_test_app(pool: PgPool) -> Router {
    let upload_dir = std::env::temp_dir().join("woundcare-api-tests");
    build_test_app_with_config(pool, test_config(upload_dir))
}

pub fn build_test_app_with_config(pool: PgPool, config: ServerConfig) -> Router {
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Insert a user with [`TEST_PASSWORD`] directly through the repository.
pub async fn seed_user(pool: &PgPool, email: &str, role: &str) -> User {
    let input = CreateUser {
        name: format!("Test {role}"),
        email: email.to_string(),
        password_hash: hash_password(TEST_PASSWORD).expect("hashing should succeed"),
        role: role.to_string(),
        professional_registry: None,
    };
    UserRepo::create(pool, &input)
        .await
        .expect("user creation should succeed")
}

/// Access token for `user`, signed with the test secret.
pub fn token_for(user: &User) -> String {
    let config = test_config(PathBuf::new());
    issue_token(
        TokenSubject {
            user_id: user.id,
            email: &user.email,
            name: &user.name,
            role: &user.role,
        },
        TokenKind::Access,
        &config.jwt,
    )
    .expect("token issue should succeed")
}

/// Seed a user of `role` and return it with a valid access token.
pub async fn user_with_token(pool: &PgPool, role: &str) -> (User, String) {
    let user = seed_user(pool, &format!("{role}@clinic.test"), role).await;
    let token = token_for(&user);
    (user, token)
}

/// A CPF with correct check digits, distinct for each `n`.
pub fn valid_cpf(n: u32) -> String {
    complete_cpf(&format!("{:09}", 123_450_000 + n)).expect("nine digits")
}

/// Create a patient through the API and return its JSON.
pub async fn create_patient(app: Router, token: &str, name: &str, cpf: &str) -> Value {
    let response = post_json_auth(
        app,
        "/api/patients",
        json!({ "name": name, "cpf": cpf }),
        token,
    )
    .await;
    assert_eq!(response.status(), 201, "patient fixture should be created");
    body_json(response).await
}

/// Create a wound through the API and return its JSON.
pub async fn create_wound(app: Router, token: &str, patient_id: i64, body: Value) -> Value {
    let mut payload = json!({
        "patient_id": patient_id,
        "location": "Sacral region",
        "wound_type": "pressure_injury",
    });
    if let (Some(target), Some(extra)) = (payload.as_object_mut(), body.as_object()) {
        for (k, v) in extra {
            target.insert(k.clone(), v.clone());
        }
    }
    let response = post_json_auth(app, "/api/wounds", payload, token).await;
    assert_eq!(response.status(), 201, "wound fixture should be created");
    body_json(response).await
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.expect("router is infallible")
}

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    let request = Request::builder()
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

fn json_request(method: Method, uri: &str, body: &Value, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response {
    send(app, json_request(Method::POST, uri, &body, None)).await
}

pub async fn post_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response {
    send(app, json_request(Method::POST, uri, &body, Some(token))).await
}

pub async fn put_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response {
    send(app, json_request(Method::PUT, uri, &body, Some(token))).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

/// A file part for [`post_multipart_auth`].
pub struct FilePart<'a> {
    pub field: &'a str,
    pub file_name: &'a str,
    pub content_type: &'a str,
    pub data: &'a [u8],
}

/// Encode text fields and an optional file as `multipart/form-data`.
pub fn multipart_body(fields: &[(&str, &str)], file: Option<FilePart<'_>>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{MULTIPART_BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some(file) = file {
        body.extend_from_slice(
            format!(
                "--{MULTIPART_BOUNDARY}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                file.field, file.file_name, file.content_type
            )
            .as_bytes(),
        );
        body.extend_from_slice(file.data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{MULTIPART_BOUNDARY}--\r\n").as_bytes());
    body
}

pub async fn post_multipart_auth(app: Router, uri: &str, body: Vec<u8>, token: &str) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={MULTIPART_BOUNDARY}"),
        )
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body))
        .unwrap();
    send(app, request).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

/// Collect a response body as raw bytes.
pub async fn body_bytes(response: Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes()
        .to_vec()
}
