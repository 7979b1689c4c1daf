//! HTTP-level tests for the `/treatments` resource and the change schedule.

mod common;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::{
    body_json, create_patient, create_wound, delete_auth, get_auth, post_json_auth,
    put_json_auth, user_with_token, valid_cpf,
};
use serde_json::{json, Value};
use sqlx::PgPool;

/// Seed a patient with one wound; returns `(patient_id, wound_id)`.
async fn patient_with_wound(app: axum::Router, token: &str, n: u32, wound: Value) -> (i64, i64) {
    let patient = create_patient(app.clone(), token, &format!("Patient {n}"), &valid_cpf(n)).await;
    let pid = patient["id"].as_i64().unwrap();
    let wound = create_wound(app, token, pid, wound).await;
    (pid, wound["id"].as_i64().unwrap())
}

async fn record(app: axum::Router, token: &str, body: Value) -> Value {
    let response = post_json_auth(app, "/api/treatments", body, token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_derives_patient_and_next_change(pool: PgPool) {
    let (nurse, token) = user_with_token(&pool, "nurse").await;
    let app = common::build_test_app(pool);
    let (pid, wid) = patient_with_wound(app.clone(), &token, 1, json!({})).await;

    let treatment = record(
        app,
        &token,
        json!({
            "wound_id": wid,
            "performed_at": "2026-03-30T10:00:00Z",
            "primary_dressing": "Hydrofiber with silver",
            "change_frequency_days": 3,
        }),
    )
    .await;
    assert_eq!(treatment["patient_id"], pid);
    assert_eq!(treatment["user_id"], nurse.id);
    assert_eq!(treatment["next_change_date"], "2026-04-02");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_rejects_mismatched_patient(pool: PgPool) {
    let (_nurse, token) = user_with_token(&pool, "nurse").await;
    let app = common::build_test_app(pool);
    let (_pid, wid) = patient_with_wound(app.clone(), &token, 2, json!({})).await;
    let other = create_patient(app.clone(), &token, "Other", &valid_cpf(3)).await;

    let response = post_json_auth(
        app.clone(),
        "/api/treatments",
        json!({ "wound_id": wid, "patient_id": other["id"] }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = post_json_auth(
        app.clone(),
        "/api/treatments",
        json!({ "wound_id": 555_555 }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = post_json_auth(
        app,
        "/api/treatments",
        json!({ "wound_id": wid, "change_frequency_days": 0 }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_rederives_next_change(pool: PgPool) {
    let (_nurse, token) = user_with_token(&pool, "nurse").await;
    let app = common::build_test_app(pool);
    let (_pid, wid) = patient_with_wound(app.clone(), &token, 4, json!({})).await;

    let treatment = record(
        app.clone(),
        &token,
        json!({
            "wound_id": wid,
            "performed_at": "2026-03-10T09:00:00Z",
            "change_frequency_days": 2,
        }),
    )
    .await;
    let id = treatment["id"].as_i64().unwrap();

    let response = put_json_auth(
        app,
        &format!("/api/treatments/{id}"),
        json!({ "change_frequency_days": 7 }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["next_change_date"], "2026-03-17");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_filters_by_wound_and_patient(pool: PgPool) {
    let (_nurse, token) = user_with_token(&pool, "nurse").await;
    let app = common::build_test_app(pool);
    let (pid, wid) = patient_with_wound(app.clone(), &token, 5, json!({})).await;
    let (_other_pid, other_wid) = patient_with_wound(app.clone(), &token, 6, json!({})).await;

    record(app.clone(), &token, json!({ "wound_id": wid })).await;
    record(app.clone(), &token, json!({ "wound_id": wid })).await;
    record(app.clone(), &token, json!({ "wound_id": other_wid })).await;

    let json = body_json(get_auth(app.clone(), &format!("/api/treatments?wound_id={wid}"), &token).await).await;
    assert_eq!(json["total"], 2);

    let json = body_json(get_auth(app.clone(), "/api/treatments", &token).await).await;
    assert_eq!(json["total"], 3);

    let json =
        body_json(get_auth(app, &format!("/api/patients/{pid}/treatments"), &token).await).await;
    assert_eq!(json["total"], 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_schedule_uses_latest_treatment_of_open_wounds(pool: PgPool) {
    let (_nurse, token) = user_with_token(&pool, "nurse").await;
    let app = common::build_test_app(pool);
    let now = Utc::now();

    // Due in 2 days.
    let (_p1, due) = patient_with_wound(app.clone(), &token, 7, json!({})).await;
    record(
        app.clone(),
        &token,
        json!({ "wound_id": due, "performed_at": now, "change_frequency_days": 2 }),
    )
    .await;

    // An older treatment would be due, but the latest one is 20 days out.
    let (_p2, superseded) = patient_with_wound(app.clone(), &token, 8, json!({})).await;
    record(
        app.clone(),
        &token,
        json!({
            "wound_id": superseded,
            "performed_at": now - Duration::days(2),
            "change_frequency_days": 3,
        }),
    )
    .await;
    record(
        app.clone(),
        &token,
        json!({ "wound_id": superseded, "performed_at": now, "change_frequency_days": 20 }),
    )
    .await;

    // Healed wounds never appear.
    let (_p3, healed) = patient_with_wound(app.clone(), &token, 9, json!({ "status": "healed" })).await;
    record(
        app.clone(),
        &token,
        json!({ "wound_id": healed, "performed_at": now, "change_frequency_days": 1 }),
    )
    .await;

    let response = get_auth(app.clone(), "/api/treatments/schedule", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["days"], 7);
    let items = json["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["wound_id"], due);

    // A wider window picks up the 20-day change; the cap is 90.
    let json = body_json(get_auth(app, "/api/treatments/schedule?days=500", &token).await).await;
    assert_eq!(json["days"], 90);
    assert_eq!(json["items"].as_array().unwrap().len(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_requires_permission(pool: PgPool) {
    let (_nurse, nurse_token) = user_with_token(&pool, "nurse").await;
    let (_doc, doc_token) = user_with_token(&pool, "physician").await;
    let app = common::build_test_app(pool);
    let (_pid, wid) = patient_with_wound(app.clone(), &nurse_token, 10, json!({})).await;
    let treatment = record(app.clone(), &nurse_token, json!({ "wound_id": wid })).await;
    let id = treatment["id"].as_i64().unwrap();

    let response = delete_auth(app.clone(), &format!("/api/treatments/{id}"), &nurse_token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = delete_auth(app.clone(), &format!("/api/treatments/{id}"), &doc_token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get_auth(app, &format!("/api/treatments/{id}"), &doc_token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
