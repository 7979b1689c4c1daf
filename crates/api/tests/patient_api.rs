//! HTTP-level tests for the `/patients` resource.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, create_patient, create_wound, delete_auth, get_auth, post_json_auth,
    put_json_auth, user_with_token, valid_cpf,
};
use serde_json::json;
use sqlx::PgPool;
use woundcare_core::patient::format_cpf;

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_then_get_returns_same_fields(pool: PgPool) {
    let (nurse, token) = user_with_token(&pool, "nurse").await;
    let app = common::build_test_app(pool);
    let cpf = valid_cpf(1);

    let response = post_json_auth(
        app.clone(),
        "/api/patients",
        json!({
            "name": "Maria Souza",
            "cpf": format_cpf(&cpf),
            "birth_date": "1950-04-12",
            "gender": "female",
            "city": "Recife",
            "state": "PE",
            "comorbidities": "Diabetes mellitus type 2",
        }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = body_json(response).await;
    assert_eq!(created["cpf"], cpf, "CPF is stored digits-only");
    assert_eq!(created["responsible_user_id"], nurse.id);

    let id = created["id"].as_i64().unwrap();
    let response = get_auth(app, &format!("/api/patients/{id}"), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let fetched = body_json(response).await;
    for field in ["name", "cpf", "birth_date", "gender", "city", "state", "comorbidities"] {
        assert_eq!(fetched[field], created[field], "{field} must round-trip");
    }
    assert_eq!(fetched["wound_count"], 0);
    assert_eq!(fetched["open_wound_count"], 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_cpf_is_rejected(pool: PgPool) {
    let (_nurse, token) = user_with_token(&pool, "nurse").await;
    let app = common::build_test_app(pool);
    let cpf = valid_cpf(2);

    create_patient(app.clone(), &token, "First Holder", &cpf).await;

    // Same digits, different punctuation.
    let response = post_json_auth(
        app,
        "/api/patients",
        json!({ "name": "Second Holder", "cpf": format_cpf(&cpf) }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "CPF already registered");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_invalid_cpf_reports_field_error(pool: PgPool) {
    let (_nurse, token) = user_with_token(&pool, "nurse").await;
    let app = common::build_test_app(pool);

    let response = post_json_auth(
        app,
        "/api/patients",
        json!({ "name": "Bad Digits", "cpf": "111.111.111-11" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["details"]["cpf"][0], "Invalid CPF");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_blank_name_is_rejected(pool: PgPool) {
    let (_nurse, token) = user_with_token(&pool, "nurse").await;
    let app = common::build_test_app(pool);

    let response = post_json_auth(
        app.clone(),
        "/api/patients",
        json!({ "name": "   ", "cpf": valid_cpf(5) }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["details"]["name"][0], "Value cannot be blank");

    let patient = create_patient(app.clone(), &token, "Named", &valid_cpf(6)).await;
    let response = put_json_auth(
        app,
        &format!("/api/patients/{}", patient["id"]),
        json!({ "name": "\t " }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unknown_responsible_user_is_not_found(pool: PgPool) {
    let (_nurse, token) = user_with_token(&pool, "nurse").await;
    let app = common::build_test_app(pool);

    let response = post_json_auth(
        app,
        "/api/patients",
        json!({ "name": "Orphan", "cpf": valid_cpf(3), "responsible_user_id": 999_999 }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_searches_and_paginates(pool: PgPool) {
    let (_nurse, token) = user_with_token(&pool, "nurse").await;
    let app = common::build_test_app(pool);

    for (i, name) in ["Ana Lima", "Bruno Lima", "Carla Dias"].iter().enumerate() {
        create_patient(app.clone(), &token, name, &valid_cpf(10 + i as u32)).await;
    }

    let response = get_auth(app.clone(), "/api/patients?search=lima&limit=1", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["total"], 2);
    assert_eq!(json["limit"], 1);
    assert_eq!(json["pages"], 2);
    assert_eq!(json["items"].as_array().unwrap().len(), 1);

    // Past the last page: empty items, real totals.
    let response = get_auth(app, "/api/patients?page=9", &token).await;
    let json = body_json(response).await;
    assert_eq!(json["total"], 3);
    assert!(json["items"].as_array().unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_rechecks_cpf_uniqueness(pool: PgPool) {
    let (_nurse, token) = user_with_token(&pool, "nurse").await;
    let app = common::build_test_app(pool);

    let first = create_patient(app.clone(), &token, "First", &valid_cpf(20)).await;
    let second = create_patient(app.clone(), &token, "Second", &valid_cpf(21)).await;
    let second_id = second["id"].as_i64().unwrap();

    let response = put_json_auth(
        app.clone(),
        &format!("/api/patients/{second_id}"),
        json!({ "cpf": first["cpf"] }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Re-submitting its own CPF is fine.
    let response = put_json_auth(
        app,
        &format!("/api/patients/{second_id}"),
        json!({ "cpf": second["cpf"], "phone": "+55 81 99999-0000" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["phone"], "+55 81 99999-0000");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_soft_delete_hides_patient_but_keeps_cpf(pool: PgPool) {
    let (_admin, admin_token) = user_with_token(&pool, "admin").await;
    let (_nurse, nurse_token) = user_with_token(&pool, "nurse").await;
    let app = common::build_test_app(pool);
    let cpf = valid_cpf(30);

    let patient = create_patient(app.clone(), &nurse_token, "Leaving", &cpf).await;
    let id = patient["id"].as_i64().unwrap();

    // Deletion is an admin permission.
    let response = delete_auth(app.clone(), &format!("/api/patients/{id}"), &nurse_token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = delete_auth(app.clone(), &format!("/api/patients/{id}"), &admin_token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get_auth(app.clone(), &format!("/api/patients/{id}"), &nurse_token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = delete_auth(app.clone(), &format!("/api/patients/{id}"), &admin_token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = post_json_auth(
        app,
        "/api/patients",
        json!({ "name": "Reuse", "cpf": cpf }),
        &nurse_token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_nested_wound_list_and_counts(pool: PgPool) {
    let (_nurse, token) = user_with_token(&pool, "nurse").await;
    let app = common::build_test_app(pool);

    let patient = create_patient(app.clone(), &token, "Two Wounds", &valid_cpf(40)).await;
    let pid = patient["id"].as_i64().unwrap();
    create_wound(app.clone(), &token, pid, json!({})).await;
    create_wound(app.clone(), &token, pid, json!({ "status": "healed" })).await;

    let response = get_auth(app.clone(), &format!("/api/patients/{pid}/wounds"), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["total"], 2);

    let detail = body_json(get_auth(app.clone(), &format!("/api/patients/{pid}"), &token).await).await;
    assert_eq!(detail["wound_count"], 2);
    assert_eq!(detail["open_wound_count"], 1);

    let response = get_auth(app, "/api/patients/424242/wounds", &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
