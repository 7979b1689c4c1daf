//! HTTP-level tests for wound image upload, metadata and removal.

mod common;

use std::io::Cursor;

use axum::http::StatusCode;
use common::{
    body_bytes, body_json, create_patient, create_wound, delete_auth, get, get_auth,
    multipart_body, post_multipart_auth, put_json_auth, test_config, user_with_token, valid_cpf,
    FilePart,
};
use serde_json::json;
use sqlx::PgPool;
use tempfile::TempDir;

fn png(width: u32, height: u32) -> Vec<u8> {
    let mut out = Cursor::new(Vec::new());
    image::RgbImage::new(width, height)
        .write_to(&mut out, image::ImageFormat::Png)
        .unwrap();
    out.into_inner()
}

fn png_part(data: &[u8]) -> FilePart<'_> {
    FilePart {
        field: "file",
        file_name: "heel.png",
        content_type: "image/png",
        data,
    }
}

struct Fixture {
    app: axum::Router,
    token: String,
    wound_id: i64,
    uploads: TempDir,
}

async fn fixture(pool: PgPool) -> Fixture {
    let (_admin, token) = user_with_token(&pool, "admin").await;
    let uploads = TempDir::new().unwrap();
    let app = common::build_test_app_with_config(pool, test_config(uploads.path().to_path_buf()));
    let patient = create_patient(app.clone(), &token, "Photo", &valid_cpf(1)).await;
    let wound = create_wound(app.clone(), &token, patient["id"].as_i64().unwrap(), json!({})).await;
    Fixture {
        app,
        token,
        wound_id: wound["id"].as_i64().unwrap(),
        uploads,
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_upload_stores_file_and_serves_it(pool: PgPool) {
    let fx = fixture(pool).await;
    let data = png(6, 4);
    let wound_id = fx.wound_id.to_string();

    let body = multipart_body(
        &[
            ("wound_id", wound_id.as_str()),
            ("description", "Day 3, granulation tissue"),
            ("taken_at", "2026-03-12T14:00:00-03:00"),
        ],
        Some(png_part(&data)),
    );
    let response = post_multipart_auth(fx.app.clone(), "/api/images", body, &fx.token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let image = body_json(response).await;

    assert_eq!(image["wound_id"], fx.wound_id);
    assert_eq!(image["file_name"], "heel.png");
    assert_eq!(image["content_type"], "image/png");
    assert_eq!(image["size_bytes"], data.len() as i64);
    assert_eq!(image["width_px"], 6);
    assert_eq!(image["height_px"], 4);
    assert!(image.get("file_path").is_none(), "disk path stays private");

    let url = image["url"].as_str().unwrap();
    let prefix = format!("/uploads/wounds/{}/", fx.wound_id);
    assert!(url.starts_with(&prefix), "unexpected url {url}");
    assert!(url.ends_with(".png"));

    let stored = fx.uploads.path().join(url.trim_start_matches("/uploads/"));
    assert_eq!(std::fs::read(&stored).unwrap(), data);

    let served = get(fx.app, url).await;
    assert_eq!(served.status(), StatusCode::OK);
    assert_eq!(body_bytes(served).await, data);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_upload_rejects_bad_input(pool: PgPool) {
    let fx = fixture(pool).await;
    let data = png(2, 2);
    let wound_id = fx.wound_id.to_string();

    // Unsupported extension.
    let gif = FilePart {
        file_name: "heel.gif",
        ..png_part(&data)
    };
    let body = multipart_body(&[("wound_id", wound_id.as_str())], Some(gif));
    let response = post_multipart_auth(fx.app.clone(), "/api/images", body, &fx.token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Right extension, not an image.
    let fake = FilePart {
        data: b"plain text pretending to be a png",
        ..png_part(&data)
    };
    let body = multipart_body(&[("wound_id", wound_id.as_str())], Some(fake));
    let response = post_multipart_auth(fx.app.clone(), "/api/images", body, &fx.token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Missing file.
    let body = multipart_body(&[("wound_id", wound_id.as_str())], None);
    let response = post_multipart_auth(fx.app.clone(), "/api/images", body, &fx.token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Unknown wound.
    let body = multipart_body(&[("wound_id", "777777")], Some(png_part(&data)));
    let response = post_multipart_auth(fx.app.clone(), "/api/images", body, &fx.token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Nothing was written for the rejected uploads.
    assert!(!fx.uploads.path().join("wounds").join("777777").exists());
    let listed = body_json(get_auth(fx.app, "/api/images", &fx.token).await).await;
    assert_eq!(listed["total"], 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_upload_over_size_limit_is_rejected(pool: PgPool) {
    let fx = fixture(pool).await;
    let wound_id = fx.wound_id.to_string();
    // Limit in the test config is 1 MiB.
    let oversized = vec![0u8; 1024 * 1024 + 1];
    let part = FilePart {
        data: &oversized,
        ..png_part(&oversized)
    };

    let body = multipart_body(&[("wound_id", wound_id.as_str())], Some(part));
    let response = post_multipart_auth(fx.app, "/api/images", body, &fx.token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_list_and_delete(pool: PgPool) {
    let fx = fixture(pool).await;
    let data = png(3, 3);
    let wound_id = fx.wound_id.to_string();

    let body = multipart_body(&[("wound_id", wound_id.as_str())], Some(png_part(&data)));
    let image = body_json(post_multipart_auth(fx.app.clone(), "/api/images", body, &fx.token).await).await;
    let id = image["id"].as_i64().unwrap();
    let stored = fx
        .uploads
        .path()
        .join(image["url"].as_str().unwrap().trim_start_matches("/uploads/"));
    assert!(stored.exists());

    let response = put_json_auth(
        fx.app.clone(),
        &format!("/api/images/{id}"),
        json!({ "description": "Edges less macerated" }),
        &fx.token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["description"], "Edges less macerated");

    let listed = body_json(
        get_auth(fx.app.clone(), &format!("/api/images?wound_id={}", fx.wound_id), &fx.token).await,
    )
    .await;
    assert_eq!(listed["total"], 1);

    // An image blocks deleting its wound.
    let response = delete_auth(fx.app.clone(), &format!("/api/wounds/{}", fx.wound_id), &fx.token).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(response).await["details"]["images"], 1);

    let response = delete_auth(fx.app.clone(), &format!("/api/images/{id}"), &fx.token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(!stored.exists(), "file is removed with the row");

    let response = get_auth(fx.app, &format!("/api/images/{id}"), &fx.token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_succeeds_when_file_already_gone(pool: PgPool) {
    let fx = fixture(pool).await;
    let data = png(2, 2);
    let wound_id = fx.wound_id.to_string();

    let body = multipart_body(&[("wound_id", wound_id.as_str())], Some(png_part(&data)));
    let image = body_json(post_multipart_auth(fx.app.clone(), "/api/images", body, &fx.token).await).await;
    let stored = fx
        .uploads
        .path()
        .join(image["url"].as_str().unwrap().trim_start_matches("/uploads/"));
    std::fs::remove_file(&stored).unwrap();

    let id = image["id"].as_i64().unwrap();
    let response = delete_auth(fx.app, &format!("/api/images/{id}"), &fx.token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_upload_rejects_content_not_matching_extension(pool: PgPool) {
    let fx = fixture(pool).await;
    let wound_id = fx.wound_id.to_string();

    let mut jpeg = Cursor::new(Vec::new());
    image::RgbImage::new(3, 3)
        .write_to(&mut jpeg, image::ImageFormat::Jpeg)
        .unwrap();
    let jpeg = jpeg.into_inner();

    // A JPEG named as a PNG.
    let body = multipart_body(&[("wound_id", wound_id.as_str())], Some(png_part(&jpeg)));
    let response = post_multipart_auth(fx.app.clone(), "/api/images", body, &fx.token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // The same bytes under a matching name are accepted as image/jpeg.
    let part = FilePart {
        field: "file",
        file_name: "heel.jpeg",
        content_type: "image/png",
        data: &jpeg,
    };
    let body = multipart_body(&[("wound_id", wound_id.as_str())], Some(part));
    let response = post_multipart_auth(fx.app, "/api/images", body, &fx.token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_json(response).await["content_type"], "image/jpeg");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_upload_refused_after_patient_deleted(pool: PgPool) {
    let fx = fixture(pool).await;
    let wound = body_json(get_auth(fx.app.clone(), &format!("/api/wounds/{}", fx.wound_id), &fx.token).await).await;
    let patient_id = wound["patient_id"].as_i64().unwrap();

    let response = delete_auth(fx.app.clone(), &format!("/api/patients/{patient_id}"), &fx.token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let data = png(2, 2);
    let wound_id = fx.wound_id.to_string();
    let body = multipart_body(&[("wound_id", wound_id.as_str())], Some(png_part(&data)));
    let response = post_multipart_auth(fx.app, "/api/images", body, &fx.token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
