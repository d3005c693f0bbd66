//! Integration tests for authentication and authorization rejections.
//!
//! Every path here is decided before the first database query (JWT
//! validation and role checks are token-only), so no live database is
//! required.

mod common;

use axum::http::{Method, StatusCode};
use common::{body_json, request, token_for};

#[tokio::test]
async fn listing_without_token_is_unauthorized() {
    let app = common::build_test_app();
    let response = request(app, Method::GET, "/api/v1/surveys", None).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let json = body_json(response).await;
    assert_eq!(json["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn submissions_without_token_is_unauthorized() {
    let app = common::build_test_app();
    let response = request(app, Method::GET, "/api/v1/surveys/1/submissions", None).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn garbage_bearer_token_is_unauthorized() {
    let app = common::build_test_app();
    let response = request(
        app,
        Method::GET,
        "/api/v1/surveys",
        Some("not-a-real-token"),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn editor_cannot_create_survey_pages() {
    let app = common::build_test_app();
    let token = token_for(7, "editor");
    let response = request(app, Method::POST, "/api/v1/surveys", Some(&token)).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let json = body_json(response).await;
    assert_eq!(json["code"], "FORBIDDEN");
}

#[tokio::test]
async fn submission_delete_rejects_get() {
    // Deleting via GET must never remove anything; only POST is routed.
    let app = common::build_test_app();
    let token = token_for(7, "editor");
    let response = request(
        app,
        Method::GET,
        "/api/v1/surveys/1/submissions/2/delete",
        Some(&token),
    )
    .await;

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}
