mod common;

use axum::http::StatusCode;
use serde_json::json;

const PROTECTED_ROUTES: &[&str] = &[
    "/api/auth/me",
    "/api/addresses",
    "/api/user-plants",
    "/api/plants",
    "/api/plants/search",
];

#[tokio::test]
async fn protected_routes_require_a_token() {
    for route in PROTECTED_ROUTES {
        let (status, body) = common::send(common::test_app(), common::get(route)).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED, "route: {}", route);
        assert_eq!(body["success"], json!(false), "route: {}", route);
        assert!(body["error"].is_string(), "route: {}", route);
    }
}

#[tokio::test]
async fn protected_routes_reject_a_garbage_token() {
    let (status, body) = common::send(
        common::test_app(),
        common::get_with_bearer("/api/addresses", "garbage.token.here"),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"], json!("Invalid token"));
}

#[tokio::test]
async fn protected_routes_reject_a_non_bearer_scheme() {
    let request = axum::http::Request::builder()
        .method(axum::http::Method::GET)
        .uri("/api/addresses")
        .header("authorization", "Basic dXNlcjpwdw==")
        .body(axum::body::Body::empty())
        .unwrap();
    let (status, _) = common::send(common::test_app(), request).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

/// Demo tokens carry the username as subject; the subject claim on
/// ownership-scoped routes must be an identifier, so the token verifies
/// but does not grant access.
#[tokio::test]
async fn username_subject_tokens_cannot_reach_owned_resources() {
    let issue = common::post_json("/api/auth/token", json!({"username": "demo"}));
    let (_, body) = common::send(common::test_app(), issue).await;
    let token = body["data"]["token"].as_str().unwrap().to_string();

    let (status, body) = common::send(
        common::test_app(),
        common::get_with_bearer("/api/addresses", &token),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], json!("Invalid user token"));
}
