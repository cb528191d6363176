mod common;

use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn root_banner_uses_the_envelope() {
    let (status, body) = common::send(common::test_app(), common::get("/")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"]["name"], json!("Botanica API"));
}

#[tokio::test]
async fn unknown_route_is_404() {
    let (status, _) = common::send(common::test_app(), common::get("/api/nope")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn token_endpoint_issues_a_bearer_token() {
    let request = common::post_json("/api/auth/token", json!({"username": "demo"}));
    let (status, body) = common::send(common::test_app(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"]["token_type"], json!("Bearer"));

    let token = body["data"]["token"].as_str().expect("token in response");
    // JWT: three dot-separated segments
    assert_eq!(token.split('.').count(), 3);
}

#[tokio::test]
async fn token_endpoint_accepts_the_configured_api_key() {
    let request = common::post_json(
        "/api/auth/token",
        json!({"username": "demo", "api_key": "demo-api-key"}),
    );
    let (status, body) = common::send(common::test_app(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
}

#[tokio::test]
async fn token_endpoint_rejects_a_wrong_api_key() {
    let request = common::post_json(
        "/api/auth/token",
        json!({"username": "demo", "api_key": "wrong-key"}),
    );
    let (status, body) = common::send(common::test_app(), request).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["error"], json!("Invalid API key"));
}

#[tokio::test]
async fn token_endpoint_requires_a_username() {
    let request = common::post_json("/api/auth/token", json!({"username": "  "}));
    let (status, body) = common::send(common::test_app(), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
}

#[tokio::test]
async fn refresh_endpoint_issues_a_fresh_token() {
    let request = common::post_json("/api/auth/refresh", json!({"username": "demo"}));
    let (status, body) = common::send(common::test_app(), request).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["token"].is_string());
}

#[tokio::test]
async fn verify_confirms_an_issued_token() {
    let issue = common::post_json("/api/auth/token", json!({"username": "demo"}));
    let (_, body) = common::send(common::test_app(), issue).await;
    let token = body["data"]["token"].as_str().unwrap().to_string();

    let (status, body) =
        common::send(common::test_app(), common::get_with_bearer("/api/auth/verify", &token)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"]["valid"], json!(true));
}

#[tokio::test]
async fn verify_rejects_a_missing_header() {
    let (status, body) = common::send(common::test_app(), common::get("/api/auth/verify")).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["data"]["valid"], json!(false));
}

#[tokio::test]
async fn verify_rejects_a_garbage_token() {
    let (status, body) = common::send(
        common::test_app(),
        common::get_with_bearer("/api/auth/verify", "not.a.token"),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["data"]["valid"], json!(false));
}
