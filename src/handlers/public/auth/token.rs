//! Demo token issuance, refresh, and verification.
//!
//! These endpoints predate the password flow and are kept alongside it:
//! `/api/auth/token` issues a bearer token for any username, gated by a
//! shared API key. Tokens issued here carry the username as subject, so
//! they pass verification but cannot reach the ownership-scoped
//! resources (those require an identifier-shaped subject).

use axum::{http::HeaderMap, response::IntoResponse, Json};
use serde::Deserialize;
use serde_json::json;

use crate::api::{ApiResponse, ApiResult};
use crate::auth;
use crate::config;
use crate::error::ApiError;
use crate::middleware::auth::extract_bearer_token;

#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub username: String,
    pub api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub username: String,
}

/// POST /api/auth/token - issue a bearer token for a username
pub async fn token_post(Json(request): Json<TokenRequest>) -> ApiResult<serde_json::Value> {
    if request.username.trim().is_empty() {
        return Err(ApiError::bad_request("Missing or invalid username"));
    }

    // Only a present-but-wrong key is rejected; the gate is advisory in
    // development where no key may be configured.
    let expected = &config::config().security.auth_api_key;
    if let Some(api_key) = request.api_key.as_deref() {
        if !api_key.is_empty() && api_key != expected {
            tracing::warn!("Failed authentication attempt for user: {}", request.username);
            return Err(ApiError::unauthorized("Invalid API key"));
        }
    }

    let token = auth::issue_token(&request.username)?;

    Ok(ApiResponse::success(json!({
        "token": token,
        "token_type": "Bearer",
        "expires_in": "24 hours",
        "usage": "Include in Authorization header as: Bearer <token>",
    })))
}

/// POST /api/auth/refresh - issue a fresh token for a username
pub async fn refresh_post(Json(request): Json<RefreshRequest>) -> ApiResult<serde_json::Value> {
    if request.username.trim().is_empty() {
        return Err(ApiError::bad_request("Missing or invalid username"));
    }

    let token = auth::issue_token(&request.username)?;

    tracing::info!("Token refreshed for user: {}", request.username);

    Ok(ApiResponse::success(json!({
        "token": token,
        "token_type": "Bearer",
        "expires_in": "24 hours",
    })))
}

/// GET /api/auth/verify - report whether the presented token is valid.
///
/// Inspects the Authorization header directly so it can answer for
/// tokens that would not pass the protected-route middleware.
pub async fn verify_get(headers: HeaderMap) -> impl IntoResponse {
    let rejection = |error: &str| {
        (
            axum::http::StatusCode::UNAUTHORIZED,
            Json(json!({
                "success": false,
                "data": { "valid": false },
                "error": error,
            })),
        )
    };

    let token = match extract_bearer_token(&headers) {
        Ok(token) => token,
        Err(_) => return rejection("Missing or invalid authorization header"),
    };

    match auth::validate_token(&token) {
        Ok(_) => (
            axum::http::StatusCode::OK,
            Json(json!({
                "success": true,
                "data": { "valid": true },
                "message": "Token is valid",
            })),
        ),
        Err(_) => rejection("Invalid token"),
    }
}
