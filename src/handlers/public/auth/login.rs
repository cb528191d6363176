use axum::extract::State;
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::api::{ApiResponse, ApiResult};
use crate::auth;
use crate::database::models::UserDto;
use crate::error::ApiError;
use crate::services::users;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// POST /api/auth/login - authenticate with email and password.
///
/// Unknown email and wrong password produce the same generic rejection
/// so the endpoint does not reveal which accounts exist.
pub async fn login_post(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> ApiResult<serde_json::Value> {
    if request.email.trim().is_empty() || request.password.is_empty() {
        return Err(ApiError::bad_request("Invalid input"));
    }

    let Some(user) = users::find_by_email(&state.db, &request.email).await? else {
        tracing::warn!("Login attempt for non-existent user: {}", request.email);
        return Err(ApiError::unauthorized("Invalid email or password"));
    };

    if !users::verify_password(&user, &request.password)? {
        tracing::warn!("Invalid password attempt for user: {}", user.email);
        return Err(ApiError::unauthorized("Invalid email or password"));
    }

    let token = auth::issue_token(&user.id.to_string())?;

    tracing::info!("User logged in: {}", user.email);

    Ok(ApiResponse::success(json!({
        "token": token,
        "user": UserDto::from(&user),
    }))
    .with_message("Login successful"))
}
