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

const MIN_PASSWORD_LENGTH: usize = 8;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// POST /api/auth/register - create an account and return a token
pub async fn register_post(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> ApiResult<serde_json::Value> {
    validate_email(&request.email)?;
    if request.password.len() < MIN_PASSWORD_LENGTH {
        return Err(ApiError::bad_request("Password must be at least 8 characters"));
    }

    let user = users::create_user(
        &state.db,
        &request.email,
        &request.password,
        request.first_name.as_deref(),
        request.last_name.as_deref(),
    )
    .await?;

    let token = auth::issue_token(&user.id.to_string())?;

    tracing::info!("New user registered: {}", user.email);

    Ok(ApiResponse::success(json!({
        "token": token,
        "user": UserDto::from(&user),
    }))
    .with_message("Registration successful"))
}

fn validate_email(email: &str) -> Result<(), ApiError> {
    let well_formed = email.split_once('@').is_some_and(|(local, domain)| {
        !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
    });

    if well_formed {
        Ok(())
    } else {
        Err(ApiError::bad_request("Invalid email format"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_addresses() {
        assert!(validate_email("ada@example.com").is_ok());
        assert!(validate_email("a.b+tag@mail.example.org").is_ok());
    }

    #[test]
    fn rejects_malformed_addresses() {
        assert!(validate_email("").is_err());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("user@nodot").is_err());
        assert!(validate_email("user@.com").is_err());
    }
}
