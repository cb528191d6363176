use axum::extract::State;
use axum::Extension;

use crate::api::{ApiResponse, ApiResult};
use crate::database::models::UserDto;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::services::users;
use crate::AppState;

/// GET /api/auth/me - current user profile
pub async fn me_get(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> ApiResult<UserDto> {
    let user = users::find_by_id(&state.db, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(ApiResponse::success(UserDto::from(&user)))
}
