use axum::extract::{Path, Query, State};
use axum::Extension;
use serde::Deserialize;
use uuid::Uuid;

use crate::api::{ApiResponse, ApiResult};
use crate::database::models::WeatherData;
use crate::database::scoped::ADDRESSES;
use crate::middleware::AuthUser;
use crate::AppState;

const DEFAULT_HISTORY_DAYS: i64 = 7;

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub days: Option<i64>,
}

/// GET /api/addresses/:id/weather - today's weather for an address
pub async fn current_get(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<WeatherData> {
    let address = ADDRESSES.fetch(&state.db, id, auth.user_id).await?;

    let weather = state.weather.weather_for_address(&state.db, &address).await?;

    Ok(ApiResponse::success(weather))
}

/// GET /api/addresses/:id/weather/history?days=N - persisted daily rows
pub async fn history_get(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Query(query): Query<HistoryQuery>,
) -> ApiResult<Vec<WeatherData>> {
    let address = ADDRESSES.fetch(&state.db, id, auth.user_id).await?;

    let days = query.days.unwrap_or(DEFAULT_HISTORY_DAYS).clamp(1, 365);
    let rows = state.weather.history(&state.db, address.id, days).await?;

    Ok(ApiResponse::list(rows))
}
