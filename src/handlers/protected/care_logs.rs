use axum::extract::{Path, State};
use axum::{Extension, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::FromRow;
use uuid::Uuid;

use crate::api::{ApiResponse, ApiResult};
use crate::database::models::PlantCareLog;
use crate::database::scoped::{CARE_LOGS, USER_PLANTS};
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateCareLogRequest {
    pub user_plant_id: Uuid,
    pub care_type: String,
    pub occurred_at: Option<DateTime<Utc>>,
    pub amount: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize, FromRow)]
struct CareTypeStats {
    care_type: String,
    count: i64,
    first_entry: Option<DateTime<Utc>>,
    last_entry: Option<DateTime<Utc>>,
}

/// GET /api/care-logs/plant/:plant_id - all logs for one plant, newest
/// event first
pub async fn list_for_plant_get(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(plant_id): Path<Uuid>,
) -> ApiResult<Vec<PlantCareLog>> {
    ensure_plant_owned(&state, plant_id, auth.user_id).await?;

    let logs = sqlx::query_as::<_, PlantCareLog>(
        "SELECT * FROM plant_care_logs WHERE user_plant_id = $1 ORDER BY occurred_at DESC",
    )
    .bind(plant_id)
    .fetch_all(&state.db)
    .await?;

    Ok(ApiResponse::list(logs))
}

/// GET /api/care-logs/plant/:plant_id/statistics - per-care-type counts
/// and first/last event times
pub async fn statistics_get(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(plant_id): Path<Uuid>,
) -> ApiResult<serde_json::Value> {
    ensure_plant_owned(&state, plant_id, auth.user_id).await?;

    let stats = sqlx::query_as::<_, CareTypeStats>(
        "SELECT care_type, COUNT(*) AS count, MIN(occurred_at) AS first_entry, MAX(occurred_at) AS last_entry \
         FROM plant_care_logs WHERE user_plant_id = $1 \
         GROUP BY care_type ORDER BY care_type",
    )
    .bind(plant_id)
    .fetch_all(&state.db)
    .await?;

    let total_logs: i64 = stats.iter().map(|s| s.count).sum();

    Ok(ApiResponse::success(json!({
        "total_logs": total_logs,
        "care_types": stats,
    })))
}

/// GET /api/care-logs/:id
pub async fn show_get(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<PlantCareLog> {
    let log = CARE_LOGS.fetch(&state.db, id, auth.user_id).await?;
    Ok(ApiResponse::success(log))
}

/// POST /api/care-logs - record a care event; the event time defaults
/// to now when the caller omits it
pub async fn create_post(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(request): Json<CreateCareLogRequest>,
) -> ApiResult<PlantCareLog> {
    if request.care_type.trim().is_empty() {
        return Err(ApiError::bad_request("care_type is required"));
    }

    let plant_owned = USER_PLANTS
        .exists(&state.db, request.user_plant_id, auth.user_id)
        .await?;
    if !plant_owned {
        return Err(ApiError::bad_request("Invalid plant"));
    }

    let occurred_at = request.occurred_at.unwrap_or_else(Utc::now);

    let log = sqlx::query_as::<_, PlantCareLog>(
        "INSERT INTO plant_care_logs (user_plant_id, care_type, occurred_at, amount, notes) \
         VALUES ($1, $2, $3, $4, $5) RETURNING *",
    )
    .bind(request.user_plant_id)
    .bind(&request.care_type)
    .bind(occurred_at)
    .bind(&request.amount)
    .bind(&request.notes)
    .fetch_one(&state.db)
    .await?;

    tracing::info!("Care log created for plant {}: {}", request.user_plant_id, log.id);

    Ok(ApiResponse::created(log))
}

/// DELETE /api/care-logs/:id
pub async fn delete_delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<()> {
    CARE_LOGS.delete(&state.db, id, auth.user_id).await?;

    tracing::info!("Care log deleted: {}", id);

    Ok(ApiResponse::message("Care log deleted successfully"))
}

async fn ensure_plant_owned(
    state: &AppState,
    plant_id: Uuid,
    user_id: Uuid,
) -> Result<(), ApiError> {
    let owned = USER_PLANTS.exists(&state.db, plant_id, user_id).await?;
    if !owned {
        return Err(ApiError::not_found("Plant not found"));
    }
    Ok(())
}
