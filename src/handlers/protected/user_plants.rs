use axum::extract::{Path, State};
use axum::{Extension, Json};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::HashMap;
use uuid::Uuid;

use crate::api::{ApiResponse, ApiResult};
use crate::database::models::{Address, UserPlant, UserPlantWithAddress};
use crate::database::scoped::{ADDRESSES, USER_PLANTS};
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::services::users;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateUserPlantRequest {
    pub address_id: Option<Uuid>,
    pub trefle_plant_id: Option<i32>,
    pub common_name: Option<String>,
    pub scientific_name: Option<String>,
    pub nickname: Option<String>,
    pub date_planted: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserPlantRequest {
    pub address_id: Option<Uuid>,
    pub nickname: Option<String>,
    pub date_planted: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub notes: Option<String>,
}

/// GET /api/user-plants - the user's plants with addresses embedded
pub async fn list_get(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> ApiResult<Vec<UserPlantWithAddress>> {
    let plants = sqlx::query_as::<_, UserPlant>(
        "SELECT * FROM user_plants WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(auth.user_id)
    .fetch_all(&state.db)
    .await?;

    let addresses = sqlx::query_as::<_, Address>("SELECT * FROM addresses WHERE user_id = $1")
        .bind(auth.user_id)
        .fetch_all(&state.db)
        .await?;
    let by_id: HashMap<Uuid, Address> = addresses.into_iter().map(|a| (a.id, a)).collect();

    let items = plants
        .into_iter()
        .map(|plant| {
            let address = plant.address_id.and_then(|id| by_id.get(&id).cloned());
            UserPlantWithAddress::new(plant, address)
        })
        .collect();

    Ok(ApiResponse::list(items))
}

/// GET /api/user-plants/:id
pub async fn show_get(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<UserPlantWithAddress> {
    let plant = USER_PLANTS.fetch(&state.db, id, auth.user_id).await?;

    let address = match plant.address_id {
        Some(address_id) => ADDRESSES.fetch_optional(&state.db, address_id, auth.user_id).await?,
        None => None,
    };

    Ok(ApiResponse::success(UserPlantWithAddress::new(plant, address)))
}

/// POST /api/user-plants - subject to the subscription-tier limit
pub async fn create_post(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(request): Json<CreateUserPlantRequest>,
) -> ApiResult<UserPlant> {
    if !users::can_add_plant(&state.db, auth.user_id).await? {
        return Err(ApiError::bad_request(
            "Plant limit reached for your subscription tier. Please upgrade to add more plants.",
        ));
    }

    if let Some(address_id) = request.address_id {
        ensure_address_owned(&state, address_id, auth.user_id).await?;
    }

    let plant = sqlx::query_as::<_, UserPlant>(
        "INSERT INTO user_plants \
         (user_id, address_id, trefle_plant_id, common_name, scientific_name, nickname, date_planted, location, notes) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) RETURNING *",
    )
    .bind(auth.user_id)
    .bind(request.address_id)
    .bind(request.trefle_plant_id)
    .bind(&request.common_name)
    .bind(&request.scientific_name)
    .bind(&request.nickname)
    .bind(request.date_planted)
    .bind(&request.location)
    .bind(&request.notes)
    .fetch_one(&state.db)
    .await?;

    tracing::info!("Plant created for user {}: {}", auth.user_id, plant.id);

    Ok(ApiResponse::created(plant))
}

/// PUT /api/user-plants/:id - partial update
pub async fn update_put(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateUserPlantRequest>,
) -> ApiResult<()> {
    USER_PLANTS.fetch(&state.db, id, auth.user_id).await?;

    if let Some(address_id) = request.address_id {
        ensure_address_owned(&state, address_id, auth.user_id).await?;
    }

    let mut query = build_update_query(id, auth.user_id, &request);
    query.build().execute(&state.db).await?;

    tracing::info!("Plant updated: {}", id);

    Ok(ApiResponse::message("Plant updated successfully"))
}

/// Partial update; absent fields keep their stored values. A null
/// address_id cannot clear the reference, matching the create/update
/// contract (the reference only changes to another owned address).
fn build_update_query<'a>(
    id: Uuid,
    user_id: Uuid,
    request: &'a UpdateUserPlantRequest,
) -> sqlx::QueryBuilder<'a, sqlx::Postgres> {
    let mut query =
        sqlx::QueryBuilder::<sqlx::Postgres>::new("UPDATE user_plants SET updated_at = now()");
    if let Some(v) = request.address_id {
        query.push(", address_id = ").push_bind(v);
    }
    if let Some(v) = &request.nickname {
        query.push(", nickname = ").push_bind(v);
    }
    if let Some(v) = request.date_planted {
        query.push(", date_planted = ").push_bind(v);
    }
    if let Some(v) = &request.location {
        query.push(", location = ").push_bind(v);
    }
    if let Some(v) = &request.notes {
        query.push(", notes = ").push_bind(v);
    }
    query.push(" WHERE id = ").push_bind(id);
    query.push(" AND user_id = ").push_bind(user_id);
    query
}

/// DELETE /api/user-plants/:id - care logs cascade with the plant
pub async fn delete_delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<()> {
    USER_PLANTS.delete(&state.db, id, auth.user_id).await?;

    tracing::info!("Plant deleted: {}", id);

    Ok(ApiResponse::message("Plant deleted successfully"))
}

/// A referenced address must exist under the caller; anything else is
/// an invalid reference, not a not-found (the address id came from the
/// request body, not the path).
async fn ensure_address_owned(
    state: &AppState,
    address_id: Uuid,
    user_id: Uuid,
) -> Result<(), ApiError> {
    let owned = ADDRESSES.exists(&state.db, address_id, user_id).await?;
    if !owned {
        return Err(ApiError::bad_request("Invalid address"));
    }
    Ok(())
}
