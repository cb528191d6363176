use axum::extract::{Path, State};
use axum::{Extension, Json};
use serde::Deserialize;
use uuid::Uuid;

use crate::api::{ApiResponse, ApiResult};
use crate::database::models::Address;
use crate::database::scoped::ADDRESSES;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateAddressRequest {
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub city: String,
    pub state: Option<String>,
    pub country: String,
    pub postal_code: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateAddressRequest {
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub postal_code: Option<String>,
}

/// GET /api/addresses - all addresses for the authenticated user
pub async fn list_get(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> ApiResult<Vec<Address>> {
    let addresses = sqlx::query_as::<_, Address>(
        "SELECT * FROM addresses WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(auth.user_id)
    .fetch_all(&state.db)
    .await?;

    Ok(ApiResponse::list(addresses))
}

/// GET /api/addresses/:id
pub async fn show_get(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<Address> {
    let address = ADDRESSES.fetch(&state.db, id, auth.user_id).await?;
    Ok(ApiResponse::success(address))
}

/// POST /api/addresses
pub async fn create_post(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(request): Json<CreateAddressRequest>,
) -> ApiResult<Address> {
    if request.address_line1.trim().is_empty()
        || request.city.trim().is_empty()
        || request.country.trim().is_empty()
    {
        return Err(ApiError::bad_request(
            "address_line1, city and country are required",
        ));
    }

    // Coordinates and timezone are left null here; a geocoding step
    // outside this API fills them in later.
    let address = sqlx::query_as::<_, Address>(
        "INSERT INTO addresses (user_id, address_line1, address_line2, city, state, country, postal_code) \
         VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING *",
    )
    .bind(auth.user_id)
    .bind(&request.address_line1)
    .bind(&request.address_line2)
    .bind(&request.city)
    .bind(&request.state)
    .bind(&request.country)
    .bind(&request.postal_code)
    .fetch_one(&state.db)
    .await?;

    tracing::info!("Address created for user {}: {}", auth.user_id, address.id);

    Ok(ApiResponse::created(address))
}

/// PUT /api/addresses/:id - partial update; absent fields keep their
/// stored values, updated_at always refreshes.
pub async fn update_put(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateAddressRequest>,
) -> ApiResult<()> {
    ADDRESSES.fetch(&state.db, id, auth.user_id).await?;

    let mut query = build_update_query(id, auth.user_id, &request);
    query.build().execute(&state.db).await?;

    tracing::info!("Address updated: {}", id);

    Ok(ApiResponse::message("Address updated successfully"))
}

/// Partial update: only the fields present in the request are written;
/// `updated_at` always refreshes. Scoped to the owner even though the
/// record was already fetched.
fn build_update_query<'a>(
    id: Uuid,
    user_id: Uuid,
    request: &'a UpdateAddressRequest,
) -> sqlx::QueryBuilder<'a, sqlx::Postgres> {
    let mut query =
        sqlx::QueryBuilder::<sqlx::Postgres>::new("UPDATE addresses SET updated_at = now()");
    if let Some(v) = &request.address_line1 {
        query.push(", address_line1 = ").push_bind(v);
    }
    if let Some(v) = &request.address_line2 {
        query.push(", address_line2 = ").push_bind(v);
    }
    if let Some(v) = &request.city {
        query.push(", city = ").push_bind(v);
    }
    if let Some(v) = &request.state {
        query.push(", state = ").push_bind(v);
    }
    if let Some(v) = &request.country {
        query.push(", country = ").push_bind(v);
    }
    if let Some(v) = &request.postal_code {
        query.push(", postal_code = ").push_bind(v);
    }
    query.push(" WHERE id = ").push_bind(id);
    query.push(" AND user_id = ").push_bind(user_id);
    query
}

/// DELETE /api/addresses/:id - refuses while any plant references the
/// address.
pub async fn delete_delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> ApiResult<()> {
    ADDRESSES.fetch(&state.db, id, auth.user_id).await?;

    let referenced = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM user_plants WHERE address_id = $1)",
    )
    .bind(id)
    .fetch_one(&state.db)
    .await?;

    if referenced {
        return Err(ApiError::conflict(
            "Cannot delete address that is being used by plants. Please update or delete those plants first.",
        ));
    }

    ADDRESSES.delete(&state.db, id, auth.user_id).await?;

    tracing::info!("Address deleted: {}", id);

    Ok(ApiResponse::message("Address deleted successfully"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_request() -> UpdateAddressRequest {
        UpdateAddressRequest {
            address_line1: None,
            address_line2: None,
            city: None,
            state: None,
            country: None,
            postal_code: None,
        }
    }

    #[test]
    fn update_writes_only_present_fields() {
        let request = UpdateAddressRequest {
            city: Some("Lisbon".to_string()),
            ..empty_request()
        };
        let query = build_update_query(Uuid::new_v4(), Uuid::new_v4(), &request);
        let sql = query.sql();

        assert!(sql.contains("city = "));
        assert!(!sql.contains("country = "));
        assert!(!sql.contains("address_line1 = "));
    }

    #[test]
    fn update_always_refreshes_updated_at_and_scopes_by_owner() {
        let request = empty_request();
        let query = build_update_query(Uuid::new_v4(), Uuid::new_v4(), &request);
        let sql = query.sql();

        assert!(sql.starts_with("UPDATE addresses SET updated_at = now()"));
        assert!(sql.contains("AND user_id = "));
    }
}
