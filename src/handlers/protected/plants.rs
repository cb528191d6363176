//! Taxonomy proxy endpoints. All lookups go through the cached Trefle
//! service; provider pagination metadata passes through the envelope.

use axum::extract::{Path, Query, State};
use serde::Deserialize;

use crate::api::{ApiResponse, ApiResult};
use crate::error::ApiError;
use crate::services::trefle::{TreflePlant, TreflePlantDetail};
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
    pub page: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct CommonNameQuery {
    pub name: Option<String>,
    pub page: Option<u32>,
}

/// GET /api/plants - list plants with pagination
pub async fn list_get(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> ApiResult<Vec<TreflePlant>> {
    let page = query.page.unwrap_or(1);
    tracing::info!("Listing plants - page: {}", page);

    let result = state.plants.list_plants(page).await?;

    Ok(ApiResponse::list(result.data)
        .with_meta(result.meta)
        .with_links(result.links))
}

/// GET /api/plants/search?q=...
pub async fn search_get(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Vec<TreflePlant>> {
    let q = query
        .q
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| ApiError::bad_request("Missing required parameter: q (query)"))?;
    let page = query.page.unwrap_or(1);

    tracing::info!("Searching plants - query: {}, page: {}", q, page);

    let result = state.plants.search_plants(q, page).await?;

    Ok(ApiResponse::list(result.data)
        .with_meta(result.meta)
        .with_links(result.links))
}

/// GET /api/plants/filter/common-name?name=...
pub async fn common_name_get(
    State(state): State<AppState>,
    Query(query): Query<CommonNameQuery>,
) -> ApiResult<Vec<TreflePlant>> {
    let name = query
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or_else(|| ApiError::bad_request("Missing required parameter: name (common name)"))?;
    let page = query.page.unwrap_or(1);

    tracing::info!("Filtering plants by common name - name: {}, page: {}", name, page);

    let result = state.plants.plants_by_common_name(name, page).await?;

    Ok(ApiResponse::list(result.data)
        .with_meta(result.meta)
        .with_links(result.links))
}

/// GET /api/plants/:id - taxonomy detail record
pub async fn show_get(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Option<TreflePlantDetail>> {
    if id <= 0 {
        return Err(ApiError::bad_request("Invalid plant ID"));
    }

    tracing::info!("Fetching plant details - ID: {}", id);

    let result = state.plants.plant_by_id(id).await?;

    Ok(ApiResponse::success(result.data).with_meta(result.meta))
}
