//! Trefle plant-taxonomy API client and its caching front.
//!
//! The raw client performs token-authenticated GETs against the
//! provider; the cached service sits in front of it and answers
//! repeated lookups from the shared keyed store for 24 hours.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;

use crate::cache::LookupCache;
use crate::config::TrefleConfig;
use crate::error::ApiError;

const CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Taxonomy API client.
#[derive(Clone)]
pub struct TrefleClient {
    http: reqwest::Client,
    base_url: String,
    api_token: String,
}

impl TrefleClient {
    pub fn new(config: &TrefleConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.base_url.clone(),
            api_token: config.api_token.clone(),
        }
    }

    /// List all plants, paginated.
    pub async fn list_plants(&self, page: u32) -> Result<TrefleSearchResponse, ApiError> {
        self.get_json("/plants", &[("page", page.to_string())]).await
    }

    /// Search plants by free-text query.
    pub async fn search_plants(&self, query: &str, page: u32) -> Result<TrefleSearchResponse, ApiError> {
        self.get_json(
            "/plants/search",
            &[("q", query.to_string()), ("page", page.to_string())],
        )
        .await
    }

    /// Filter plants by common name.
    pub async fn plants_by_common_name(
        &self,
        common_name: &str,
        page: u32,
    ) -> Result<TrefleSearchResponse, ApiError> {
        self.get_json(
            "/plants",
            &[
                ("filter[common_name]", common_name.to_string()),
                ("page", page.to_string()),
            ],
        )
        .await
    }

    /// Get detailed information about a single plant.
    pub async fn plant_by_id(&self, plant_id: i64) -> Result<TrefleDetailResponse, ApiError> {
        self.get_json(&format!("/plants/{}", plant_id), &[]).await
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ApiError> {
        let url = format!("{}{}", self.base_url, path);

        let response = self
            .http
            .get(&url)
            .query(query)
            .query(&[("token", self.api_token.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            tracing::error!("Taxonomy provider returned {} for {}", response.status(), path);
            return Err(ApiError::upstream_failure("External provider request failed"));
        }

        Ok(response.json::<T>().await?)
    }
}

/// Caching front for the taxonomy client, keyed by the exact query
/// parameters. Provider failures are propagated and never cached.
#[derive(Clone)]
pub struct CachedTrefleService {
    client: TrefleClient,
    cache: LookupCache,
}

impl CachedTrefleService {
    pub fn new(client: TrefleClient, cache: LookupCache) -> Self {
        Self { client, cache }
    }

    pub async fn list_plants(&self, page: u32) -> Result<TrefleSearchResponse, ApiError> {
        self.cached(format!("trefle_list_{}", page), self.client.list_plants(page))
            .await
    }

    pub async fn search_plants(&self, query: &str, page: u32) -> Result<TrefleSearchResponse, ApiError> {
        self.cached(
            format!("trefle_search_{}_{}", query, page),
            self.client.search_plants(query, page),
        )
        .await
    }

    pub async fn plants_by_common_name(
        &self,
        common_name: &str,
        page: u32,
    ) -> Result<TrefleSearchResponse, ApiError> {
        self.cached(
            format!("trefle_common_{}_{}", common_name, page),
            self.client.plants_by_common_name(common_name, page),
        )
        .await
    }

    pub async fn plant_by_id(&self, plant_id: i64) -> Result<TrefleDetailResponse, ApiError> {
        self.cached(
            format!("trefle_plant_{}", plant_id),
            self.client.plant_by_id(plant_id),
        )
        .await
    }

    async fn cached<T, F>(&self, key: String, fetch: F) -> Result<T, ApiError>
    where
        T: Serialize + DeserializeOwned,
        F: Future<Output = Result<T, ApiError>>,
    {
        if let Some(value) = self.cache.get(&key).await {
            if let Ok(hit) = serde_json::from_value(value) {
                tracing::debug!("Cache hit: {}", key);
                return Ok(hit);
            }
        }

        tracing::debug!("Cache miss: {}", key);
        let result = fetch.await?;

        if let Ok(value) = serde_json::to_value(&result) {
            self.cache.insert(key, value, CACHE_TTL).await;
        }

        Ok(result)
    }
}

// Provider wire models (snake_case, as delivered)

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreflePlant {
    pub id: i64,
    pub common_name: Option<String>,
    pub scientific_name: Option<String>,
    pub family_common_name: Option<String>,
    pub image_url: Option<String>,
    pub slug: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreflePlantDetail {
    pub id: i64,
    pub common_name: Option<String>,
    pub scientific_name: Option<String>,
    pub family: Option<String>,
    pub genus: Option<String>,
    pub observations: Option<String>,
    pub vegetable: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrefleLinks {
    #[serde(rename = "self")]
    pub self_link: Option<String>,
    pub first: Option<String>,
    pub last: Option<String>,
    pub next: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrefleMeta {
    pub total: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrefleSearchResponse {
    #[serde(default)]
    pub data: Vec<TreflePlant>,
    pub links: Option<TrefleLinks>,
    pub meta: Option<TrefleMeta>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrefleDetailResponse {
    pub data: Option<TreflePlantDetail>,
    pub meta: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TrefleConfig;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn service() -> CachedTrefleService {
        let client = TrefleClient::new(&TrefleConfig {
            api_token: "test-token".to_string(),
            base_url: "http://127.0.0.1:0".to_string(),
        });
        CachedTrefleService::new(client, LookupCache::new())
    }

    #[tokio::test]
    async fn identical_lookups_fetch_once() {
        let svc = service();
        let calls = AtomicU32::new(0);

        let first: i32 = svc
            .cached("trefle_search_rose_1".to_string(), async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(42)
            })
            .await
            .unwrap();
        let second: i32 = svc
            .cached("trefle_search_rose_1".to_string(), async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(99)
            })
            .await
            .unwrap();

        assert_eq!(first, 42);
        assert_eq!(second, 42); // served from cache, not refetched
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn distinct_keys_fetch_separately() {
        let svc = service();

        let a: i32 = svc
            .cached("trefle_list_1".to_string(), async { Ok(1) })
            .await
            .unwrap();
        let b: i32 = svc
            .cached("trefle_list_2".to_string(), async { Ok(2) })
            .await
            .unwrap();

        assert_eq!((a, b), (1, 2));
    }

    #[tokio::test]
    async fn errors_are_not_cached() {
        let svc = service();
        let calls = AtomicU32::new(0);

        let failed: Result<i32, _> = svc
            .cached("trefle_plant_7".to_string(), async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(ApiError::upstream_failure("provider down"))
            })
            .await;
        assert!(failed.is_err());

        let recovered: i32 = svc
            .cached("trefle_plant_7".to_string(), async {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(7)
            })
            .await
            .unwrap();

        assert_eq!(recovered, 7);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn search_response_tolerates_missing_fields() {
        let parsed: TrefleSearchResponse = serde_json::from_str(r#"{"data": []}"#).unwrap();
        assert!(parsed.data.is_empty());
        assert!(parsed.meta.is_none());

        let parsed: TrefleSearchResponse = serde_json::from_str(
            r#"{
                "data": [{"id": 1, "common_name": "rose", "scientific_name": null,
                          "family_common_name": null, "image_url": null, "slug": "rose"}],
                "links": {"self": "/plants?page=1", "first": null, "last": null, "next": null},
                "meta": {"total": 1}
            }"#,
        )
        .unwrap();
        assert_eq!(parsed.data.len(), 1);
        assert_eq!(parsed.meta.unwrap().total, Some(1));
    }
}
