//! Weather lookups with two-tier freshness.
//!
//! Lookup order for an address on a given day: the in-process cache
//! entry (valid for one hour), then the persisted daily row, then the
//! external provider. Once a daily row exists it is reused for the rest
//! of the day regardless of the in-process cache. Provider failures
//! propagate and are never cached or persisted.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;
use std::time::Duration;
use uuid::Uuid;

use crate::cache::LookupCache;
use crate::config::WeatherConfig;
use crate::database::models::{Address, WeatherData};
use crate::error::ApiError;

const CACHE_TTL: Duration = Duration::from_secs(60 * 60);

/// Two concurrent first fetches for the same address/day may both reach
/// this statement; the unique (address_id, date) index makes the loser a
/// no-op, and the re-select afterwards returns the single winning row.
const INSERT_DAILY_SQL: &str =
    "INSERT INTO weather_data (address_id, date, temperature, humidity, precipitation, conditions) \
     VALUES ($1, $2, $3, $4, $5, $6) \
     ON CONFLICT (address_id, date) DO NOTHING";

#[derive(Clone)]
pub struct WeatherService {
    http: reqwest::Client,
    cache: LookupCache,
    api_key: String,
    base_url: String,
}

impl WeatherService {
    pub fn new(config: &WeatherConfig, cache: LookupCache) -> Self {
        Self {
            http: reqwest::Client::new(),
            cache,
            api_key: config.api_key.clone(),
            base_url: config.base_url.clone(),
        }
    }

    /// Today's weather for an (already ownership-checked) address.
    pub async fn weather_for_address(
        &self,
        pool: &PgPool,
        address: &Address,
    ) -> Result<WeatherData, ApiError> {
        let (Some(latitude), Some(longitude)) = (address.latitude, address.longitude) else {
            return Err(ApiError::bad_request("Address has no coordinates"));
        };

        let today = Utc::now().date_naive();
        let cache_key = format!("weather_{}_{}", address.id, today);

        if let Some(value) = self.cache.get(&cache_key).await {
            if let Ok(cached) = serde_json::from_value::<WeatherData>(value) {
                tracing::debug!("Cache hit for weather at address {}", address.id);
                return Ok(cached);
            }
        }

        // The persisted daily row wins for the rest of the day.
        if let Some(stored) = fetch_daily_row(pool, address.id, today).await? {
            self.remember(&cache_key, &stored).await;
            return Ok(stored);
        }

        let observed = self.fetch_from_provider(latitude, longitude).await?;

        sqlx::query(INSERT_DAILY_SQL)
            .bind(address.id)
            .bind(today)
            .bind(observed.temperature)
            .bind(observed.humidity)
            .bind(Decimal::ZERO) // provider does not report precipitation
            .bind(&observed.conditions)
            .execute(pool)
            .await?;

        let stored = fetch_daily_row(pool, address.id, today)
            .await?
            .ok_or_else(|| ApiError::internal("Weather record disappeared after insert"))?;

        self.remember(&cache_key, &stored).await;
        tracing::info!("Weather fetched and cached for address {}", address.id);

        Ok(stored)
    }

    /// Persisted weather rows for the last `days` days, newest first.
    pub async fn history(
        &self,
        pool: &PgPool,
        address_id: Uuid,
        days: i64,
    ) -> Result<Vec<WeatherData>, ApiError> {
        let start_date = Utc::now().date_naive() - chrono::Duration::days(days);

        let rows = sqlx::query_as::<_, WeatherData>(
            "SELECT * FROM weather_data WHERE address_id = $1 AND date >= $2 ORDER BY date DESC",
        )
        .bind(address_id)
        .bind(start_date)
        .fetch_all(pool)
        .await?;

        Ok(rows)
    }

    async fn remember(&self, key: &str, data: &WeatherData) {
        if let Ok(value) = serde_json::to_value(data) {
            self.cache.insert(key.to_string(), value, CACHE_TTL).await;
        }
    }

    async fn fetch_from_provider(
        &self,
        latitude: Decimal,
        longitude: Decimal,
    ) -> Result<Observation, ApiError> {
        let url = format!("{}/weather", self.base_url);

        let response = self
            .http
            .get(&url)
            .query(&[
                ("lat", latitude.to_string()),
                ("lon", longitude.to_string()),
                ("appid", self.api_key.clone()),
                ("units", "metric".to_string()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            tracing::error!("Weather provider returned {}", response.status());
            return Err(ApiError::upstream_failure("External provider request failed"));
        }

        let body = response.json::<ProviderResponse>().await?;

        Ok(Observation {
            temperature: body
                .main
                .as_ref()
                .and_then(|m| m.temp)
                .and_then(Decimal::from_f64_retain),
            humidity: body.main.as_ref().and_then(|m| m.humidity),
            conditions: body
                .weather
                .unwrap_or_default()
                .into_iter()
                .next()
                .and_then(|w| w.description),
        })
    }
}

struct Observation {
    temperature: Option<Decimal>,
    humidity: Option<i32>,
    conditions: Option<String>,
}

async fn fetch_daily_row(
    pool: &PgPool,
    address_id: Uuid,
    date: NaiveDate,
) -> Result<Option<WeatherData>, sqlx::Error> {
    sqlx::query_as::<_, WeatherData>(
        "SELECT * FROM weather_data WHERE address_id = $1 AND date = $2",
    )
    .bind(address_id)
    .bind(date)
    .fetch_optional(pool)
    .await
}

// Provider wire models (only the consumed fields)

#[derive(Debug, Deserialize)]
struct ProviderResponse {
    main: Option<ProviderMain>,
    weather: Option<Vec<ProviderCondition>>,
}

#[derive(Debug, Deserialize)]
struct ProviderMain {
    temp: Option<f64>,
    humidity: Option<i32>,
}

#[derive(Debug, Deserialize)]
struct ProviderCondition {
    description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_response_parses_consumed_fields() {
        let body: ProviderResponse = serde_json::from_str(
            r#"{
                "main": {"temp": 21.38, "humidity": 64, "pressure": 1012},
                "weather": [{"id": 800, "description": "clear sky"}],
                "wind": {"speed": 3.1}
            }"#,
        )
        .unwrap();

        let main = body.main.unwrap();
        assert_eq!(main.temp, Some(21.38));
        assert_eq!(main.humidity, Some(64));
        assert_eq!(
            body.weather.unwrap()[0].description.as_deref(),
            Some("clear sky")
        );
    }

    #[test]
    fn provider_response_tolerates_missing_sections() {
        let body: ProviderResponse = serde_json::from_str("{}").unwrap();
        assert!(body.main.is_none());
        assert!(body.weather.is_none());
    }

    #[test]
    fn daily_insert_defers_to_the_unique_index() {
        // Losing a same-day insert race must be a no-op, never a second
        // row and never an error surfaced to the caller.
        assert!(INSERT_DAILY_SQL.contains("ON CONFLICT (address_id, date) DO NOTHING"));
    }
}
