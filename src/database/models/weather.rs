use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One day's weather for an address; unique per (address, date).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WeatherData {
    pub id: Uuid,
    pub address_id: Uuid,
    pub date: NaiveDate,
    pub temperature: Option<Decimal>,
    pub humidity: Option<i32>,
    pub precipitation: Option<Decimal>,
    pub conditions: Option<String>,
    pub created_at: DateTime<Utc>,
}
