use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// One care event (watering, fertilizing, pruning, ...) for a plant.
/// `occurred_at` is caller-supplied and defaults to the time of entry.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PlantCareLog {
    pub id: Uuid,
    pub user_plant_id: Uuid,
    pub care_type: String,
    pub occurred_at: DateTime<Utc>,
    pub amount: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}
