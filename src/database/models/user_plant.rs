use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::Address;

/// A plant tracked by a user, optionally tied to one of their
/// addresses and to a taxonomy record.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserPlant {
    pub id: Uuid,
    pub user_id: Uuid,
    pub address_id: Option<Uuid>,
    pub trefle_plant_id: Option<i32>,
    pub common_name: Option<String>,
    pub scientific_name: Option<String>,
    pub nickname: Option<String>,
    pub date_planted: Option<DateTime<Utc>>,
    pub location: Option<String>,
    pub notes: Option<String>,
    pub photo_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A plant with its address embedded, as returned by the read endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct UserPlantWithAddress {
    #[serde(flatten)]
    pub plant: UserPlant,
    pub address: Option<Address>,
}

impl UserPlantWithAddress {
    pub fn new(plant: UserPlant, address: Option<Address>) -> Self {
        Self { plant, address }
    }
}
