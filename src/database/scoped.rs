//! Ownership-scoped record access.
//!
//! Every single-record read or mutation of a user-owned resource goes
//! through a `ScopedTable`, which filters by the record id *and* the
//! ownership predicate in one statement. A record that exists under a
//! different owner is indistinguishable from a missing record: both
//! come back as `NotFound`.

use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool};
use std::marker::PhantomData;
use uuid::Uuid;

use crate::database::models::{Address, PlantCareLog, UserPlant};
use crate::error::ApiError;

pub struct ScopedTable<T> {
    table: &'static str,
    /// SQL fragment tying a row to its owner; `$2` binds the caller's
    /// user id. Either a direct column match or a parent-chain subquery.
    owner_predicate: &'static str,
    not_found: &'static str,
    _marker: PhantomData<fn() -> T>,
}

/// Addresses are owned directly via `user_id`.
pub const ADDRESSES: ScopedTable<Address> =
    ScopedTable::new("addresses", "user_id = $2", "Address not found");

/// User plants are owned directly via `user_id`.
pub const USER_PLANTS: ScopedTable<UserPlant> =
    ScopedTable::new("user_plants", "user_id = $2", "Plant not found");

/// Care logs are owned transitively through their parent plant.
pub const CARE_LOGS: ScopedTable<PlantCareLog> = ScopedTable::new(
    "plant_care_logs",
    "user_plant_id IN (SELECT id FROM user_plants WHERE user_id = $2)",
    "Care log not found",
);

impl<T> ScopedTable<T> {
    pub const fn new(
        table: &'static str,
        owner_predicate: &'static str,
        not_found: &'static str,
    ) -> Self {
        Self {
            table,
            owner_predicate,
            not_found,
            _marker: PhantomData,
        }
    }

    fn select_sql(&self) -> String {
        format!(
            "SELECT * FROM {} WHERE id = $1 AND {}",
            self.table, self.owner_predicate
        )
    }

    fn exists_sql(&self) -> String {
        format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE id = $1 AND {})",
            self.table, self.owner_predicate
        )
    }

    fn delete_sql(&self) -> String {
        format!(
            "DELETE FROM {} WHERE id = $1 AND {}",
            self.table, self.owner_predicate
        )
    }
}

impl<T> ScopedTable<T>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
{
    /// Fetch the record if it exists *and* belongs to `owner`.
    pub async fn fetch_optional(
        &self,
        pool: &PgPool,
        id: Uuid,
        owner: Uuid,
    ) -> Result<Option<T>, sqlx::Error> {
        sqlx::query_as::<_, T>(&self.select_sql())
            .bind(id)
            .bind(owner)
            .fetch_optional(pool)
            .await
    }

    /// Fetch the record, mapping both "absent" and "owned by someone
    /// else" to the same `NotFound`.
    pub async fn fetch(&self, pool: &PgPool, id: Uuid, owner: Uuid) -> Result<T, ApiError> {
        self.fetch_optional(pool, id, owner)
            .await?
            .ok_or_else(|| ApiError::not_found(self.not_found))
    }

    /// Whether a record with this id exists under this owner.
    pub async fn exists(&self, pool: &PgPool, id: Uuid, owner: Uuid) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(&self.exists_sql())
            .bind(id)
            .bind(owner)
            .fetch_one(pool)
            .await
    }

    /// Delete the record if owned; `NotFound` otherwise.
    pub async fn delete(&self, pool: &PgPool, id: Uuid, owner: Uuid) -> Result<(), ApiError> {
        let result = sqlx::query(&self.delete_sql())
            .bind(id)
            .bind(owner)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::not_found(self.not_found));
        }
        Ok(())
    }
}
