//! Account lookup, registration, and credential verification.

use sqlx::PgPool;
use uuid::Uuid;

use crate::auth;
use crate::database::models::User;
use crate::error::ApiError;
use crate::services::tier;

/// Look up a user by email, case-insensitively.
pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE lower(email) = lower($1)")
        .bind(email)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_id(pool: &PgPool, user_id: Uuid) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

/// Create a new account on the Free tier with a hashed password.
/// A duplicate email (case-insensitive) is a `BadRequest`.
pub async fn create_user(
    pool: &PgPool,
    email: &str,
    password: &str,
    first_name: Option<&str>,
    last_name: Option<&str>,
) -> Result<User, ApiError> {
    if find_by_email(pool, email).await?.is_some() {
        return Err(ApiError::bad_request("User with this email already exists"));
    }

    let password_hash = auth::hash_password(password)?;

    let insert = sqlx::query_as::<_, User>(
        "INSERT INTO users (email, password_hash, first_name, last_name) \
         VALUES ($1, $2, $3, $4) RETURNING *",
    )
    .bind(email)
    .bind(&password_hash)
    .bind(first_name)
    .bind(last_name)
    .fetch_one(pool)
    .await;

    match insert {
        Ok(user) => Ok(user),
        // The unique index backstops a concurrent registration that
        // slipped past the pre-check.
        Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
            Err(ApiError::bad_request("User with this email already exists"))
        }
        Err(e) => Err(e.into()),
    }
}

/// Verify a login attempt against the stored hash.
pub fn verify_password(user: &User, password: &str) -> Result<bool, ApiError> {
    Ok(auth::verify_password(password, &user.password_hash)?)
}

pub async fn plant_count(pool: &PgPool, user_id: Uuid) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM user_plants WHERE user_id = $1")
        .bind(user_id)
        .fetch_one(pool)
        .await
}

/// Whether the user's tier allows adding one more plant right now.
pub async fn can_add_plant(pool: &PgPool, user_id: Uuid) -> Result<bool, ApiError> {
    let Some(user) = find_by_id(pool, user_id).await? else {
        return Ok(false);
    };

    let count = plant_count(pool, user_id).await?;
    Ok(tier::can_add_plant(&user.subscription_tier, count))
}
