use axum::{routing::get, Json, Router};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod api;
pub mod auth;
pub mod cache;
pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod services;

use cache::LookupCache;
use services::trefle::{CachedTrefleService, TrefleClient};
use services::weather::WeatherService;
use sqlx::PgPool;

/// Shared application state, injected into every handler.
///
/// The lookup cache is owned here and shared by the taxonomy and weather
/// services so both populate the same process-wide keyed store.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub cache: LookupCache,
    pub plants: CachedTrefleService,
    pub weather: WeatherService,
}

impl AppState {
    pub fn new(db: PgPool) -> Self {
        let config = config::config();
        let cache = LookupCache::new();
        let plants = CachedTrefleService::new(TrefleClient::new(&config.trefle), cache.clone());
        let weather = WeatherService::new(&config.weather, cache.clone());

        Self { db, cache, plants, weather }
    }
}

pub fn app(state: AppState) -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .merge(auth_public_routes())
        // Protected API (bearer token required)
        .merge(protected_routes())
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn auth_public_routes() -> Router<AppState> {
    use axum::routing::post;
    use handlers::public::auth;

    Router::new()
        // Demo token issuance (API-key gated) plus the password-based flow;
        // both are part of the public surface.
        .route("/api/auth/token", post(auth::token_post))
        .route("/api/auth/refresh", post(auth::refresh_post))
        .route("/api/auth/verify", get(auth::verify_get))
        .route("/api/auth/register", post(auth::register_post))
        .route("/api/auth/login", post(auth::login_post))
}

fn protected_routes() -> Router<AppState> {
    use axum::routing::post;
    use handlers::protected::{addresses, auth, care_logs, plants, user_plants, weather};

    Router::new()
        .route("/api/auth/me", get(auth::me_get))
        // Addresses
        .route("/api/addresses", get(addresses::list_get).post(addresses::create_post))
        .route(
            "/api/addresses/:id",
            get(addresses::show_get)
                .put(addresses::update_put)
                .delete(addresses::delete_delete),
        )
        .route("/api/addresses/:id/weather", get(weather::current_get))
        .route("/api/addresses/:id/weather/history", get(weather::history_get))
        // User plants
        .route("/api/user-plants", get(user_plants::list_get).post(user_plants::create_post))
        .route(
            "/api/user-plants/:id",
            get(user_plants::show_get)
                .put(user_plants::update_put)
                .delete(user_plants::delete_delete),
        )
        // Care logs
        .route("/api/care-logs", post(care_logs::create_post))
        .route("/api/care-logs/plant/:plant_id", get(care_logs::list_for_plant_get))
        .route(
            "/api/care-logs/plant/:plant_id/statistics",
            get(care_logs::statistics_get),
        )
        .route(
            "/api/care-logs/:id",
            get(care_logs::show_get).delete(care_logs::delete_delete),
        )
        // Taxonomy proxy
        .route("/api/plants", get(plants::list_get))
        .route("/api/plants/search", get(plants::search_get))
        .route("/api/plants/filter/common-name", get(plants::common_name_get))
        .route("/api/plants/:id", get(plants::show_get))
        .route_layer(axum::middleware::from_fn(middleware::auth::jwt_auth_middleware))
}

async fn root() -> Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    Json(json!({
        "success": true,
        "data": {
            "name": "Botanica API",
            "version": version,
            "description": "Plant-care tracking API built with Rust (Axum)",
            "endpoints": {
                "home": "/ (public)",
                "health": "/health (public)",
                "auth": "/api/auth/token, /api/auth/refresh, /api/auth/verify, /api/auth/register, /api/auth/login (public)",
                "profile": "/api/auth/me (protected)",
                "addresses": "/api/addresses[/:id] (protected)",
                "weather": "/api/addresses/:id/weather[/history] (protected)",
                "user_plants": "/api/user-plants[/:id] (protected)",
                "care_logs": "/api/care-logs[/:id], /api/care-logs/plant/:plant_id[/statistics] (protected)",
                "plants": "/api/plants[/:id], /api/plants/search, /api/plants/filter/common-name (protected)",
            }
        }
    }))
}

async fn health(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match sqlx::query("SELECT 1").execute(&state.db).await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "success": false,
                "error": "database unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "database_error": e.to_string()
                }
            })),
        ),
    }
}
