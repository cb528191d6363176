pub mod addresses;
pub mod auth;
pub mod care_logs;
pub mod plants;
pub mod user_plants;
pub mod weather;
