pub mod tier;
pub mod trefle;
pub mod users;
pub mod weather;
