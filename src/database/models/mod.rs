pub mod address;
pub mod care_log;
pub mod subscription;
pub mod user;
pub mod user_plant;
pub mod weather;

pub use address::Address;
pub use care_log::PlantCareLog;
pub use subscription::Subscription;
pub use user::{User, UserDto};
pub use user_plant::{UserPlant, UserPlantWithAddress};
pub use weather::WeatherData;
