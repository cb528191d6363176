mod login;
mod register;
mod token;

pub use login::login_post;
pub use register::register_post;
pub use token::{refresh_post, token_post, verify_get};
