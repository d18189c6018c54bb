pub mod auth;
pub mod session;

pub use auth::RequireAdmin;
pub use session::{CurrentSession, SESSION_COOKIE};
