pub mod auth;
pub mod require_admin;

pub use auth::{jwt_auth, CurrentUser};
pub use require_admin::require_admin;
