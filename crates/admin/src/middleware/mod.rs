//! Middleware for the admin panel.

pub mod auth;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use auth::{
    AdminAuthRejection, OptionalAdminAuth, RequireAdminAuth, clear_current_admin,
    set_current_admin,
};
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
pub use session::{SESSION_COOKIE_NAME, create_session_layer};
