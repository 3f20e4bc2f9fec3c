//! Session middleware configuration for admin.
//!
//! Sessions are `PostgreSQL`-backed in production and held in memory for
//! local runs and tests. Either way the cookie is HTTP-only, `SameSite=Strict`
//! and expires after seven days without activity.

use tower_sessions::cookie::SameSite;
use tower_sessions::cookie::time::Duration;
use tower_sessions::{Expiry, SessionManagerLayer, SessionStore};

use crate::config::AdminConfig;

/// Session cookie name for admin.
pub const SESSION_COOKIE_NAME: &str = "vitrine_admin_session";

/// Session expiry in seconds (7 days).
pub const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Create the session layer over `store`.
#[must_use]
pub fn create_session_layer<S>(store: S, config: &AdminConfig) -> SessionManagerLayer<S>
where
    S: SessionStore + Clone,
{
    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(Duration::seconds(SESSION_EXPIRY_SECONDS)))
        .with_secure(config.is_secure())
        .with_same_site(SameSite::Strict)
        .with_http_only(true)
        .with_path("/")
}
