//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET    /                     - Redirect to the dashboard
//! GET    /dashboard            - Collection counts and recent applications
//!
//! # Auth
//! GET    /login                - Login page (redirects to /dashboard when signed in)
//! POST   /login                - Sign in with email and password
//! POST   /logout               - Logout
//! POST   /api/auth/session     - Create a session from an id token
//! DELETE /api/auth/session     - End the session
//!
//! # Catalog API
//! *      /api/admin/...        - See [`api`]
//! ```

pub mod api;
pub mod auth;
pub mod dashboard;

use axum::{Router, response::Redirect, routing::get};

use crate::middleware::auth::DASHBOARD_PATH;
use crate::state::AppState;

/// Build the admin router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { Redirect::to(DASHBOARD_PATH) }))
        .route("/dashboard", get(dashboard::dashboard))
        .merge(auth::router())
        .nest("/api/admin", api::router())
}
