//! Sign-in, sign-out and session endpoints.
//!
//! Two ways in, both ending in the same session:
//!
//! - the `/login` form posts email and password; the server signs in with
//!   the identity provider and verifies the resulting id token;
//! - a client that already holds an id token posts it to
//!   `POST /api/auth/session`.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form, Json, Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::{info, instrument, warn};

use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::auth::DASHBOARD_PATH;
use crate::middleware::{OptionalAdminAuth, clear_current_admin, set_current_admin};
use crate::models::CurrentAdmin;
use crate::services::IdentityError;
use crate::state::AppState;

/// Build the auth router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", get(login_page).post(login_submit))
        .route("/logout", post(logout))
        .route(
            "/api/auth/session",
            post(create_session).delete(delete_session),
        )
}

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub email: String,
    pub error: Option<&'static str>,
}

/// Verify `id_token`, check the allowlist and store the admin in the session.
async fn start_session(state: &AppState, session: &Session, id_token: &str) -> Result<CurrentAdmin> {
    let identity = state.identity().lookup(id_token).await?;

    if !state.config().is_allowed(&identity.email) {
        warn!(email = %identity.email, "Sign-in rejected: not on the admin allowlist");
        return Err(AppError::Forbidden("account is not an admin".to_string()));
    }

    let admin = CurrentAdmin::from(identity);
    set_current_admin(session, &admin).await?;
    info!(uid = %admin.uid, email = %admin.email, "Admin signed in");
    Ok(admin)
}

/// Render the login page, or skip it when already signed in.
///
/// GET /login
#[instrument(skip_all)]
async fn login_page(OptionalAdminAuth(admin): OptionalAdminAuth) -> Response {
    if admin.is_some() {
        return Redirect::to(DASHBOARD_PATH).into_response();
    }
    LoginTemplate {
        email: String::new(),
        error: None,
    }
    .into_response()
}

/// Submitted login form.
#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Sign in with email and password.
///
/// POST /login
#[instrument(skip_all, fields(email = %form.email.trim()))]
async fn login_submit(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Response {
    let email = form.email.trim().to_string();
    let rejected = |status: StatusCode, error: &'static str| {
        (
            status,
            LoginTemplate {
                email: email.clone(),
                error: Some(error),
            },
        )
            .into_response()
    };

    if email.is_empty() || form.password.is_empty() {
        return rejected(StatusCode::BAD_REQUEST, "Enter your email and password.");
    }

    let password = SecretString::from(form.password);
    let signed_in = match state.identity().sign_in(&email, &password).await {
        Ok(id_token) => start_session(&state, &session, &id_token).await,
        Err(e) => Err(AppError::Identity(e)),
    };

    match signed_in {
        Ok(_) => Redirect::to(DASHBOARD_PATH).into_response(),
        Err(AppError::Identity(IdentityError::Disabled)) => {
            rejected(StatusCode::UNAUTHORIZED, "This account is disabled.")
        }
        Err(AppError::Identity(e)) if e.is_client_error() => {
            info!("Sign-in failed: invalid credentials");
            rejected(StatusCode::UNAUTHORIZED, "Invalid email or password.")
        }
        Err(AppError::Forbidden(_)) => rejected(
            StatusCode::FORBIDDEN,
            "This account does not have access to the admin panel.",
        ),
        Err(e) => {
            let event_id = sentry::capture_error(&e);
            tracing::error!(error = %e, sentry_event_id = %event_id, "Sign-in failed");
            rejected(
                StatusCode::BAD_GATEWAY,
                "Sign-in is unavailable right now. Try again in a minute.",
            )
        }
    }
}

/// Logout and clear session.
///
/// POST /logout
#[instrument(skip_all)]
async fn logout(session: Session) -> Redirect {
    if let Err(e) = clear_current_admin(&session).await {
        warn!(error = %e, "Failed to clear admin session");
    }
    Redirect::to("/login")
}

/// Body of `POST /api/auth/session`.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRequest {
    #[serde(default)]
    pub id_token: String,
}

/// The admin a new session belongs to.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub uid: String,
    pub email: String,
}

/// Exchange an id token for a session cookie.
///
/// POST /api/auth/session
#[instrument(skip_all)]
async fn create_session(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<SessionRequest>,
) -> Result<Json<SessionResponse>> {
    let id_token = body.id_token.trim();
    if id_token.is_empty() {
        return Err(AppError::BadRequest("idToken is required".to_string()));
    }

    let admin = start_session(&state, &session, id_token).await?;
    Ok(Json(SessionResponse {
        uid: admin.uid,
        email: admin.email,
    }))
}

/// End the session.
///
/// DELETE /api/auth/session
#[instrument(skip_all)]
async fn delete_session(session: Session) -> Result<StatusCode> {
    clear_current_admin(&session).await?;
    Ok(StatusCode::NO_CONTENT)
}
