//! Contact form route handlers.
//!
//! A valid submission is stored as an application with status `new` and the
//! visitor is redirected back to the page with a thank-you note. Invalid
//! input and store failures re-render the form with what was typed.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::{error, info, instrument};
use vitrine_core::ApplicationForm;
use vitrine_data::ApplicationRepository;

use crate::filters;
use crate::middleware::Lang;
use crate::state::AppState;
use crate::views::PageContext;

/// Values echoed back into the form.
#[derive(Debug, Clone, Default)]
pub struct ContactFormView {
    pub name: String,
    pub surname: String,
    pub phone_number: String,
    pub email: String,
    pub message: String,
}

impl From<&ApplicationForm> for ContactFormView {
    fn from(form: &ApplicationForm) -> Self {
        Self {
            name: form.name.clone(),
            surname: form.surname.clone(),
            phone_number: form.phone_number.clone(),
            email: form.email.clone(),
            message: form.message.clone().unwrap_or_default(),
        }
    }
}

#[derive(Template, WebTemplate)]
#[template(path = "contact.html")]
pub struct ContactTemplate {
    pub page: PageContext,
    pub form: ContactFormView,
    pub sent: bool,
    /// Form-level error message.
    pub error: Option<&'static str>,
    /// Name of the field the error belongs to, if any.
    pub error_field: Option<&'static str>,
}

impl ContactTemplate {
    fn new(page: PageContext) -> Self {
        Self {
            page,
            form: ContactFormView::default(),
            sent: false,
            error: None,
            error_field: None,
        }
    }

    /// Whether `field` failed validation.
    #[must_use]
    pub fn has_error(&self, field: &str) -> bool {
        self.error_field == Some(field)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct ContactParams {
    pub sent: Option<String>,
}

/// Display the contact form.
#[instrument(skip_all, fields(locale = %locale))]
pub async fn show(Lang(locale): Lang, Query(params): Query<ContactParams>) -> ContactTemplate {
    ContactTemplate {
        sent: params.sent.is_some(),
        ..ContactTemplate::new(PageContext::new(locale, "/contact"))
    }
}

/// Handle a contact form submission.
///
/// Validation runs before anything is written.
#[instrument(skip_all, fields(locale = %locale))]
pub async fn submit(
    State(state): State<AppState>,
    Lang(locale): Lang,
    Form(form): Form<ApplicationForm>,
) -> Response {
    let mut template = ContactTemplate {
        form: ContactFormView::from(&form),
        ..ContactTemplate::new(PageContext::new(locale, "/contact"))
    };

    let application = match form.validate() {
        Ok(application) => application,
        Err(e) => {
            info!(field = e.field(), error = %e, "Contact form rejected");
            template.error = Some(template.page.t.validation(&e));
            template.error_field = Some(e.field());
            return (StatusCode::BAD_REQUEST, template).into_response();
        }
    };

    match ApplicationRepository::new(state.store())
        .create(&application)
        .await
    {
        Ok(created) => {
            info!(application_id = %created.id, "Application received");
            Redirect::to("/contact?sent=1").into_response()
        }
        Err(e) => {
            let event_id = sentry::capture_error(&e);
            error!(error = %e, sentry_event_id = %event_id, "Failed to store application");
            template.error = Some(template.page.t.contact_failed);
            (StatusCode::BAD_GATEWAY, template).into_response()
        }
    }
}
